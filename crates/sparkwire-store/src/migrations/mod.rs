//! Database migration runner.
//!
//! Each logical database (`channels`, `pending_relay`) records its schema
//! version in the `versions` ledger. [`run_migrations`] must run once, before
//! any other statement touches the data tables; every [`Database`]
//! constructor calls it.
//!
//! For each logical database the runner either creates the tables at the
//! current version, applies the forward upgrades from the recorded version in
//! strict order, or does nothing. A version it does not know aborts the whole
//! run. Everything happens inside a single transaction, so a failure leaves
//! the file exactly as it was.
//!
//! [`Database`]: crate::Database

pub mod channels;
pub mod pending_relay;
pub mod v001_initial;
pub mod v002_channel_closed;

use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::error::{Result, StoreError};

/// One schema operation executed inside the migration transaction.
pub type Step = fn(&Transaction<'_>) -> rusqlite::Result<()>;

/// A forward migration from `from` to `from + 1`.
pub struct Upgrade {
    pub from: i64,
    pub name: &'static str,
    pub apply: Step,
}

/// The tables owned by one logical database name.
pub struct Schema {
    pub db_name: &'static str,
    /// Current version; what `create` produces and what upgrades end at.
    pub version: i64,
    pub create: Step,
    pub upgrades: &'static [Upgrade],
}

/// Schemas in the order they are migrated.
pub const SCHEMAS: &[&Schema] = &[&channels::SCHEMA, &pending_relay::SCHEMA];

const VERSIONS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS versions (
    db_name TEXT NOT NULL PRIMARY KEY,
    version INTEGER NOT NULL
);
"#;

/// What the runner did for one logical database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaAction {
    Created { version: i64 },
    Upgraded { from: i64, to: i64 },
    UpToDate { version: i64 },
}

/// Outcome of a [`run_migrations`] call, one entry per logical database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub actions: Vec<(&'static str, SchemaAction)>,
}

impl MigrationReport {
    pub fn action(&self, db_name: &str) -> Option<SchemaAction> {
        self.actions
            .iter()
            .find(|(name, _)| *name == db_name)
            .map(|(_, action)| *action)
    }

    /// Whether the run changed anything on disk.
    pub fn changed(&self) -> bool {
        self.actions
            .iter()
            .any(|(_, action)| !matches!(action, SchemaAction::UpToDate { .. }))
    }
}

/// Bring every known schema up to its current version.
pub fn run_migrations(conn: &mut Connection) -> Result<MigrationReport> {
    // Must be set outside a transaction; SQLite ignores it inside one.
    conn.pragma_update(None, "foreign_keys", true)?;

    let tx = conn.transaction()?;
    tx.execute_batch(VERSIONS_SQL)?;

    let mut report = MigrationReport::default();
    for schema in SCHEMAS {
        let action = migrate_schema(&tx, schema)?;
        report.actions.push((schema.db_name, action));
    }

    tx.commit()?;
    Ok(report)
}

fn migrate_schema(tx: &Transaction<'_>, schema: &Schema) -> Result<SchemaAction> {
    let recorded = read_version(tx, schema.db_name)?;

    tracing::info!(
        db_name = schema.db_name,
        current_version = ?recorded,
        target_version = schema.version,
        "checking database migrations"
    );

    match recorded {
        None => {
            tracing::info!(db_name = schema.db_name, "creating schema from scratch");
            (schema.create)(tx)?;
            write_version(tx, schema.db_name, schema.version)?;
            Ok(SchemaAction::Created {
                version: schema.version,
            })
        }
        Some(version) if version == schema.version => {
            Ok(SchemaAction::UpToDate { version })
        }
        Some(version) if (1..schema.version).contains(&version) => {
            for from in version..schema.version {
                let upgrade = schema
                    .upgrades
                    .iter()
                    .find(|u| u.from == from)
                    .ok_or_else(|| {
                        StoreError::Migration(format!(
                            "no upgrade from version {from} for '{}'",
                            schema.db_name
                        ))
                    })?;

                tracing::info!(
                    db_name = schema.db_name,
                    from,
                    "applying migration {}",
                    upgrade.name
                );
                (upgrade.apply)(tx)
                    .map_err(|e| StoreError::Migration(format!("{}: {e}", upgrade.name)))?;
            }
            write_version(tx, schema.db_name, schema.version)?;
            Ok(SchemaAction::Upgraded {
                from: version,
                to: schema.version,
            })
        }
        Some(version) => {
            tracing::error!(
                db_name = schema.db_name,
                version,
                "refusing to open database with unknown schema version"
            );
            Err(StoreError::UnknownSchemaVersion {
                db_name: schema.db_name,
                version,
            })
        }
    }
}

/// Read the recorded version of a logical database, if any.
///
/// Returns `None` when either the ledger or the entry does not exist.
pub fn read_version(conn: &Connection, db_name: &str) -> Result<Option<i64>> {
    let ledger_exists: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'versions')",
        [],
        |row| row.get(0),
    )?;
    if !ledger_exists {
        return Ok(None);
    }

    let version = conn
        .query_row(
            "SELECT version FROM versions WHERE db_name = ?1",
            params![db_name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(version)
}

fn write_version(conn: &Connection, db_name: &str, version: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO versions (db_name, version) VALUES (?1, ?2)
         ON CONFLICT(db_name) DO UPDATE SET version = excluded.version",
        params![db_name, version],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
            params![name],
            |row| row.get(0),
        )
        .unwrap()
    }

    fn columns(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .unwrap();
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .collect::<rusqlite::Result<Vec<_>>>()
            .unwrap();
        names
    }

    fn seed_version(conn: &Connection, db_name: &str, version: i64) {
        conn.execute_batch(VERSIONS_SQL).unwrap();
        write_version(conn, db_name, version).unwrap();
    }

    #[test]
    fn fresh_database_is_created_at_current_version() {
        let mut conn = Connection::open_in_memory().unwrap();
        let report = run_migrations(&mut conn).unwrap();

        assert_eq!(
            report.action(channels::SCHEMA.db_name),
            Some(SchemaAction::Created { version: 2 })
        );
        assert_eq!(
            report.action(pending_relay::SCHEMA.db_name),
            Some(SchemaAction::Created { version: 1 })
        );
        assert!(report.changed());
        assert!(columns(&conn, "local_channels").contains(&"is_closed".to_string()));
        assert!(table_exists(&conn, "htlc_infos"));
        assert!(table_exists(&conn, "pending_relay"));
        assert_eq!(read_version(&conn, "channels").unwrap(), Some(2));
    }

    #[test]
    fn second_run_is_a_no_op() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        let report = run_migrations(&mut conn).unwrap();

        assert!(!report.changed());
        assert_eq!(
            report.action("channels"),
            Some(SchemaAction::UpToDate { version: 2 })
        );
    }

    #[test]
    fn version_one_is_upgraded_and_rows_survive() {
        let mut conn = Connection::open_in_memory().unwrap();
        {
            let tx = conn.transaction().unwrap();
            v001_initial::up(&tx).unwrap();
            tx.commit().unwrap();
        }
        seed_version(&conn, "channels", 1);
        conn.execute(
            "INSERT INTO local_channels (channel_id, data) VALUES (?1, ?2)",
            params![[7u8; 32].as_slice(), b"v1-state".as_slice()],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO htlc_infos (channel_id, commitment_number, payment_hash, cltv_expiry)
             VALUES (?1, 3, ?2, 700000)",
            params![[7u8; 32].as_slice(), [9u8; 32].as_slice()],
        )
        .unwrap();
        assert!(!columns(&conn, "local_channels").contains(&"is_closed".to_string()));

        let report = run_migrations(&mut conn).unwrap();
        assert_eq!(
            report.action("channels"),
            Some(SchemaAction::Upgraded { from: 1, to: 2 })
        );

        let (data, is_closed): (Vec<u8>, bool) = conn
            .query_row(
                "SELECT data, is_closed FROM local_channels WHERE channel_id = ?1",
                params![[7u8; 32].as_slice()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(data, b"v1-state");
        assert!(!is_closed);

        let htlcs: i64 = conn
            .query_row("SELECT COUNT(*) FROM htlc_infos", [], |row| row.get(0))
            .unwrap();
        assert_eq!(htlcs, 1);
        assert_eq!(read_version(&conn, "channels").unwrap(), Some(2));
    }

    #[test]
    fn future_version_is_rejected_without_touching_tables() {
        let mut conn = Connection::open_in_memory().unwrap();
        seed_version(&conn, "channels", 3);

        let err = run_migrations(&mut conn).unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnknownSchemaVersion {
                db_name: "channels",
                version: 3
            }
        ));
        assert!(!table_exists(&conn, "local_channels"));
        assert!(!table_exists(&conn, "htlc_infos"));
        assert!(!table_exists(&conn, "pending_relay"));
        assert_eq!(read_version(&conn, "channels").unwrap(), Some(3));
    }

    #[test]
    fn version_zero_is_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        seed_version(&conn, "channels", 0);

        assert!(matches!(
            run_migrations(&mut conn),
            Err(StoreError::UnknownSchemaVersion { version: 0, .. })
        ));
    }

    #[test]
    fn failure_in_later_schema_rolls_back_earlier_ones() {
        let mut conn = Connection::open_in_memory().unwrap();
        seed_version(&conn, "pending_relay", 9);

        assert!(run_migrations(&mut conn).is_err());
        assert!(!table_exists(&conn, "local_channels"));
        assert_eq!(read_version(&conn, "channels").unwrap(), None);
    }

    #[test]
    fn unversioned_file_with_existing_tables_is_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE local_channels (channel_id BLOB NOT NULL PRIMARY KEY, data BLOB NOT NULL);",
        )
        .unwrap();

        assert!(matches!(
            run_migrations(&mut conn),
            Err(StoreError::Sqlite(_))
        ));
        assert!(!columns(&conn, "local_channels").contains(&"is_closed".to_string()));
        assert_eq!(read_version(&conn, "channels").unwrap(), None);
        assert!(!table_exists(&conn, "pending_relay"));
    }

    fn noop(_tx: &Transaction<'_>) -> rusqlite::Result<()> {
        Ok(())
    }

    const GAPPED: Schema = Schema {
        db_name: "gapped",
        version: 3,
        create: noop,
        upgrades: &[Upgrade {
            from: 1,
            name: "v002_gapped",
            apply: noop,
        }],
    };

    #[test]
    fn missing_upgrade_step_is_an_error() {
        let mut conn = Connection::open_in_memory().unwrap();
        seed_version(&conn, "gapped", 2);
        let tx = conn.transaction().unwrap();

        let err = migrate_schema(&tx, &GAPPED).unwrap_err();
        match err {
            StoreError::Migration(msg) => assert!(msg.contains("no upgrade from version 2")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(read_version(&tx, "gapped").unwrap(), Some(2));
    }

    #[test]
    fn foreign_keys_are_enforced_after_migration() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        let enabled: bool = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert!(enabled);
    }
}
