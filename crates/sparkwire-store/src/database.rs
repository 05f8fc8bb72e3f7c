//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees that
//! migrations have run before any other operation. It is a single-writer
//! handle: callers serialize access to it, and it takes no locks of its own.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::migrations::{self, MigrationReport};

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
    migration_report: MigrationReport,
}

impl Database {
    /// Open (or create) the database described by `config`.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let db_path = config.resolve_db_path()?;
        Self::open_at(&db_path, config)
    }

    /// Open (or create) a database at an explicit path.
    pub fn open_at(path: &Path, config: &StoreConfig) -> Result<Self> {
        tracing::info!(path = %path.display(), "opening channel database");

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", config.journal_mode.as_str())?;
        conn.busy_timeout(config.busy_timeout())?;

        Self::from_connection(conn)
    }

    /// Open a private in-memory database, mostly useful for tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Take ownership of an already opened connection and migrate it.
    ///
    /// Fails, and drops the connection, if the schema cannot be brought to the
    /// current version.
    pub fn from_connection(mut conn: Connection) -> Result<Self> {
        let migration_report = migrations::run_migrations(&mut conn)?;

        if migration_report.changed() {
            tracing::info!(actions = ?migration_report.actions, "database schema updated");
        }

        Ok(Self {
            conn,
            migration_report,
        })
    }

    /// What the migration run at construction did.
    pub fn migration_report(&self) -> &MigrationReport {
        &self.migration_report
    }

    /// Recorded schema version of a logical database.
    pub fn schema_version(&self, db_name: &str) -> Result<Option<i64>> {
        migrations::read_version(&self.conn, db_name)
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    ///
    /// Callers should prefer the typed helpers, but direct access is
    /// occasionally needed for ad-hoc queries.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }

    /// Release the connection, reporting any error SQLite raises on close.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        Ok(())
    }
}
