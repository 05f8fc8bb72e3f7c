//! Schema of the `pending_relay` logical database: relay commands for HTLCs
//! that have not been acknowledged yet.

use rusqlite::Transaction;
use sparkwire_shared::constants::PENDING_RELAY_DB_NAME;

use super::Schema;

pub const CURRENT_VERSION: i64 = 1;

pub const SCHEMA: Schema = Schema {
    db_name: PENDING_RELAY_DB_NAME,
    version: CURRENT_VERSION,
    create,
    upgrades: &[],
};

const CREATE_SQL: &str = r#"
CREATE TABLE pending_relay (
    channel_id BLOB NOT NULL,       -- 32-byte channel id
    htlc_id    INTEGER NOT NULL,
    data       BLOB NOT NULL,       -- opaque encoded relay command

    PRIMARY KEY (channel_id, htlc_id)
);
"#;

fn create(tx: &Transaction<'_>) -> Result<(), rusqlite::Error> {
    tx.execute_batch(CREATE_SQL)
}
