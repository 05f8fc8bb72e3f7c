//! Schema of the `channels` logical database: channel records and the HTLC
//! commitment index.

use rusqlite::Transaction;
use sparkwire_shared::constants::CHANNELS_DB_NAME;

use super::{v002_channel_closed, Schema, Upgrade};

pub const CURRENT_VERSION: i64 = 2;

pub const SCHEMA: Schema = Schema {
    db_name: CHANNELS_DB_NAME,
    version: CURRENT_VERSION,
    create,
    upgrades: &[Upgrade {
        from: 1,
        name: "v002_channel_closed",
        apply: v002_channel_closed::up,
    }],
};

/// Tables and index at [`CURRENT_VERSION`].
///
/// No `IF NOT EXISTS`: an unversioned file that already holds these tables
/// must fail to migrate rather than be stamped with a version it lacks.
const CREATE_SQL: &str = r#"
CREATE TABLE local_channels (
    channel_id BLOB NOT NULL PRIMARY KEY,           -- 32-byte channel id
    data       BLOB NOT NULL,                       -- opaque encoded channel state
    is_closed  BOOLEAN NOT NULL DEFAULT 0           -- soft-delete flag, never reset
);

CREATE TABLE htlc_infos (
    channel_id        BLOB NOT NULL,                -- FK -> local_channels(channel_id)
    commitment_number INTEGER NOT NULL,
    payment_hash      BLOB NOT NULL,                -- 32-byte payment hash
    cltv_expiry       INTEGER NOT NULL,             -- absolute block height

    FOREIGN KEY (channel_id) REFERENCES local_channels(channel_id)
);

CREATE INDEX htlc_infos_idx
    ON htlc_infos(channel_id, commitment_number);
"#;

fn create(tx: &Transaction<'_>) -> Result<(), rusqlite::Error> {
    tx.execute_batch(CREATE_SQL)
}
