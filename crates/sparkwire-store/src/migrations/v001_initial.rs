//! v001 -- Initial channel schema.
//!
//! Creates `local_channels` without the `is_closed` flag, plus the HTLC
//! commitment index. Fresh databases skip this and are created directly at
//! the current version (see [`super::channels`]); the module remains the
//! reference for what a version 1 file looks like on disk.

use rusqlite::Transaction;

const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Local channels
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS local_channels (
    channel_id BLOB NOT NULL PRIMARY KEY,   -- 32-byte channel id
    data       BLOB NOT NULL                -- opaque encoded channel state
);

-- ----------------------------------------------------------------
-- HTLC infos, one row per in-flight HTLC per commitment
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS htlc_infos (
    channel_id        BLOB NOT NULL,        -- FK -> local_channels(channel_id)
    commitment_number INTEGER NOT NULL,
    payment_hash      BLOB NOT NULL,        -- 32-byte payment hash
    cltv_expiry       INTEGER NOT NULL,     -- absolute block height

    FOREIGN KEY (channel_id) REFERENCES local_channels(channel_id)
);

CREATE INDEX IF NOT EXISTS htlc_infos_idx
    ON htlc_infos(channel_id, commitment_number);
"#;

/// Create the version 1 schema.
pub fn up(tx: &Transaction<'_>) -> Result<(), rusqlite::Error> {
    tx.execute_batch(UP_SQL)
}
