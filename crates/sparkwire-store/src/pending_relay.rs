use rusqlite::params;
use sparkwire_shared::ChannelId;

use crate::database::Database;
use crate::error::Result;
use crate::models::PendingRelay;
use crate::sql::{read_id, read_u64, to_sql_int};

impl Database {
    /// Store a relay command. A command already stored for the same HTLC is kept.
    pub fn add_pending_relay(&self, channel_id: ChannelId, htlc_id: u64, data: &[u8]) -> Result<()> {
        self.conn().execute(
            "INSERT OR IGNORE INTO pending_relay (channel_id, htlc_id, data)
             VALUES (?1, ?2, ?3)",
            params![
                channel_id.as_bytes().as_slice(),
                to_sql_int(htlc_id, "htlc_id")?,
                data,
            ],
        )?;
        Ok(())
    }

    /// Returns `true` if a command was removed.
    pub fn remove_pending_relay(&self, channel_id: ChannelId, htlc_id: u64) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM pending_relay WHERE channel_id = ?1 AND htlc_id = ?2",
            params![
                channel_id.as_bytes().as_slice(),
                to_sql_int(htlc_id, "htlc_id")?,
            ],
        )?;
        Ok(affected > 0)
    }

    pub fn list_pending_relay(&self, channel_id: ChannelId) -> Result<Vec<PendingRelay>> {
        let mut stmt = self.conn().prepare(
            "SELECT channel_id, htlc_id, data
             FROM pending_relay
             WHERE channel_id = ?1
             ORDER BY htlc_id ASC",
        )?;

        let rows = stmt.query_map(params![channel_id.as_bytes().as_slice()], |row| {
            Ok(PendingRelay {
                channel_id: read_id(row, 0, "channel_id")?,
                htlc_id: read_u64(row, 1)?,
                data: row.get(2)?,
            })
        })?;

        let mut relays = Vec::new();
        for row in rows {
            relays.push(row?);
        }
        Ok(relays)
    }
}
