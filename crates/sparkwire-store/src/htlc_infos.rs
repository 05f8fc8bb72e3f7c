//! Per-commitment HTLC index.
//!
//! Remembers which HTLCs were in flight in each commitment of a channel so a
//! penalty transaction can be built if a revoked commitment is broadcast.
//! Append-only: rows disappear only when their channel is removed.

use rusqlite::params;
use sparkwire_shared::{ChannelId, CltvExpiry, PaymentHash};

use crate::database::Database;
use crate::error::Result;
use crate::models::HtlcInfo;
use crate::sql::{read_id, to_sql_int};

impl Database {
    /// Record one HTLC of a commitment.
    ///
    /// There is no duplicate detection: the same arguments twice produce two
    /// rows. The channel must exist.
    pub fn add_htlc_info(
        &self,
        channel_id: ChannelId,
        commitment_number: u64,
        payment_hash: PaymentHash,
        cltv_expiry: CltvExpiry,
    ) -> Result<()> {
        let commitment = to_sql_int(commitment_number, "commitment_number")?;

        self.conn().execute(
            "INSERT INTO htlc_infos (channel_id, commitment_number, payment_hash, cltv_expiry)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                channel_id.as_bytes().as_slice(),
                commitment,
                payment_hash.as_bytes().as_slice(),
                cltv_expiry.height(),
            ],
        )?;

        tracing::debug!(
            channel_id = %channel_id,
            commitment_number,
            payment_hash = %payment_hash,
            cltv_expiry = %cltv_expiry,
            "htlc info added"
        );
        Ok(())
    }

    /// All HTLCs recorded for one commitment of a channel, in no particular
    /// order. Empty when none are known.
    pub fn list_htlc_infos(
        &self,
        channel_id: ChannelId,
        commitment_number: u64,
    ) -> Result<Vec<HtlcInfo>> {
        let commitment = to_sql_int(commitment_number, "commitment_number")?;

        let mut stmt = self.conn().prepare(
            "SELECT payment_hash, cltv_expiry
             FROM htlc_infos
             WHERE channel_id = ?1 AND commitment_number = ?2",
        )?;

        let rows = stmt.query_map(
            params![channel_id.as_bytes().as_slice(), commitment],
            |row| {
                Ok(HtlcInfo {
                    payment_hash: read_id(row, 0, "payment_hash")?,
                    cltv_expiry: CltvExpiry(row.get(1)?),
                })
            },
        )?;

        let mut infos = Vec::new();
        for row in rows {
            infos.push(row?);
        }
        Ok(infos)
    }
}
