//! Channel records: one row per channel, keyed by channel id.
//!
//! Channel state is opaque to the store. It crosses the boundary through a
//! [`ChannelCodec`] supplied by the caller on every call that reads or writes
//! it.

use rusqlite::{params, OptionalExtension};
use sparkwire_shared::{ChannelCodec, ChannelId, HasChannelId};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{ChannelSummary, StoredChannel};
use crate::sql::{read_id, read_u64};

impl Database {
    // ------------------------------------------------------------------
    // Write
    // ------------------------------------------------------------------

    /// Insert the channel, or replace the stored state of an existing one.
    ///
    /// The closed flag of an existing row is left untouched.
    pub fn add_or_update_channel<C: ChannelCodec>(&self, codec: &C, state: &C::State) -> Result<()> {
        let channel_id = state.channel_id();
        let data = codec.encode(state)?;

        tracing::debug!(channel_id = %channel_id, bytes = data.len(), "storing channel");

        self.conn().execute(
            "INSERT INTO local_channels (channel_id, data, is_closed)
             VALUES (?1, ?2, 0)
             ON CONFLICT(channel_id) DO UPDATE SET data = excluded.data",
            params![channel_id.as_bytes().as_slice(), data],
        )?;
        Ok(())
    }

    /// Soft-delete a channel.
    ///
    /// Drops its pending relay commands and HTLC infos and marks the record
    /// closed, all in one transaction. The record itself stays readable through
    /// [`Database::get_channel`]. Calling this again, or for an unknown
    /// channel, is a no-op.
    pub fn remove_channel(&self, channel_id: ChannelId) -> Result<()> {
        let id = channel_id.as_bytes().as_slice();
        let tx = self.conn().unchecked_transaction()?;

        let relays = tx.execute("DELETE FROM pending_relay WHERE channel_id = ?1", params![id])?;
        let htlcs = tx.execute("DELETE FROM htlc_infos WHERE channel_id = ?1", params![id])?;
        tx.execute(
            "UPDATE local_channels SET is_closed = 1 WHERE channel_id = ?1",
            params![id],
        )?;

        tx.commit()?;

        tracing::debug!(
            channel_id = %channel_id,
            pending_relay_removed = relays,
            htlc_infos_removed = htlcs,
            "channel removed"
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Decode every channel that has not been removed.
    ///
    /// A single undecodable row fails the whole call. Order is unspecified.
    pub fn list_local_channels<C: ChannelCodec>(&self, codec: &C) -> Result<Vec<C::State>> {
        let mut stmt = self.conn().prepare(
            "SELECT channel_id, data
             FROM local_channels
             WHERE is_closed = 0",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((read_id::<ChannelId>(row, 0, "channel_id")?, row.get::<_, Vec<u8>>(1)?))
        })?;

        let mut channels = Vec::new();
        for row in rows {
            let (channel_id, data) = row?;
            channels.push(decode_channel(codec, channel_id, &data)?);
        }
        Ok(channels)
    }

    /// Look a channel up by id, whether or not it has been removed.
    pub fn get_channel<C: ChannelCodec>(
        &self,
        codec: &C,
        channel_id: ChannelId,
    ) -> Result<Option<StoredChannel<C::State>>> {
        let row = self
            .conn()
            .query_row(
                "SELECT data, is_closed FROM local_channels WHERE channel_id = ?1",
                params![channel_id.as_bytes().as_slice()],
                |row| Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, bool>(1)?)),
            )
            .optional()?;

        match row {
            Some((data, is_closed)) => Ok(Some(StoredChannel {
                state: decode_channel(codec, channel_id, &data)?,
                is_closed,
            })),
            None => Ok(None),
        }
    }

    /// Every channel record, open or closed, without decoding state.
    pub fn channel_summaries(&self) -> Result<Vec<ChannelSummary>> {
        let mut stmt = self.conn().prepare(
            "SELECT channel_id, length(data), is_closed
             FROM local_channels
             ORDER BY channel_id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(ChannelSummary {
                channel_id: read_id(row, 0, "channel_id")?,
                data_len: read_u64(row, 1)?,
                is_closed: row.get(2)?,
            })
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }
        Ok(summaries)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn decode_channel<C: ChannelCodec>(codec: &C, channel_id: ChannelId, data: &[u8]) -> Result<C::State> {
    codec.decode(data).map_err(|source| {
        tracing::error!(channel_id = %channel_id, error = %source, "stored channel failed to decode");
        StoreError::CorruptChannel { channel_id, source }
    })
}
