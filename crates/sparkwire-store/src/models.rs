//! Records returned by the store.

use sparkwire_shared::{ChannelId, CltvExpiry, PaymentHash};

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// A decoded channel together with its soft-delete flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredChannel<S> {
    pub state: S,
    /// Set once the channel has been removed; never cleared.
    pub is_closed: bool,
}

/// Channel row metadata, read without decoding the state blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSummary {
    pub channel_id: ChannelId,
    /// Size of the encoded state in bytes.
    pub data_len: u64,
    pub is_closed: bool,
}

// ---------------------------------------------------------------------------
// HTLC infos
// ---------------------------------------------------------------------------

/// An HTLC that was in flight in a given commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HtlcInfo {
    pub payment_hash: PaymentHash,
    pub cltv_expiry: CltvExpiry,
}

// ---------------------------------------------------------------------------
// Pending relay
// ---------------------------------------------------------------------------

/// A relay command waiting to be acknowledged on a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRelay {
    pub channel_id: ChannelId,
    pub htlc_id: u64,
    /// Opaque encoded command.
    pub data: Vec<u8>,
}
