use sparkwire_shared::{ChannelId, CodecError};
use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error, surfaced unchanged.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The version ledger holds a value this build cannot migrate from.
    #[error("Unknown schema version {version} for database '{db_name}'")]
    UnknownSchemaVersion { db_name: &'static str, version: i64 },

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// A stored channel blob could not be decoded.
    #[error("Corrupt channel {channel_id}: {source}")]
    CorruptChannel {
        channel_id: ChannelId,
        #[source]
        source: CodecError,
    },

    /// Channel state could not be encoded.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// A fixed-size column held a value of the wrong length.
    #[error("Invalid {column} blob of {len} bytes")]
    InvalidBlob { column: &'static str, len: usize },

    /// An integer does not fit in a SQLite INTEGER.
    #[error("Value out of range: {0}")]
    OutOfRange(&'static str),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
