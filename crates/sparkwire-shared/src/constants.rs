/// Application name
pub const APP_NAME: &str = "sparkwire";

/// Default SQLite file name for the channel store
pub const CHANNELS_DB_FILE: &str = "channels.sqlite";

/// Logical database names recorded in the schema version ledger
pub const CHANNELS_DB_NAME: &str = "channels";
pub const PENDING_RELAY_DB_NAME: &str = "pending_relay";
