//! # sparkwire-store
//!
//! Persistent channel state for a sparkwire node, backed by SQLite.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection`. Opening it runs the schema migrations once; after
//! that it offers:
//!
//! - channel records: opaque encoded state per channel, soft-deleted on removal
//! - the HTLC commitment index used to punish revoked commitments
//! - pending relay commands, cleared together with their channel

pub mod channels;
pub mod config;
pub mod database;
pub mod htlc_infos;
pub mod migrations;
pub mod models;
pub mod pending_relay;

mod error;
mod sql;

#[cfg(test)]
mod test_support;

pub use config::StoreConfig;
pub use database::Database;
pub use error::{Result, StoreError};
pub use migrations::{run_migrations, MigrationReport, SchemaAction};
pub use models::*;
