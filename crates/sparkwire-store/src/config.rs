//! Store configuration loaded from environment variables.
//!
//! Every setting has a default, so a node can open its channel store with
//! zero configuration.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use sparkwire_shared::constants::{APP_NAME, CHANNELS_DB_FILE};

use crate::error::{Result, StoreError};

/// Channel store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Explicit database file.
    /// Env: `SPARKWIRE_DB_PATH`
    /// Default: `channels.sqlite` in the platform data directory.
    pub db_path: Option<PathBuf>,

    /// SQLite journal mode.
    /// Env: `SPARKWIRE_JOURNAL_MODE`
    /// Default: `WAL`
    pub journal_mode: String,

    /// How long a statement waits on a locked database before failing.
    /// Env: `SPARKWIRE_BUSY_TIMEOUT_MS`
    /// Default: `5000`
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            journal_mode: "WAL".to_string(),
            busy_timeout_ms: 5_000,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("SPARKWIRE_DB_PATH") {
            if !path.is_empty() {
                config.db_path = Some(PathBuf::from(path));
            }
        }

        if let Some(mode) = lookup("SPARKWIRE_JOURNAL_MODE") {
            if !mode.is_empty() {
                config.journal_mode = mode.to_uppercase();
            }
        }

        if let Some(val) = lookup("SPARKWIRE_BUSY_TIMEOUT_MS") {
            match val.parse::<u64>() {
                Ok(ms) => config.busy_timeout_ms = ms,
                Err(_) => {
                    tracing::warn!(
                        value = %val,
                        "Invalid SPARKWIRE_BUSY_TIMEOUT_MS, using default"
                    );
                }
            }
        }

        config
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Resolve the database file, creating the platform data directory when
    /// no explicit path is configured.
    ///
    /// - Linux:   `~/.local/share/sparkwire/channels.sqlite`
    /// - macOS:   `~/Library/Application Support/org.sparkwire.sparkwire/channels.sqlite`
    /// - Windows: `{FOLDERID_RoamingAppData}\sparkwire\sparkwire\data\channels.sqlite`
    pub fn resolve_db_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }

        let project_dirs =
            ProjectDirs::from("org", APP_NAME, APP_NAME).ok_or(StoreError::NoDataDir)?;
        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(CHANNELS_DB_FILE))
    }
}
