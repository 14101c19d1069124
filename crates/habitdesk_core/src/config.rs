//! Process configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve the database path, log level and optional log directory once.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - The log level is not validated here; `init_logging` reports bad levels.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "HABITDESK_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "HABITDESK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "HABITDESK_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "habitdesk.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging is disabled when this is `None`.
    pub log_dir: Option<String>,
}

impl CoreConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup` instead of the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV),
        }
    }
}
