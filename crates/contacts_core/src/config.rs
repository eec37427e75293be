//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve database path, import endpoint and logging settings.
//!
//! # Invariants
//! - Blank environment values fall back to defaults.
//! - Resolution never fails; validation happens where values are used.

use crate::import::DEFAULT_IMPORT_URL;
use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "CONTACTS_DB_PATH";
pub const IMPORT_URL_ENV: &str = "CONTACTS_IMPORT_URL";
pub const LOG_LEVEL_ENV: &str = "CONTACTS_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "CONTACTS_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "contacts.sqlite3";

/// Effective settings for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub import_url: String,
    pub log_level: String,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            import_url: DEFAULT_IMPORT_URL.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads `CONTACTS_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, falling back to defaults for
    /// missing or blank values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Self {
            db_path: read(DB_PATH_ENV).map_or(defaults.db_path, PathBuf::from),
            import_url: read(IMPORT_URL_ENV).unwrap_or(defaults.import_url),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}
