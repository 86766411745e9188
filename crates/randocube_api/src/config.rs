//! Environment-driven API configuration.
//!
//! # Invariants
//! - A data path ending in `.json` selects the JSON save-file provider; any
//!   other path selects SQLite.
//! - Logging stays disabled unless a log directory is configured.

use randocube_core::default_log_level;
use std::path::{Path, PathBuf};

pub const DATA_PATH_ENV: &str = "RANDOCUBE_DATA_PATH";
pub const LOG_LEVEL_ENV: &str = "RANDOCUBE_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "RANDOCUBE_LOG_DIR";
const DEFAULT_DATA_FILE_NAME: &str = "randocube.json";

/// Persistence provider selected for a data path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Json,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub data_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            data_path: std::env::temp_dir().join(DEFAULT_DATA_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl ApiConfig {
    /// Builds a config from `RANDOCUBE_*` variables, falling back to defaults
    /// for unset or blank values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            data_path: read(DATA_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }

    pub fn backend(&self) -> StoreBackend {
        backend_for(&self.data_path)
    }
}

fn backend_for(path: &Path) -> StoreBackend {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        StoreBackend::Json
    } else {
        StoreBackend::Sqlite
    }
}
