//! Runtime configuration resolved from the process environment.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Resolution never touches the filesystem.

use crate::logging::{default_log_level, normalize_level, LoggingError};
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_DB_PATH: &str = "PHOTODESK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "PHOTODESK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PHOTODESK_LOG_DIR";
pub const ENV_SUPER_DUPER: &str = "PHOTODESK_SUPER_DUPER";

const DEFAULT_DB_FILE_NAME: &str = "photodesk.sqlite3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}: {source}")]
    LogLevel {
        key: &'static str,
        source: LoggingError,
    },
    #[error("{key}: expected a boolean, got `{value}`")]
    InvalidBool { key: &'static str, value: String },
    #[error("{key} must be an absolute path, got `{value}`")]
    RelativePath { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite database file. Defaults to a file in the temp directory.
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// File logging is enabled only when set.
    pub log_dir: Option<PathBuf>,
    /// Switches the `/value` probe to its fixed "Super Duper" reply.
    pub super_duper: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            super_duper: false,
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(|source| ConfigError::LogLevel {
                key: ENV_LOG_LEVEL,
                source,
            })?;
        }

        if let Some(dir) = read(ENV_LOG_DIR) {
            let path = PathBuf::from(&dir);
            if !path.is_absolute() {
                return Err(ConfigError::RelativePath {
                    key: ENV_LOG_DIR,
                    value: dir,
                });
            }
            config.log_dir = Some(path);
        }

        if let Some(flag) = read(ENV_SUPER_DUPER) {
            config.super_duper = parse_bool(ENV_SUPER_DUPER, &flag)?;
        }

        Ok(config)
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: value.to_string(),
        }),
    }
}
