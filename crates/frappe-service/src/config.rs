//! Application configuration module.
//!
//! Configuration is loaded from `FRAPPE_*` environment variables with
//! fallback to defaults.
//!
//! | Variable                      | Default           |
//! |-------------------------------|-------------------|
//! | `FRAPPE_DATABASE_PATH`        | `frappuccino.db`  |
//! | `FRAPPE_MAX_CONNECTIONS`      | `5`               |
//! | `FRAPPE_MIN_CONNECTIONS`      | `1`               |
//! | `FRAPPE_CONNECT_TIMEOUT_SECS` | `30`              |
//! | `FRAPPE_LOG_LEVEL`            | `info`            |
//! | `FRAPPE_LOG_FORMAT`           | `pretty`          |
//! | `FRAPPE_DEFAULT_PAGE_SIZE`    | `10`              |

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use frappe_core::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use frappe_db::DbConfig;

/// Log output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human friendly
    #[default]
    Pretty,
    /// One line per event
    Compact,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(ConfigError::InvalidValue("FRAPPE_LOG_FORMAT".to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Compact => f.write_str("compact"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file, or `:memory:`
    pub database_path: PathBuf,

    /// Pool upper bound
    pub max_connections: u32,

    /// Connections kept open while idle
    pub min_connections: u32,

    /// Seconds to wait for a pooled connection
    pub connect_timeout_secs: u64,

    /// `tracing` filter directive, e.g. `info` or `frappe_db=debug,info`
    pub log_level: String,

    pub log_format: LogFormat,

    /// Page size used when a leftovers request doesn't give one
    pub default_page_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from("frappuccino.db"),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 30,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// `load()` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        let config = AppConfig {
            database_path: lookup("FRAPPE_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            max_connections: parse_or(&lookup, "FRAPPE_MAX_CONNECTIONS", defaults.max_connections)?,

            min_connections: parse_or(&lookup, "FRAPPE_MIN_CONNECTIONS", defaults.min_connections)?,

            connect_timeout_secs: parse_or(
                &lookup,
                "FRAPPE_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,

            log_level: lookup("FRAPPE_LOG_LEVEL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.log_level),

            log_format: parse_or(&lookup, "FRAPPE_LOG_FORMAT", defaults.log_format)?,

            default_page_size: parse_or(
                &lookup,
                "FRAPPE_DEFAULT_PAGE_SIZE",
                defaults.default_page_size,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::OutOfRange {
                key: "FRAPPE_MAX_CONNECTIONS".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::OutOfRange {
                key: "FRAPPE_MIN_CONNECTIONS".to_string(),
                reason: format!("must not exceed FRAPPE_MAX_CONNECTIONS ({})", self.max_connections),
            });
        }
        if self.default_page_size == 0 || self.default_page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::OutOfRange {
                key: "FRAPPE_DEFAULT_PAGE_SIZE".to_string(),
                reason: format!("must be between 1 and {}", MAX_PAGE_SIZE),
            });
        }
        Ok(())
    }

    /// Pool settings for [`frappe_db::Database::new`].
    pub fn to_db_config(&self) -> DbConfig {
        let base = if self.database_path.as_os_str() == frappe_db::pool::IN_MEMORY_PATH {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&self.database_path)
                .max_connections(self.max_connections)
                .min_connections(self.min_connections)
        };

        base.connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("{key} {reason}")]
    OutOfRange { key: String, reason: String },
}
