//! Logging initialisation.
//!
//! `RUST_LOG` wins over the configured level when it is set.

use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LogFormat};

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter {directive:?}: {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Installs the global `tracing` subscriber.
///
/// Call once, at program start.
pub fn init_tracing(config: &AppConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| TelemetryError::InvalidFilter {
            directive: config.log_level.clone(),
            reason: e.to_string(),
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match config.log_format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    installed.map_err(|_| TelemetryError::AlreadyInitialized)
}
