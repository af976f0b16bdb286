use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the conference monitor.
///
/// Only construction and attachment report errors to the caller; everything
/// that happens during event dispatch terminates in a log statement instead.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The supplied configuration cannot start a session
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be decoded
    #[error("failed to decode config file: {0}")]
    ConfigDecode(#[from] serde_json::Error),

    /// The monitor is already subscribed to an event source
    #[error("monitor is already attached to an event source")]
    AlreadyAttached,
}

/// Result type for monitor operations
pub type Result<T> = std::result::Result<T, MonitorError>;
