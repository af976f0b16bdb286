//! Error types for the stats client

use thiserror::Error;

/// Errors raised locally by the client before any backend contact.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Application credentials are missing or empty
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A required registration argument is missing
    #[error("faulty parameters: missing {field}")]
    FaultyParameters {
        /// Name of the absent argument
        field: &'static str,
    },

    /// A function name outside the monitored WebRTC vocabulary
    #[error("unknown WebRTC function code: {0}")]
    UnknownFunction(String),

    /// An event name outside the fabric event vocabulary
    #[error("unknown fabric event code: {0}")]
    UnknownEvent(String),
}
