//! Logging bootstrap for the monitor.
//!
//! Centralizes tracing-subscriber setup so host applications can pick an
//! output profile without wiring the subscriber themselves. Libraries in
//! this workspace only emit through `tracing` macros; installing (or not
//! installing) a subscriber stays the application's choice.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy)]
pub enum LoggingMode {
    /// No output
    Silent,
    /// Compact stderr output for development
    Development,
    /// Verbose diagnostics with source locations
    Debug,
}

impl LoggingMode {
    /// Mode matching a config's `debug` flag.
    pub fn for_debug_flag(debug: bool) -> Self {
        if debug {
            Self::Debug
        } else {
            Self::Development
        }
    }
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Initialize logging with the specified mode
///
/// Call early in the application lifecycle, before the monitor dispatches
/// its first event.
///
/// # Environment Variables
///
/// - `CONFWATCH_LOG_LEVEL`: Override log level (error, warn, info, debug, trace)
/// - `RUST_LOG`: Standard fallback filter
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let subscriber = Registry::default()
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .compact(),
                )
                .with(env_filter("info"));

            subscriber
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let subscriber = Registry::default()
                .with(
                    fmt::layer()
                        .pretty()
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(env_filter("debug"));

            subscriber
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Initialize logging from the `CONFWATCH_LOG_MODE` environment variable
///
/// - "development" -> LoggingMode::Development
/// - "debug" -> LoggingMode::Debug
///
/// Defaults to Silent if not specified or invalid.
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = match std::env::var("CONFWATCH_LOG_MODE").as_deref() {
        Ok("development") => LoggingMode::Development,
        Ok("debug") => LoggingMode::Debug,
        _ => LoggingMode::Silent,
    };

    init_logging(mode)
}

/// Build an environment filter with fallback to a default level
fn env_filter(default_level: &str) -> EnvFilter {
    if let Ok(level) = std::env::var("CONFWATCH_LOG_LEVEL") {
        EnvFilter::new(level)
    } else if let Ok(rust_log) = std::env::var("RUST_LOG") {
        EnvFilter::new(rust_log)
    } else {
        EnvFilter::new(default_level)
    }
}

/// Check if a tracing subscriber has already been installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}
