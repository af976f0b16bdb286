//! Typed client for the call-quality monitoring backend.
//!
//! This crate wraps the backend's four primitives (initialize, connection
//! registration, error report, fabric event) behind a thin validating
//! client. The backend itself is consumed through the [`MonitoringBackend`]
//! trait; completion is reported through callbacks that the caller does not
//! await.

mod codes;
mod error;
mod stats;

pub use codes::{FabricEvent, TransportUsage, WebRtcFunction};
pub use error::ClientError;
pub use stats::{StreamDirection, StreamStats, TransportStats};

use std::sync::Arc;

use conference_events::{ConferenceId, PeerConnection, UserId};

/// Application credentials issued by the monitoring backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Application identifier.
    pub app_id: String,
    /// Application secret.
    pub app_secret: String,
}

impl Credentials {
    /// Create credentials from an id/secret pair.
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        }
    }
}

/// Session-level options forwarded to the backend on initialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOptions {
    /// Application version reported alongside every session.
    pub application_version: String,
    /// Ask the backend not to install its own page-unload handler.
    pub disable_unload_handler: bool,
}

/// Failure reported asynchronously by the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("backend failure {code}: {message}")]
pub struct BackendFailure {
    /// Backend error code.
    pub code: i32,
    /// Descriptive message.
    pub message: String,
}

impl BackendFailure {
    /// Create a new backend failure record.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Callback reporting the outcome of an initialize invocation.
pub type InitCallback = Box<dyn FnOnce(Result<(), BackendFailure>) + Send>;

/// Callback reporting the outcome of a connection registration.
pub type CompletionCallback = Box<dyn FnOnce(Result<(), BackendFailure>) + Send>;

/// Callback receiving periodic transport statistics.
pub type StatsCallback = Box<dyn Fn(TransportStats) + Send + Sync>;

/// The monitoring backend's primitives, as consumed by the bridge.
///
/// Every operation is fire-and-forget from the caller's perspective:
/// outcomes arrive through the supplied callbacks, possibly on another
/// thread, and are never awaited.
pub trait MonitoringBackend: Send + Sync {
    /// Establish the backend session for the local participant.
    fn initialize(
        &self,
        credentials: &Credentials,
        local_user: &UserId,
        on_init: InitCallback,
        on_stats: StatsCallback,
        options: &BackendOptions,
    );

    /// Register a transport as a monitored fabric within a conference.
    fn add_connection(
        &self,
        peer_connection: &PeerConnection,
        remote_user: &str,
        usage: TransportUsage,
        conference: &ConferenceId,
        on_complete: CompletionCallback,
    );

    /// Attribute a WebRTC operation failure to a registered transport.
    fn report_error(
        &self,
        peer_connection: &PeerConnection,
        conference: &ConferenceId,
        function: WebRtcFunction,
        error: &str,
    );

    /// Report a fabric event against a registered transport.
    fn send_event(
        &self,
        peer_connection: &PeerConnection,
        event: FabricEvent,
        conference: &ConferenceId,
    );
}

/// Thin validating wrapper around a [`MonitoringBackend`].
///
/// Owns no state beyond the backend handle. Arguments are checked locally;
/// a call that fails validation never reaches the backend.
#[derive(Clone)]
pub struct StatsClient {
    backend: Arc<dyn MonitoringBackend>,
}

impl StatsClient {
    /// Create a client over the given backend.
    pub fn new(backend: Arc<dyn MonitoringBackend>) -> Self {
        Self { backend }
    }

    /// Invoke backend initialization for the local participant.
    ///
    /// Rejects empty credentials locally. Completion is reported through
    /// `on_init`; no automatic retry is attempted.
    pub fn initialize(
        &self,
        credentials: &Credentials,
        local_user: &UserId,
        on_init: InitCallback,
        on_stats: StatsCallback,
        options: &BackendOptions,
    ) -> Result<(), ClientError> {
        if credentials.app_id.is_empty() {
            return Err(ClientError::Configuration("app id is empty".to_string()));
        }
        if credentials.app_secret.is_empty() {
            return Err(ClientError::Configuration(
                "app secret is empty".to_string(),
            ));
        }

        tracing::debug!(user = %local_user, version = %options.application_version, "initializing backend session");
        self.backend
            .initialize(credentials, local_user, on_init, on_stats, options);
        Ok(())
    }

    /// Register a transport as a monitored fabric.
    ///
    /// All three identifying arguments must be non-empty; a missing one
    /// aborts the call before any backend contact. Registration always uses
    /// the multiplexed usage mode.
    pub fn register_connection(
        &self,
        peer_connection: &PeerConnection,
        remote_user: &str,
        conference: &ConferenceId,
        on_complete: CompletionCallback,
    ) -> Result<(), ClientError> {
        if peer_connection.is_empty() {
            return Err(ClientError::FaultyParameters {
                field: "peer_connection",
            });
        }
        if remote_user.is_empty() {
            return Err(ClientError::FaultyParameters {
                field: "remote_user",
            });
        }
        if conference.is_empty() {
            return Err(ClientError::FaultyParameters {
                field: "conference",
            });
        }

        tracing::debug!(%peer_connection, %conference, remote_user, "registering connection");
        self.backend.add_connection(
            peer_connection,
            remote_user,
            TransportUsage::Multiplex,
            conference,
            on_complete,
        );
        Ok(())
    }

    /// Attribute a WebRTC operation failure to a registered transport.
    pub fn report_error(
        &self,
        peer_connection: &PeerConnection,
        conference: &ConferenceId,
        function: WebRtcFunction,
        error: &str,
    ) {
        tracing::debug!(%peer_connection, %conference, %function, error, "reporting error");
        self.backend
            .report_error(peer_connection, conference, function, error);
    }

    /// Report a fabric event against a registered transport.
    pub fn notify(
        &self,
        peer_connection: &PeerConnection,
        conference: &ConferenceId,
        event: FabricEvent,
    ) {
        tracing::debug!(%peer_connection, %conference, %event, "sending fabric event");
        self.backend.send_event(peer_connection, event, conference);
    }
}

impl std::fmt::Debug for StatsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsClient").finish_non_exhaustive()
    }
}
