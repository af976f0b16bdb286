//! Bridges conference lifecycle events to a call-quality monitoring backend.
//!
//! A [`ConferenceMonitor`] subscribes once to an event source, classifies
//! each delivered event, correlates it with the media connection it refers
//! to, and issues the matching monitoring call: session initialize on join,
//! fabric registration when a stream appears, mute/share/termination events,
//! and negotiation error reports. Malformed or unexpected events are logged
//! and dropped; nothing escapes back into the delivery loop.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use confwatch_monitor::{ConferenceMonitor, EventBus, MonitorConfig};
//!
//! let config = MonitorConfig::from_json_file("config/monitoring.json")?;
//! let backend: Arc<dyn confwatch_monitor::MonitoringBackend> = make_backend();
//!
//! let bus = EventBus::new();
//! let monitor = ConferenceMonitor::new(config, backend)?;
//! monitor.attach(&bus)?;
//!
//! // The signalling layer now publishes lifecycle events into `bus`.
//! ```

mod classify;
mod config;
mod dispatcher;
mod error;
pub mod logging;

pub use classify::{classify, Action, IgnoreReason};
pub use config::MonitorConfig;
pub use dispatcher::EventDispatcher;
pub use error::{MonitorError, Result};

// One-stop re-exports for hosts that only depend on this crate.
pub use conference_events::{
    ConferenceEvent, ConferenceId, EventBus, EventPayload, Participant, PeerConnection, RoomRef,
    UserId,
};
pub use session_state::{BackendState, ConnectionKey, ConnectionRole, SessionContext};
pub use stats_client::{
    BackendFailure, BackendOptions, Credentials, FabricEvent, MonitoringBackend, StatsClient,
    TransportStats, WebRtcFunction,
};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Observes a conference's lifecycle events and reports them to the
/// monitoring backend.
///
/// Constructed explicitly from a validated [`MonitorConfig`] and a backend
/// handle, then attached to an [`EventBus`] exactly once. Session state is
/// inspectable through the snapshot accessors.
pub struct ConferenceMonitor {
    dispatcher: Arc<EventDispatcher>,
    context: Arc<Mutex<SessionContext>>,
    attached: AtomicBool,
}

impl ConferenceMonitor {
    /// Create a monitor from a configuration and a backend handle.
    ///
    /// Fails when the configuration cannot start a session (missing
    /// credentials).
    pub fn new(config: MonitorConfig, backend: Arc<dyn MonitoringBackend>) -> Result<Self> {
        config.validate()?;

        let context = Arc::new(Mutex::new(SessionContext::new()));
        let client = StatsClient::new(backend);
        let dispatcher = Arc::new(EventDispatcher::new(
            client,
            Arc::clone(&context),
            config,
        ));

        Ok(Self {
            dispatcher,
            context,
            attached: AtomicBool::new(false),
        })
    }

    /// Subscribe to an event source. May be called once per monitor.
    pub fn attach(&self, bus: &EventBus) -> Result<()> {
        if self.attached.swap(true, Ordering::SeqCst) {
            return Err(MonitorError::AlreadyAttached);
        }

        let dispatcher = Arc::clone(&self.dispatcher);
        bus.subscribe(Box::new(move |event| dispatcher.dispatch(event)));
        tracing::info!("monitor attached to event source");
        Ok(())
    }

    /// Snapshot of the backend lifecycle state.
    pub fn backend_state(&self) -> BackendState {
        self.context.lock().backend_state().clone()
    }

    /// The local participant identity, once a joining event pinned it.
    pub fn local_user(&self) -> Option<UserId> {
        self.context.lock().local_user().cloned()
    }

    /// Number of currently registered connections.
    pub fn connection_count(&self) -> usize {
        self.context.lock().connection_count()
    }
}

impl std::fmt::Debug for ConferenceMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConferenceMonitor")
            .field("attached", &self.attached.load(Ordering::SeqCst))
            .field("backend_state", &self.backend_state())
            .finish_non_exhaustive()
    }
}
