//! Recording monitoring backend for integration tests.
//!
//! Captures every backend call so tests can assert on exactly what reached
//! the external service, with knobs for completing initialization
//! synchronously, asynchronously, or with a scripted failure.

use std::sync::{Arc, Mutex};

use conference_events::{ConferenceId, PeerConnection, UserId};
use stats_client::{
    BackendFailure, BackendOptions, CompletionCallback, Credentials, FabricEvent, InitCallback,
    MonitoringBackend, StatsCallback, TransportUsage, WebRtcFunction,
};

/// One call observed by the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Initialize {
        app_id: String,
        user: String,
        version: String,
    },
    AddConnection {
        peer_connection: String,
        remote_user: String,
        usage: TransportUsage,
        conference: String,
    },
    ReportError {
        peer_connection: String,
        conference: String,
        function: WebRtcFunction,
        error: String,
    },
    SendEvent {
        peer_connection: String,
        event: FabricEvent,
        conference: String,
    },
}

/// How the backend completes initialize invocations.
enum InitBehavior {
    /// Invoke the init callback with success before returning.
    CompleteOk,
    /// Invoke the init callback with this failure before returning.
    Fail(BackendFailure),
    /// Hold the callback until the test releases it.
    Defer,
}

/// Backend double that records calls and scripts initialization outcomes.
pub struct RecordingBackend {
    calls: Mutex<Vec<BackendCall>>,
    init_behavior: InitBehavior,
    held_inits: Mutex<Vec<InitCallback>>,
    stats_sinks: Mutex<Vec<StatsCallback>>,
}

impl RecordingBackend {
    /// Backend that confirms initialization synchronously.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::with_behavior(InitBehavior::CompleteOk))
    }

    /// Backend that rejects initialization with the given failure.
    pub fn failing_init(code: i32, message: &str) -> Arc<Self> {
        Arc::new(Self::with_behavior(InitBehavior::Fail(BackendFailure::new(
            code, message,
        ))))
    }

    /// Backend that holds init callbacks until [`Self::release_inits`].
    pub fn deferred_init() -> Arc<Self> {
        Arc::new(Self::with_behavior(InitBehavior::Defer))
    }

    fn with_behavior(init_behavior: InitBehavior) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            init_behavior,
            held_inits: Mutex::new(Vec::new()),
            stats_sinks: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of every call recorded so far.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls filtered to connection registrations.
    pub fn registrations(&self) -> Vec<BackendCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, BackendCall::AddConnection { .. }))
            .collect()
    }

    /// Calls filtered to fabric events.
    pub fn events(&self) -> Vec<BackendCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, BackendCall::SendEvent { .. }))
            .collect()
    }

    /// Complete every held init callback with the given outcome.
    pub fn release_inits(&self, outcome: Result<(), BackendFailure>) {
        let held: Vec<InitCallback> = self.held_inits.lock().unwrap().drain(..).collect();
        for callback in held {
            callback(outcome.clone());
        }
    }

    /// Push a stats batch through every registered stats callback.
    pub fn push_stats(&self, stats: stats_client::TransportStats) {
        for sink in self.stats_sinks.lock().unwrap().iter() {
            sink(stats.clone());
        }
    }
}

impl MonitoringBackend for RecordingBackend {
    fn initialize(
        &self,
        credentials: &Credentials,
        local_user: &UserId,
        on_init: InitCallback,
        on_stats: StatsCallback,
        options: &BackendOptions,
    ) {
        self.calls.lock().unwrap().push(BackendCall::Initialize {
            app_id: credentials.app_id.clone(),
            user: local_user.to_string(),
            version: options.application_version.clone(),
        });
        self.stats_sinks.lock().unwrap().push(on_stats);

        match &self.init_behavior {
            InitBehavior::CompleteOk => on_init(Ok(())),
            InitBehavior::Fail(failure) => on_init(Err(failure.clone())),
            InitBehavior::Defer => self.held_inits.lock().unwrap().push(on_init),
        }
    }

    fn add_connection(
        &self,
        peer_connection: &PeerConnection,
        remote_user: &str,
        usage: TransportUsage,
        conference: &ConferenceId,
        on_complete: CompletionCallback,
    ) {
        self.calls.lock().unwrap().push(BackendCall::AddConnection {
            peer_connection: peer_connection.to_string(),
            remote_user: remote_user.to_string(),
            usage,
            conference: conference.to_string(),
        });
        on_complete(Ok(()));
    }

    fn report_error(
        &self,
        peer_connection: &PeerConnection,
        conference: &ConferenceId,
        function: WebRtcFunction,
        error: &str,
    ) {
        self.calls.lock().unwrap().push(BackendCall::ReportError {
            peer_connection: peer_connection.to_string(),
            conference: conference.to_string(),
            function,
            error: error.to_string(),
        });
    }

    fn send_event(
        &self,
        peer_connection: &PeerConnection,
        event: FabricEvent,
        conference: &ConferenceId,
    ) {
        self.calls.lock().unwrap().push(BackendCall::SendEvent {
            peer_connection: peer_connection.to_string(),
            event,
            conference: conference.to_string(),
        });
    }
}
