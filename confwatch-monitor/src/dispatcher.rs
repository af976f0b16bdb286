//! Event dispatch: classification, correlation, delegation.
//!
//! The dispatcher runs synchronously on the event source's delivery thread
//! and performs no blocking I/O. Every failure mode terminates here in a log
//! statement and a safe no-op; nothing propagates back into the delivery
//! loop.

use std::sync::Arc;

use parking_lot::Mutex;

use conference_events::{ConferenceEvent, ConferenceId, PeerConnection, UserId};
use session_state::{ConnectionKey, ConnectionRole, SessionContext};
use stats_client::{FabricEvent, StatsCallback, StatsClient, TransportStats, WebRtcFunction};

use crate::classify::{classify, Action, IgnoreReason};
use crate::config::MonitorConfig;

/// Routes classified events to the stats client through the session context.
pub struct EventDispatcher {
    client: StatsClient,
    context: Arc<Mutex<SessionContext>>,
    config: MonitorConfig,
}

impl EventDispatcher {
    /// Create a dispatcher over an explicit client, context, and config.
    pub fn new(
        client: StatsClient,
        context: Arc<Mutex<SessionContext>>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            client,
            context,
            config,
        }
    }

    /// Process one delivered event. Never panics, never returns an error.
    pub fn dispatch(&self, event: ConferenceEvent) {
        let conference = event.room.label.clone();

        match classify(&event) {
            Action::Initialize { local_user } => self.initialize(local_user),
            Action::Register {
                role,
                peer_connection,
            } => self.register(conference, role, peer_connection),
            Action::Notify { role, event } => self.notify(conference, role, event),
            Action::Report {
                role,
                function,
                message,
            } => self.report(conference, role, function, &message),
            Action::Terminate { role } => self.terminate(conference, role),
            Action::Ignore {
                reason: IgnoreReason::Reserved,
            } => {
                tracing::trace!(?event, "reserved event category, ignoring");
            }
            Action::Ignore {
                reason: IgnoreReason::Unmatched,
            } => {
                tracing::debug!(?event, "event matches no reporting case, ignoring");
            }
        }
    }

    /// Establish the backend session for the joining participant.
    ///
    /// The local identity is first-write-wins; re-initialization while an
    /// initialize is pending or confirmed is a no-op. A retry is permitted
    /// after a reported failure.
    fn initialize(&self, local_user: UserId) {
        let user = {
            let mut ctx = self.context.lock();
            if !ctx.set_local_user(local_user.clone()) {
                tracing::debug!(requested = %local_user, "local user already pinned for this session");
            }
            if !ctx.may_initialize() {
                tracing::debug!(state = ?ctx.backend_state(), "initialize skipped, backend already requested");
                return;
            }
            ctx.mark_pending();
            ctx.local_user().cloned().unwrap_or(local_user)
        };

        let on_init = {
            let context = Arc::clone(&self.context);
            Box::new(move |outcome: Result<(), stats_client::BackendFailure>| match outcome {
                Ok(()) => {
                    context.lock().mark_ready();
                    tracing::info!("backend session ready");
                }
                Err(failure) => {
                    context.lock().mark_failed(failure.code, failure.message.clone());
                    tracing::warn!(code = failure.code, message = %failure.message, "backend initialization failed");
                }
            })
        };

        let on_stats: StatsCallback = Box::new(|stats: TransportStats| {
            for line in stats.summaries() {
                tracing::debug!("{}", line);
            }
        });

        if let Err(err) = self.client.initialize(
            &self.config.credentials(),
            &user,
            on_init,
            on_stats,
            &self.config.backend_options(),
        ) {
            // Fatal for this session; recorded so inspection shows why.
            self.context.lock().mark_failed(-1, err.to_string());
            tracing::error!(%err, "backend initialization rejected locally");
        }
    }

    /// Register a transport under `(conference, role)` and hand it to the
    /// backend.
    ///
    /// The handle is stored before the backend call so the very next event
    /// can correlate against it; completion callbacks only record the
    /// registration outcome and carry no ordering guarantee.
    fn register(&self, conference: ConferenceId, role: ConnectionRole, pc: PeerConnection) {
        let key = ConnectionKey::new(conference.clone(), role);
        {
            let mut ctx = self.context.lock();
            if !ctx.is_ready() {
                tracing::warn!(%key, state = ?ctx.backend_state(), "dropping registration, backend not ready");
                return;
            }
            if !ctx.register_connection(key.clone(), pc.clone()) {
                tracing::debug!(%key, "replacing previously registered connection");
            }
        }

        let on_complete = {
            let context = Arc::clone(&self.context);
            let key = key.clone();
            Box::new(move |outcome: Result<(), stats_client::BackendFailure>| match outcome {
                Ok(()) => {
                    context.lock().note_registration(&key, true);
                    tracing::debug!(%key, "connection registration confirmed");
                }
                Err(failure) => {
                    context.lock().note_registration(&key, false);
                    tracing::warn!(%key, code = failure.code, message = %failure.message, "connection registration rejected by backend");
                }
            })
        };

        if let Err(err) =
            self.client
                .register_connection(&pc, &self.config.gateway_label, &conference, on_complete)
        {
            self.context.lock().unregister_connection(&key);
            tracing::warn!(%key, %err, "connection registration aborted");
        }
    }

    /// Report a fabric event against the connection registered for `role`.
    fn notify(&self, conference: ConferenceId, role: ConnectionRole, event: FabricEvent) {
        let key = ConnectionKey::new(conference.clone(), role);
        if let Some(pc) = self.resolve(&key) {
            self.client.notify(&pc, &conference, event);
        }
    }

    /// Attribute a negotiation failure to the connection for `role`.
    fn report(
        &self,
        conference: ConferenceId,
        role: ConnectionRole,
        function: WebRtcFunction,
        message: &str,
    ) {
        let key = ConnectionKey::new(conference.clone(), role);
        if let Some(pc) = self.resolve(&key) {
            self.client.report_error(&pc, &conference, function, message);
        }
    }

    /// Report fabric termination, then forget the connection.
    fn terminate(&self, conference: ConferenceId, role: ConnectionRole) {
        let key = ConnectionKey::new(conference.clone(), role);
        let Some(pc) = self.resolve(&key) else {
            return;
        };

        self.client
            .notify(&pc, &conference, FabricEvent::FabricTerminated);
        self.context.lock().unregister_connection(&key);
        tracing::debug!(%key, "connection unregistered after detach");
    }

    /// Resolve the handle for a key, enforcing the initialization gate.
    ///
    /// Returns `None`, after logging, when the backend has not confirmed
    /// initialization or the key was never registered. Lost reports are
    /// acceptable; a crashed delivery loop is not.
    fn resolve(&self, key: &ConnectionKey) -> Option<PeerConnection> {
        let ctx = self.context.lock();
        if !ctx.is_ready() {
            tracing::warn!(%key, state = ?ctx.backend_state(), "dropping report, backend not ready");
            return None;
        }
        match ctx.connection(key) {
            Some(pc) => Some(pc.clone()),
            None => {
                tracing::debug!(%key, "correlation miss, dropping event");
                None
            }
        }
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("connections", &self.context.lock().connection_count())
            .finish_non_exhaustive()
    }
}
