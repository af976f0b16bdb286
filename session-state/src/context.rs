//! Session-scoped correlation state.
//!
//! One [`SessionContext`] lives for the duration of a conferencing session.
//! Mutators return what actually changed so callers can log and tests can
//! assert on outcomes; none of them panic.

use std::collections::HashMap;

use conference_events::{ConferenceId, PeerConnection, UserId};

/// Which side of a relayed media path a registered connection represents.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum ConnectionRole {
    /// The local participant's main publish transport.
    LocalMain,
    /// A transport receiving a remote participant's feed.
    RemoteSubscriber,
}

impl std::fmt::Display for ConnectionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocalMain => write!(f, "local-main"),
            Self::RemoteSubscriber => write!(f, "remote-subscriber"),
        }
    }
}

/// Key a registered connection is stored under.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct ConnectionKey {
    /// Conference the connection belongs to.
    pub conference: ConferenceId,
    /// Role of the connection within that conference.
    pub role: ConnectionRole,
}

impl ConnectionKey {
    /// Create a new connection key.
    pub fn new(conference: impl Into<ConferenceId>, role: ConnectionRole) -> Self {
        Self {
            conference: conference.into(),
            role,
        }
    }
}

impl std::fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.conference, self.role)
    }
}

/// Lifecycle of the monitoring backend session.
///
/// `Pending` is entered when initialize is invoked; the backend's completion
/// callback moves the state to `Ready` or `Failed`. Reporting calls require
/// `Ready`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackendState {
    /// Initialize has not been invoked.
    #[default]
    Idle,
    /// Initialize was invoked; completion has not been reported yet.
    Pending,
    /// The backend confirmed initialization.
    Ready,
    /// The backend reported an initialization failure.
    Failed {
        /// Error code reported by the backend.
        code: i32,
        /// Descriptive message reported by the backend.
        message: String,
    },
}

/// Outcome of a connection registration as reported by the backend.
///
/// The handle stays resolvable regardless of status: completion callbacks
/// carry no ordering guarantee relative to later events, so correlation must
/// not wait for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStatus {
    /// Registration was handed to the backend; no outcome yet.
    Requested,
    /// The backend confirmed the registration.
    Confirmed,
    /// The backend rejected the registration.
    Rejected,
}

#[derive(Debug, Clone)]
struct RegisteredConnection {
    handle: PeerConnection,
    status: RegistrationStatus,
}

/// Correlation state for one conferencing session.
///
/// Holds the local participant identity (set once), the backend lifecycle,
/// and the mapping from `(conference, role)` to the transport handle that
/// was registered for it.
#[derive(Debug, Default)]
pub struct SessionContext {
    local_user: Option<UserId>,
    backend: BackendState,
    connections: HashMap<ConnectionKey, RegisteredConnection>,
}

impl SessionContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the local participant identity, first-write-wins.
    ///
    /// Returns `true` if the identity was applied; `false` when one is
    /// already set (the stored value is left untouched).
    pub fn set_local_user(&mut self, user: UserId) -> bool {
        if self.local_user.is_some() {
            return false;
        }
        self.local_user = Some(user);
        true
    }

    /// The local participant identity, if one has been set.
    pub fn local_user(&self) -> Option<&UserId> {
        self.local_user.as_ref()
    }

    /// Current backend lifecycle state.
    pub fn backend_state(&self) -> &BackendState {
        &self.backend
    }

    /// Whether the backend has confirmed initialization.
    pub fn is_ready(&self) -> bool {
        self.backend == BackendState::Ready
    }

    /// Whether an initialize invocation is currently allowed.
    ///
    /// Re-initialization while `Pending` or `Ready` is a no-op; a retry is
    /// permitted from `Idle` or after a reported failure.
    pub fn may_initialize(&self) -> bool {
        matches!(self.backend, BackendState::Idle | BackendState::Failed { .. })
    }

    /// Record that initialize was invoked.
    pub fn mark_pending(&mut self) {
        self.backend = BackendState::Pending;
    }

    /// Record a successful initialization callback.
    pub fn mark_ready(&mut self) {
        self.backend = BackendState::Ready;
    }

    /// Record a failed initialization callback.
    pub fn mark_failed(&mut self, code: i32, message: impl Into<String>) {
        self.backend = BackendState::Failed {
            code,
            message: message.into(),
        };
    }

    /// Register a connection handle under a key, idempotently.
    ///
    /// Returns `true` when the key was newly inserted. Re-registering an
    /// existing key replaces the handle and resets its status to
    /// `Requested`.
    pub fn register_connection(&mut self, key: ConnectionKey, handle: PeerConnection) -> bool {
        self.connections
            .insert(
                key,
                RegisteredConnection {
                    handle,
                    status: RegistrationStatus::Requested,
                },
            )
            .is_none()
    }

    /// Resolve the handle registered under a key.
    ///
    /// Absence is a normal outcome: events may reference a connection that
    /// was never registered or was already detached.
    pub fn connection(&self, key: &ConnectionKey) -> Option<&PeerConnection> {
        self.connections.get(key).map(|entry| &entry.handle)
    }

    /// Registration status for a key, if the key is registered.
    pub fn registration_status(&self, key: &ConnectionKey) -> Option<RegistrationStatus> {
        self.connections.get(key).map(|entry| entry.status)
    }

    /// Record the backend's registration outcome for a key.
    ///
    /// A no-op when the key was unregistered before the callback fired.
    pub fn note_registration(&mut self, key: &ConnectionKey, confirmed: bool) {
        if let Some(entry) = self.connections.get_mut(key) {
            entry.status = if confirmed {
                RegistrationStatus::Confirmed
            } else {
                RegistrationStatus::Rejected
            };
        }
    }

    /// Remove a connection registration, returning the handle if one existed.
    ///
    /// Later lookups for the key return absent.
    pub fn unregister_connection(&mut self, key: &ConnectionKey) -> Option<PeerConnection> {
        self.connections.remove(key).map(|entry| entry.handle)
    }

    /// Number of currently registered connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(conference: &str, role: ConnectionRole) -> ConnectionKey {
        ConnectionKey::new(conference, role)
    }

    #[test]
    fn local_user_is_first_write_wins() {
        let mut ctx = SessionContext::new();
        assert!(ctx.local_user().is_none());

        assert!(ctx.set_local_user(UserId::new("ada")));
        assert_eq!(ctx.local_user().unwrap().as_str(), "ada");

        // A later joiner must not displace the session identity.
        assert!(!ctx.set_local_user(UserId::new("grace")));
        assert_eq!(ctx.local_user().unwrap().as_str(), "ada");
    }

    #[test]
    fn backend_lifecycle_transitions() {
        let mut ctx = SessionContext::new();
        assert_eq!(*ctx.backend_state(), BackendState::Idle);
        assert!(ctx.may_initialize());
        assert!(!ctx.is_ready());

        ctx.mark_pending();
        assert_eq!(*ctx.backend_state(), BackendState::Pending);
        assert!(!ctx.may_initialize());

        ctx.mark_ready();
        assert!(ctx.is_ready());
        assert!(!ctx.may_initialize());
    }

    #[test]
    fn failed_backend_allows_retry() {
        let mut ctx = SessionContext::new();
        ctx.mark_pending();
        ctx.mark_failed(7, "bad credentials");

        assert_eq!(
            *ctx.backend_state(),
            BackendState::Failed {
                code: 7,
                message: "bad credentials".to_string()
            }
        );
        assert!(!ctx.is_ready());
        assert!(ctx.may_initialize());
    }

    #[test]
    fn register_is_idempotent_upsert() {
        let mut ctx = SessionContext::new();
        let k = key("standup", ConnectionRole::LocalMain);

        assert!(ctx.register_connection(k.clone(), PeerConnection::new("pc-1")));
        assert!(!ctx.register_connection(k.clone(), PeerConnection::new("pc-2")));

        // Upsert keeps the most recent handle.
        assert_eq!(ctx.connection(&k).unwrap().as_str(), "pc-2");
        assert_eq!(ctx.connection_count(), 1);
    }

    #[test]
    fn lookup_distinguishes_roles() {
        let mut ctx = SessionContext::new();
        ctx.register_connection(
            key("standup", ConnectionRole::LocalMain),
            PeerConnection::new("pc-main"),
        );

        assert!(ctx
            .connection(&key("standup", ConnectionRole::RemoteSubscriber))
            .is_none());
        assert!(ctx
            .connection(&key("retro", ConnectionRole::LocalMain))
            .is_none());
    }

    #[test]
    fn unregister_makes_key_unresolvable() {
        let mut ctx = SessionContext::new();
        let k = key("standup", ConnectionRole::LocalMain);
        ctx.register_connection(k.clone(), PeerConnection::new("pc-1"));

        let removed = ctx.unregister_connection(&k);
        assert_eq!(removed.unwrap().as_str(), "pc-1");
        assert!(ctx.connection(&k).is_none());

        // Removing again is a quiet no-op.
        assert!(ctx.unregister_connection(&k).is_none());
    }

    #[test]
    fn registration_outcomes_are_inspectable() {
        let mut ctx = SessionContext::new();
        let k = key("standup", ConnectionRole::LocalMain);
        ctx.register_connection(k.clone(), PeerConnection::new("pc-1"));
        assert_eq!(
            ctx.registration_status(&k),
            Some(RegistrationStatus::Requested)
        );

        ctx.note_registration(&k, true);
        assert_eq!(
            ctx.registration_status(&k),
            Some(RegistrationStatus::Confirmed)
        );

        // The handle stays resolvable either way.
        ctx.note_registration(&k, false);
        assert!(ctx.connection(&k).is_some());
        assert_eq!(
            ctx.registration_status(&k),
            Some(RegistrationStatus::Rejected)
        );
    }

    #[test]
    fn late_registration_callback_after_detach_is_ignored() {
        let mut ctx = SessionContext::new();
        let k = key("standup", ConnectionRole::LocalMain);
        ctx.register_connection(k.clone(), PeerConnection::new("pc-1"));
        ctx.unregister_connection(&k);

        ctx.note_registration(&k, true);
        assert!(ctx.registration_status(&k).is_none());
    }
}
