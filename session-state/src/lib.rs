//! Per-session correlation state.
//!
//! A deliberately dependency-light crate holding the state the event
//! dispatcher correlates against: the local participant identity, the
//! monitoring backend's lifecycle, and the map from `(conference, role)` to
//! the transport handle registered for it. Locking is the caller's concern;
//! everything here is plain data with change-reporting mutators.

mod context;

pub use context::{
    BackendState, ConnectionKey, ConnectionRole, RegistrationStatus, SessionContext,
};
