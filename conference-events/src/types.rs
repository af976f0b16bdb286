//! Core identifier types for conference events.

use serde::{Deserialize, Serialize};

/// Identifier correlating all events and connections belonging to one call.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConferenceId(pub String);

impl ConferenceId {
    /// Create a new conference ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the conference ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for ConferenceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ConferenceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for ConferenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display identity of a conference participant.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Create a new user ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the user ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle naming a peer-connection transport owned by the
/// signalling layer.
///
/// The monitoring backend treats the handle as an opaque token; the bridge
/// only stores it and passes it back on later reporting calls.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerConnection(pub String);

impl PeerConnection {
    /// Create a new peer-connection handle from a string token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the handle token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the handle token is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for PeerConnection {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl std::fmt::Display for PeerConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to the conference room an event belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRef {
    /// Conference identifier, carried as the room description on the wire.
    #[serde(rename = "description")]
    pub label: ConferenceId,
}

impl RoomRef {
    /// Create a new room reference.
    pub fn new(label: impl Into<ConferenceId>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// Reference to the participant an event is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Display identity of the participant.
    pub username: UserId,
}

impl Participant {
    /// Create a new participant reference.
    pub fn new(username: impl Into<UserId>) -> Self {
        Self {
            username: username.into(),
        }
    }
}
