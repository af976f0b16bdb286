//! Lifecycle event model for a multi-party conference.
//!
//! Events are produced by the signalling layer and consumed at most once per
//! delivery. The payload is a tagged union mirroring the wire shape the
//! signalling layer emits (`type` discriminant, variant fields under `data`).

use serde::{Deserialize, Serialize};

use crate::types::{Participant, PeerConnection, RoomRef};

/// A single lifecycle event observed in a conference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferenceEvent {
    /// Room the event belongs to.
    pub room: RoomRef,

    /// Participant the event is scoped to, where applicable.
    #[serde(rename = "user", default, skip_serializing_if = "Option::is_none")]
    pub participant: Option<Participant>,

    /// The event payload, discriminated by `type`.
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl ConferenceEvent {
    /// Create a room-scoped event with no participant reference.
    pub fn new(room: RoomRef, payload: EventPayload) -> Self {
        Self {
            room,
            participant: None,
            payload,
        }
    }

    /// Attach a participant reference to the event.
    pub fn with_participant(mut self, participant: Participant) -> Self {
        self.participant = Some(participant);
        self
    }
}

/// Discriminated union of conference lifecycle events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum EventPayload {
    /// A participant's presence changed.
    User {
        /// Presence transition being reported.
        status: ParticipantStatus,
    },

    /// Subscriber-side bookkeeping. Reserved, currently carries nothing.
    Subscriber,

    /// A media stream became available on a transport.
    Stream {
        /// Which side of the relayed media path produced the stream.
        #[serde(rename = "stream")]
        source: StreamSource,
        /// Which plugin handle the stream is attached to.
        #[serde(rename = "for")]
        target: HandleRole,
        /// Transport carrying the stream.
        #[serde(rename = "peerconnection")]
        peer_connection: PeerConnection,
    },

    /// Screen sharing started or stopped.
    #[serde(rename = "screenshare")]
    ScreenShare {
        /// Whether sharing started or stopped.
        status: ShareStatus,
    },

    /// A media channel was toggled (mute/unmute, pause/resume).
    Channel {
        /// Which channel was toggled.
        channel: MediaChannel,
        /// `true` when the channel is now active (unmuted/resumed).
        #[serde(rename = "status")]
        active: bool,
    },

    /// A plugin handle changed state.
    PluginHandle {
        /// New state of the handle.
        status: HandleStatus,
        /// Which handle changed.
        #[serde(rename = "for")]
        target: HandleRole,
    },

    /// A WebRTC negotiation step failed.
    Error {
        /// Negotiation step that failed.
        #[serde(rename = "status")]
        stage: FailureStage,
        /// Error description from the signalling layer.
        #[serde(rename = "error")]
        message: String,
    },
}

/// Presence transitions a participant can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    /// The participant is joining the conference.
    Joining,
    /// The participant finished joining.
    Joined,
    /// The participant is leaving.
    Leaving,
}

/// Which side of a relayed media path a stream belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamSource {
    /// Stream captured locally and sent towards the gateway.
    Local,
    /// Stream received from a remote participant.
    Remote,
}

/// Plugin handle a stream or state change is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleRole {
    /// The participant's main publish handle.
    Main,
    /// A per-remote-feed subscriber handle.
    Subscriber,
}

/// Screen-share transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareStatus {
    Started,
    Stopped,
}

/// Media channels that can be toggled independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaChannel {
    Audio,
    Video,
}

/// Plugin handle lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleStatus {
    Attached,
    Detached,
}

/// WebRTC negotiation step an error event refers to.
///
/// Unrecognized stages are preserved verbatim so they can be logged before
/// being ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FailureStage {
    CreateOffer,
    CreateAnswer,
    Other(String),
}

impl From<String> for FailureStage {
    fn from(stage: String) -> Self {
        match stage.as_str() {
            "createOffer" => Self::CreateOffer,
            "createAnswer" => Self::CreateAnswer,
            _ => Self::Other(stage),
        }
    }
}

impl From<FailureStage> for String {
    fn from(stage: FailureStage) -> Self {
        match stage {
            FailureStage::CreateOffer => "createOffer".to_string(),
            FailureStage::CreateAnswer => "createAnswer".to_string(),
            FailureStage::Other(other) => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Participant, RoomRef};

    #[test]
    fn user_event_deserializes_from_wire_shape() {
        let json = r#"{
            "type": "user",
            "room": {"description": "standup"},
            "user": {"username": "ada"},
            "data": {"status": "joining"}
        }"#;

        let event: ConferenceEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.room.label.as_str(), "standup");
        assert_eq!(
            event.participant.as_ref().unwrap().username.as_str(),
            "ada"
        );
        assert_eq!(
            event.payload,
            EventPayload::User {
                status: ParticipantStatus::Joining
            }
        );
    }

    #[test]
    fn stream_event_keeps_wire_field_names() {
        let json = r#"{
            "type": "stream",
            "room": {"description": "standup"},
            "data": {"stream": "local", "for": "main", "peerconnection": "pc-1"}
        }"#;

        let event: ConferenceEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event.payload,
            EventPayload::Stream {
                source: StreamSource::Local,
                target: HandleRole::Main,
                peer_connection: PeerConnection::new("pc-1"),
            }
        );

        // Round-trip preserves the rename of `for` and `peerconnection`.
        let back = serde_json::to_string(&event).unwrap();
        assert!(back.contains(r#""for":"main""#));
        assert!(back.contains(r#""peerconnection":"pc-1""#));
    }

    #[test]
    fn channel_event_carries_active_flag() {
        let json = r#"{
            "type": "channel",
            "room": {"description": "standup"},
            "data": {"channel": "audio", "status": false}
        }"#;

        let event: ConferenceEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event.payload,
            EventPayload::Channel {
                channel: MediaChannel::Audio,
                active: false
            }
        );
    }

    #[test]
    fn plugin_handle_detach_deserializes() {
        let json = r#"{
            "type": "pluginHandle",
            "room": {"description": "standup"},
            "data": {"status": "detached", "for": "subscriber"}
        }"#;

        let event: ConferenceEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event.payload,
            EventPayload::PluginHandle {
                status: HandleStatus::Detached,
                target: HandleRole::Subscriber,
            }
        );
    }

    #[test]
    fn subscriber_event_needs_no_data() {
        let json = r#"{"type": "subscriber", "room": {"description": "standup"}}"#;
        let event: ConferenceEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.payload, EventPayload::Subscriber);
    }

    #[test]
    fn unknown_failure_stage_is_preserved() {
        let json = r#"{
            "type": "error",
            "room": {"description": "standup"},
            "data": {"status": "setRemoteDescription", "error": "boom"}
        }"#;

        let event: ConferenceEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event.payload,
            EventPayload::Error {
                stage: FailureStage::Other("setRemoteDescription".to_string()),
                message: "boom".to_string(),
            }
        );
    }

    #[test]
    fn builder_attaches_participant() {
        let event = ConferenceEvent::new(
            RoomRef::new("standup"),
            EventPayload::User {
                status: ParticipantStatus::Joining,
            },
        )
        .with_participant(Participant::new("ada"));

        assert!(event.participant.is_some());
    }
}
