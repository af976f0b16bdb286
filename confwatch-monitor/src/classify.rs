//! Event classification.
//!
//! Maps each incoming lifecycle event to the reporting action it implies,
//! as a pure function over the event union so the mapping is exhaustive at
//! compile time. First matching case wins; combinations with no reporting
//! meaning classify as [`Action::Ignore`] and are dropped by the dispatcher.

use conference_events::{
    ConferenceEvent, EventPayload, FailureStage, HandleRole, HandleStatus, MediaChannel,
    ParticipantStatus, PeerConnection, ShareStatus, StreamSource, UserId,
};
use session_state::ConnectionRole;
use stats_client::{FabricEvent, WebRtcFunction};

/// Reporting action implied by one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Establish the backend session for the joining local participant.
    Initialize {
        /// Identity the session is initialized under.
        local_user: UserId,
    },

    /// Register a transport as a monitored fabric.
    Register {
        role: ConnectionRole,
        peer_connection: PeerConnection,
    },

    /// Report a fabric event against the connection registered for `role`.
    Notify {
        role: ConnectionRole,
        event: FabricEvent,
    },

    /// Attribute a WebRTC operation failure to the connection for `role`.
    Report {
        role: ConnectionRole,
        function: WebRtcFunction,
        message: String,
    },

    /// Report fabric termination, then forget the connection for `role`.
    Terminate { role: ConnectionRole },

    /// No reporting action.
    Ignore { reason: IgnoreReason },
}

/// Why an event classifies to no action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The event category is reserved and intentionally unhandled.
    Reserved,
    /// The event shape matches no reporting case.
    Unmatched,
}

/// Connection role a plugin handle maps to.
fn role_for(target: HandleRole) -> ConnectionRole {
    match target {
        HandleRole::Main => ConnectionRole::LocalMain,
        HandleRole::Subscriber => ConnectionRole::RemoteSubscriber,
    }
}

/// Classify one event into its reporting action.
pub fn classify(event: &ConferenceEvent) -> Action {
    match &event.payload {
        EventPayload::User {
            status: ParticipantStatus::Joining,
        } => match &event.participant {
            Some(participant) => Action::Initialize {
                local_user: participant.username.clone(),
            },
            // A joining event without an identity cannot initialize.
            None => Action::Ignore {
                reason: IgnoreReason::Unmatched,
            },
        },
        EventPayload::User { .. } => Action::Ignore {
            reason: IgnoreReason::Unmatched,
        },

        EventPayload::Subscriber => Action::Ignore {
            reason: IgnoreReason::Reserved,
        },

        EventPayload::Stream {
            source: StreamSource::Local,
            target: HandleRole::Main,
            peer_connection,
        } => Action::Register {
            role: ConnectionRole::LocalMain,
            peer_connection: peer_connection.clone(),
        },
        EventPayload::Stream {
            source: StreamSource::Remote,
            target: HandleRole::Subscriber,
            peer_connection,
        } => Action::Register {
            role: ConnectionRole::RemoteSubscriber,
            peer_connection: peer_connection.clone(),
        },
        EventPayload::Stream { .. } => Action::Ignore {
            reason: IgnoreReason::Unmatched,
        },

        EventPayload::ScreenShare { status } => Action::Notify {
            role: ConnectionRole::LocalMain,
            event: match status {
                ShareStatus::Started => FabricEvent::ScreenShareStart,
                ShareStatus::Stopped => FabricEvent::ScreenShareStop,
            },
        },

        EventPayload::Channel { channel, active } => Action::Notify {
            role: ConnectionRole::LocalMain,
            event: match (channel, active) {
                (MediaChannel::Audio, true) => FabricEvent::AudioUnmute,
                (MediaChannel::Audio, false) => FabricEvent::AudioMute,
                (MediaChannel::Video, true) => FabricEvent::VideoResume,
                (MediaChannel::Video, false) => FabricEvent::VideoPause,
            },
        },

        EventPayload::PluginHandle {
            status: HandleStatus::Detached,
            target,
        } => Action::Terminate {
            role: role_for(*target),
        },
        EventPayload::PluginHandle { .. } => Action::Ignore {
            reason: IgnoreReason::Unmatched,
        },

        EventPayload::Error { stage, message } => match stage {
            FailureStage::CreateOffer => Action::Report {
                role: ConnectionRole::LocalMain,
                function: WebRtcFunction::CreateOffer,
                message: message.clone(),
            },
            FailureStage::CreateAnswer => Action::Report {
                role: ConnectionRole::LocalMain,
                function: WebRtcFunction::CreateAnswer,
                message: message.clone(),
            },
            FailureStage::Other(_) => Action::Ignore {
                reason: IgnoreReason::Unmatched,
            },
        },
    }
}
