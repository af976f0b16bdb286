//! Conference lifecycle event model and in-process event bus.
//!
//! This crate defines the heterogeneous events a conferencing session emits
//! (participants joining, streams starting, channels toggling, handles
//! detaching, negotiation errors) together with the serial
//! publish/subscribe channel they are delivered on. It carries no reporting
//! logic; consumers subscribe to an [`EventBus`] and interpret the events
//! themselves.

mod bus;
mod event;
mod types;

pub use bus::{EventBus, EventHandler};
pub use event::{
    ConferenceEvent, EventPayload, FailureStage, HandleRole, HandleStatus, MediaChannel,
    ParticipantStatus, ShareStatus, StreamSource,
};
pub use types::{ConferenceId, Participant, PeerConnection, RoomRef, UserId};
