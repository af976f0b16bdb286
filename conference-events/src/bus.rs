//! In-process publish/subscribe channel for conference events.
//!
//! Delivery is serial and in arrival order: `publish` invokes every
//! registered handler on the publisher's thread before returning. There is
//! no buffering; an event is delivered at least once per real occurrence.

use std::sync::Mutex;

use crate::event::ConferenceEvent;

/// Handler invoked once per delivered event.
pub type EventHandler = Box<dyn FnMut(ConferenceEvent) + Send>;

/// Serial, in-order event channel.
///
/// Handlers run synchronously on the thread that calls [`EventBus::publish`],
/// in subscription order. Subscribers are expected to absorb their own
/// failures; the bus does not inspect handler outcomes.
#[derive(Default)]
pub struct EventBus {
    handlers: Mutex<Vec<EventHandler>>,
}

impl EventBus {
    /// Create a new bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for every subsequently published event.
    pub fn subscribe(&self, handler: EventHandler) {
        match self.handlers.lock() {
            Ok(mut handlers) => handlers.push(handler),
            Err(_) => tracing::error!("event bus handler list poisoned, subscription dropped"),
        }
    }

    /// Deliver an event to every subscriber, serially, in subscription order.
    pub fn publish(&self, event: ConferenceEvent) {
        let mut handlers = match self.handlers.lock() {
            Ok(handlers) => handlers,
            Err(_) => {
                tracing::error!("event bus handler list poisoned, event dropped");
                return;
            }
        };

        tracing::trace!(subscribers = handlers.len(), ?event, "delivering event");
        let last = handlers.len().saturating_sub(1);
        for (index, handler) in handlers.iter_mut().enumerate() {
            if index == last {
                // Hand the event itself to the final subscriber.
                handler(event);
                return;
            }
            handler(event.clone());
        }
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.handlers.lock().map(|h| h.len()).unwrap_or(0)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
