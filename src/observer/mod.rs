//! Observer interface consumed by the UI collaborator (spec §6).
//!
//! Mirrors the teacher's `notifications::event_bus`: a `tokio::broadcast`
//! pub/sub bus. The UI shell (out of scope per spec §1) subscribes to learn
//! about status, availability, meter, and log changes without the engine
//! depending on any particular front-end.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Default channel capacity, matching the teacher's event bus.
const DEFAULT_CAPACITY: usize = 1024;

/// Events published by the engine to external subscribers.
#[derive(Debug, Clone)]
pub enum Event {
    /// `onStatusChange(status, optionalDetailMessage)`
    StatusChange {
        status: String,
        detail: Option<String>,
    },
    /// `onAvailabilityChange(connectorId, "Operative"|"Inoperative")`
    AvailabilityChange {
        connector_id: u32,
        availability: String,
    },
    /// `onLog(message)` — already prefixed with `"[OCPP] "` by the caller.
    Log(String),
    /// Not named in spec §6 directly but suggested by §9's "UI coupling
    /// leaks" note: the engine resets the meter to zero internally on
    /// StartTransaction rather than reaching into UI state, and the UI
    /// observes the new value through this event instead.
    MeterValueChange(u64),
}

/// Event bus for broadcasting engine events to all subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: Event) {
        if self.sender.send(event).is_err() {
            debug!("event published with no subscribers");
        }
    }

    /// Convenience: publish a log line, applying the `"[OCPP] "` prefix
    /// spec §6 requires of every engine log line.
    pub fn log(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.publish(Event::Log(format!("[OCPP] {message}")));
    }

    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventSubscriber {
    receiver: broadcast::Receiver<Event>,
}

impl EventSubscriber {
    pub async fn recv(&mut self) -> Option<Event> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(count, "event subscriber lagged, events dropped");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

pub type SharedEventBus = Arc<EventBus>;

pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_subscribe_roundtrip() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();

        bus.publish(Event::StatusChange {
            status: "CONNECTED".to_string(),
            detail: None,
        });

        let event = sub.recv().await.expect("event");
        match event {
            Event::StatusChange { status, .. } => assert_eq!(status, "CONNECTED"),
            _ => panic!("wrong event variant"),
        }
    }

    #[test]
    fn log_applies_prefix() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();
        bus.log("hello");
        let event = sub.receiver.try_recv().expect("event");
        match event {
            Event::Log(msg) => assert_eq!(msg, "[OCPP] hello"),
            _ => panic!("wrong event variant"),
        }
    }
}
