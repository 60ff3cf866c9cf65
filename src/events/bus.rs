//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! Publishers hand over an [`EventMessage`] and return immediately. Delivery
//! is at most once: a receiver that falls behind by more than the channel
//! capacity loses the oldest messages.

use crate::utils::time::current_timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::broadcast;

/// Topic of the notification sent whenever a user opens a patient record
pub const PATIENT_VIEWED_TOPIC: &str = "org.openmrs.module.emrapi.event.PATIENT_VIEWED";

/// Payload key of the viewed patient's uuid
pub const PATIENT_UUID_KEY: &str = "patientUuid";

/// Payload key of the viewing user's uuid
pub const USER_UUID_KEY: &str = "userUuid";

pub const DEFAULT_CAPACITY: usize = 1024;

/// A topic-tagged map message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMessage {
    pub topic: String,
    pub payload: HashMap<String, String>,
    pub timestamp: i64,
}

impl EventMessage {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            payload: HashMap::new(),
            timestamp: current_timestamp(),
        }
    }

    /// Build a patient viewed notification
    pub fn patient_viewed(patient_uuid: impl Into<String>, user_uuid: impl Into<String>) -> Self {
        Self::new(PATIENT_VIEWED_TOPIC)
            .with(PATIENT_UUID_KEY, patient_uuid)
            .with(USER_UUID_KEY, user_uuid)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    pub fn with_payload(mut self, payload: HashMap<String, String>) -> Self {
        self.payload = payload;
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.payload.get(key).map(String::as_str)
    }
}

pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish to all current subscribers, returning how many received it.
    ///
    /// With no subscribers the message is dropped and zero is returned.
    pub fn publish(&self, message: EventMessage) -> usize {
        self.sender.send(message).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventMessage> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_viewed_message() {
        let message = EventMessage::patient_viewed("p-uuid", "u-uuid");

        assert_eq!(message.topic, PATIENT_VIEWED_TOPIC);
        assert_eq!(message.get(PATIENT_UUID_KEY), Some("p-uuid"));
        assert_eq!(message.get(USER_UUID_KEY), Some("u-uuid"));
        assert_eq!(message.get("other"), None);
        assert!(message.timestamp > 0);
    }

    #[tokio::test]
    async fn test_publish_and_receive() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let delivered = bus.publish(EventMessage::patient_viewed("p", "u"));
        assert_eq!(delivered, 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.get(PATIENT_UUID_KEY), Some("p"));
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new(4);
        assert_eq!(bus.publish(EventMessage::new("anything")), 0);
    }

    #[tokio::test]
    async fn test_slow_receiver_lags() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();

        for i in 0..4 {
            bus.publish(EventMessage::new("t").with("n", i.to_string()));
        }

        match rx.recv().await {
            Err(broadcast::error::RecvError::Lagged(n)) => assert_eq!(n, 2),
            other => panic!("expected lag, got {:?}", other),
        }
        let next = rx.recv().await.unwrap();
        assert_eq!(next.get("n"), Some("2"));
    }
}
