use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::broadcast;

use super::payload::EventKind;

/// Fire-and-forget publisher for lifecycle events.
///
/// Backed by a broadcast channel: publication happens inline after each
/// successful commit, so events for the same task arrive in commit order.
/// Consumers (the notification service seam) subscribe via [`subscribe`].
///
/// [`subscribe`]: EventPublisher::subscribe
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<PublishedEvent>,
}

/// Event that has been published.
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub kind: EventKind,
    pub payload: Value,
    pub published_at: DateTime<Utc>,
}

impl EventPublisher {
    /// Create a new event publisher with the specified channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event on the topic corresponding to its kind.
    ///
    /// Sending with no subscribers is not an error; emission must succeed
    /// whether or not anyone is listening.
    pub fn publish(&self, kind: EventKind, payload: Value) -> Result<(), PublishError> {
        let event = PublishedEvent {
            kind,
            payload,
            published_at: Utc::now(),
        };

        tracing::debug!(topic = %kind, "publishing lifecycle event");

        match self.sender.send(event) {
            Ok(_) => Ok(()),
            // No subscribers; acceptable for fire-and-forget emission
            Err(broadcast::error::SendError(_)) => Ok(()),
        }
    }

    /// Subscribe to the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(1000)
    }
}

/// Error types for event publishing.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Event channel is closed")]
    ChannelClosed,
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let publisher = EventPublisher::new(8);
        assert_eq!(publisher.subscriber_count(), 0);
        assert!(publisher
            .publish(EventKind::TaskPosted, json!({"id": 1}))
            .is_ok());
    }

    #[tokio::test]
    async fn test_subscribers_receive_in_publish_order() {
        let publisher = EventPublisher::new(8);
        let mut rx = publisher.subscribe();

        publisher
            .publish(EventKind::TaskPosted, json!({"id": 1}))
            .unwrap();
        publisher
            .publish(EventKind::FreelancerAssigned, json!({"id": 1}))
            .unwrap();

        assert_eq!(rx.recv().await.unwrap().kind, EventKind::TaskPosted);
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::FreelancerAssigned);
    }
}
