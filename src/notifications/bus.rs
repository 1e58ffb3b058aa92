//! Event bus for broadcasting occurrences to subscribers
//!
//! Tokio broadcast channel underneath: publish is fire-and-forget from the
//! raising thread, subscribers consume on their own tasks. The bus is the
//! domain event source the registry attaches sinks to — `subscribe()` is
//! the subscribe half of the pair, dropping the returned subscriber is the
//! unsubscribe half.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::occurrence::EventOccurrence;

const DEFAULT_CAPACITY: usize = 1024;

/// Event bus for broadcasting occurrences to all subscribers
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventOccurrence>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriber_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Publish an occurrence to all subscribers. Never blocks and never
    /// fails from the publisher's perspective.
    pub fn publish(&self, occurrence: EventOccurrence) {
        let name = occurrence.name.clone();
        match self.sender.send(occurrence) {
            Ok(count) => {
                debug!(event = %name, subscribers = count, "Occurrence published");
            }
            Err(_) => {
                // No subscribers — normal before the registry attaches sinks
                debug!(event = %name, "Occurrence published (no subscribers)");
            }
        }
    }

    pub fn subscribe(&self) -> EventSubscriber {
        let receiver = self.sender.subscribe();
        self.subscriber_count.fetch_add(1, Ordering::SeqCst);

        EventSubscriber {
            receiver,
            subscriber_count: self.subscriber_count.clone(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriber_count.load(Ordering::SeqCst)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscriber handle; dropping it detaches from the bus
pub struct EventSubscriber {
    receiver: broadcast::Receiver<EventOccurrence>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventSubscriber {
    /// Receive the next occurrence, skipping over lagged gaps.
    pub async fn recv(&mut self) -> Option<EventOccurrence> {
        loop {
            match self.receiver.recv().await {
                Ok(occurrence) => return Some(occurrence),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(missed = count, "Event subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return None;
                }
            }
        }
    }
}

impl Drop for EventSubscriber {
    fn drop(&mut self) {
        self.subscriber_count.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Shared event bus type
pub type SharedEventBus = Arc<EventBus>;

/// Create a shared event bus
pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::occurrence::event_names;

    #[tokio::test]
    async fn publish_reaches_subscriber() {
        let bus = EventBus::new();
        let mut subscriber = bus.subscribe();

        bus.publish(EventOccurrence::request(
            event_names::AUTH_EVSE_START,
            serde_json::json!({"token": "04AA11BB"}),
        ));

        let received = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            subscriber.recv(),
        )
        .await
        .expect("timeout")
        .expect("occurrence");

        assert_eq!(received.name, "AuthEVSEStart");
    }

    #[test]
    fn subscriber_count_tracks_drops() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);

        let sub1 = bus.subscribe();
        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(sub1);
        assert_eq!(bus.subscriber_count(), 1);
    }
}
