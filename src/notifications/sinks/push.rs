//! Push-stream sink

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::notifications::occurrence::EventOccurrence;

use super::{EventSink, SinkError};

const DEFAULT_CAPACITY: usize = 256;

/// Forwards occurrences into a broadcast channel consumed by the
/// WebSocket push endpoint. Sending never blocks the fan-out; with no
/// connected clients the occurrence is simply dropped.
pub struct PushStreamSink {
    sender: broadcast::Sender<EventOccurrence>,
}

impl PushStreamSink {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe a push client (one receiver per WebSocket connection).
    pub fn subscribe(&self) -> broadcast::Receiver<EventOccurrence> {
        self.sender.subscribe()
    }

    pub fn client_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for PushStreamSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSink for PushStreamSink {
    fn id(&self) -> &str {
        "push-stream"
    }

    async fn deliver(
        &self,
        _event: &str,
        _tags: &[String],
        occurrence: &EventOccurrence,
    ) -> Result<(), SinkError> {
        // No clients connected is not a failure
        let _ = self.sender.send(occurrence.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::occurrence::event_names;

    #[tokio::test]
    async fn connected_client_receives_occurrence() {
        let sink = PushStreamSink::new();
        let mut client = sink.subscribe();

        let occ = EventOccurrence::request(
            event_names::GET_EVSES_STATUS_REQUEST,
            serde_json::json!({"network": "Prod"}),
        );
        sink.deliver(event_names::GET_EVSES_STATUS_REQUEST, &[], &occ)
            .await
            .expect("delivery");

        let received = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            client.recv(),
        )
        .await
        .expect("timeout")
        .expect("occurrence");
        assert_eq!(received.name, "GetEVSEsStatusRequest");
    }

    #[tokio::test]
    async fn delivery_without_clients_succeeds() {
        let sink = PushStreamSink::new();
        let occ = EventOccurrence::request(event_names::SEND_CDR, serde_json::json!({}));
        assert!(sink.deliver(event_names::SEND_CDR, &[], &occ).await.is_ok());
    }
}
