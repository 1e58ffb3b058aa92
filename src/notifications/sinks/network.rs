//! Network sink

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::notifications::occurrence::EventOccurrence;
use crate::shared::retry::{retry_with_backoff, RetryConfig};

use super::{EventSink, SinkError};

/// Ships occurrences as newline-delimited JSON over TCP. Each delivery is
/// bounded by `timeout`; expiry counts as a delivery failure. The bounded
/// backoff here is the sink's own retry policy — the registry never
/// retries on its behalf.
pub struct NetworkSink {
    addr: String,
    timeout: Duration,
    retry: RetryConfig,
}

impl NetworkSink {
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
            retry: RetryConfig {
                max_attempts: 2,
                initial_delay: Duration::from_millis(100),
                ..RetryConfig::default()
            },
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn send_line(&self, line: &str) -> Result<(), SinkError> {
        let attempt = async {
            let mut stream = TcpStream::connect(&self.addr).await?;
            stream.write_all(line.as_bytes()).await?;
            stream.write_all(b"\n").await?;
            stream.flush().await?;
            Ok::<(), SinkError>(())
        };

        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(SinkError::Timeout),
        }
    }
}

#[async_trait]
impl EventSink for NetworkSink {
    fn id(&self) -> &str {
        "network"
    }

    async fn deliver(
        &self,
        _event: &str,
        _tags: &[String],
        occurrence: &EventOccurrence,
    ) -> Result<(), SinkError> {
        let line = serde_json::to_string(occurrence)
            .map_err(|e| SinkError::Delivery(e.to_string()))?;

        retry_with_backoff(
            self.retry.clone(),
            || self.send_line(&line),
            |err| matches!(err, SinkError::Io(_) | SinkError::Timeout),
            "network_sink_delivery",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::occurrence::event_names;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn delivers_json_line_over_tcp() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");

        let reader = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut buf = String::new();
            socket.read_to_string(&mut buf).await.expect("read");
            buf
        });

        let sink = NetworkSink::new(addr.to_string(), Duration::from_secs(1));
        let occ = EventOccurrence::request(
            event_names::REMOTE_EVSE_STARTED,
            serde_json::json!({"evse": "DE*GEF*E1*A"}),
        );
        sink.deliver(event_names::REMOTE_EVSE_STARTED, &[], &occ)
            .await
            .expect("delivery");

        let received = tokio::time::timeout(Duration::from_secs(1), reader)
            .await
            .expect("reader done")
            .expect("join");
        assert!(received.ends_with('\n'));
        let parsed: EventOccurrence =
            serde_json::from_str(received.trim_end()).expect("valid json");
        assert_eq!(parsed.name, "RemoteEVSEStarted");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_delivery_failure() {
        // port 9 (discard) is almost certainly closed on loopback
        let sink = NetworkSink::new("127.0.0.1:9", Duration::from_millis(200)).with_retry(
            RetryConfig {
                max_attempts: 1,
                ..RetryConfig::default()
            },
        );

        let occ = EventOccurrence::request(event_names::SEND_CDR, serde_json::json!({}));
        let result = sink.deliver(event_names::SEND_CDR, &[], &occ).await;
        assert!(result.is_err());
    }
}
