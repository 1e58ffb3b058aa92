//! Event sinks
//!
//! A sink consumes one event occurrence at a time. Delivery failures are
//! isolated per sink: the fan-out boundary logs and swallows them, they
//! never reach the domain operation that raised the event.

pub mod console;
pub mod disk;
pub mod network;
pub mod push;

use async_trait::async_trait;
use thiserror::Error;

use super::occurrence::EventOccurrence;

pub use console::ConsoleSink;
pub use disk::DiskSink;
pub use network::NetworkSink;
pub use push::PushStreamSink;

/// Why a single delivery failed. Non-fatal by contract.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("delivery timed out")]
    Timeout,

    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// One event consumer. `id()` is the stable identity used for idempotent
/// attach/detach bookkeeping.
#[async_trait]
pub trait EventSink: Send + Sync {
    fn id(&self) -> &str;

    async fn deliver(
        &self,
        event: &str,
        tags: &[String],
        occurrence: &EventOccurrence,
    ) -> Result<(), SinkError>;
}
