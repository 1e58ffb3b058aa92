//! Console sink

use async_trait::async_trait;
use tracing::info;

use crate::notifications::occurrence::EventOccurrence;

use super::{EventSink, SinkError};

/// Writes one structured log line per occurrence through the tracing
/// pipeline.
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSink for ConsoleSink {
    fn id(&self) -> &str {
        "console"
    }

    async fn deliver(
        &self,
        event: &str,
        tags: &[String],
        occurrence: &EventOccurrence,
    ) -> Result<(), SinkError> {
        info!(
            target: "roaming_hub::events",
            event,
            tags = ?tags,
            occurrence = %occurrence.text(),
            "event"
        );
        Ok(())
    }
}
