//! Disk sink

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::notifications::occurrence::EventOccurrence;

use super::{EventSink, SinkError};

/// Appends one JSON line per occurrence to `<directory>/<event>.jsonl`.
pub struct DiskSink {
    directory: PathBuf,
}

impl DiskSink {
    /// Create the sink, ensuring the target directory exists.
    pub async fn create(directory: impl AsRef<Path>) -> Result<Self, SinkError> {
        let directory = directory.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&directory).await?;
        Ok(Self { directory })
    }

    fn file_for(&self, event: &str) -> PathBuf {
        self.directory.join(format!("{event}.jsonl"))
    }
}

#[async_trait]
impl EventSink for DiskSink {
    fn id(&self) -> &str {
        "disk"
    }

    async fn deliver(
        &self,
        event: &str,
        _tags: &[String],
        occurrence: &EventOccurrence,
    ) -> Result<(), SinkError> {
        let line = serde_json::to_string(occurrence)
            .map_err(|e| SinkError::Delivery(e.to_string()))?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.file_for(event))
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::occurrence::event_names;

    #[tokio::test]
    async fn appends_one_json_line_per_occurrence() {
        let dir = std::env::temp_dir().join(format!("roaming-hub-test-{}", uuid::Uuid::new_v4()));
        let sink = DiskSink::create(&dir).await.expect("sink dir");

        for _ in 0..2 {
            let occ = EventOccurrence::request(
                event_names::CDR_SENT,
                serde_json::json!({"session": "s1"}),
            );
            sink.deliver(event_names::CDR_SENT, &[], &occ)
                .await
                .expect("delivery");
        }

        let written = tokio::fs::read_to_string(dir.join("CDRSent.jsonl"))
            .await
            .expect("file written");
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let parsed: EventOccurrence = serde_json::from_str(line).expect("valid json line");
            assert_eq!(parsed.name, "CDRSent");
        }

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
