//! The per-event relay pipeline: read, classify, convert, publish.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::Local;
use tracing::{debug, info};

use seisrelay_convert::{classify, envelope, RecordConverter};
use seisrelay_publish::HttpPublisher;
use seisrelay_watch::{FileEvent, FileHandler};

/// One relay per process: converter and publisher are shared read-only
/// across every concurrently processed event.
pub struct Relay {
    converter: Arc<dyn RecordConverter>,
    publisher: HttpPublisher,
}

impl Relay {
    pub fn new(converter: Arc<dyn RecordConverter>, publisher: HttpPublisher) -> Self {
        Self {
            converter,
            publisher,
        }
    }
}

#[async_trait]
impl FileHandler for Relay {
    /// Steps run strictly in sequence; any error drops this event only.
    async fn handle(&self, event: FileEvent) -> Result<()> {
        info!(path = %event.path.display(), "Process file");

        debug!("Read file");
        let raw = tokio::fs::read(&event.path)
            .await
            .with_context(|| format!("failed to read {}", event.path.display()))?;

        let Some(name) = event.file_name() else {
            bail!("path {} has no readable file name", event.path.display());
        };
        let classification = classify(name);
        if classification.topic().is_none() {
            bail!("unrecognized bulletin name: {name}");
        }

        debug!("Convert to JSON");
        let record = self
            .converter
            .convert(classification, &raw)
            .with_context(|| format!("failed to convert {name}"))?;
        let payload = envelope::seal(record, Local::now())?;

        self.publisher.publish(&payload, classification).await?;
        Ok(())
    }
}
