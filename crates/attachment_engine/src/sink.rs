use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use engine_logging::{engine_debug, engine_info};

use crate::filename::safe_filename;
use crate::persist::OutputDir;
use crate::{FetchError, Fetcher};

/// How long a transient hand-off resource is kept once delivery was requested.
pub const RELEASE_GRACE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Let the sink download the file itself.
    Url(String),
    /// An in-memory blob, usually a freshly built archive.
    Blob(Bytes),
}

/// Resource that must outlive the delivery request for a while, like an
/// object URL handed to a browser. Dropped on release.
pub struct TransientResource {
    label: String,
    resource: Option<Box<dyn Any + Send>>,
}

impl TransientResource {
    pub fn new<T: Any + Send>(label: impl Into<String>, resource: T) -> Self {
        Self {
            label: label.into(),
            resource: Some(Box::new(resource)),
        }
    }

    /// Wait for `grace`, then release. Completion of the download itself is
    /// never observed.
    pub async fn release_after(self, grace: Duration) {
        tokio::time::sleep(grace).await;
        self.release();
    }

    pub fn release(mut self) {
        if self.resource.take().is_some() {
            engine_debug!("Released transient resource {}", self.label);
        }
    }
}

impl std::fmt::Debug for TransientResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransientResource")
            .field("label", &self.label)
            .field("held", &self.resource.is_some())
            .finish()
    }
}

/// Result of a successful delivery request.
#[derive(Debug)]
pub enum Handoff {
    /// The sink owns the file now; nothing to clean up.
    Confirmed,
    /// The sink still relies on this resource; release it after the grace period.
    Pending(TransientResource),
}

impl Handoff {
    pub async fn settle(self, grace: Duration) {
        match self {
            Handoff::Confirmed => {}
            Handoff::Pending(resource) => resource.release_after(grace).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("download failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("could not store {filename}: {message}")]
    Store { filename: String, message: String },
}

/// Download capability: hand a file to the user under `filename`.
#[async_trait::async_trait]
pub trait DownloadSink: Send + Sync {
    async fn deliver(&self, delivery: Delivery, filename: &str) -> Result<Handoff, DeliveryError>;
}

/// Saves deliveries into a local directory.
pub struct DirectorySink {
    output: OutputDir,
    fetcher: Arc<dyn Fetcher>,
}

impl DirectorySink {
    pub fn new(dir: PathBuf, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            output: OutputDir::new(dir),
            fetcher,
        }
    }

    fn store(&self, filename: &str, content: &[u8]) -> Result<PathBuf, DeliveryError> {
        let safe = safe_filename(filename);
        self.output
            .save(&safe, content)
            .map_err(|err| DeliveryError::Store {
                filename: safe,
                message: err.to_string(),
            })
    }
}

#[async_trait::async_trait]
impl DownloadSink for DirectorySink {
    async fn deliver(&self, delivery: Delivery, filename: &str) -> Result<Handoff, DeliveryError> {
        let content = match delivery {
            Delivery::Url(url) => self.fetcher.fetch(&url).await?.bytes,
            Delivery::Blob(bytes) => bytes,
        };
        let path = self.store(filename, &content)?;
        engine_info!("Saved {} ({} bytes)", path.display(), content.len());
        Ok(Handoff::Confirmed)
    }
}
