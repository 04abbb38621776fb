use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use attachment_core::{
    archive_filename, extract_attachments, plan_download, AttachmentRef, DownloadPlan,
    DownloaderConfig, Msg,
};
use bytes::Bytes;
use chrono::{NaiveDate, Utc};
use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use futures_util::future::{join, join_all};
use tokio::sync::{mpsc, OnceCell};

use crate::archive::{shared_archiver, Archiver};
use crate::control::{control_id, JobGuard, TriggerControl};
use crate::region::{parse_selector, Region, RegionProvider, SelectorError};
use crate::sink::{Delivery, DownloadSink, RELEASE_GRACE};
use crate::{EngineEvent, Fetcher, JobError, JobOutcome, LogProgressSink, ProgressSink};

pub type Today = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("table selector (table_selector) not specified")]
    MissingTableSelector,
    #[error("no table matches selector {0:?}")]
    NoRegions(String),
    #[error(transparent)]
    InvalidSelector(#[from] SelectorError),
}

/// Wires trigger controls into a page and runs the download job behind each.
pub struct AttachmentDownloader {
    config: DownloaderConfig,
    provider: Arc<dyn RegionProvider>,
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn DownloadSink>,
    archiver: OnceCell<Arc<dyn Archiver>>,
    events: Arc<dyn ProgressSink>,
    today: Today,
}

impl AttachmentDownloader {
    pub fn new(
        config: DownloaderConfig,
        provider: Arc<dyn RegionProvider>,
        fetcher: Arc<dyn Fetcher>,
        sink: Arc<dyn DownloadSink>,
    ) -> Self {
        Self {
            config,
            provider,
            fetcher,
            sink,
            archiver: OnceCell::new(),
            events: Arc::new(LogProgressSink),
            today: Arc::new(|| Utc::now().date_naive()),
        }
    }

    /// Use this archiver instead of the process-wide zip capability.
    pub fn with_archiver(self, archiver: Arc<dyn Archiver>) -> Self {
        Self {
            archiver: OnceCell::new_with(Some(archiver)),
            ..self
        }
    }

    pub fn with_events(self, events: Arc<dyn ProgressSink>) -> Self {
        Self { events, ..self }
    }

    pub fn with_today(self, today: Today) -> Self {
        Self { today, ..self }
    }

    async fn archiver(&self) -> Arc<dyn Archiver> {
        self.archiver
            .get_or_init(|| async {
                let shared: Arc<dyn Archiver> = shared_archiver().await;
                shared
            })
            .await
            .clone()
    }

    /// Insert a trigger control into every region of the page.
    ///
    /// Waits for the archiving capability first. A missing or invalid table
    /// selector, or a page without regions, aborts everything; a region
    /// without an insertion point is skipped on its own.
    pub async fn initialize(&self) -> Result<Vec<TriggerControl>, ConfigError> {
        self.archiver().await;

        let result = self.wire_regions();
        if let Err(err) = &result {
            engine_error!("Error: {}", err);
        }
        result
    }

    fn wire_regions(&self) -> Result<Vec<TriggerControl>, ConfigError> {
        let table_selector = self
            .config
            .table_selector
            .as_deref()
            .ok_or(ConfigError::MissingTableSelector)?;
        if let Some(selector) = self.config.national_code_selector.as_deref() {
            parse_selector(selector)?;
        }

        let regions = self.provider.regions(table_selector)?;
        if regions.is_empty() {
            return Err(ConfigError::NoRegions(table_selector.to_string()));
        }

        let mut controls = Vec::with_capacity(regions.len());
        for region in regions {
            let Some(position_selector) = self.config.button_position_selector.as_deref() else {
                engine_error!(region = region.index; "Error: button position selector not set");
                continue;
            };
            let anchor = match self.provider.find_anchor(&region, position_selector)? {
                Some(anchor) => anchor,
                None => {
                    engine_error!(
                        region = region.index;
                        "Error: button position {:?} not found",
                        position_selector
                    );
                    continue;
                }
            };
            let id = control_id(region.index);
            self.provider
                .insert_trigger(&anchor, &id, &self.config.button_text);
            engine_debug!(region = region.index; "Inserted trigger {}", id);
            controls.push(TriggerControl::new(
                region,
                &self.config.button_text,
                self.events.clone(),
            ));
        }
        engine_info!("Initialized {} download trigger(s)", controls.len());
        Ok(controls)
    }

    /// Run one download job for `region`, driven by its trigger `control`.
    ///
    /// Never fails: errors are logged and reported as a
    /// [`EngineEvent::JobCompleted`] event, and the control is always
    /// re-enabled with its idle label afterwards.
    pub async fn handle_trigger(&self, region: &Region, control: &TriggerControl) {
        let Some(job) = control.press() else {
            engine_debug!(region = region.index; "Trigger {} is busy; ignoring", control.id());
            return;
        };

        let result = self.run_job(region, &job).await;
        match &result {
            Ok(outcome) => engine_info!(region = region.index; "Download finished: {:?}", outcome),
            Err(err) => engine_error!(region = region.index; "Error in the download process: {}", err),
        }
        self.events.emit(EngineEvent::JobCompleted {
            region: region.index,
            result,
        });
        drop(job);
    }

    async fn run_job(&self, region: &Region, job: &JobGuard<'_>) -> Result<JobOutcome, JobError> {
        let hrefs = self.provider.candidate_links(region);
        let refs = extract_attachments(hrefs.iter().map(String::as_str));

        match plan_download(refs) {
            DownloadPlan::Nothing => {
                engine_error!(region = region.index; "No attachment found for download.");
                Ok(JobOutcome::NoAttachments)
            }
            DownloadPlan::Direct(file) => self.download_single(file).await,
            DownloadPlan::Archive(batches) => self.download_as_archive(region, batches, job).await,
        }
    }

    async fn download_single(&self, file: AttachmentRef) -> Result<JobOutcome, JobError> {
        let handoff = self
            .sink
            .deliver(Delivery::Url(file.url.clone()), &file.filename)
            .await
            .map_err(|source| JobError::Delivery {
                filename: file.filename.clone(),
                source,
            })?;
        handoff.settle(RELEASE_GRACE).await;
        Ok(JobOutcome::Direct {
            url: file.url,
            filename: file.filename,
        })
    }

    async fn download_as_archive(
        &self,
        region: &Region,
        batches: Vec<Vec<AttachmentRef>>,
        job: &JobGuard<'_>,
    ) -> Result<JobOutcome, JobError> {
        let requested: usize = batches.iter().map(Vec::len).sum();
        let mut builder = self.archiver().await.begin();
        let archived = AtomicUsize::new(0);

        for (number, batch) in batches.iter().enumerate() {
            engine_debug!(
                region = region.index;
                "Fetching batch {} ({} file(s))",
                number + 1,
                batch.len()
            );
            let fetched = join_all(
                batch
                    .iter()
                    .map(|file| self.fetch_one(region, file, requested, &archived, job)),
            )
            .await;
            for (file, bytes) in batch.iter().zip(fetched) {
                if let Some(bytes) = bytes {
                    builder.add(&file.filename, bytes);
                }
            }
        }

        job.report(Msg::CompressStarted);
        let entries = builder.entry_count();
        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<u8>();
        let finalize = builder.finalize(Box::new(move |percent| {
            let _ = progress_tx.send(percent);
        }));
        let relay = async {
            while let Some(percent) = progress_rx.recv().await {
                job.report(Msg::CompressProgress(percent));
                self.events.emit(EngineEvent::ArchiveProgress {
                    region: region.index,
                    percent,
                });
            }
        };
        let (blob, ()) = join(finalize, relay).await;
        let blob = blob?;

        let filename = self.archive_name(region);
        let handoff = self
            .sink
            .deliver(Delivery::Blob(blob), &filename)
            .await
            .map_err(|source| JobError::Delivery {
                filename: filename.clone(),
                source,
            })?;
        handoff.settle(RELEASE_GRACE).await;

        Ok(JobOutcome::Archive {
            filename,
            archived: entries,
            requested,
        })
    }

    async fn fetch_one(
        &self,
        region: &Region,
        file: &AttachmentRef,
        total: usize,
        archived: &AtomicUsize,
        job: &JobGuard<'_>,
    ) -> Option<Bytes> {
        let bytes = match self.fetcher.fetch(&file.url).await {
            Ok(output) => {
                archived.fetch_add(1, Ordering::SeqCst);
                self.events.emit(EngineEvent::FileFetched {
                    region: region.index,
                    filename: file.filename.clone(),
                    bytes: output.metadata.byte_len,
                });
                Some(output.bytes)
            }
            Err(err) => {
                engine_error!(region = region.index; "Error downloading {}: {}", file.filename, err);
                self.events.emit(EngineEvent::FileFailed {
                    region: region.index,
                    filename: file.filename.clone(),
                    kind: err.kind,
                });
                None
            }
        };
        job.report(Msg::FileSettled {
            archived: archived.load(Ordering::SeqCst),
            total,
        });
        bytes
    }

    fn archive_name(&self, region: &Region) -> String {
        let code = self
            .config
            .national_code_selector
            .as_deref()
            .and_then(|selector| match self.provider.text_at(selector, region.index) {
                Ok(text) => text,
                Err(err) => {
                    engine_warn!(region = region.index; "National code lookup failed: {}", err);
                    None
                }
            });
        archive_filename(code.as_deref(), (self.today)(), region.index)
    }
}
