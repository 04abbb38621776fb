//! Attachment engine: page access, fetching, archiving and download orchestration.
mod archive;
mod control;
mod decode;
mod downloader;
mod events;
mod fetch;
mod filename;
mod persist;
mod region;
mod sink;
mod types;

pub use archive::{shared_archiver, ArchiveBuilder, ArchiveError, ArchiveProgress, Archiver, ZipArchiver};
pub use control::{control_id, TriggerControl};
pub use decode::{decode_page, DecodeError, DecodedPage};
pub use downloader::{AttachmentDownloader, ConfigError, Today};
pub use events::{ChannelProgressSink, LogProgressSink, ProgressSink};
pub use fetch::{resolve_url, FetchSettings, Fetcher, ReqwestFetcher};
pub use filename::safe_filename;
pub use persist::{OutputDir, PersistError};
pub use region::{
    parse_selector, Anchor, HtmlRegionProvider, InsertedControl, Region, RegionProvider,
    SelectorError,
};
pub use sink::{
    Delivery, DeliveryError, DirectorySink, DownloadSink, Handoff, TransientResource, RELEASE_GRACE,
};
pub use types::{
    EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, JobError, JobOutcome,
};
