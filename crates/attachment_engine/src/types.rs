use std::fmt;

use attachment_core::ControlView;
use bytes::Bytes;

use crate::archive::ArchiveError;
use crate::sink::DeliveryError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A trigger control's label or enabled flag changed.
    ControlChanged {
        control_id: String,
        view: ControlView,
    },
    FileFetched {
        region: usize,
        filename: String,
        bytes: u64,
    },
    FileFailed {
        region: usize,
        filename: String,
        kind: FailureKind,
    },
    ArchiveProgress {
        region: usize,
        percent: u8,
    },
    JobCompleted {
        region: usize,
        result: Result<JobOutcome, JobError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The region had no attachment links; nothing was delivered.
    NoAttachments,
    /// One file handed to the sink as-is.
    Direct { url: String, filename: String },
    /// Several files bundled into one archive. `archived` may be below
    /// `requested` when some fetches failed.
    Archive {
        filename: String,
        archived: usize,
        requested: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    #[error("archive could not be built: {0}")]
    Archive(#[from] ArchiveError),
    #[error("delivery of {filename} failed: {source}")]
    Delivery {
        filename: String,
        source: DeliveryError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Bytes,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
