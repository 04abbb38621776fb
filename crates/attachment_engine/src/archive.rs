use std::io::{Cursor, Write};
use std::sync::Arc;

use bytes::Bytes;
use engine_logging::engine_info;
use tokio::sync::OnceCell;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Receives integer percentages, 0 to 100, while an archive is finalised.
pub type ArchiveProgress = Box<dyn FnMut(u8) + Send>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArchiveError {
    #[error("zip error: {0}")]
    Zip(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("archive worker stopped: {0}")]
    Worker(String),
}

/// Archiving capability: create an empty archive.
pub trait Archiver: Send + Sync {
    fn begin(&self) -> Box<dyn ArchiveBuilder>;
}

/// An archive under construction.
#[async_trait::async_trait]
pub trait ArchiveBuilder: Send {
    fn add(&mut self, name: &str, bytes: Bytes);

    fn entry_count(&self) -> usize;

    /// Produce the archive as one blob, reporting progress along the way.
    async fn finalize(self: Box<Self>, progress: ArchiveProgress) -> Result<Bytes, ArchiveError>;
}

#[derive(Debug, Clone, Copy)]
pub struct ZipArchiver {
    compression_level: Option<i64>,
}

impl Default for ZipArchiver {
    fn default() -> Self {
        Self {
            compression_level: Some(6),
        }
    }
}

impl ZipArchiver {
    pub fn with_compression_level(level: Option<i64>) -> Self {
        Self {
            compression_level: level,
        }
    }
}

impl Archiver for ZipArchiver {
    fn begin(&self) -> Box<dyn ArchiveBuilder> {
        Box::new(ZipArchiveBuilder {
            compression_level: self.compression_level,
            entries: Vec::new(),
        })
    }
}

struct ZipArchiveBuilder {
    compression_level: Option<i64>,
    entries: Vec<(String, Bytes)>,
}

#[async_trait::async_trait]
impl ArchiveBuilder for ZipArchiveBuilder {
    fn add(&mut self, name: &str, bytes: Bytes) {
        self.entries.push((name.to_string(), bytes));
    }

    fn entry_count(&self) -> usize {
        self.entries.len()
    }

    async fn finalize(self: Box<Self>, progress: ArchiveProgress) -> Result<Bytes, ArchiveError> {
        let ZipArchiveBuilder {
            compression_level,
            entries,
        } = *self;
        tokio::task::spawn_blocking(move || write_zip(entries, compression_level, progress))
            .await
            .map_err(|err| ArchiveError::Worker(err.to_string()))?
    }
}

fn write_zip(
    entries: Vec<(String, Bytes)>,
    compression_level: Option<i64>,
    mut progress: ArchiveProgress,
) -> Result<Bytes, ArchiveError> {
    let total: u64 = entries.iter().map(|(_, bytes)| bytes.len() as u64).sum();
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(compression_level);

    progress(0);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut written: u64 = 0;
    for (name, bytes) in &entries {
        writer
            .start_file(name.as_str(), options)
            .map_err(|err| ArchiveError::Zip(err.to_string()))?;
        writer
            .write_all(bytes)
            .map_err(|err| ArchiveError::Io(err.to_string()))?;
        written += bytes.len() as u64;
        progress(percent(written, total));
    }
    let cursor = writer
        .finish()
        .map_err(|err| ArchiveError::Zip(err.to_string()))?;
    progress(100);
    Ok(Bytes::from(cursor.into_inner()))
}

fn percent(done: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    ((done as f64 / total as f64) * 100.0).round().min(100.0) as u8
}

static SHARED_ARCHIVER: OnceCell<Arc<ZipArchiver>> = OnceCell::const_new();

/// Process-wide archiving capability, created on first use.
///
/// Concurrent callers all wait on the same initialisation and receive the
/// same instance.
pub async fn shared_archiver() -> Arc<ZipArchiver> {
    SHARED_ARCHIVER
        .get_or_init(|| async {
            engine_info!("Archive capability loaded");
            Arc::new(ZipArchiver::default())
        })
        .await
        .clone()
}
