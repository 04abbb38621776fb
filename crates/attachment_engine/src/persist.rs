use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::Builder;
use thiserror::Error;

/// Prefix of the hidden file a download is staged in before it gets its name.
const STAGING_PREFIX: &str = ".partial-";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{} exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot create {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// The directory downloads end up in.
#[derive(Debug, Clone)]
pub struct OutputDir {
    path: PathBuf,
}

impl OutputDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the directory and its parents unless it is already there.
    pub fn ensure(&self) -> Result<(), PersistError> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(PersistError::NotADirectory(self.path.clone())),
            Err(_) => fs::create_dir_all(&self.path).map_err(|source| PersistError::CreateDir {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Save `content` as `filename`, replacing an earlier download of that name.
    ///
    /// Bytes land in a hidden staging file first; the final name only ever
    /// refers to a complete file.
    pub fn save(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        self.ensure()?;
        let target = self.path.join(filename);
        let write_err = |source: io::Error| PersistError::Write {
            path: target.clone(),
            source,
        };

        let mut staged = Builder::new()
            .prefix(STAGING_PREFIX)
            .tempfile_in(&self.path)
            .map_err(write_err)?;
        staged.write_all(content).map_err(write_err)?;
        staged.as_file().sync_all().map_err(write_err)?;
        staged
            .persist(&target)
            .map_err(|err| write_err(err.error))?;
        Ok(target)
    }
}

