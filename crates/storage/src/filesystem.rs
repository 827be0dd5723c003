//! Filesystem placement of uploads

use crate::{Result, StorageError};
use common::candidate_name;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tracing::debug;

/// Default cap on collision suffixes tried for a single upload
pub const DEFAULT_MAX_NAME_ATTEMPTS: usize = 10_000;

/// The directory uploads are written into
#[derive(Debug, Clone)]
pub struct SaveDirectory {
    root: PathBuf,
    max_attempts: usize,
}

/// A freshly created, empty file that no other request can claim
#[derive(Debug)]
pub struct ReservedFile {
    pub path: PathBuf,
    pub file: File,
}

impl SaveDirectory {
    /// Resolve `dir` to an absolute path and require it to be an existing directory.
    pub fn open(dir: impl AsRef<Path>, max_attempts: usize) -> Result<Self> {
        let dir = dir.as_ref();
        let root = std::fs::canonicalize(dir)
            .map_err(|_| StorageError::NotADirectory(dir.to_path_buf()))?;
        if !root.is_dir() {
            return Err(StorageError::NotADirectory(root));
        }
        Ok(Self {
            root,
            max_attempts: max_attempts.max(1),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path for `name` directly inside the save directory.
    ///
    /// Anything that would land elsewhere (absolute names, separators,
    /// `..`) is refused.
    pub fn candidate_path(&self, name: &str) -> Result<PathBuf> {
        let path = self.root.join(name);
        if path.parent() != Some(self.root.as_path()) || path.file_name().is_none() {
            return Err(StorageError::OutsideSaveDirectory(path));
        }
        Ok(path)
    }

    /// Create a new file for `filename`, falling back to `filename_1`,
    /// `filename_2`, ... while earlier candidates exist.
    ///
    /// Each attempt is an exclusive create, so two concurrent uploads of the
    /// same name always end up in different files.
    pub async fn create_unique(&self, filename: &str) -> Result<ReservedFile> {
        for attempt in 0..self.max_attempts {
            let path = self.candidate_path(&candidate_name(filename, attempt))?;
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok(ReservedFile { path, file }),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(path = ?path, "Candidate already exists");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(StorageError::NamesExhausted {
            name: filename.to_string(),
            attempts: self.max_attempts,
        })
    }
}
