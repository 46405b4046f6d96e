//! Artifact file store and garbage collection.
//!
//! Artifacts are addressed by their caller-visible filename (the job row's
//! `code`), independent of job ids, so split siblings share one file. The
//! sweep deletes exactly the files whose name is not referenced by any
//! queued or printing job; submission writes the file before the job row
//! commits, so a committed job can never lose its artifact to the sweep.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::QueueError;

/// Filesystem store rooted at the configured artifacts directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

/// Artifact names are plain filenames; anything that could escape the
/// store directory is rejected.
pub(crate) fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code != "."
        && code != ".."
        && !code.contains('/')
        && !code.contains('\\')
        && !code.contains('\0')
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, code: &str) -> Result<PathBuf, QueueError> {
        if !is_valid_code(code) {
            return Err(QueueError::invalid_state(format!(
                "invalid artifact filename '{code}'"
            )));
        }
        Ok(self.dir.join(code))
    }

    pub fn exists(&self, code: &str) -> Result<bool, QueueError> {
        Ok(self.path_for(code)?.exists())
    }

    /// Write artifact bytes, creating the store directory on first use.
    pub fn store(&self, code: &str, bytes: &[u8]) -> Result<(), QueueError> {
        let path = self.path_for(code)?;
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        fs::write(&path, bytes)?;
        Ok(())
    }

    pub fn read(&self, code: &str) -> Result<Option<Vec<u8>>, QueueError> {
        let path = self.path_for(code)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Delete every stored file whose name is not in the live set.
    /// Idempotent against files already removed by a concurrent sweep.
    /// Returns the number of files deleted.
    pub fn sweep(&self, live: &HashSet<String>) -> Result<u64, QueueError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            // Nothing was ever stored.
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(err.into()),
        };

        let mut removed = 0u64;
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if live.contains(name) {
                continue;
            }
            match fs::remove_file(entry.path()) {
                Ok(()) => {
                    tracing::debug!(artifact = name, "removed unreferenced artifact");
                    removed += 1;
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(removed)
    }
}
