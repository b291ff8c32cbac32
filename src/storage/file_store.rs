//! Raw UTF-8 text persistence.
//!
//! Callers only see `Option`/`bool`; failures are logged here with the path.

use crate::core::error::{BookmarkFoldersError, Result};
use std::fs;
use std::path::Path;

#[derive(Debug, Default)]
pub struct FileStore {
    writes: u64,
}

impl FileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trimmed content, or `None` if the file is missing, unreadable or blank.
    pub fn read(&self, path: &Path) -> Option<String> {
        match self.try_read(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("{e}");
                None
            }
        }
    }

    /// Overwrites `path` with `content`, creating parent directories first.
    pub fn write(&mut self, path: &Path, content: &str) -> bool {
        match self.try_write(path, content) {
            Ok(()) => {
                self.writes += 1;
                true
            }
            Err(e) => {
                log::error!("{e}");
                false
            }
        }
    }

    pub fn try_read(&self, path: &Path) -> Result<Option<String>> {
        if !path.is_file() {
            log::debug!("No data file at {}", path.display());
            return Ok(None);
        }

        let content =
            fs::read_to_string(path).map_err(|e| BookmarkFoldersError::read_failed(path, e))?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            log::debug!("Data file is empty: {}", path.display());
            return Ok(None);
        }

        Ok(Some(trimmed.to_string()))
    }

    pub fn try_write(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| BookmarkFoldersError::directory_creation_failed(parent, e))?;
        }

        fs::write(path, content).map_err(|e| BookmarkFoldersError::write_failed(path, e))?;
        log::debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }

    /// Successful writes since construction.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}
