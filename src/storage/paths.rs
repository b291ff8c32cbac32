//! Namespace → directory and data-file mapping.
//!
//! Layout: `<instance>/config/<app>/<namespace>/<data file>`.

use crate::core::config::{StorageSettings, SETTINGS_FILE_NAME};
use crate::core::error::{BookmarkFoldersError, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    data_file_name: String,
}

impl PathResolver {
    pub fn new(instance_dir: impl AsRef<Path>, settings: &StorageSettings) -> Self {
        Self::with_root(
            Self::root_for(instance_dir.as_ref(), &settings.app_directory),
            &settings.data_file_name,
        )
    }

    pub fn with_root(root: impl Into<PathBuf>, data_file_name: &str) -> Self {
        Self {
            root: root.into(),
            data_file_name: data_file_name.to_string(),
        }
    }

    /// `<instance>/config/<app>`, usable before settings are loaded.
    pub fn root_for(instance_dir: &Path, app_directory: &str) -> PathBuf {
        instance_dir.join("config").join(app_directory)
    }

    pub fn settings_file_for(instance_dir: &Path, app_directory: &str) -> PathBuf {
        Self::root_for(instance_dir, app_directory).join(SETTINGS_FILE_NAME)
    }

    pub fn root_directory(&self) -> &Path {
        &self.root
    }

    pub fn namespace_directory(&self, namespace: &str) -> PathBuf {
        self.root.join(namespace)
    }

    pub fn data_file_path(&self, namespace: &str) -> PathBuf {
        self.namespace_directory(namespace).join(&self.data_file_name)
    }

    pub fn ensure_root_directory(&self) -> bool {
        report("root", ensure_directory(&self.root))
    }

    pub fn ensure_namespace_directory(&self, namespace: &str) -> bool {
        report("namespace", ensure_directory(&self.namespace_directory(namespace)))
    }
}

fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    if dir.exists() {
        return Err(BookmarkFoldersError::not_a_directory(dir));
    }

    fs::create_dir_all(dir).map_err(|e| BookmarkFoldersError::directory_creation_failed(dir, e))?;
    log::debug!("Created directory: {}", dir.display());
    Ok(())
}

fn report(kind: &str, result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Could not prepare {kind} directory: {e}");
            false
        }
    }
}
