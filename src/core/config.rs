use crate::core::error::{BookmarkFoldersError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_APP_DIRECTORY: &str = "bookmark-folders";
pub const DEFAULT_DATA_FILE_NAME: &str = "folders.json";
pub const DEFAULT_NAMESPACE: &str = "all";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Tunables for the storage core. Missing fields fall back to their defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    pub app_directory: String,
    pub data_file_name: String,
    pub default_namespace: String,
    pub context_ttl_millis: i64,
    pub min_save_interval_millis: i64,
    pub reload_freshness_millis: i64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            app_directory: DEFAULT_APP_DIRECTORY.to_string(),
            data_file_name: DEFAULT_DATA_FILE_NAME.to_string(),
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            context_ttl_millis: 30_000,
            min_save_interval_millis: 5_000,
            reload_freshness_millis: 5_000,
        }
    }
}

impl StorageSettings {
    pub fn load_or_create(settings_file: &Path) -> Result<Self> {
        if settings_file.exists() {
            let content = std::fs::read_to_string(settings_file)
                .map_err(|e| BookmarkFoldersError::read_failed(settings_file, e))?;
            let settings: Self = serde_json::from_str(&content)?;
            Ok(settings.normalized())
        } else {
            let settings = Self::default();
            settings.save(settings_file)?;
            Ok(settings)
        }
    }

    pub fn save(&self, settings_file: &Path) -> Result<()> {
        if let Some(parent) = settings_file.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| BookmarkFoldersError::directory_creation_failed(parent, e))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(settings_file, content)
            .map_err(|e| BookmarkFoldersError::write_failed(settings_file, e))?;

        Ok(())
    }

    /// Blank names and negative intervals are replaced with defaults.
    fn normalized(mut self) -> Self {
        let defaults = Self::default();
        if self.app_directory.trim().is_empty() {
            self.app_directory = defaults.app_directory;
        }
        if self.data_file_name.trim().is_empty() {
            self.data_file_name = defaults.data_file_name;
        }
        if self.default_namespace.trim().is_empty() {
            self.default_namespace = defaults.default_namespace;
        }
        self.context_ttl_millis = self.context_ttl_millis.max(0);
        self.min_save_interval_millis = self.min_save_interval_millis.max(0);
        self.reload_freshness_millis = self.reload_freshness_millis.max(0);
        self
    }
}
