use crate::core::config::DEFAULT_APP_DIRECTORY;
use crate::core::error::{BookmarkFoldersError, Result};
use std::path::PathBuf;

pub const HOME_ENV_VAR: &str = "BOOKMARK_FOLDERS_HOME";

/// Directory that hosts `config/<app>/...` when no `--instance-dir` is given.
pub fn get_instance_directory() -> Result<PathBuf> {
    if let Ok(home) = std::env::var(HOME_ENV_VAR) {
        if !home.trim().is_empty() {
            return Ok(PathBuf::from(home));
        }
    }

    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|home| home.join(".local/share"))),
        _ => dirs::data_dir(),
    };

    base.map(|dir| dir.join(DEFAULT_APP_DIRECTORY))
        .ok_or(BookmarkFoldersError::InstanceDirectoryNotFound)
}
