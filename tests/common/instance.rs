//! Temporary instance directories and command builders
//!
//! Every test gets its own instance directory so folder data never leaks
//! between tests or into the user's real data directory.

#![allow(dead_code)]

use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const SESSION_VARS: [&str; 5] = [
    "BOOKMARK_FOLDERS_HOME",
    "BOOKMARK_FOLDERS_SERVER",
    "BOOKMARK_FOLDERS_WORLD",
    "BOOKMARK_FOLDERS_PROFILE",
    "BOOKMARK_FOLDERS_ZONE",
];

/// Test instance containing the temporary directory (kept alive for the test)
/// and its path.
pub struct TestInstance {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl TestInstance {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `bookmark-folders --instance-dir <dir>` with a clean session environment
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("bookmark-folders").expect("binary should be built");
        for var in SESSION_VARS {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1")
            .env("CLICOLOR", "0")
            .arg("--instance-dir")
            .arg(&self.path);
        cmd
    }

    /// Same as [`command`](Self::command) but inside the given local session
    pub fn command_in_world(&self, world: &str) -> Command {
        let mut cmd = self.command();
        cmd.env("BOOKMARK_FOLDERS_WORLD", world);
        cmd
    }

    pub fn data_file(&self, namespace: &str) -> PathBuf {
        self.path
            .join("config")
            .join("bookmark-folders")
            .join(namespace)
            .join("folders.json")
    }

    pub fn read_data_file(&self, namespace: &str) -> String {
        fs::read_to_string(self.data_file(namespace)).unwrap_or_default()
    }

    /// Writes an ingredient registry and returns its path
    pub fn write_registry(&self, json: &str) -> PathBuf {
        let file = self.path.join("registry.json");
        fs::write(&file, json).expect("registry should be writable");
        file
    }
}

pub fn setup_instance() -> TestInstance {
    let temp_dir = TempDir::new().expect("temp dir should be created");
    let path = temp_dir.path().to_path_buf();
    TestInstance { temp_dir, path }
}

/// Runs `args` and asserts success
pub fn run_ok(instance: &TestInstance, args: &[&str]) {
    instance.command().args(args).assert().success();
}
