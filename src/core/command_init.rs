//! Centralized initialization for CLI commands.
//!
//! This module provides [`CommandInit`] which turns global CLI options into a
//! ready [`StorageCoordinator`], so every command starts from the same setup.
//!
//! # Initialization Steps
//! 1. **Instance directory**: `--instance-dir`, else the platform default
//! 2. **Settings**: load `settings.json`, writing defaults if it is missing
//! 3. **Ingredient registry**: optional JSON registry from `--registry`
//! 4. **Session environment**: namespace signals from `BOOKMARK_FOLDERS_*` variables

use crate::core::clock::SystemClock;
use crate::core::config::{StorageSettings, DEFAULT_APP_DIRECTORY};
use crate::core::dirs::get_instance_directory;
use crate::core::error::{BookmarkFoldersError, Result};
use crate::storage::context::StaticEnvironment;
use crate::storage::coordinator::{SaveOutcome, StorageCoordinator};
use crate::storage::ingredients::RegistryLookup;
use crate::storage::paths::PathResolver;
use std::path::PathBuf;
use std::rc::Rc;

/// Global options shared by every command
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    pub instance_dir: Option<PathBuf>,
    pub registry: Option<PathBuf>,
}

/// Initialized context handed to a command
pub struct CommandContext {
    pub storage: StorageCoordinator<RegistryLookup>,
    pub instance_dir: PathBuf,
}

pub struct CommandInit;

impl CommandInit {
    pub fn initialize(options: &CommandOptions) -> Result<CommandContext> {
        // Step 1: Instance directory
        let instance_dir = match &options.instance_dir {
            Some(dir) => dir.clone(),
            None => get_instance_directory()?,
        };
        log::debug!("Using instance directory: {}", instance_dir.display());

        // Step 2: Settings
        let settings_file = PathResolver::settings_file_for(&instance_dir, DEFAULT_APP_DIRECTORY);
        let settings = StorageSettings::load_or_create(&settings_file).map_err(|e| {
            log::warn!("Failed to load settings from {}: {e}", settings_file.display());
            e
        })?;

        // Step 3: Ingredient registry
        let registry = match &options.registry {
            Some(path) => RegistryLookup::from_file(path)?,
            None => RegistryLookup::new(),
        };

        // Step 4: Session environment
        let environment = Rc::new(StaticEnvironment::from_env());

        let storage = StorageCoordinator::new(
            &instance_dir,
            settings,
            environment,
            Rc::new(SystemClock),
            registry,
        );

        Ok(CommandContext {
            storage,
            instance_dir,
        })
    }

    /// Parses a user-supplied folder id; ids start at 1.
    pub fn parse_folder_id(input: &str) -> Result<u32> {
        match input.trim().parse::<u32>() {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(BookmarkFoldersError::invalid_folder_id(input)),
        }
    }
}

impl CommandContext {
    /// Writes anything still pending. Commands call this before returning.
    pub fn finish(mut self) -> Result<()> {
        match self.storage.flush() {
            SaveOutcome::Written | SaveOutcome::Clean => Ok(()),
            outcome => Err(BookmarkFoldersError::operation_rejected(format!(
                "Could not save folders ({outcome:?})"
            ))),
        }
    }
}
