//! Core building blocks shared by the storage layer and the CLI.
//!
//! This module provides error handling, time, configuration, the folder data
//! model and terminal output helpers.

pub mod clock;
pub mod command_init;
pub mod config;
pub mod dirs;
pub mod error;
pub mod output;
pub mod state;

// === Error handling ===
// Core error types and result type used throughout the application
pub use error::{BookmarkFoldersError, Result};

// === Time ===
// Injectable clock for TTLs, debouncing and freshness checks
pub use clock::{Clock, ManualClock, SystemClock};

// === Configuration ===
// Storage tunables persisted next to the folder data
pub use config::StorageSettings;

// === Data model ===
pub use state::{Folder, ParsedDocument};

// === Command initialization ===
// Builds a ready-to-use storage coordinator from CLI options
pub use command_init::{CommandContext, CommandInit, CommandOptions};

// === Output formatting ===
// Unified output formatting for consistent CLI presentation
pub use output::{print_error, print_folder_line, print_info, print_section_header, print_success};
