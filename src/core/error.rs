//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`BookmarkFoldersError`] which covers every failure mode of
//! the folder storage core and the CLI built on top of it. It uses `thiserror` for
//! ergonomic error definitions and includes constructors for the common cases.
//!
//! # Public API
//! - [`BookmarkFoldersError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, BookmarkFoldersError>`
//!
//! # Error Categories
//! - **File operations**: I/O errors with path context, directory creation
//! - **Documents**: Malformed folder documents, invalid or duplicate folder ids
//! - **Folders**: Unknown folder ids, rejected mutations
//! - **Ingredients**: Lookup failures reported by the ingredient service
//!
//! The storage core itself reports most of these as `bool`/`Option` and a log line;
//! the typed errors surface at the edges (CLI commands, settings, parsing helpers).

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for bookmark-folders
#[derive(Error, Debug)]
pub enum BookmarkFoldersError {
    // File operation errors
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Path exists but is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Could not determine an instance directory")]
    InstanceDirectoryNotFound,

    // Document errors
    #[error("Malformed folder document: {reason}")]
    MalformedDocument { reason: String },

    #[error("Folder id must be positive (got 0)")]
    ZeroFolderId,

    #[error("Duplicate folder id {id} in document")]
    DuplicateFolderId { id: u32 },

    // Folder errors
    #[error("Folder {id} does not exist")]
    FolderNotFound { id: u32 },

    #[error("Invalid folder id: '{input}'")]
    InvalidFolderId { input: String },

    #[error("Folder name cannot be empty")]
    EmptyFolderName,

    #[error("{message}")]
    OperationRejected { message: String },

    // Ingredient errors
    #[error("Failed to resolve ingredient '{key}': {reason}")]
    LookupFailed { key: String, reason: String },

    // JSON serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using BookmarkFoldersError
pub type Result<T> = std::result::Result<T, BookmarkFoldersError>;

impl BookmarkFoldersError {
    /// Create a read failed error
    pub fn read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a write failed error
    pub fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a directory creation failed error
    pub fn directory_creation_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreationFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a not-a-directory error
    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        Self::NotADirectory { path: path.into() }
    }

    /// Create a malformed document error
    pub fn malformed_document(reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            reason: reason.into(),
        }
    }

    /// Create a folder not found error
    pub fn folder_not_found(id: u32) -> Self {
        Self::FolderNotFound { id }
    }

    /// Create an invalid folder id error
    pub fn invalid_folder_id(input: impl Into<String>) -> Self {
        Self::InvalidFolderId {
            input: input.into(),
        }
    }

    /// Create an operation rejected error
    pub fn operation_rejected(message: impl Into<String>) -> Self {
        Self::OperationRejected {
            message: message.into(),
        }
    }

    /// Create a lookup failed error
    pub fn lookup_failed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LookupFailed {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
