//! Bookmark Folders - namespaced bookmark folders with an ingredient cache.
//!
//! Users sort bookmark keys into named folders. Folders are persisted per
//! storage namespace (one directory per save or server) and the ingredients the
//! keys refer to are cached and pruned as folders change.
//!
//! # Public API
//! - [`storage`]: the persistence and caching core, fronted by [`StorageCoordinator`]
//! - [`core`]: errors, settings, the folder model, clocks and CLI helpers

pub mod commands;
pub mod core;
pub mod storage;

// Re-export the public API for external users
pub use core::{
    // Error handling
    BookmarkFoldersError,
    // Time
    Clock,
    // Data model
    Folder,
    ManualClock,
    ParsedDocument,
    Result,
    // Configuration
    StorageSettings,
    SystemClock,
};

pub use storage::{
    ContextResolver,
    DocumentSerializer,
    FileStore,
    FolderRepository,
    IngredientCache,
    IngredientLookup,
    PathResolver,
    RegistryLookup,
    SaveOutcome,
    SessionEnvironment,
    StaticEnvironment,
    StorageCoordinator,
    StorageEvent,
};
