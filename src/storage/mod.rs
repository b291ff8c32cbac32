//! Persistence and caching core.
//!
//! Components, leaf-first:
//! - [`context`]: which storage namespace the current session uses
//! - [`paths`]: namespace → directory and data file
//! - [`file_store`]: raw text reads and writes
//! - [`serializer`]: folder documents to and from text
//! - [`repository`]: the authoritative in-memory folder store
//! - [`ingredients`]: bookmark key → resolved ingredient cache
//! - [`coordinator`]: the façade that applies load/save policy

pub mod context;
pub mod coordinator;
pub mod file_store;
pub mod ingredients;
pub mod paths;
pub mod repository;
pub mod serializer;

pub use context::{
    sanitize_namespace, ContextResolver, IdentityProbe, NamespaceSource, NoSessionEnvironment,
    SessionEnvironment, StaticEnvironment,
};
pub use coordinator::{SaveOutcome, StorageCoordinator, StorageEvent, StorageListener};
pub use file_store::FileStore;
pub use ingredients::{IngredientCache, IngredientLookup, LookupError, RegistryLookup};
pub use paths::PathResolver;
pub use repository::{FolderRepository, RepositoryPhase};
pub use serializer::DocumentSerializer;
