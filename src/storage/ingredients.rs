//! Ingredient cache keyed by bookmark key.
//!
//! The cache is a derived index over folder contents: an entry lives exactly as
//! long as some folder still references its key. Folders stay the source of
//! truth; [`IngredientCache::prune_unused`] drops everything unreachable.
//!
//! Resolution goes through the external [`IngredientLookup`] capability. Keys
//! that fail to resolve are skipped and retried on the next population pass.

use crate::core::error::{BookmarkFoldersError, Result};
use crate::core::state::Folder;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Error reported by an ingredient lookup service.
pub type LookupError = BookmarkFoldersError;

/// The ingredient lookup service.
pub trait IngredientLookup {
    type Ingredient: Clone;

    /// The bookmark key that identifies `ingredient`, if it has one.
    fn key_for(&self, ingredient: &Self::Ingredient) -> Option<String>;

    /// `Ok(None)` means the key is unknown to the service.
    fn resolve(&self, key: &str) -> std::result::Result<Option<Self::Ingredient>, LookupError>;
}

#[derive(Debug)]
pub struct IngredientCache<T> {
    entries: HashMap<String, T>,
}

impl<T> Default for IngredientCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Clone> IngredientCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn put(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<T> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Removes every entry whose key is not in `active_keys` and returns how many
    /// were dropped. An empty key set clears the whole cache.
    pub fn prune_unused(&mut self, active_keys: &HashSet<String>) -> usize {
        let before = self.entries.len();
        if active_keys.is_empty() {
            self.entries.clear();
        } else {
            self.entries.retain(|key, _| active_keys.contains(key));
        }
        let removed = before - self.entries.len();
        if removed > 0 {
            log::debug!("Pruned {removed} unreferenced ingredients");
        }
        removed
    }

    /// Resolves and caches every bookmark key not cached yet. Returns the number
    /// of newly cached ingredients.
    pub fn load_for_folders<'a, L>(
        &mut self,
        folders: impl IntoIterator<Item = &'a Folder>,
        lookup: &L,
    ) -> usize
    where
        L: IngredientLookup<Ingredient = T>,
    {
        let mut added = 0;
        for folder in folders {
            for key in &folder.bookmark_keys {
                if self.entries.contains_key(key) {
                    continue;
                }
                match lookup.resolve(key) {
                    Ok(Some(ingredient)) => {
                        self.entries.insert(key.clone(), ingredient);
                        added += 1;
                    }
                    Ok(None) => {
                        log::debug!("No ingredient for bookmark '{key}' in folder {}", folder.id);
                    }
                    Err(e) => {
                        log::warn!("Skipping bookmark '{key}' in folder {}: {e}", folder.id);
                    }
                }
            }
        }
        added
    }
}

/// An in-memory registry of JSON ingredient objects, keyed by their `"key"` field.
#[derive(Debug, Default, Clone)]
pub struct RegistryLookup {
    entries: HashMap<String, serde_json::Value>,
}

impl RegistryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON array of ingredient objects. Entries without a string `"key"`
    /// are ignored.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BookmarkFoldersError::read_failed(path, e))?;
        let values: Vec<serde_json::Value> = serde_json::from_str(&content)?;

        let mut registry = Self::new();
        for value in values {
            if !registry.register(value) {
                log::warn!("Registry entry without a key in {}", path.display());
            }
        }
        log::debug!("Loaded {} ingredients from {}", registry.len(), path.display());
        Ok(registry)
    }

    /// Returns `false` if the value has no usable key.
    pub fn register(&mut self, ingredient: serde_json::Value) -> bool {
        match self.key_for(&ingredient) {
            Some(key) => {
                self.entries.insert(key, ingredient);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IngredientLookup for RegistryLookup {
    type Ingredient = serde_json::Value;

    fn key_for(&self, ingredient: &serde_json::Value) -> Option<String> {
        ingredient
            .get("key")
            .and_then(|key| key.as_str())
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }

    fn resolve(&self, key: &str) -> std::result::Result<Option<serde_json::Value>, LookupError> {
        Ok(self.entries.get(key).cloned())
    }
}

/// Display name of a registry ingredient, falling back to its key.
pub fn ingredient_label(ingredient: &serde_json::Value) -> Option<&str> {
    ingredient
        .get("name")
        .and_then(|name| name.as_str())
        .or_else(|| ingredient.get("key").and_then(|key| key.as_str()))
}
