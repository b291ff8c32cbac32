//! Folder data model shared by the repository, serializer and coordinator.
//!
//! # Public API
//! - [`Folder`]: A named, ordered set of bookmark keys
//! - [`ParsedDocument`]: Transfer object produced by parsing an on-disk document

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: u32,
    pub name: String,
    pub bookmark_keys: Vec<String>,
}

impl Folder {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            bookmark_keys: Vec::new(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.bookmark_keys.iter().any(|k| k == key)
    }

    /// Appends `key` unless already present. Returns whether the list changed.
    pub fn push_bookmark(&mut self, key: impl Into<String>) -> bool {
        let key = key.into();
        if self.contains(&key) {
            return false;
        }
        self.bookmark_keys.push(key);
        true
    }

    pub fn remove_bookmark(&mut self, key: &str) -> bool {
        let before = self.bookmark_keys.len();
        self.bookmark_keys.retain(|k| k != key);
        self.bookmark_keys.len() != before
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedDocument {
    pub folders: BTreeMap<u32, Folder>,
    pub next_id: u32,
    pub active_folder_id: Option<u32>,
}
