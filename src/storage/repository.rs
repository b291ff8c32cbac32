//! Authoritative in-memory folder store.
//!
//! [`FolderRepository`] owns every [`Folder`], the last active folder pointer and
//! the loaded/dirty flags. Mutations only mark the repository dirty when they
//! actually change something, so no-op calls never cause a write.
//!
//! # Id allocation
//! New folders get the lowest positive id not currently in use. Ids of deleted
//! folders are therefore reused, but never while the folder still exists.
//!
//! # Lifecycle
//! `Unloaded → Loading → Loaded(clean) ⇄ Loaded(dirty) → Saving → Loaded(clean)`.
//! A failed save returns to `Loaded` with the dirty flag still set.

use crate::core::state::{Folder, ParsedDocument};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryPhase {
    Unloaded,
    Loading,
    Loaded,
    Saving,
}

#[derive(Debug)]
pub struct FolderRepository {
    folders: BTreeMap<u32, Folder>,
    last_active_folder_id: Option<u32>,
    phase: RepositoryPhase,
    loaded: bool,
    dirty: bool,
}

impl Default for FolderRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl FolderRepository {
    pub fn new() -> Self {
        Self {
            folders: BTreeMap::new(),
            last_active_folder_id: None,
            phase: RepositoryPhase::Unloaded,
            loaded: false,
            dirty: false,
        }
    }

    pub fn create_folder(&mut self, name: impl Into<String>) -> Folder {
        let folder = Folder::new(self.next_id(), name);
        log::debug!("Created folder {} '{}'", folder.id, folder.name);
        self.folders.insert(folder.id, folder.clone());
        self.mark_dirty();
        folder
    }

    pub fn delete_folder(&mut self, id: u32) -> bool {
        if self.folders.remove(&id).is_none() {
            return false;
        }
        if self.last_active_folder_id == Some(id) {
            self.last_active_folder_id = None;
        }
        log::debug!("Deleted folder {id}");
        self.mark_dirty();
        true
    }

    pub fn update_folder_name(&mut self, id: u32, new_name: impl Into<String>) -> bool {
        let Some(folder) = self.folders.get_mut(&id) else {
            return false;
        };
        let new_name = new_name.into();
        if folder.name != new_name {
            folder.name = new_name;
            self.mark_dirty();
        }
        true
    }

    /// `false` if the folder is unknown or already holds `key`.
    pub fn add_bookmark(&mut self, id: u32, key: impl Into<String>) -> bool {
        let Some(folder) = self.folders.get_mut(&id) else {
            return false;
        };
        if !folder.push_bookmark(key) {
            return false;
        }
        self.mark_dirty();
        true
    }

    pub fn remove_bookmark(&mut self, id: u32, key: &str) -> bool {
        let Some(folder) = self.folders.get_mut(&id) else {
            return false;
        };
        if !folder.remove_bookmark(key) {
            return false;
        }
        self.mark_dirty();
        true
    }

    /// Moves `key` from one folder to the end of another. Fails without changes
    /// if either folder is unknown, the source lacks the key or the target has it.
    pub fn move_bookmark(&mut self, from: u32, to: u32, key: &str) -> bool {
        if from == to {
            return false;
        }
        let source_has_key = self.folders.get(&from).is_some_and(|f| f.contains(key));
        let target_accepts = self.folders.get(&to).is_some_and(|f| !f.contains(key));
        if !source_has_key || !target_accepts {
            return false;
        }

        if let Some(source) = self.folders.get_mut(&from) {
            source.remove_bookmark(key);
        }
        if let Some(target) = self.folders.get_mut(&to) {
            target.push_bookmark(key);
        }
        self.mark_dirty();
        true
    }

    pub fn folder(&self, id: u32) -> Option<&Folder> {
        self.folders.get(&id)
    }

    /// All folders ordered by id.
    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.folders.values()
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    pub fn all_bookmark_keys(&self) -> HashSet<String> {
        self.folders
            .values()
            .flat_map(|folder| folder.bookmark_keys.iter().cloned())
            .collect()
    }

    /// The id the next `create_folder` call will assign.
    pub fn next_id(&self) -> u32 {
        let mut candidate = 1;
        for &id in self.folders.keys() {
            if id != candidate {
                break;
            }
            candidate += 1;
        }
        candidate
    }

    pub fn last_active_folder_id(&self) -> Option<u32> {
        self.last_active_folder_id
    }

    /// `false` if `id` names no folder. Setting the current value is a no-op.
    pub fn set_last_active_folder_id(&mut self, id: Option<u32>) -> bool {
        if let Some(id) = id {
            if !self.folders.contains_key(&id) {
                return false;
            }
        }
        if self.last_active_folder_id != id {
            self.last_active_folder_id = id;
            self.mark_dirty();
        }
        true
    }

    /// Replaces all state with the document's contents.
    pub fn load_from_parsed_document(&mut self, document: ParsedDocument) {
        let ParsedDocument {
            folders,
            next_id,
            active_folder_id,
        } = document;

        self.folders = folders;
        self.last_active_folder_id = active_folder_id.filter(|id| self.folders.contains_key(id));
        if active_folder_id.is_some() && self.last_active_folder_id.is_none() {
            log::warn!("Dropping active folder pointer to missing folder {active_folder_id:?}");
        }
        log::debug!(
            "Loaded {} folders (stored nextId {next_id}, allocator next id {})",
            self.folders.len(),
            self.next_id()
        );
        self.mark_loaded();
        self.dirty = false;
    }

    pub fn clear(&mut self) {
        if self.folders.is_empty() && self.last_active_folder_id.is_none() {
            return;
        }
        self.folders.clear();
        self.last_active_folder_id = None;
        self.mark_dirty();
    }

    /// Marks the repository loaded without touching its contents.
    pub fn mark_loaded(&mut self) {
        self.loaded = true;
        self.phase = RepositoryPhase::Loaded;
    }

    /// Drops everything and returns to `Unloaded`, e.g. before switching namespace.
    pub fn reset(&mut self) {
        self.folders.clear();
        self.last_active_folder_id = None;
        self.loaded = false;
        self.dirty = false;
        self.phase = RepositoryPhase::Unloaded;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn phase(&self) -> RepositoryPhase {
        self.phase
    }

    pub fn begin_loading(&mut self) {
        self.phase = RepositoryPhase::Loading;
    }

    pub fn begin_saving(&mut self) {
        self.phase = RepositoryPhase::Saving;
    }

    /// Ends a save; only a successful one clears the dirty flag.
    pub fn finish_saving(&mut self, success: bool) {
        if success {
            self.dirty = false;
        }
        self.phase = if self.loaded {
            RepositoryPhase::Loaded
        } else {
            RepositoryPhase::Unloaded
        };
    }
}
