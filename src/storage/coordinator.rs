//! The storage façade used by the rest of the application.
//!
//! [`StorageCoordinator`] ties namespace resolution, paths, file I/O,
//! serialization, the folder repository and the ingredient cache together.
//!
//! # Policies
//! - **Lazy load**: every public operation makes sure data is loaded first.
//! - **Debounced save**: a save is skipped while the repository is clean or the
//!   last successful save is younger than `minSaveIntervalMillis`. Deferred
//!   changes go out on the next [`tick`](StorageCoordinator::tick) or
//!   [`flush`](StorageCoordinator::flush).
//! - **Throttled reload**: data is reloaded when the namespace changes, or when
//!   it is dirty and older than `reloadFreshnessMillis`. Pending changes are
//!   written to their own namespace before any reload.
//! - **Reentrancy guard**: loads and saves started while another one is running
//!   (e.g. from an event listener) are rejected and logged.
//! - **Fallback directory**: if the namespace directory cannot be created the
//!   default namespace is used instead and
//!   [`is_using_fallback_directory`](StorageCoordinator::is_using_fallback_directory)
//!   reports it.

use crate::core::clock::{elapsed_millis, Clock};
use crate::core::config::StorageSettings;
use crate::core::state::{Folder, ParsedDocument};
use crate::storage::context::{ContextResolver, SessionEnvironment};
use crate::storage::file_store::FileStore;
use crate::storage::ingredients::{IngredientCache, IngredientLookup};
use crate::storage::paths::PathResolver;
use crate::storage::repository::{FolderRepository, RepositoryPhase};
use crate::storage::serializer::DocumentSerializer;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Notifications delivered to subscribers after loads and saves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageEvent {
    Loaded { namespace: String, folders: usize },
    Saved { namespace: String },
    NamespaceChanged { from: String, to: String },
}

/// Result of a save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Written,
    /// Nothing to write.
    Clean,
    /// Inside the debounce interval; still dirty.
    Deferred,
    /// Another load or save is in progress; still dirty.
    Rejected,
    /// Serialization or I/O failed; still dirty.
    Failed,
}

pub type StorageListener<L> = Box<dyn FnMut(&mut StorageCoordinator<L>, &StorageEvent)>;

pub struct StorageCoordinator<L: IngredientLookup> {
    settings: StorageSettings,
    clock: Rc<dyn Clock>,
    context: ContextResolver,
    paths: PathResolver,
    files: FileStore,
    repository: FolderRepository,
    cache: IngredientCache<L::Ingredient>,
    lookup: L,
    requested_namespace: Option<String>,
    active_namespace: Option<String>,
    using_fallback: bool,
    last_load_millis: Option<i64>,
    last_save_millis: Option<i64>,
    io_depth: u32,
    rejected_reentries: u64,
    listeners: Vec<StorageListener<L>>,
}

impl<L: IngredientLookup> StorageCoordinator<L> {
    pub fn new(
        instance_dir: impl AsRef<Path>,
        settings: StorageSettings,
        environment: Rc<dyn SessionEnvironment>,
        clock: Rc<dyn Clock>,
        lookup: L,
    ) -> Self {
        let context = ContextResolver::new(
            environment,
            clock.clone(),
            settings.default_namespace.clone(),
            settings.context_ttl_millis,
        );
        let paths = PathResolver::new(instance_dir, &settings);

        Self {
            settings,
            clock,
            context,
            paths,
            files: FileStore::new(),
            repository: FolderRepository::new(),
            cache: IngredientCache::new(),
            lookup,
            requested_namespace: None,
            active_namespace: None,
            using_fallback: false,
            last_load_millis: None,
            last_save_millis: None,
            io_depth: 0,
            rejected_reentries: 0,
            listeners: Vec::new(),
        }
    }

    // === Folder operations ===

    pub fn all_folders(&mut self) -> Vec<Folder> {
        self.ensure_loaded();
        self.repository.folders().cloned().collect()
    }

    pub fn folder(&mut self, id: u32) -> Option<Folder> {
        self.ensure_loaded();
        self.repository.folder(id).cloned()
    }

    pub fn create_folder(&mut self, name: &str) -> Folder {
        self.ensure_loaded();
        let folder = self.repository.create_folder(name);
        self.mark_dirty_and_save();
        folder
    }

    pub fn delete_folder(&mut self, id: u32) -> bool {
        self.ensure_loaded();
        if !self.repository.delete_folder(id) {
            return false;
        }
        self.prune_cache();
        self.mark_dirty_and_save();
        true
    }

    pub fn update_folder_name(&mut self, id: u32, new_name: &str) -> bool {
        self.ensure_loaded();
        let changed = self
            .repository
            .folder(id)
            .is_some_and(|folder| folder.name != new_name);
        if !self.repository.update_folder_name(id, new_name) {
            return false;
        }
        if changed {
            self.mark_dirty_and_save();
        }
        true
    }

    pub fn add_bookmark(&mut self, id: u32, key: &str) -> bool {
        self.ensure_loaded();
        if !self.repository.add_bookmark(id, key) {
            return false;
        }
        self.cache
            .load_for_folders(self.repository.folder(id), &self.lookup);
        self.mark_dirty_and_save();
        true
    }

    /// Bookmarks an ingredient object directly, caching it under its key.
    pub fn add_ingredient(&mut self, id: u32, ingredient: &L::Ingredient) -> bool {
        self.ensure_loaded();
        let Some(key) = self.lookup.key_for(ingredient) else {
            log::warn!("Ingredient has no bookmark key; not adding it to folder {id}");
            return false;
        };
        if !self.repository.add_bookmark(id, key.as_str()) {
            return false;
        }
        self.cache.put(key, ingredient.clone());
        self.mark_dirty_and_save();
        true
    }

    pub fn remove_bookmark(&mut self, id: u32, key: &str) -> bool {
        self.ensure_loaded();
        if !self.repository.remove_bookmark(id, key) {
            return false;
        }
        self.prune_cache();
        self.mark_dirty_and_save();
        true
    }

    pub fn move_bookmark(&mut self, from: u32, to: u32, key: &str) -> bool {
        self.ensure_loaded();
        if !self.repository.move_bookmark(from, to, key) {
            return false;
        }
        self.mark_dirty_and_save();
        true
    }

    pub fn last_active_folder_id(&mut self) -> Option<u32> {
        self.ensure_loaded();
        self.repository.last_active_folder_id()
    }

    /// `false` if `id` names no folder.
    pub fn set_last_active_folder_id(&mut self, id: Option<u32>) -> bool {
        self.ensure_loaded();
        let changed = self.repository.last_active_folder_id() != id;
        if !self.repository.set_last_active_folder_id(id) {
            return false;
        }
        if changed {
            self.mark_dirty_and_save();
        }
        true
    }

    // === Ingredients ===

    pub fn ingredient(&mut self, key: &str) -> Option<&L::Ingredient> {
        self.ensure_loaded();
        self.cache.get(key)
    }

    /// Bookmark keys of a folder in display order, each with its cached ingredient.
    pub fn folder_ingredients(&mut self, id: u32) -> Option<Vec<(String, Option<L::Ingredient>)>> {
        self.ensure_loaded();
        let folder = self.repository.folder(id)?;
        Some(
            folder
                .bookmark_keys
                .iter()
                .map(|key| (key.clone(), self.cache.get(key).cloned()))
                .collect(),
        )
    }

    pub fn cached_ingredient_count(&self) -> usize {
        self.cache.len()
    }

    // === Load / save ===

    /// Host tick: retries a deferred save, then applies the reload policy.
    pub fn tick(&mut self) {
        self.save_data();
        self.load_data_if_needed();
    }

    /// Call after the host switches session; re-resolves the namespace now.
    pub fn on_session_changed(&mut self) -> bool {
        self.context.invalidate();
        self.load_data_if_needed()
    }

    pub fn ensure_loaded(&mut self) -> bool {
        if self.repository.is_loaded() {
            return true;
        }
        self.load_data_if_needed()
    }

    /// Reloads when the namespace changed, or when dirty data is older than the
    /// freshness window. Returns `false` if a required reload could not run.
    pub fn load_data_if_needed(&mut self) -> bool {
        if self.reject_if_busy("load") {
            return false;
        }

        let namespace = self.context.determine_namespace();
        if self.repository.is_loaded() {
            let namespace_changed = self.requested_namespace.as_deref() != Some(namespace.as_str());
            let stale = self.repository.is_dirty()
                && self.last_load_millis.map_or(true, |at| {
                    elapsed_millis(self.clock.as_ref(), at) >= self.settings.reload_freshness_millis
                });
            if !namespace_changed && !stale {
                return true;
            }
            log::debug!(
                "Reloading folders (namespace changed: {namespace_changed}, stale: {stale})"
            );
        }

        self.load_namespace(namespace)
    }

    /// Loads the current namespace unconditionally, flushing pending changes first.
    pub fn reload(&mut self) -> bool {
        if self.reject_if_busy("reload") {
            return false;
        }
        let namespace = self.context.determine_namespace();
        self.load_namespace(namespace)
    }

    /// Debounced save. Always writes to the namespace the data was loaded from,
    /// even if the session has moved on since.
    pub fn save_data(&mut self) -> SaveOutcome {
        if !self.repository.is_dirty() {
            return SaveOutcome::Clean;
        }
        if let Some(at) = self.last_save_millis {
            let elapsed = elapsed_millis(self.clock.as_ref(), at);
            if elapsed < self.settings.min_save_interval_millis {
                log::debug!("Deferring save; last save was {elapsed}ms ago");
                return SaveOutcome::Deferred;
            }
        }
        self.write_now()
    }

    /// Saves pending changes immediately, ignoring the debounce interval.
    pub fn flush(&mut self) -> SaveOutcome {
        if !self.repository.is_dirty() {
            return SaveOutcome::Clean;
        }
        self.write_now()
    }

    pub fn mark_dirty_and_save(&mut self) {
        self.repository.mark_dirty();
        self.save_data();
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&mut StorageCoordinator<L>, &StorageEvent) + 'static,
    ) {
        self.listeners.push(Box::new(listener));
    }

    // === Diagnostics ===

    pub fn is_using_fallback_directory(&self) -> bool {
        self.using_fallback
    }

    pub fn is_dirty(&self) -> bool {
        self.repository.is_dirty()
    }

    pub fn is_loaded(&self) -> bool {
        self.repository.is_loaded()
    }

    pub fn phase(&self) -> RepositoryPhase {
        self.repository.phase()
    }

    /// Namespace whose file backs the current state (after any fallback).
    pub fn current_namespace(&self) -> Option<&str> {
        self.active_namespace.as_deref()
    }

    pub fn data_file_path(&self) -> Option<PathBuf> {
        self.active_namespace
            .as_deref()
            .map(|namespace| self.paths.data_file_path(namespace))
    }

    pub fn paths(&self) -> &PathResolver {
        &self.paths
    }

    pub fn settings(&self) -> &StorageSettings {
        &self.settings
    }

    pub fn save_count(&self) -> u64 {
        self.files.writes()
    }

    pub fn rejected_reentries(&self) -> u64 {
        self.rejected_reentries
    }

    // === Internals ===

    fn reject_if_busy(&mut self, operation: &str) -> bool {
        if self.io_depth == 0 {
            return false;
        }
        self.rejected_reentries += 1;
        log::warn!("Ignoring nested {operation} while storage I/O is in progress");
        true
    }

    fn load_namespace(&mut self, requested: String) -> bool {
        if self.repository.is_loaded() && self.repository.is_dirty() {
            let outcome = self.write_now();
            if outcome != SaveOutcome::Written {
                log::warn!("Pending changes could not be saved ({outcome:?}); skipping reload");
                return false;
            }
        }

        self.io_depth += 1;
        let previous = self.active_namespace.clone();
        let switching = self
            .requested_namespace
            .as_deref()
            .is_some_and(|current| current != requested);
        if switching {
            self.repository.reset();
            self.cache.clear();
        }

        self.repository.begin_loading();
        let namespace = self.prepare_namespace_directory(&requested);
        let path = self.paths.data_file_path(&namespace);
        match self.files.read(&path) {
            None => {
                log::debug!("No folder data for namespace '{namespace}'; starting empty");
                self.repository.load_from_parsed_document(ParsedDocument {
                    next_id: 1,
                    ..Default::default()
                });
            }
            Some(text) => match DocumentSerializer::deserialize(&text) {
                Some(document) => self.repository.load_from_parsed_document(document),
                None => {
                    log::warn!(
                        "Folder data at {} is unusable; keeping {} folders in memory and leaving the file untouched",
                        path.display(),
                        self.repository.folder_count()
                    );
                    self.repository.mark_loaded();
                }
            },
        }

        self.requested_namespace = Some(requested);
        self.active_namespace = Some(namespace.clone());
        self.last_load_millis = Some(self.clock.now_millis());
        self.prune_cache();
        self.cache
            .load_for_folders(self.repository.folders(), &self.lookup);
        log::debug!(
            "Loaded {} folders for namespace '{namespace}' ({} ingredients cached)",
            self.repository.folder_count(),
            self.cache.len()
        );

        if let Some(from) = previous.filter(|from| *from != namespace) {
            self.notify(StorageEvent::NamespaceChanged {
                from,
                to: namespace.clone(),
            });
        }
        let folders = self.repository.folder_count();
        self.notify(StorageEvent::Loaded { namespace, folders });

        self.io_depth -= 1;
        true
    }

    /// Ensures the namespace directory exists, falling back to the default one.
    fn prepare_namespace_directory(&mut self, requested: &str) -> String {
        if !self.paths.ensure_root_directory() {
            log::warn!(
                "Root directory {} is unavailable",
                self.paths.root_directory().display()
            );
        }
        if self.paths.ensure_namespace_directory(requested) {
            self.using_fallback = false;
            return requested.to_string();
        }

        let default = self.context.default_namespace().to_string();
        self.using_fallback = requested != default;
        if self.using_fallback {
            log::warn!("Using default namespace '{default}' instead of '{requested}'");
            self.paths.ensure_namespace_directory(&default);
        }
        default
    }

    fn write_now(&mut self) -> SaveOutcome {
        if self.reject_if_busy("save") {
            return SaveOutcome::Rejected;
        }
        if !self.repository.is_loaded() {
            log::warn!("Refusing to save folders that were never loaded");
            return SaveOutcome::Failed;
        }

        self.io_depth += 1;
        let current = self.context.determine_namespace();
        let namespace = self
            .active_namespace
            .clone()
            .unwrap_or_else(|| self.context.default_namespace().to_string());
        if self.requested_namespace.as_deref() != Some(current.as_str()) {
            log::debug!(
                "Namespace is now '{current}'; writing pending changes to '{namespace}' first"
            );
        }

        let outcome = self.write_namespace(&namespace);
        if outcome == SaveOutcome::Written {
            self.notify(StorageEvent::Saved { namespace });
        }
        self.io_depth -= 1;
        outcome
    }

    fn write_namespace(&mut self, namespace: &str) -> SaveOutcome {
        if !self.paths.ensure_namespace_directory(namespace) {
            log::warn!("Namespace directory for '{namespace}' is unavailable");
        }

        self.repository.begin_saving();
        let text = match DocumentSerializer::serialize(
            self.repository.folders(),
            self.repository.next_id(),
            self.repository.last_active_folder_id(),
        ) {
            Ok(text) => text,
            Err(e) => {
                log::error!("Failed to serialize folders: {e}");
                self.repository.finish_saving(false);
                return SaveOutcome::Failed;
            }
        };

        let path = self.paths.data_file_path(namespace);
        let written = self.files.write(&path, &text);
        self.repository.finish_saving(written);
        if !written {
            log::warn!("Save failed; changes stay pending");
            return SaveOutcome::Failed;
        }

        self.last_save_millis = Some(self.clock.now_millis());
        log::info!(
            "Saved {} folders to {}",
            self.repository.folder_count(),
            path.display()
        );
        SaveOutcome::Written
    }

    fn prune_cache(&mut self) {
        let active = self.repository.all_bookmark_keys();
        self.cache.prune_unused(&active);
    }

    fn notify(&mut self, event: StorageEvent) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in listeners.iter_mut() {
            listener(self, &event);
        }
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::storage::context::{NoSessionEnvironment, StaticEnvironment};
    use crate::storage::ingredients::RegistryLookup;
    use serde_json::json;
    use std::cell::{Cell, RefCell};
    use std::fs;
    use tempfile::TempDir;

    struct Harness {
        temp_dir: TempDir,
        clock: Rc<ManualClock>,
        env: Rc<StaticEnvironment>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                temp_dir: TempDir::new().unwrap(),
                clock: Rc::new(ManualClock::new(1_000_000)),
                env: Rc::new(StaticEnvironment::new()),
            }
        }

        fn coordinator(&self) -> StorageCoordinator<RegistryLookup> {
            let mut registry = RegistryLookup::new();
            registry.register(json!({ "key": "ore_iron", "name": "Iron Ore" }));
            registry.register(json!({ "key": "ore_gold", "name": "Gold Ore" }));
            StorageCoordinator::new(
                self.temp_dir.path(),
                StorageSettings::default(),
                self.env.clone(),
                self.clock.clone(),
                registry,
            )
        }

        fn data_file(&self, namespace: &str) -> PathBuf {
            PathResolver::new(self.temp_dir.path(), &StorageSettings::default())
                .data_file_path(namespace)
        }
    }

    #[test]
    fn test_end_to_end_ores() {
        let harness = Harness::new();
        let mut storage = harness.coordinator();

        let folder = storage.create_folder("Ores");
        assert_eq!(folder.id, 1);
        assert!(storage.add_bookmark(1, "ore_iron"));
        assert_eq!(storage.flush(), SaveOutcome::Written);

        let mut reopened = harness.coordinator();
        let folder = reopened.folder(1).unwrap();
        assert_eq!(folder.name, "Ores");
        assert_eq!(folder.bookmark_keys, vec!["ore_iron"]);
        assert_eq!(reopened.current_namespace(), Some("all"));
    }

    #[test]
    fn test_lazy_load_on_first_read() {
        let harness = Harness::new();
        let mut storage = harness.coordinator();
        assert!(!storage.is_loaded());
        assert!(storage.all_folders().is_empty());
        assert!(storage.is_loaded());
        assert!(!storage.is_dirty());
        assert_eq!(storage.phase(), RepositoryPhase::Loaded);
    }

    #[test]
    fn test_saves_are_debounced() {
        let harness = Harness::new();
        let mut storage = harness.coordinator();

        storage.create_folder("Ores");
        assert_eq!(storage.save_count(), 1);

        harness.clock.advance(1_000);
        storage.add_bookmark(1, "ore_iron");
        harness.clock.advance(1_000);
        storage.add_bookmark(1, "ore_gold");
        assert_eq!(storage.save_count(), 1);
        assert!(storage.is_dirty());

        storage.tick();
        assert_eq!(storage.save_count(), 1);

        harness.clock.advance(3_000);
        storage.tick();
        assert_eq!(storage.save_count(), 2);
        assert!(!storage.is_dirty());

        let content = fs::read_to_string(harness.data_file("all")).unwrap();
        assert!(content.contains("ore_iron"));
        assert!(content.contains("ore_gold"));
    }

    #[test]
    fn test_save_clears_dirty_and_mutation_sets_it() {
        let harness = Harness::new();
        let mut storage = harness.coordinator();

        storage.create_folder("Ores");
        assert!(!storage.is_dirty());
        storage.update_folder_name(1, "Metals");
        assert!(storage.is_dirty());
        assert_eq!(storage.flush(), SaveOutcome::Written);
        assert!(!storage.is_dirty());
        assert_eq!(storage.flush(), SaveOutcome::Clean);
    }

    #[test]
    fn test_duplicate_bookmark_causes_no_write() {
        let harness = Harness::new();
        let mut storage = harness.coordinator();
        storage.create_folder("Ores");
        storage.add_bookmark(1, "ore_iron");
        storage.flush();
        let writes = storage.save_count();

        harness.clock.advance(60_000);
        assert!(!storage.add_bookmark(1, "ore_iron"));
        assert!(!storage.is_dirty());
        storage.tick();
        assert_eq!(storage.save_count(), writes);
    }

    #[test]
    fn test_delete_active_folder_clears_pointer_on_disk() {
        let harness = Harness::new();
        let mut storage = harness.coordinator();
        storage.create_folder("Ores");
        storage.create_folder("Tools");
        assert!(storage.set_last_active_folder_id(Some(1)));
        assert!(!storage.set_last_active_folder_id(Some(9)));
        storage.flush();

        assert!(storage.delete_folder(1));
        assert_eq!(storage.last_active_folder_id(), None);
        storage.flush();

        let content = fs::read_to_string(harness.data_file("all")).unwrap();
        assert!(!content.contains("activeFolder"));
        assert!(!storage.delete_folder(1));
    }

    #[test]
    fn test_corrupt_file_is_not_overwritten_until_mutation() {
        let harness = Harness::new();
        let file = harness.data_file("all");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, "{ this is not a folder document").unwrap();

        let mut storage = harness.coordinator();
        assert!(storage.all_folders().is_empty());
        assert!(storage.is_loaded());
        assert!(!storage.is_dirty());
        storage.tick();
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "{ this is not a folder document"
        );

        storage.create_folder("Recovered");
        let content = fs::read_to_string(&file).unwrap();
        assert!(content.contains("Recovered"));
    }

    #[test]
    fn test_corrupt_file_on_reload_keeps_memory() {
        let harness = Harness::new();
        let mut storage = harness.coordinator();
        storage.create_folder("Ores");
        storage.add_bookmark(1, "ore_iron");
        storage.flush();

        fs::write(harness.data_file("all"), "garbage").unwrap();
        assert!(storage.reload());
        let folders = storage.all_folders();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].bookmark_keys, vec!["ore_iron"]);
    }

    #[test]
    fn test_clean_and_fresh_state_skips_reload() {
        let harness = Harness::new();
        let mut storage = harness.coordinator();
        storage.create_folder("Ores");

        let external = r#"{ "nextId": 3, "folders": [
            { "id": 1, "name": "Ores" }, { "id": 2, "name": "External" } ] }"#;
        fs::write(harness.data_file("all"), external).unwrap();

        harness.clock.advance(10_000);
        storage.tick();
        assert_eq!(storage.all_folders().len(), 1);

        assert!(storage.reload());
        assert_eq!(storage.all_folders().len(), 2);
    }

    #[test]
    fn test_stale_dirty_state_is_flushed_then_reloaded() {
        let harness = Harness::new();
        let mut storage = harness.coordinator();
        storage.create_folder("Ores");
        harness.clock.advance(1_000);
        storage.add_bookmark(1, "ore_gold");
        assert!(storage.is_dirty());

        harness.clock.advance(5_000);
        assert!(storage.load_data_if_needed());
        assert!(!storage.is_dirty());
        assert_eq!(storage.folder(1).unwrap().bookmark_keys, vec!["ore_gold"]);
        assert_eq!(storage.save_count(), 2);
    }

    #[test]
    fn test_namespace_switch_flushes_and_separates_data() {
        let harness = Harness::new();
        harness.env.set_local_session(Some("World A".to_string()));
        let mut storage = harness.coordinator();

        storage.create_folder("Only in A");
        harness.clock.advance(100);
        storage.add_bookmark(1, "ore_iron");
        assert!(storage.is_dirty());
        assert_eq!(storage.current_namespace(), Some("World_A"));

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        storage.subscribe(move |_, event| sink.borrow_mut().push(event.clone()));

        harness.env.set_local_session(Some("World B".to_string()));
        assert!(storage.on_session_changed());
        assert_eq!(storage.current_namespace(), Some("World_B"));
        assert!(storage.all_folders().is_empty());
        assert_eq!(storage.cached_ingredient_count(), 0);

        let a_content = fs::read_to_string(harness.data_file("World_A")).unwrap();
        assert!(a_content.contains("ore_iron"));
        assert!(events.borrow().contains(&StorageEvent::NamespaceChanged {
            from: "World_A".to_string(),
            to: "World_B".to_string(),
        }));

        harness.env.set_local_session(Some("World A".to_string()));
        storage.on_session_changed();
        assert_eq!(storage.folder(1).unwrap().bookmark_keys, vec!["ore_iron"]);
    }

    #[test]
    fn test_unavailable_namespace_directory_falls_back() {
        let harness = Harness::new();
        let paths = PathResolver::new(harness.temp_dir.path(), &StorageSettings::default());
        assert!(paths.ensure_root_directory());
        fs::write(paths.namespace_directory("blocked"), "in the way").unwrap();

        harness.env.set_local_session(Some("blocked".to_string()));
        let mut storage = harness.coordinator();
        storage.create_folder("Ores");

        assert!(storage.is_using_fallback_directory());
        assert_eq!(storage.current_namespace(), Some("all"));
        assert!(harness.data_file("all").is_file());
    }

    #[test]
    fn test_fallback_flag_clears_when_default_is_requested() {
        let harness = Harness::new();
        let paths = PathResolver::new(harness.temp_dir.path(), &StorageSettings::default());
        assert!(paths.ensure_root_directory());
        fs::write(paths.namespace_directory("blocked"), "in the way").unwrap();

        harness.env.set_local_session(Some("blocked".to_string()));
        let mut storage = harness.coordinator();
        assert!(storage.ensure_loaded());
        assert!(storage.is_using_fallback_directory());

        fs::remove_dir(paths.namespace_directory("all")).unwrap();
        fs::write(paths.namespace_directory("all"), "in the way").unwrap();
        harness.env.set_local_session(None);
        assert!(storage.on_session_changed());

        assert_eq!(storage.current_namespace(), Some("all"));
        assert!(!storage.is_using_fallback_directory());
    }

    #[test]
    fn test_nested_reload_from_listener_is_rejected() {
        let harness = Harness::new();
        let mut storage = harness.coordinator();
        let nested_result = Rc::new(Cell::new(None));
        let seen = nested_result.clone();
        storage.subscribe(move |storage, event| {
            if let StorageEvent::Loaded { .. } = event {
                seen.set(Some(storage.reload()));
            }
        });

        assert!(storage.ensure_loaded());
        assert_eq!(nested_result.get(), Some(false));
        assert_eq!(storage.rejected_reentries(), 1);
    }

    #[test]
    fn test_save_from_listener_is_deferred_to_next_tick() {
        let harness = Harness::new();
        let mut storage = harness.coordinator();
        let created = Rc::new(Cell::new(false));
        let flag = created.clone();
        storage.subscribe(move |storage, event| {
            if matches!(event, StorageEvent::Loaded { .. }) && !flag.get() {
                flag.set(true);
                storage.create_folder("From listener");
            }
        });

        storage.ensure_loaded();
        assert!(storage.is_dirty());
        assert_eq!(storage.save_count(), 0);

        storage.tick();
        assert_eq!(storage.save_count(), 1);
        assert!(!storage.is_dirty());
    }

    #[test]
    fn test_ingredient_cache_follows_bookmarks() {
        let harness = Harness::new();
        let mut storage = harness.coordinator();
        storage.create_folder("Ores");
        storage.create_folder("Copy");

        storage.add_bookmark(1, "ore_iron");
        storage.add_bookmark(2, "ore_iron");
        storage.add_bookmark(1, "ore_unknown");
        assert_eq!(
            storage.ingredient("ore_iron").and_then(|v| v["name"].as_str()),
            Some("Iron Ore")
        );
        assert!(storage.ingredient("ore_unknown").is_none());

        storage.remove_bookmark(1, "ore_iron");
        assert!(storage.ingredient("ore_iron").is_some());
        storage.delete_folder(2);
        assert!(storage.ingredient("ore_iron").is_none());
        assert_eq!(storage.cached_ingredient_count(), 0);

        let listed = storage.folder_ingredients(1).unwrap();
        assert_eq!(listed, vec![("ore_unknown".to_string(), None)]);
        assert!(storage.folder_ingredients(7).is_none());
    }

    #[test]
    fn test_cache_repopulates_after_load() {
        let harness = Harness::new();
        let mut storage = harness.coordinator();
        storage.create_folder("Ores");
        storage.add_bookmark(1, "ore_gold");
        storage.flush();

        let mut reopened = harness.coordinator();
        assert!(reopened.ingredient("ore_gold").is_some());
        assert_eq!(reopened.cached_ingredient_count(), 1);
    }

    #[test]
    fn test_add_ingredient_uses_lookup_key() {
        let harness = Harness::new();
        let mut storage = harness.coordinator();
        storage.create_folder("Food");

        let bread = json!({ "key": "bread", "name": "Bread" });
        assert!(storage.add_ingredient(1, &bread));
        assert!(!storage.add_ingredient(1, &bread));
        assert!(!storage.add_ingredient(1, &json!({ "name": "keyless" })));
        assert_eq!(storage.folder(1).unwrap().bookmark_keys, vec!["bread"]);
        assert_eq!(storage.ingredient("bread"), Some(&bread));
    }

    #[test]
    fn test_move_bookmark_between_folders() {
        let harness = Harness::new();
        let mut storage = harness.coordinator();
        storage.create_folder("From");
        storage.create_folder("To");
        storage.add_bookmark(1, "ore_iron");

        assert!(storage.move_bookmark(1, 2, "ore_iron"));
        assert!(storage.folder(1).unwrap().bookmark_keys.is_empty());
        assert_eq!(storage.folder(2).unwrap().bookmark_keys, vec!["ore_iron"]);
        assert!(storage.ingredient("ore_iron").is_some());
    }

    #[test]
    fn test_failed_write_stays_dirty_and_retries() {
        let harness = Harness::new();
        let mut storage = harness.coordinator();
        storage.create_folder("Ores");

        let file = harness.data_file("all");
        fs::remove_file(&file).unwrap();
        fs::create_dir(&file).unwrap();

        harness.clock.advance(10_000);
        storage.add_bookmark(1, "ore_iron");
        assert!(storage.is_dirty());
        assert_eq!(storage.flush(), SaveOutcome::Failed);
        assert_eq!(storage.phase(), RepositoryPhase::Loaded);

        fs::remove_dir(&file).unwrap();
        assert_eq!(storage.flush(), SaveOutcome::Written);
        assert!(!storage.is_dirty());
    }

    #[test]
    fn test_default_environment_uses_default_namespace() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = StorageCoordinator::new(
            temp_dir.path(),
            StorageSettings::default(),
            Rc::new(NoSessionEnvironment),
            Rc::new(ManualClock::new(0)),
            RegistryLookup::new(),
        );
        storage.create_folder("x");
        assert_eq!(storage.current_namespace(), Some("all"));
        assert!(!storage.is_using_fallback_directory());
        assert_eq!(
            storage.data_file_path(),
            Some(storage.paths().data_file_path("all"))
        );
    }
}
