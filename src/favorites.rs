//! Favorites store
//!
//! Owns the user's saved titles for the session and mirrors every change to
//! durable storage under [`FAVORITES_KEY`]. Entries are unique per
//! `(id, media_type)` and kept newest first.
//!
//! Storage problems never reach the caller: a missing or corrupt value loads
//! as an empty list, and a failed write is logged while the in-memory change
//! stands.

use chrono::Utc;

use crate::models::{Candidate, FavoriteEntry, MediaType};
use crate::storage::Storage;

/// Storage key holding the JSON array of favorites
pub const FAVORITES_KEY: &str = "devflix_favorites";

/// Handle returned by [`FavoritesStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[FavoriteEntry])>;

pub struct FavoritesStore<S: Storage> {
    entries: Vec<FavoriteEntry>,
    storage: S,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: Storage> FavoritesStore<S> {
    /// Load the saved favorites from `storage`
    pub fn open(storage: S) -> Self {
        let entries = load_entries(&storage);
        tracing::debug!(count = entries.len(), "favorites loaded");
        Self {
            entries,
            storage,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// All entries, newest first
    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_favorite(&self, id: u64, media_type: MediaType) -> bool {
        self.position(id, media_type).is_some()
    }

    pub fn get(&self, id: u64, media_type: MediaType) -> Option<&FavoriteEntry> {
        self.position(id, media_type).map(|i| &self.entries[i])
    }

    /// Entries of one media type, in collection order
    pub fn list_by_type(&self, media_type: MediaType) -> Vec<&FavoriteEntry> {
        self.entries
            .iter()
            .filter(|e| e.media_type == media_type)
            .collect()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Save a title. Returns false if it was already a favorite.
    pub fn add(&mut self, candidate: impl Into<Candidate>) -> bool {
        let candidate = candidate.into();
        if self.is_favorite(candidate.id, candidate.media_type()) {
            return false;
        }

        let entry = candidate.into_entry(Utc::now());
        tracing::debug!(id = entry.id, media_type = entry.media_type.as_str(), "favorite added");
        self.entries.insert(0, entry);
        self.changed();
        true
    }

    /// Forget a title. Returns false if it was not a favorite.
    pub fn remove(&mut self, id: u64, media_type: MediaType) -> bool {
        let Some(index) = self.position(id, media_type) else {
            return false;
        };

        self.entries.remove(index);
        tracing::debug!(id, media_type = media_type.as_str(), "favorite removed");
        self.changed();
        true
    }

    /// Add if absent, remove if present. Returns whether the title is now a favorite.
    pub fn toggle(&mut self, candidate: impl Into<Candidate>) -> bool {
        let candidate = candidate.into();
        let media_type = candidate.media_type();
        if self.is_favorite(candidate.id, media_type) {
            self.remove(candidate.id, media_type);
            false
        } else {
            self.add(candidate);
            true
        }
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.changed();
    }

    // -------------------------------------------------------------------------
    // Change notification
    // -------------------------------------------------------------------------

    /// Call `listener` with the full collection after every mutation
    pub fn subscribe(&mut self, listener: impl FnMut(&[FavoriteEntry]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn position(&self, id: u64, media_type: MediaType) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.id == id && e.media_type == media_type)
    }

    /// Notify listeners, then persist
    fn changed(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.entries);
        }
        self.persist();
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize favorites: {}", e);
                return;
            }
        };

        if let Err(e) = self.storage.set(FAVORITES_KEY, &json) {
            tracing::warn!("Failed to save favorites: {}", e);
        }
    }
}

impl<S: Storage + std::fmt::Debug> std::fmt::Debug for FavoritesStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("entries", &self.entries)
            .field("storage", &self.storage)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Read and parse the saved collection, falling back to empty
fn load_entries<S: Storage>(storage: &S) -> Vec<FavoriteEntry> {
    let raw = match storage.get(FAVORITES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!("Failed to read favorites: {}", e);
            return Vec::new();
        }
    };

    let mut entries: Vec<FavoriteEntry> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Discarding unreadable favorites: {}", e);
            return Vec::new();
        }
    };

    // Older writers did not always enforce uniqueness; first occurrence wins
    let mut seen = std::collections::HashSet::new();
    entries.retain(|e| seen.insert(e.key()));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageError};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn fight_club() -> Candidate {
        Candidate {
            id: 550,
            media_type: Some(MediaType::Movie),
            title: Some("Clube da Luta".into()),
            poster_path: Some("/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg".into()),
            overview: Some("Um homem deprimido...".into()),
            vote_average: Some(8.4),
            release_date: Some("1999-10-15".into()),
            ..Candidate::default()
        }
    }

    fn show(id: u64, name: &str) -> Candidate {
        Candidate {
            id,
            media_type: Some(MediaType::Tv),
            name: Some(name.into()),
            ..Candidate::default()
        }
    }

    /// Storage whose writes always fail
    #[derive(Debug, Default)]
    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into())
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into())
        }
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut store = FavoritesStore::open(MemoryStorage::new());
        assert!(store.add(fight_club()));
        assert!(!store.add(fight_club()));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_add_prepends() {
        let mut store = FavoritesStore::open(MemoryStorage::new());
        store.add(fight_club());
        store.add(show(1396, "Breaking Bad"));
        assert_eq!(store.entries()[0].id, 1396);
        assert_eq!(store.entries()[1].id, 550);
    }

    #[test]
    fn test_same_id_different_type_is_independent() {
        let mut store = FavoritesStore::open(MemoryStorage::new());
        store.add(fight_club());
        assert!(store.is_favorite(550, MediaType::Movie));
        assert!(!store.is_favorite(550, MediaType::Tv));

        store.add(show(550, "Some Show"));
        assert_eq!(store.count(), 2);
        assert_eq!(store.list_by_type(MediaType::Tv).len(), 1);
        assert_eq!(store.list_by_type(MediaType::Movie).len(), 1);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = FavoritesStore::open(MemoryStorage::new());
        assert!(!store.remove(550, MediaType::Movie));
        assert!(store.storage().get(FAVORITES_KEY).unwrap().is_none());

        store.add(show(550, "Some Show"));
        assert!(!store.remove(550, MediaType::Movie));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_toggle_twice_restores_collection() {
        let mut store = FavoritesStore::open(MemoryStorage::new());
        store.add(show(1396, "Breaking Bad"));
        let before: Vec<_> = store.entries().to_vec();

        assert!(store.toggle(fight_club()));
        assert!(store.is_favorite(550, MediaType::Movie));
        assert!(!store.toggle(fight_club()));

        assert_eq!(store.entries(), before.as_slice());
    }

    #[test]
    fn test_toggle_infers_untagged_media_type() {
        let mut store = FavoritesStore::open(MemoryStorage::new());
        let untagged = Candidate {
            id: 66732,
            name: Some("Stranger Things".into()),
            ..Candidate::default()
        };
        assert!(store.toggle(untagged));
        assert!(store.is_favorite(66732, MediaType::Tv));
    }

    #[test]
    fn test_clear() {
        let mut store = FavoritesStore::open(MemoryStorage::new());
        store.add(fight_club());
        store.add(show(1396, "Breaking Bad"));
        store.clear();
        assert_eq!(store.count(), 0);
        assert!(!store.is_favorite(550, MediaType::Movie));
        assert!(!store.is_favorite(1396, MediaType::Tv));
        assert_eq!(store.storage().get(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_every_mutation_persists() {
        let mut store = FavoritesStore::open(MemoryStorage::new());
        store.add(fight_club());
        let saved = store.storage().get(FAVORITES_KEY).unwrap().unwrap();
        let parsed: Vec<FavoriteEntry> = serde_json::from_str(&saved).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title, "Clube da Luta");

        store.remove(550, MediaType::Movie);
        let saved = store.storage().get(FAVORITES_KEY).unwrap().unwrap();
        assert_eq!(saved, "[]");
    }

    #[test]
    fn test_corrupt_value_loads_empty() {
        let storage = MemoryStorage::with_value(FAVORITES_KEY, "not json {");
        let store = FavoritesStore::open(storage);
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_unreadable_storage_loads_empty_and_keeps_mutations() {
        let mut store = FavoritesStore::open(BrokenStorage);
        assert!(store.is_empty());

        assert!(store.add(fight_club()));
        assert!(store.is_favorite(550, MediaType::Movie));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_quota_exceeded_keeps_memory_state() {
        let mut store = FavoritesStore::open(MemoryStorage::with_quota(64));
        store.add(fight_club());
        assert_eq!(store.count(), 1);
        // The write did not fit, nothing was stored
        assert!(store.storage().get(FAVORITES_KEY).unwrap().is_none());
    }

    #[test]
    fn test_load_drops_duplicates() {
        let json = r#"[
            {"id": 1, "media_type": "movie", "title": "First"},
            {"id": 1, "media_type": "movie", "title": "Second"},
            {"id": 1, "media_type": "tv", "title": "Show"}
        ]"#;
        let store = FavoritesStore::open(MemoryStorage::with_value(FAVORITES_KEY, json));
        assert_eq!(store.count(), 2);
        assert_eq!(store.get(1, MediaType::Movie).unwrap().title, "First");
    }

    /// Storage that appends every write to a shared event log
    #[derive(Debug)]
    struct RecordingStorage(Rc<RefCell<Vec<String>>>);

    impl Storage for RecordingStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            self.0.borrow_mut().push(format!("write {}", key));
            Ok(())
        }
    }

    #[test]
    fn test_listeners_run_before_persist() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut store = FavoritesStore::open(RecordingStorage(Rc::clone(&log)));
        let sink = Rc::clone(&log);
        store.subscribe(move |entries| sink.borrow_mut().push(format!("notify {}", entries.len())));

        store.add(fight_club());
        store.add(fight_club()); // no-op, no notification
        store.clear();

        assert_eq!(
            *log.borrow(),
            vec![
                "notify 1".to_string(),
                format!("write {}", FAVORITES_KEY),
                "notify 0".to_string(),
                format!("write {}", FAVORITES_KEY),
            ]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = FavoritesStore::open(MemoryStorage::new());
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let id = store.subscribe(move |_| *counter.borrow_mut() += 1);

        store.add(fight_club());
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.clear();

        assert_eq!(*calls.borrow(), 1);
    }
}
