//! Bounded, deduplicating history of closed tabs.
//!
//! Entries are ordered most-recently-closed first. Closing a tab that is
//! already in the history moves the existing entry to the front instead of
//! inserting a duplicate; when the cache is full the least-recently-closed
//! entry is evicted. Every mutation persists the full list and notifies the
//! change listener (the tree view, in the host extension).

use anyhow::Result;

use crate::store::HistoryStore;
use crate::tab::TabRecord;

pub struct HistoryCache<S: HistoryStore> {
    entries: Vec<TabRecord>,
    capacity: usize,
    store: S,
    on_change: Option<Box<dyn FnMut()>>,
}

impl<S: HistoryStore> HistoryCache<S> {
    /// Restore the history from the store.
    ///
    /// Entries that fail to parse are skipped with a warning; one bad entry
    /// never discards the rest. The restored list is truncated to
    /// `capacity`.
    pub fn restore(store: S, capacity: usize) -> Result<Self> {
        let mut entries: Vec<TabRecord> = Vec::new();
        for raw in store.load()? {
            match serde_json::from_str(&raw) {
                Ok(tab) => entries.push(tab),
                Err(e) => eprintln!("Warning: skipping malformed history entry: {}", e),
            }
        }
        entries.truncate(capacity);

        Ok(Self {
            entries,
            capacity,
            store,
            on_change: None,
        })
    }

    /// Register a callback fired after every successful mutation.
    pub fn set_on_change(&mut self, listener: impl FnMut() + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    /// Record a closed tab at the front of the history.
    ///
    /// If an equal record already exists it is moved to the front (the
    /// length does not change); otherwise the new record is inserted,
    /// evicting the least-recently-closed entry when the cache is full.
    pub fn push(&mut self, tab: TabRecord) -> Result<()> {
        debug_assert!(tab.kind().is_trackable());

        if let Some(pos) = self.entries.iter().position(|existing| *existing == tab) {
            let existing = self.entries.remove(pos);
            self.entries.insert(0, existing);
        } else {
            if self.entries.len() >= self.capacity {
                self.entries.pop();
            }
            self.entries.insert(0, tab);
        }

        self.commit()
    }

    /// Apply a new capacity from configuration. Shrinking drops the
    /// least-recently-closed tail; growing keeps the entries as they are.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<()> {
        self.capacity = capacity;
        if self.entries.len() > capacity {
            self.entries.truncate(capacity);
            return self.commit();
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.commit()
    }

    /// Live view of the history, most-recently-closed first. All mutation
    /// goes through [`push`](Self::push) and friends.
    pub fn entries(&self) -> &[TabRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn commit(&mut self) -> Result<()> {
        let serialized = self
            .entries
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        self.store.save(&serialized)?;

        if let Some(listener) = &mut self.on_change {
            listener();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::tab::{TabInput, TabUri};
    use std::cell::Cell;
    use std::rc::Rc;

    fn text_tab(label: &str) -> TabRecord {
        TabRecord::new(
            label,
            TabInput::Text {
                uri: TabUri::new(format!("file:///ws/{}", label)),
            },
        )
    }

    fn cache(capacity: usize) -> HistoryCache<MemoryStore> {
        HistoryCache::restore(MemoryStore::new(), capacity).unwrap()
    }

    #[test]
    fn test_push_is_most_recent_first() {
        let mut cache = cache(10);
        cache.push(text_tab("a.rs")).unwrap();
        cache.push(text_tab("b.rs")).unwrap();
        cache.push(text_tab("c.rs")).unwrap();

        let labels: Vec<&str> = cache.entries().iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["c.rs", "b.rs", "a.rs"]);
    }

    #[test]
    fn test_duplicate_push_moves_to_front_without_growing() {
        let mut cache = cache(10);
        cache.push(text_tab("a.rs")).unwrap();
        cache.push(text_tab("b.rs")).unwrap();
        cache.push(text_tab("c.rs")).unwrap();

        cache.push(text_tab("a.rs")).unwrap();

        assert_eq!(cache.len(), 3);
        let labels: Vec<&str> = cache.entries().iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["a.rs", "c.rs", "b.rs"]);
    }

    #[test]
    fn test_duplicate_detection_ignores_timestamp() {
        let mut cache = cache(10);
        cache.push(text_tab("a.rs").with_timestamp(1)).unwrap();
        cache.push(text_tab("a.rs").with_timestamp(2)).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_eviction_at_capacity() {
        let mut cache = cache(2);
        cache.push(text_tab("a.rs")).unwrap();
        cache.push(text_tab("b.rs")).unwrap();
        cache.push(text_tab("c.rs")).unwrap();

        let labels: Vec<&str> = cache.entries().iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["c.rs", "b.rs"]);
    }

    #[test]
    fn test_capacity_shrink_truncates_tail() {
        let mut cache = cache(10);
        for label in ["a", "b", "c", "d", "e"] {
            cache.push(text_tab(label)).unwrap();
        }

        cache.set_capacity(3).unwrap();

        let labels: Vec<&str> = cache.entries().iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["e", "d", "c"]);
        assert_eq!(cache.capacity(), 3);
    }

    #[test]
    fn test_capacity_growth_keeps_entries() {
        let mut cache = cache(2);
        cache.push(text_tab("a.rs")).unwrap();
        cache.push(text_tab("b.rs")).unwrap();

        cache.set_capacity(5).unwrap();
        assert_eq!(cache.len(), 2);

        // Room for three more now
        for label in ["c", "d", "e"] {
            cache.push(text_tab(label)).unwrap();
        }
        assert_eq!(cache.len(), 5);
    }

    #[test]
    fn test_clear() {
        let store = MemoryStore::new();
        let handle = store.clone();
        let mut cache = HistoryCache::restore(store, 10).unwrap();
        cache.push(text_tab("a.rs")).unwrap();

        cache.clear().unwrap();
        assert!(cache.is_empty());
        assert!(handle.snapshot().is_empty());
    }

    #[test]
    fn test_mutations_persist_to_store() {
        let store = MemoryStore::new();
        let handle = store.clone();
        let mut cache = HistoryCache::restore(store, 10).unwrap();

        cache.push(text_tab("a.rs")).unwrap();
        cache.push(text_tab("b.rs")).unwrap();

        let persisted = handle.snapshot();
        assert_eq!(persisted.len(), 2);
        assert!(persisted[0].contains("b.rs"));
        assert!(persisted[1].contains("a.rs"));
    }

    #[test]
    fn test_restore_roundtrip() {
        let store = MemoryStore::new();
        let handle = store.clone();
        let mut cache = HistoryCache::restore(store, 10).unwrap();
        cache.push(text_tab("a.rs")).unwrap();
        cache.push(text_tab("b.rs")).unwrap();

        let restored = HistoryCache::restore(handle, 10).unwrap();
        assert_eq!(restored.entries(), cache.entries());
    }

    #[test]
    fn test_restore_skips_malformed_entries() {
        let store = MemoryStore::with_entries(vec![
            r#"{"label":"a.rs","type":"Text","uri":"file:///a.rs"}"#.to_string(),
            "not json".to_string(),
            r#"{"label":"b.rs","type":"Text"}"#.to_string(), // missing uri
            r#"{"label":"c.rs","type":"Text","uri":"file:///c.rs"}"#.to_string(),
        ]);

        let cache = HistoryCache::restore(store, 10).unwrap();
        let labels: Vec<&str> = cache.entries().iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["a.rs", "c.rs"]);
    }

    #[test]
    fn test_restore_truncates_to_capacity() {
        let store = MemoryStore::new();
        let handle = store.clone();
        let mut cache = HistoryCache::restore(store, 10).unwrap();
        for label in ["a", "b", "c", "d"] {
            cache.push(text_tab(label)).unwrap();
        }

        let restored = HistoryCache::restore(handle, 2).unwrap();
        let labels: Vec<&str> = restored.entries().iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["d", "c"]);
    }

    #[test]
    fn test_on_change_fires_per_mutation() {
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();

        let mut cache = cache(10);
        cache.set_on_change(move || counter.set(counter.get() + 1));

        cache.push(text_tab("a.rs")).unwrap();
        cache.push(text_tab("a.rs")).unwrap(); // move-to-front still notifies
        cache.clear().unwrap();
        assert_eq!(fired.get(), 3);

        // Capacity growth mutates nothing and stays silent.
        cache.set_capacity(20).unwrap();
        assert_eq!(fired.get(), 3);
    }
}
