//! Per-user registry of published index sets
//!
//! One writer swaps a whole [`IndexSet`] in at a time; any number of readers
//! clone the current `Arc` out and search it without holding the lock. A
//! reader that grabbed a set before a swap keeps using it until it drops the
//! `Arc`.

use crate::index::types::UserId;
use crate::index::view::IndexSet;
use ahash::AHashMap;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Snapshot of what the store currently holds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStatus {
    pub users_loaded: usize,
    pub total_contacts: usize,
}

/// Current index set per user
#[derive(Debug, Default)]
pub struct UserIndexStore {
    sets: RwLock<AHashMap<UserId, Arc<IndexSet>>>,
}

impl UserIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `set` for `user_id`, returning the set it replaced
    ///
    /// Last write wins; nothing is merged.
    pub fn put(
        &self,
        user_id: impl Into<UserId>,
        set: impl Into<Arc<IndexSet>>,
    ) -> Option<Arc<IndexSet>> {
        let set = set.into();
        self.write().insert(user_id.into(), set)
    }

    /// Current set for `user_id`, if a warm-up ever completed
    pub fn get(&self, user_id: &str) -> Option<Arc<IndexSet>> {
        self.read().get(user_id).cloned()
    }

    /// Evict a user, returning their last set
    pub fn remove(&self, user_id: &str) -> Option<Arc<IndexSet>> {
        self.write().remove(user_id)
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.read().contains_key(user_id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Loaded user ids, sorted
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn status(&self) -> StoreStatus {
        let sets = self.read();
        StoreStatus {
            users_loaded: sets.len(),
            total_contacts: sets.values().map(|s| s.len()).sum(),
        }
    }

    // Every mutation is a single insert/remove, so a poisoned map is still
    // consistent and safe to keep using.
    fn read(&self) -> RwLockReadGuard<'_, AHashMap<UserId, Arc<IndexSet>>> {
        self.sets.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AHashMap<UserId, Arc<IndexSet>>> {
        self.sets.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build::build_index_set;
    use crate::index::types::RawContact;
    use std::thread;

    fn set_of(n: usize) -> IndexSet {
        build_index_set(
            (0..n)
                .map(|i| RawContact::new(i.to_string(), format!("u{i}@x.com"), "F", "L"))
                .collect(),
        )
    }

    #[test]
    fn test_get_absent() {
        let store = UserIndexStore::new();
        assert!(store.get("nobody").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_put_replaces() {
        let store = UserIndexStore::new();

        assert!(store.put("u1", set_of(2)).is_none());
        let old = store.put("u1", set_of(5)).unwrap();

        assert_eq!(old.len(), 2);
        assert_eq!(store.get("u1").unwrap().len(), 5);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reader_keeps_old_set_after_swap() {
        let store = UserIndexStore::new();
        store.put("u1", set_of(3));

        let held = store.get("u1").unwrap();
        store.put("u1", set_of(7));

        assert_eq!(held.len(), 3);
        assert_eq!(store.get("u1").unwrap().len(), 7);
    }

    #[test]
    fn test_remove_and_status() {
        let store = UserIndexStore::new();
        store.put("b", set_of(4));
        store.put("a", set_of(6));

        assert_eq!(
            store.status(),
            StoreStatus {
                users_loaded: 2,
                total_contacts: 10
            }
        );
        assert_eq!(store.user_ids(), ["a", "b"]);

        assert!(store.remove("a").is_some());
        assert!(!store.contains("a"));
        assert_eq!(store.status().total_contacts, 4);
    }

    #[test]
    fn test_instances_are_independent() {
        let first = UserIndexStore::new();
        let second = UserIndexStore::new();
        first.put("u1", set_of(1));

        assert!(second.get("u1").is_none());
    }

    #[test]
    fn test_concurrent_readers_see_whole_sets() {
        let store = Arc::new(UserIndexStore::new());
        store.put("u1", set_of(10));

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..20 {
                    store.put("u1", set_of(20));
                    store.put("u1", set_of(10));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let set = store.get("u1").unwrap();
                        assert!(set.len() == 10 || set.len() == 20);
                        for view in set.views() {
                            assert_eq!(view.len(), set.len());
                        }
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
