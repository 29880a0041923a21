//! Contact sources for warm-up
//!
//! - [`InMemoryRepository`] - contacts held in a map, for tests and embedding
//! - [`JsonDirRepository`] - one `<user_id>.json` file per user
//! - [`SyntheticRepository`] - random contacts for demos and benchmarks

mod json;
mod synthetic;

pub use json::JsonDirRepository;
pub use synthetic::{random_query, SyntheticRepository};

use crate::error::RepositoryError;
use crate::index::types::{RawContact, UserId};
use ahash::AHashMap;
use std::sync::{PoisonError, RwLock};

/// Supplies a user's raw contacts
pub trait ContactRepository: Send + Sync {
    fn fetch(&self, user_id: &str) -> Result<Vec<RawContact>, RepositoryError>;
}

/// Contacts kept in memory, keyed by user
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    users: RwLock<AHashMap<UserId, Vec<RawContact>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contacts stored for `user_id`
    pub fn insert(&self, user_id: impl Into<UserId>, contacts: Vec<RawContact>) {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_id.into(), contacts);
    }

    pub fn remove(&self, user_id: &str) -> Option<Vec<RawContact>> {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(user_id)
    }
}

impl ContactRepository for InMemoryRepository {
    fn fetch(&self, user_id: &str) -> Result<Vec<RawContact>, RepositoryError> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned()
            .ok_or_else(|| RepositoryError::UserNotFound(user_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_fetch() {
        let repo = InMemoryRepository::new();
        repo.insert("u1", vec![RawContact::new("1", "a@b.c", "A", "B")]);

        assert_eq!(repo.fetch("u1").unwrap().len(), 1);
        assert!(matches!(
            repo.fetch("u2"),
            Err(RepositoryError::UserNotFound(id)) if id == "u2"
        ));
    }

    #[test]
    fn test_in_memory_insert_replaces() {
        let repo = InMemoryRepository::new();
        repo.insert("u1", vec![RawContact::new("1", "a@b.c", "A", "B")]);
        repo.insert("u1", Vec::new());

        assert!(repo.fetch("u1").unwrap().is_empty());
        assert!(repo.remove("u1").is_some());
        assert!(repo.fetch("u1").is_err());
    }
}
