//! Sorted contact views
//!
//! An [`IndexSet`] holds the same contacts three times over, each copy
//! ordered by one normalized field. Entries are shared `Arc`s, so the three
//! views cost one pointer per contact each.

use super::types::{Contact, Field};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Contacts ordered by one field's normalized key
#[derive(Debug, Clone)]
pub struct IndexView {
    field: Field,
    entries: Vec<Arc<Contact>>,
}

impl IndexView {
    /// Wrap entries that are already sorted by `field`
    pub(crate) fn new(field: Field, entries: Vec<Arc<Contact>>) -> Self {
        debug_assert!(
            entries
                .windows(2)
                .all(|w| field.key(&w[0]) <= field.key(&w[1]))
        );
        Self { field, entries }
    }

    /// The field this view is sorted by
    pub fn field(&self) -> Field {
        self.field
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[Arc<Contact>] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Contact>> {
        self.entries.iter()
    }

    /// Sort key of the entry at `pos`
    pub fn key_at(&self, pos: usize) -> Option<&str> {
        self.entries.get(pos).map(|c| self.field.key(c))
    }

    /// First position whose key is `>= query`
    ///
    /// `query` must already be normalized.
    pub fn lower_bound(&self, query: &str) -> usize {
        self.entries.partition_point(|c| self.field.key(c) < query)
    }

    /// Range `[lo, hi)` of entries whose key starts with `query`
    pub fn prefix_range(&self, query: &str) -> (usize, usize) {
        let lo = self.lower_bound(query);
        // Matches are contiguous from lo, so the tail is partitioned too
        let hi = lo
            + self.entries[lo..].partition_point(|c| self.field.key(c).starts_with(query));
        (lo, hi)
    }

    /// Whether keys are non-decreasing
    pub fn is_sorted(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| self.field.key(&w[0]) <= self.field.key(&w[1]))
    }
}

/// Build metadata for an index set
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct IndexStats {
    /// Number of contacts indexed (per view)
    pub contacts: usize,
    /// Wall time spent normalizing and sorting
    pub build_time: Duration,
}

/// The three sorted views of one user's contacts
///
/// Immutable once built. A refresh builds a new set and swaps it in.
#[derive(Debug)]
pub struct IndexSet {
    email: IndexView,
    first_name: IndexView,
    last_name: IndexView,
    stats: IndexStats,
}

impl IndexSet {
    pub(crate) fn new(
        email: IndexView,
        first_name: IndexView,
        last_name: IndexView,
        build_time: Duration,
    ) -> Self {
        debug_assert_eq!(email.len(), first_name.len());
        debug_assert_eq!(email.len(), last_name.len());

        let stats = IndexStats {
            contacts: email.len(),
            build_time,
        };

        Self {
            email,
            first_name,
            last_name,
            stats,
        }
    }

    /// View sorted by `field`
    pub fn view(&self, field: Field) -> &IndexView {
        match field {
            Field::Email => &self.email,
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
        }
    }

    pub fn views(&self) -> [&IndexView; 3] {
        [&self.email, &self.first_name, &self.last_name]
    }

    /// Number of contacts (each view holds exactly this many)
    pub fn len(&self) -> usize {
        self.stats.contacts
    }

    pub fn is_empty(&self) -> bool {
        self.stats.contacts == 0
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }
}
