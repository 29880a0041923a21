//! Deadline-bounded fan-out lookup
//!
//! A lookup runs one [`PrefixSearcher`] per field on scoped threads, all
//! feeding the same sink. The calling thread waits on the searchers'
//! completion channel until either every searcher has reported or the
//! deadline passes, then raises the shared cancel token. Scoped threads are
//! joined before the lookup returns, so nothing keeps scanning or writing to
//! the sink afterwards.

use crate::config::LookupConfig;
use crate::error::Result;
use crate::index::build::build_index_set;
use crate::index::store::UserIndexStore;
use crate::index::types::Contact;
use crate::index::view::{IndexSet, IndexStats};
use crate::query::cancel::CancelToken;
use crate::query::searcher::{PrefixSearcher, SearchOutcome};
use crate::query::sink::{MatchCollector, MatchSink};
use crate::repository::ContactRepository;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How a lookup ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupOutcome {
    /// Every searcher scanned to the end of its matches
    Completed,
    /// The deadline passed first; matches are partial
    TimedOut,
    /// No index has been published for the user
    NotWarmedUp,
}

/// Matches of one lookup
///
/// Unordered. A contact matching on several fields appears once per field.
#[derive(Debug, Clone)]
pub struct LookupResult {
    pub matches: Vec<Arc<Contact>>,
    pub outcome: LookupOutcome,
    pub elapsed: Duration,
}

impl LookupResult {
    fn not_warmed_up(elapsed: Duration) -> Self {
        Self {
            matches: Vec::new(),
            outcome: LookupOutcome::NotWarmedUp,
            elapsed,
        }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn timed_out(&self) -> bool {
        self.outcome == LookupOutcome::TimedOut
    }

    /// Matches with repeated contacts removed, keeping first arrival
    ///
    /// Contacts are compared by id.
    pub fn distinct(&self) -> Vec<Arc<Contact>> {
        let mut seen = HashSet::with_capacity(self.matches.len());
        self.matches
            .iter()
            .filter(|c| seen.insert(c.id.as_str()))
            .cloned()
            .collect()
    }
}

/// Engine counters
#[derive(Debug, Default)]
struct EngineStats {
    lookups_served: AtomicU64,
    lookups_timed_out: AtomicU64,
    warm_ups_completed: AtomicU64,
    warm_ups_failed: AtomicU64,
}

/// Point-in-time copy of the engine counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStatsSnapshot {
    pub lookups_served: u64,
    pub lookups_timed_out: u64,
    pub warm_ups_completed: u64,
    pub warm_ups_failed: u64,
}

/// Warm-up and lookup over a [`UserIndexStore`]
pub struct LookupEngine {
    store: Arc<UserIndexStore>,
    config: LookupConfig,
    searchers: [PrefixSearcher; 3],
    stats: EngineStats,
}

impl LookupEngine {
    /// Engine over a fresh store
    pub fn new(config: LookupConfig) -> Result<Self> {
        Self::with_store(Arc::new(UserIndexStore::new()), config)
    }

    /// Engine over a store the caller owns
    pub fn with_store(store: Arc<UserIndexStore>, config: LookupConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            searchers: PrefixSearcher::all(),
            stats: EngineStats::default(),
        })
    }

    pub fn store(&self) -> &Arc<UserIndexStore> {
        &self.store
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn stats(&self) -> EngineStatsSnapshot {
        EngineStatsSnapshot {
            lookups_served: self.stats.lookups_served.load(Ordering::Relaxed),
            lookups_timed_out: self.stats.lookups_timed_out.load(Ordering::Relaxed),
            warm_ups_completed: self.stats.warm_ups_completed.load(Ordering::Relaxed),
            warm_ups_failed: self.stats.warm_ups_failed.load(Ordering::Relaxed),
        }
    }

    /// Fetch a user's contacts, rebuild their index set and publish it
    ///
    /// On repository failure the previously published set (if any) stays in
    /// place and the error is returned.
    pub fn warm_up<R>(&self, user_id: &str, repository: &R) -> Result<IndexStats>
    where
        R: ContactRepository + ?Sized,
    {
        let records = match repository.fetch(user_id) {
            Ok(records) => records,
            Err(e) => {
                self.stats.warm_ups_failed.fetch_add(1, Ordering::Relaxed);
                warn!(user_id, error = %e, "warm-up failed, keeping existing index");
                return Err(e.into());
            }
        };

        let set = build_index_set(records);
        let stats = set.stats();
        let replaced = self.store.put(user_id, set);
        self.stats.warm_ups_completed.fetch_add(1, Ordering::Relaxed);

        info!(
            user_id,
            contacts = stats.contacts,
            build_ms = stats.build_time.as_millis() as u64,
            replaced = replaced.is_some(),
            "index published"
        );
        Ok(stats)
    }

    /// Look up `query` within the configured deadline
    pub fn lookup(&self, user_id: &str, query: &str) -> LookupResult {
        self.lookup_with_deadline(user_id, query, self.config.deadline())
    }

    /// Look up `query`, waiting at most `deadline` for the searchers
    pub fn lookup_with_deadline(
        &self,
        user_id: &str,
        query: &str,
        deadline: Duration,
    ) -> LookupResult {
        let started = Instant::now();
        let Some(set) = self.store.get(user_id) else {
            debug!(user_id, "lookup before warm-up");
            return LookupResult::not_warmed_up(started.elapsed());
        };

        let collector = MatchCollector::new();
        let outcome = self.fan_out(&set, query, deadline, &collector);
        let result = LookupResult {
            matches: collector.into_matches(),
            outcome,
            elapsed: started.elapsed(),
        };

        debug!(
            user_id,
            query,
            matches = result.len(),
            outcome = ?result.outcome,
            elapsed_us = result.elapsed.as_micros() as u64,
            "lookup finished"
        );
        result
    }

    /// Run the lookup into a caller-supplied sink
    ///
    /// Nothing is written to `sink` after this returns.
    pub fn lookup_into<S>(
        &self,
        user_id: &str,
        query: &str,
        deadline: Duration,
        sink: &S,
    ) -> LookupOutcome
    where
        S: MatchSink,
    {
        match self.store.get(user_id) {
            Some(set) => self.fan_out(&set, query, deadline, sink),
            None => LookupOutcome::NotWarmedUp,
        }
    }

    fn fan_out<S>(
        &self,
        set: &IndexSet,
        query: &str,
        deadline: Duration,
        sink: &S,
    ) -> LookupOutcome
    where
        S: MatchSink,
    {
        // A deadline too far out to represent means no deadline at all
        let expires = Instant::now().checked_add(deadline);
        let cancel = CancelToken::new();
        let (done_tx, done_rx) = crossbeam_channel::bounded::<SearchOutcome>(self.searchers.len());

        let timed_out = thread::scope(|scope| {
            for searcher in &self.searchers {
                let done_tx = done_tx.clone();
                let cancel = &cancel;
                scope.spawn(move || {
                    let outcome = searcher.search(set, query, sink, cancel);
                    // Receiver only goes away once the scope is joining
                    let _ = done_tx.send(outcome);
                });
            }
            // Disconnect fires once every searcher's sender is dropped
            drop(done_tx);

            let timed_out = await_searchers(&done_rx, self.searchers.len(), expires);

            cancel.cancel();
            timed_out
        });

        self.stats.lookups_served.fetch_add(1, Ordering::Relaxed);
        if timed_out {
            self.stats.lookups_timed_out.fetch_add(1, Ordering::Relaxed);
            debug!(deadline_ms = deadline.as_millis() as u64, "lookup hit deadline");
            LookupOutcome::TimedOut
        } else {
            LookupOutcome::Completed
        }
    }
}

/// Wait until `expected` searchers report or `expires` passes
///
/// Returns `true` on timeout. Completion is decided by the number of outcomes
/// received, not by channel disconnect, since a searcher drops its sender a
/// moment after sending.
fn await_searchers(
    done_rx: &Receiver<SearchOutcome>,
    expected: usize,
    expires: Option<Instant>,
) -> bool {
    let mut received = 0;
    while received < expected {
        let next = match expires {
            Some(at) => done_rx.recv_deadline(at),
            None => done_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match next {
            Ok(outcome) => {
                received += 1;
                debug!(
                    field = %outcome.field,
                    emitted = outcome.emitted,
                    cancelled = outcome.cancelled,
                    "searcher done"
                );
            }
            Err(RecvTimeoutError::Disconnected) => return false,
            Err(RecvTimeoutError::Timeout) => return true,
        }
    }
    false
}
