//! Destinations for matches emitted by concurrent searchers

use crate::index::types::Contact;
use std::sync::{Arc, Mutex, PoisonError};

/// Receives matches from any number of searcher threads at once
pub trait MatchSink: Sync {
    fn emit(&self, contact: &Arc<Contact>);
}

impl<F> MatchSink for F
where
    F: Fn(&Arc<Contact>) + Sync,
{
    fn emit(&self, contact: &Arc<Contact>) {
        self(contact)
    }
}

/// Accumulates matches in arrival order
#[derive(Debug, Default)]
pub struct MatchCollector {
    matches: Mutex<Vec<Arc<Contact>>>,
}

impl MatchCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn into_matches(self) -> Vec<Arc<Contact>> {
        self.matches
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Arc<Contact>>> {
        self.matches.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MatchSink for MatchCollector {
    fn emit(&self, contact: &Arc<Contact>) {
        self.lock().push(Arc::clone(contact));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::types::RawContact;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn contact(id: &str) -> Arc<Contact> {
        Arc::new(Contact::from_raw(RawContact::new(id, "e", "f", "l")))
    }

    #[test]
    fn test_collector_concurrent_emit() {
        let collector = MatchCollector::new();
        let c = contact("1");

        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..250 {
                        collector.emit(&c);
                    }
                });
            }
        });

        assert_eq!(collector.len(), 1000);
        assert_eq!(collector.into_matches().len(), 1000);
    }

    #[test]
    fn test_closure_sink() {
        let seen = AtomicUsize::new(0);
        let sink = |_: &Arc<Contact>| {
            seen.fetch_add(1, Ordering::Relaxed);
        };

        sink.emit(&contact("1"));
        sink.emit(&contact("2"));
        assert_eq!(seen.load(Ordering::Relaxed), 2);
    }
}
