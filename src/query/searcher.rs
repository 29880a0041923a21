//! Prefix search over one sorted view
//!
//! Binary search finds the first key `>= query`; matches are then contiguous,
//! so a forward scan emits them until the first key that does not start with
//! the query. The cancel token is checked before every emit.

use crate::index::types::{Field, normalize};
use crate::index::view::{IndexSet, IndexView};
use crate::query::cancel::CancelToken;
use crate::query::sink::MatchSink;

/// How a single searcher finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub field: Field,
    /// Matches handed to the sink
    pub emitted: usize,
    /// Stopped early because the lookup was cancelled
    pub cancelled: bool,
}

/// Searcher bound to one field
///
/// It always searches the view sorted by its own field, and matches against
/// that same field's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixSearcher {
    field: Field,
}

impl PrefixSearcher {
    pub const fn new(field: Field) -> Self {
        Self { field }
    }

    /// One searcher per indexed field
    pub fn all() -> [PrefixSearcher; 3] {
        Field::ALL.map(PrefixSearcher::new)
    }

    pub fn field(&self) -> Field {
        self.field
    }

    /// Emit every contact in `set` whose field starts with `query`
    pub fn search<S>(
        &self,
        set: &IndexSet,
        query: &str,
        sink: &S,
        cancel: &CancelToken,
    ) -> SearchOutcome
    where
        S: MatchSink + ?Sized,
    {
        search_view(set.view(self.field), query, sink, cancel)
    }

    /// Number of matches in `set`, without emitting
    pub fn count(&self, set: &IndexSet, query: &str) -> usize {
        let (lo, hi) = set.view(self.field).prefix_range(&normalize(query));
        hi - lo
    }
}

/// Emit the contacts of `view` whose key starts with `query`
pub fn search_view<S>(
    view: &IndexView,
    query: &str,
    sink: &S,
    cancel: &CancelToken,
) -> SearchOutcome
where
    S: MatchSink + ?Sized,
{
    let field = view.field();
    let query = normalize(query);
    let start = view.lower_bound(&query);

    let mut emitted = 0;
    for contact in &view.as_slice()[start..] {
        if cancel.is_cancelled() {
            return SearchOutcome {
                field,
                emitted,
                cancelled: true,
            };
        }
        if !field.key(contact).starts_with(query.as_str()) {
            break;
        }
        sink.emit(contact);
        emitted += 1;
    }

    SearchOutcome {
        field,
        emitted,
        cancelled: false,
    }
}
