pub mod cancel;
pub mod engine;
pub mod searcher;
pub mod sink;

pub use cancel::CancelToken;
pub use engine::{EngineStatsSnapshot, LookupEngine, LookupOutcome, LookupResult};
pub use searcher::{search_view, PrefixSearcher, SearchOutcome};
pub use sink::{MatchCollector, MatchSink};
