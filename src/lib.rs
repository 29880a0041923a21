//! # contact-lookup - deadline-bounded contact prefix search
//!
//! Keeps each user's contacts in memory as three sorted views (email, first
//! name, last name) and answers prefix queries by searching all three in
//! parallel under a time budget.
//!
//! ## Architecture
//!
//! - [`index`] - Normalization, sorted views, and the per-user index store
//! - [`query`] - Prefix searchers and the fan-out lookup engine
//! - [`repository`] - Contact sources used for warm-up
//! - [`config`] - Deadline configuration (env > config file > defaults)
//! - [`output`] - Terminal formatting for the `clook` binary
//!
//! ## Quick Start
//!
//! ```no_run
//! use contact_lookup::{InMemoryRepository, LookupConfig, LookupEngine, RawContact};
//!
//! let repo = InMemoryRepository::new();
//! repo.insert("u1", vec![RawContact::new("1", "alice@x.com", "Alice", "Smith")]);
//!
//! let engine = LookupEngine::new(LookupConfig::default()).unwrap();
//! engine.warm_up("u1", &repo).unwrap();
//!
//! let result = engine.lookup("u1", "ali");
//! for contact in result.distinct() {
//!     println!("{} <{}>", contact.id, contact.email);
//! }
//! ```
//!
//! ## Semantics
//!
//! - A lookup for a user with no published index returns an empty result.
//! - A lookup that reaches its deadline returns whatever was matched so far.
//! - A contact that matches on several fields is returned once per field;
//!   use [`LookupResult::distinct`] for one entry per contact.

pub mod config;
pub mod error;
pub mod index;
#[cfg(feature = "cli")]
pub mod output;
pub mod query;
pub mod repository;

pub use config::LookupConfig;
pub use error::{LookupError, RepositoryError, Result};
pub use index::{Contact, Field, IndexSet, IndexStats, RawContact, UserIndexStore};
pub use query::{LookupEngine, LookupOutcome, LookupResult};
pub use repository::{ContactRepository, InMemoryRepository, JsonDirRepository, SyntheticRepository};
