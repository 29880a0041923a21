pub mod build;
pub mod store;
pub mod types;
pub mod view;

pub use build::build_index_set;
pub use store::{StoreStatus, UserIndexStore};
pub use types::*;
pub use view::{IndexSet, IndexStats, IndexView};
