//! Package search across npm, NuGet and PyPI.
//!
//! Ties the registry clients together: [`SearchService`] fans a query out,
//! merges and caches the results, and [`presenter`] turns them into display
//! entries.

pub mod config;
pub mod presenter;
pub mod search;

// Re-export commonly used types
pub use config::{CacheConfig, SearchConfig};
pub use presenter::{
    ContextAction, ResultEntry, context_actions, help_entries, no_results_entry, present,
};
pub use search::SearchService;
