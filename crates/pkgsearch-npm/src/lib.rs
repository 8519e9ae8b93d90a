//! npm registry support for pkgsearch.
//!
//! npm's search endpoint ranks loosely, so this client expands each query
//! into a handful of variations (organization scopes, `-cli` and ecosystem
//! naming patterns) and merges what comes back.

pub mod config;
pub mod registry;
pub mod variations;

pub use config::NpmConfig;
pub use registry::{NpmClient, relevance, resolve_author};
pub use variations::query_variations;
