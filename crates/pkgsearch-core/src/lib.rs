//! Core abstractions for pkgsearch.
//!
//! This crate provides the data model, traits and shared utilities used by
//! every registry client (npm, NuGet, PyPI) and by the search orchestrator.
//!
//! # Architecture
//!
//! pkgsearch-core defines:
//! - **Data model**: `PackageInfo`, `Registry`, `ParsedQuery`
//! - **Traits**: `RegistryClient`, the per-registry search capability
//! - **HTTP transport**: one shared connection pool with per-request timeouts
//!   and cooperative cancellation
//! - **Result cache**: TTL-bounded, size-bounded, sharded query cache
//! - **Ranking**: cross-registry deduplication and ordering
//! - **Error types**: `SearchError`, degraded to empty results at client boundaries
//!
//! # Examples
//!
//! ```
//! use pkgsearch_core::{ParsedQuery, Registry};
//!
//! let query = ParsedQuery::parse("pip requests");
//! assert_eq!(query.target_registry, Some(Registry::PyPi));
//! assert_eq!(query.search_term, "requests");
//! ```

pub mod cache;
pub mod error;
pub mod http;
pub mod query;
pub mod ranking;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use cache::{CacheEntry, ResultCache};
pub use error::{Result, SearchError};
pub use http::{DEFAULT_USER_AGENT, HttpTransport};
pub use query::{ParsedQuery, is_registry_keyword, parse, supported_keywords};
pub use ranking::{merge_and_rank, rank_order};
pub use registry::{RegistryClient, degrade};
pub use types::{PackageInfo, Registry, UNKNOWN_AUTHOR};
