//! PyPI support for pkgsearch.
//!
//! PyPI has no JSON search endpoint, so this crate resolves a query by
//! exact-name lookups against the JSON API: the literal term first, then a
//! handful of common spellings of the same name.

pub mod config;
pub mod registry;
pub mod variations;

pub use config::PypiConfig;
pub use registry::PypiClient;
pub use variations::name_variations;
