//! NuGet support for pkgsearch.
//!
//! Queries the NuGet v3 search service. NuGet's own full-text ranking is
//! trusted; relevance is derived from download counts only.

pub mod config;
pub mod registry;

pub use config::NuGetConfig;
pub use registry::{NuGetClient, popularity_score};
