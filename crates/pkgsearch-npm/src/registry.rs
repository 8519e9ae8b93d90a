//! npm registry client.
//!
//! Uses the search API (<https://registry.npmjs.org/-/v1/search>). Each user
//! query fans out into several variation requests, issued one after another
//! in priority order so that cancellation is observed between them.

use crate::config::NpmConfig;
use crate::variations::query_variations;
use async_trait::async_trait;
use pkgsearch_core::{
    HttpTransport, PackageInfo, Registry, RegistryClient, Result, SearchError, UNKNOWN_AUTHOR,
    degrade,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Boost applied when a hit's name contains the original term.
const CONTAINS_BOOST: f64 = 1.2;

/// Client for the npm search API.
///
/// # Examples
///
/// ```no_run
/// # use pkgsearch_npm::NpmClient;
/// # use pkgsearch_core::{HttpTransport, RegistryClient};
/// # use std::sync::Arc;
/// # use tokio_util::sync::CancellationToken;
/// # #[tokio::main]
/// # async fn main() -> pkgsearch_core::Result<()> {
/// let client = NpmClient::new(Arc::new(HttpTransport::new()?));
///
/// let results = client.search("express", 5, &CancellationToken::new()).await;
/// assert!(results.len() <= 5);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NpmClient {
    transport: Arc<HttpTransport>,
    config: NpmConfig,
}

impl NpmClient {
    /// Creates a client with default configuration on the shared transport.
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self::with_config(transport, NpmConfig::default())
    }

    pub fn with_config(transport: Arc<HttpTransport>, config: NpmConfig) -> Self {
        Self { transport, config }
    }

    fn search_url(&self, text: &str, size: usize) -> String {
        format!(
            "{}/-/v1/search?text={}&size={}",
            self.config.registry_url.trim_end_matches('/'),
            urlencoding::encode(text),
            size
        )
    }

    /// Issues variation requests in order until `budget` is spent.
    ///
    /// Hits gathered before the budget runs out are kept; cancellation
    /// discards everything.
    async fn try_search(
        &self,
        term: &str,
        limit: usize,
        budget: Duration,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageInfo>> {
        let term = term.trim();
        if term.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let deadline = Instant::now() + budget;
        let size = limit.max(self.config.min_page_size);
        let mut seen = HashSet::new();
        let mut packages = Vec::new();

        for variation in query_variations(term)
            .into_iter()
            .take(self.config.max_variations)
        {
            if cancel.is_cancelled() {
                return Err(SearchError::Cancelled);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracing::warn!(term, "npm soft time cap reached, skipping remaining variations");
                break;
            }

            let url = self.search_url(&variation, size);
            let response: SearchResponse =
                match self.transport.get_json(&url, remaining, cancel).await {
                    Ok(response) => response,
                    Err(SearchError::Cancelled) => return Err(SearchError::Cancelled),
                    Err(e) => {
                        tracing::debug!(term, variation = %variation, error = %e, "npm variation failed");
                        continue;
                    }
                };

            for object in response.objects {
                if seen.insert(object.package.name.to_lowercase()) {
                    packages.push(object.into_package(term));
                }
            }
        }

        packages.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        packages.truncate(limit);
        Ok(packages)
    }
}

#[async_trait]
impl RegistryClient for NpmClient {
    fn registry(&self) -> Registry {
        Registry::Npm
    }

    fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    async fn search(
        &self,
        term: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Vec<PackageInfo> {
        tracing::info!(term, "npm: searching");
        let result = self
            .try_search(term, limit, self.config.timeout(), cancel)
            .await;
        degrade(Registry::Npm, term, result)
    }
}

/// Scores an npm hit against the term the user typed.
///
/// The base score is `searchScore * score.final`, capped at 1. An exact
/// case-insensitive name match scores 1; a name containing the term gets a
/// 1.2x boost (still capped). A missing `searchScore` counts as 1.
pub fn relevance(name: &str, term: &str, search_score: Option<f64>, final_score: f64) -> f64 {
    let name = name.to_lowercase();
    let term = term.to_lowercase();

    if name == term {
        return 1.0;
    }

    let base = (search_score.unwrap_or(1.0) * final_score).min(1.0);
    if name.contains(&term) {
        (base * CONTAINS_BOOST).min(1.0)
    } else {
        base
    }
}

/// Author fallback order: `author.name`, then `publisher.username`, then "Unknown".
pub fn resolve_author(author: Option<&str>, publisher: Option<&str>) -> String {
    author
        .filter(|a| !a.trim().is_empty())
        .or_else(|| publisher.filter(|p| !p.trim().is_empty()))
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string()
}

/// Search response from npm registry.
#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    objects: Vec<SearchObject>,
}

/// Search result object.
#[derive(Deserialize)]
struct SearchObject {
    package: SearchPackage,
    #[serde(default)]
    score: Option<SearchScore>,
    #[serde(default, rename = "searchScore")]
    search_score: Option<f64>,
}

#[derive(Deserialize)]
struct SearchScore {
    #[serde(default, rename = "final")]
    final_score: f64,
}

/// Package information in search result.
#[derive(Deserialize)]
struct SearchPackage {
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    author: Option<Person>,
    #[serde(default)]
    publisher: Option<Publisher>,
    #[serde(default)]
    links: Option<PackageLinks>,
}

#[derive(Deserialize)]
struct Person {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct Publisher {
    #[serde(default)]
    username: Option<String>,
}

#[derive(Deserialize)]
struct PackageLinks {
    #[serde(default)]
    npm: Option<String>,
}

impl SearchObject {
    fn into_package(self, term: &str) -> PackageInfo {
        let final_score = self.score.map_or(0.0, |s| s.final_score);
        let score = relevance(&self.package.name, term, self.search_score, final_score);

        let pkg = self.package;
        let author = resolve_author(
            pkg.author.as_ref().and_then(|a| a.name.as_deref()),
            pkg.publisher.as_ref().and_then(|p| p.username.as_deref()),
        );

        PackageInfo::new(Registry::Npm, pkg.name, pkg.version)
            .with_description(pkg.description)
            .with_author(Some(author))
            .with_url(pkg.links.and_then(|l| l.npm))
            .with_relevance(score)
    }
}
