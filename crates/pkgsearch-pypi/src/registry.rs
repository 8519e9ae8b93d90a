//! PyPI registry client.
//!
//! Resolves queries through the package metadata API
//! (<https://pypi.org/pypi/{package}/json>). The exact name is looked up
//! first; alias lookups then run concurrently within what is left of the
//! client's deadline.

use crate::config::PypiConfig;
use crate::variations::name_variations;
use async_trait::async_trait;
use futures::future::join_all;
use pkgsearch_core::{
    HttpTransport, PackageInfo, Registry, RegistryClient, Result, SearchError, degrade,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Score of a hit on the name exactly as typed.
const EXACT_SCORE: f64 = 1.0;

/// Score of a hit on one of the alias spellings.
const VARIATION_SCORE: f64 = 0.8;

/// Client for the PyPI JSON API.
///
/// # Examples
///
/// ```no_run
/// # use pkgsearch_pypi::PypiClient;
/// # use pkgsearch_core::{HttpTransport, RegistryClient};
/// # use std::sync::Arc;
/// # use tokio_util::sync::CancellationToken;
/// # #[tokio::main]
/// # async fn main() -> pkgsearch_core::Result<()> {
/// let client = PypiClient::new(Arc::new(HttpTransport::new()?));
///
/// let results = client.search("flask", 5, &CancellationToken::new()).await;
/// assert_eq!(results[0].relevance_score, 1.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PypiClient {
    transport: Arc<HttpTransport>,
    config: PypiConfig,
}

impl PypiClient {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self::with_config(transport, PypiConfig::default())
    }

    pub fn with_config(transport: Arc<HttpTransport>, config: PypiConfig) -> Self {
        Self { transport, config }
    }

    fn project_url(&self, name: &str) -> String {
        format!(
            "{}/pypi/{}/json",
            self.config.registry_url.trim_end_matches('/'),
            urlencoding::encode(name)
        )
    }

    async fn lookup(
        &self,
        name: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<ProjectInfo> {
        let url = self.project_url(name);
        let project: ProjectResponse = self.transport.get_json(&url, timeout, cancel).await?;
        Ok(project.info)
    }

    async fn try_search(
        &self,
        term: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageInfo>> {
        let term = term.trim();
        if term.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let deadline = Instant::now() + self.config.timeout();
        let mut seen = HashSet::new();
        let mut packages = Vec::new();

        match self
            .lookup(&term.to_lowercase(), self.config.timeout(), cancel)
            .await
        {
            Ok(info) => {
                seen.insert(info.name.to_lowercase());
                packages.push(info.into_package(EXACT_SCORE));
            }
            Err(SearchError::Cancelled) => return Err(SearchError::Cancelled),
            Err(e) => tracing::debug!(term, error = %e, "pypi exact lookup missed"),
        }

        let budget = self
            .config
            .max_variations
            .min(limit.saturating_sub(packages.len()));
        if budget == 0 {
            return Ok(packages);
        }

        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            tracing::warn!(term, "pypi deadline reached after exact lookup");
            return Ok(packages);
        }

        let variations: Vec<String> = name_variations(term).into_iter().take(budget).collect();
        let lookups = variations
            .iter()
            .map(|name| self.lookup(name, remaining, cancel));

        for (name, result) in variations.iter().zip(join_all(lookups).await) {
            match result {
                Ok(info) => {
                    if seen.insert(info.name.to_lowercase()) {
                        packages.push(info.into_package(VARIATION_SCORE));
                    }
                }
                Err(SearchError::Cancelled) => return Err(SearchError::Cancelled),
                Err(e) => {
                    tracing::debug!(term, variation = %name, error = %e, "pypi variation missed");
                }
            }
        }

        packages.truncate(limit);
        Ok(packages)
    }
}

#[async_trait]
impl RegistryClient for PypiClient {
    fn registry(&self) -> Registry {
        Registry::PyPi
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
        tracing::info!(term, "pypi: searching");
        degrade(Registry::PyPi, term, self.try_search(term, limit, cancel).await)
    }
}

/// Project metadata response; only `info` is read.
#[derive(Deserialize)]
struct ProjectResponse {
    info: ProjectInfo,
}

#[derive(Deserialize)]
struct ProjectInfo {
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    author: Option<String>,
}

impl ProjectInfo {
    fn into_package(self, score: f64) -> PackageInfo {
        PackageInfo::new(Registry::PyPi, self.name, self.version)
            .with_description(self.summary)
            .with_author(self.author)
            .with_relevance(score)
    }
}
