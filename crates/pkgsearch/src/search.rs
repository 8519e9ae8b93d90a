//! Search orchestration across registries.
//!
//! [`SearchService`] owns the shared HTTP transport, one client per registry
//! and the result cache. Unfiltered queries fan out to every client at once;
//! filtered queries go straight to one client and skip the cache.

use crate::config::{CacheConfig, SearchConfig};
use futures::future::join_all;
use pkgsearch_core::{
    HttpTransport, PackageInfo, ParsedQuery, Registry, RegistryClient, Result, ResultCache,
    merge_and_rank,
};
use pkgsearch_npm::NpmClient;
use pkgsearch_nuget::NuGetClient;
use pkgsearch_pypi::PypiClient;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Slack on top of a client's own deadline before the orchestrator gives up on it.
const TIMEOUT_GRACE: Duration = Duration::from_millis(250);

/// Concurrent, cached search over every configured registry.
///
/// Safe to share behind an `Arc` and call from many tasks at once; the cache
/// is the only mutable state.
///
/// # Examples
///
/// ```no_run
/// # use pkgsearch::{SearchConfig, SearchService};
/// # use pkgsearch_core::ParsedQuery;
/// # use tokio_util::sync::CancellationToken;
/// # #[tokio::main]
/// # async fn main() -> pkgsearch_core::Result<()> {
/// let service = SearchService::new(&SearchConfig::default())?;
///
/// let query = ParsedQuery::parse("pip requests");
/// let results = service.search(&query, &CancellationToken::new()).await;
/// # Ok(())
/// # }
/// ```
pub struct SearchService {
    clients: Vec<Arc<dyn RegistryClient>>,
    cache: Option<ResultCache>,
    per_registry_limit: usize,
    filtered_limit: usize,
}

impl SearchService {
    /// Builds the shared transport and the npm, NuGet and PyPI clients.
    ///
    /// # Errors
    ///
    /// Fails only if the HTTP client cannot be constructed.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::with_user_agent(&config.user_agent)?);

        let clients: Vec<Arc<dyn RegistryClient>> = vec![
            Arc::new(NpmClient::with_config(
                Arc::clone(&transport),
                config.npm.clone(),
            )),
            Arc::new(NuGetClient::with_config(
                Arc::clone(&transport),
                config.nuget.clone(),
            )),
            Arc::new(PypiClient::with_config(transport, config.pypi.clone())),
        ];

        Ok(Self::with_clients(clients, config))
    }

    /// Builds a service over the given clients, taking limits and cache
    /// settings from `config`.
    pub fn with_clients(clients: Vec<Arc<dyn RegistryClient>>, config: &SearchConfig) -> Self {
        Self {
            clients,
            cache: build_cache(&config.cache),
            per_registry_limit: config.per_registry_limit,
            filtered_limit: config.filtered_limit,
        }
    }

    /// Runs a parsed query: filtered queries hit one registry, the rest fan out.
    pub async fn search(
        &self,
        query: &ParsedQuery,
        cancel: &CancellationToken,
    ) -> Arc<[PackageInfo]> {
        if query.is_empty() {
            return Arc::from([]);
        }

        match query.target_registry {
            Some(registry) => {
                tracing::info!(%registry, term = %query.search_term, "filtered search");
                self.search_registry(registry, &query.search_term, self.filtered_limit, cancel)
                    .await
                    .into()
            }
            None => {
                tracing::info!(term = %query.search_term, "unfiltered search");
                self.search_all(&query.search_term, self.per_registry_limit, cancel)
                    .await
            }
        }
    }

    /// Searches every registry concurrently and returns the merged ranking.
    ///
    /// Results are cached under the trimmed, lower-cased term. A cancelled
    /// search returns an empty set and leaves the cache untouched.
    pub async fn search_all(
        &self,
        term: &str,
        per_registry_limit: usize,
        cancel: &CancellationToken,
    ) -> Arc<[PackageInfo]> {
        let term = term.trim();
        if term.is_empty() || cancel.is_cancelled() {
            return Arc::from([]);
        }

        if let Some(cache) = &self.cache
            && let Some(hit) = cache.try_get(term)
        {
            tracing::debug!(term, count = hit.len(), "cache hit");
            return hit;
        }

        let started = Instant::now();
        let searches = self
            .clients
            .iter()
            .map(|client| guarded_search(client.as_ref(), term, per_registry_limit, cancel));

        let batches = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!(term, "search cancelled during fan-out");
                return Arc::from([]);
            }
            batches = join_all(searches) => batches,
        };

        if cancel.is_cancelled() {
            return Arc::from([]);
        }

        let ranked: Arc<[PackageInfo]> = merge_and_rank(batches).into();
        if let Some(cache) = &self.cache {
            cache.put(term, Arc::clone(&ranked));
        }

        tracing::info!(
            term,
            count = ranked.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search finished"
        );
        ranked
    }

    /// Searches one registry, bypassing the fan-out and the cache.
    pub async fn search_registry(
        &self,
        registry: Registry,
        term: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Vec<PackageInfo> {
        let term = term.trim();
        if term.is_empty() || cancel.is_cancelled() {
            return Vec::new();
        }

        let Some(client) = self.clients.iter().find(|c| c.registry() == registry) else {
            tracing::debug!(%registry, "no client registered");
            return Vec::new();
        };

        let packages = guarded_search(client.as_ref(), term, limit, cancel).await;
        if cancel.is_cancelled() {
            return Vec::new();
        }
        packages
    }

    /// Drops every cached result.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
            tracing::info!("result cache cleared");
        }
    }

    pub fn cache_len(&self) -> usize {
        self.cache.as_ref().map_or(0, ResultCache::len)
    }

    /// Registries with a configured client, in dispatch order.
    pub fn registries(&self) -> Vec<Registry> {
        self.clients.iter().map(|c| c.registry()).collect()
    }
}

fn build_cache(config: &CacheConfig) -> Option<ResultCache> {
    config
        .enabled
        .then(|| ResultCache::with_limits(config.ttl(), config.capacity))
}

/// Runs one client under its own deadline; an overrun degrades to no hits.
async fn guarded_search(
    client: &dyn RegistryClient,
    term: &str,
    limit: usize,
    cancel: &CancellationToken,
) -> Vec<PackageInfo> {
    let deadline = client.timeout() + TIMEOUT_GRACE;
    match tokio::time::timeout(deadline, client.search(term, limit, cancel)).await {
        Ok(packages) => packages,
        Err(_) => {
            tracing::warn!(
                registry = %client.registry(),
                term,
                deadline_ms = deadline.as_millis() as u64,
                "registry client overran its deadline"
            );
            Vec::new()
        }
    }
}
