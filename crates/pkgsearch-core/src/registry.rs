use crate::error::{Result, SearchError};
use crate::types::{PackageInfo, Registry};
use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Search capability of one upstream package registry.
///
/// Implementors encode one upstream protocol plus whatever query expansion
/// compensates for its search quality. `search` never fails: timeouts,
/// network errors, malformed responses and missing packages are logged and
/// reported as an empty result set (see [`degrade`]).
///
/// Every network round trip must observe `cancel`; a call made with an
/// already-cancelled token returns without issuing requests.
///
/// # Examples
///
/// ```
/// use pkgsearch_core::{PackageInfo, Registry, RegistryClient};
/// use async_trait::async_trait;
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// struct FixedClient;
///
/// #[async_trait]
/// impl RegistryClient for FixedClient {
///     fn registry(&self) -> Registry {
///         Registry::Npm
///     }
///
///     fn timeout(&self) -> Duration {
///         Duration::from_secs(1)
///     }
///
///     async fn search(
///         &self,
///         term: &str,
///         _limit: usize,
///         _cancel: &CancellationToken,
///     ) -> Vec<PackageInfo> {
///         vec![PackageInfo::new(Registry::Npm, term, "1.0.0").with_relevance(1.0)]
///     }
/// }
/// ```
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Registry this client talks to.
    fn registry(&self) -> Registry;

    /// Overall deadline for one `search` call.
    ///
    /// Must stay below the user-visible latency budget; the orchestrator
    /// uses it to bound its join.
    fn timeout(&self) -> Duration;

    /// Returns up to `limit` hits for `term`, best first.
    async fn search(
        &self,
        term: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Vec<PackageInfo>;
}

/// Logs a failed client search and turns it into an empty result set.
///
/// Cancellation and "not found" are expected outcomes and logged at debug
/// level; timeouts and everything else are warnings.
pub fn degrade(
    registry: Registry,
    term: &str,
    result: Result<Vec<PackageInfo>>,
) -> Vec<PackageInfo> {
    match result {
        Ok(packages) => {
            tracing::info!(%registry, term, count = packages.len(), "search finished");
            packages
        }
        Err(SearchError::Cancelled) => {
            tracing::debug!(%registry, term, "search cancelled");
            Vec::new()
        }
        Err(e @ SearchError::NotFound(_)) => {
            tracing::debug!(%registry, term, error = %e, "no match");
            Vec::new()
        }
        Err(e @ SearchError::Timeout(_)) => {
            tracing::warn!(%registry, term, error = %e, "search timed out");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(%registry, term, error = %e, "search failed");
            Vec::new()
        }
    }
}
