use pkgsearch_core::{DEFAULT_USER_AGENT, Result, SearchError};
use pkgsearch_npm::NpmConfig;
use pkgsearch_nuget::NuGetConfig;
use pkgsearch_pypi::PypiConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Root configuration for pkgsearch.
///
/// Read from a JSON document; every field has a default, so `{}` is a valid
/// configuration. Out-of-range numbers are clamped by [`SearchConfig::validated`]
/// with a warning rather than rejected.
///
/// # Examples
///
/// ```
/// use pkgsearch::config::SearchConfig;
///
/// let json = r#"{
///     "per_registry_limit": 3,
///     "cache": { "ttl_secs": 60 },
///     "npm": { "max_variations": 4 }
/// }"#;
///
/// let config = SearchConfig::from_json_str(json).unwrap();
/// assert_eq!(config.per_registry_limit, 3);
/// assert_eq!(config.cache.ttl_secs, 60);
/// assert_eq!(config.npm.max_variations, 4);
/// assert_eq!(config.filtered_limit, 10);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Hits requested from each registry for an unfiltered query.
    #[serde(default = "default_per_registry_limit")]
    pub per_registry_limit: usize,
    /// Hits requested from the single registry of a filtered query.
    #[serde(default = "default_filtered_limit")]
    pub filtered_limit: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub npm: NpmConfig,
    #[serde(default)]
    pub nuget: NuGetConfig,
    #[serde(default)]
    pub pypi: PypiConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            per_registry_limit: default_per_registry_limit(),
            filtered_limit: default_filtered_limit(),
            user_agent: default_user_agent(),
            cache: CacheConfig::default(),
            npm: NpmConfig::default(),
            nuget: NuGetConfig::default(),
            pypi: PypiConfig::default(),
        }
    }
}

/// Configuration for the query result cache.
///
/// # Defaults
///
/// - `enabled`: `true`
/// - `ttl_secs`: `600` (10 minutes)
/// - `capacity`: `100` entries
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: default_ttl_secs(),
            capacity: default_capacity(),
        }
    }
}

impl SearchConfig {
    /// Parses a JSON document and clamps it into range.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Json`] if the document is not valid JSON or a
    /// field has the wrong type.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    /// Reads and parses the JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Io`] when the file cannot be read and
    /// [`SearchError::Config`] when it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
            .map_err(|e| SearchError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Clamps every tunable into its supported range, warning about each change.
    pub fn validated(mut self) -> Self {
        self.per_registry_limit = clamp_setting(
            "per_registry_limit",
            self.per_registry_limit,
            1,
            MAX_RESULT_LIMIT,
        );
        self.filtered_limit =
            clamp_setting("filtered_limit", self.filtered_limit, 1, MAX_RESULT_LIMIT);

        if self.user_agent.trim().is_empty() {
            tracing::warn!("user_agent is blank, using {}", DEFAULT_USER_AGENT);
            self.user_agent = default_user_agent();
        }

        self.cache.ttl_secs = clamp_setting("cache.ttl_secs", self.cache.ttl_secs, 1, MAX_TTL_SECS);
        self.cache.capacity =
            clamp_setting("cache.capacity", self.cache.capacity, 1, MAX_CACHE_CAPACITY);

        self.npm.timeout_secs =
            clamp_setting("npm.timeout_secs", self.npm.timeout_secs, 1, MAX_TIMEOUT_SECS);
        self.npm.max_variations =
            clamp_setting("npm.max_variations", self.npm.max_variations, 1, MAX_NPM_VARIATIONS);
        self.npm.min_page_size =
            clamp_setting("npm.min_page_size", self.npm.min_page_size, 1, MAX_NPM_PAGE_SIZE);

        self.nuget.timeout_secs =
            clamp_setting("nuget.timeout_secs", self.nuget.timeout_secs, 1, MAX_TIMEOUT_SECS);

        self.pypi.timeout_secs =
            clamp_setting("pypi.timeout_secs", self.pypi.timeout_secs, 1, MAX_TIMEOUT_SECS);
        self.pypi.max_variations = clamp_setting(
            "pypi.max_variations",
            self.pypi.max_variations,
            0,
            MAX_PYPI_VARIATIONS,
        );

        self
    }
}

const MAX_RESULT_LIMIT: usize = 100;
const MAX_TTL_SECS: u64 = 24 * 60 * 60;
const MAX_CACHE_CAPACITY: usize = 10_000;
const MAX_TIMEOUT_SECS: u64 = 30;
const MAX_NPM_VARIATIONS: usize = 16;
/// The npm search API rejects `size` above 250.
const MAX_NPM_PAGE_SIZE: usize = 250;
const MAX_PYPI_VARIATIONS: usize = 10;

fn clamp_setting<T>(name: &str, value: T, min: T, max: T) -> T
where
    T: Ord + Copy + std::fmt::Display,
{
    let clamped = value.clamp(min, max);
    if clamped != value {
        tracing::warn!(
            "{} = {} is outside {}..={}, using {}",
            name,
            value,
            min,
            max,
            clamped
        );
    }
    clamped
}

// Default value functions
const fn default_true() -> bool {
    true
}

const fn default_per_registry_limit() -> usize {
    5
}

const fn default_filtered_limit() -> usize {
    10
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

const fn default_ttl_secs() -> u64 {
    600 // 10 minutes
}

const fn default_capacity() -> usize {
    100
}
