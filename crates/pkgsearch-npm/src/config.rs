use serde::Deserialize;
use std::time::Duration;

/// Default npm registry endpoint.
pub const REGISTRY_BASE: &str = "https://registry.npmjs.org";

/// Tuning knobs for the npm client.
///
/// # Defaults
///
/// - `registry_url`: `https://registry.npmjs.org`
/// - `timeout_secs`: `10` (soft cap across all variation requests)
/// - `max_variations`: `8`
/// - `min_page_size`: `20` (results requested per variation)
///
/// # Examples
///
/// ```
/// use pkgsearch_npm::NpmConfig;
///
/// let config: NpmConfig = serde_json::from_str(r#"{"max_variations": 3}"#).unwrap();
/// assert_eq!(config.max_variations, 3);
/// assert_eq!(config.timeout_secs, 10);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct NpmConfig {
    #[serde(default = "default_registry_url")]
    pub registry_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_variations")]
    pub max_variations: usize,
    #[serde(default = "default_min_page_size")]
    pub min_page_size: usize,
}

impl NpmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for NpmConfig {
    fn default() -> Self {
        Self {
            registry_url: default_registry_url(),
            timeout_secs: default_timeout_secs(),
            max_variations: default_max_variations(),
            min_page_size: default_min_page_size(),
        }
    }
}

fn default_registry_url() -> String {
    REGISTRY_BASE.to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_max_variations() -> usize {
    8
}

const fn default_min_page_size() -> usize {
    20
}
