use serde::Deserialize;
use std::time::Duration;

/// Default PyPI endpoint.
pub const REGISTRY_BASE: &str = "https://pypi.org";

/// Tuning knobs for the PyPI client.
///
/// `max_variations` bounds the alias lookups issued after the exact one.
#[derive(Debug, Clone, Deserialize)]
pub struct PypiConfig {
    #[serde(default = "default_registry_url")]
    pub registry_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_variations")]
    pub max_variations: usize,
}

impl PypiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for PypiConfig {
    fn default() -> Self {
        Self {
            registry_url: default_registry_url(),
            timeout_secs: default_timeout_secs(),
            max_variations: default_max_variations(),
        }
    }
}

fn default_registry_url() -> String {
    REGISTRY_BASE.to_string()
}

const fn default_timeout_secs() -> u64 {
    5
}

const fn default_max_variations() -> usize {
    6
}
