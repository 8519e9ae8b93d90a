use serde::Deserialize;
use std::time::Duration;

/// Default NuGet search service endpoint.
pub const SEARCH_BASE: &str = "https://azuresearch-usnc.nuget.org";

/// Tuning knobs for the NuGet client.
///
/// # Defaults
///
/// - `registry_url`: `https://azuresearch-usnc.nuget.org`
/// - `timeout_secs`: `5`
#[derive(Debug, Clone, Deserialize)]
pub struct NuGetConfig {
    #[serde(default = "default_registry_url")]
    pub registry_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl NuGetConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for NuGetConfig {
    fn default() -> Self {
        Self {
            registry_url: default_registry_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_registry_url() -> String {
    SEARCH_BASE.to_string()
}

const fn default_timeout_secs() -> u64 {
    5
}
