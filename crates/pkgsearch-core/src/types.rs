//! Unified cross-registry data model.

use serde::Serialize;
use std::fmt;

/// Author reported when an upstream record carries none.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Supported package registries.
///
/// # Examples
///
/// ```
/// use pkgsearch_core::Registry;
///
/// assert_eq!(Registry::Npm.install_command("react"), "npm install react");
/// assert_eq!(Registry::PyPi.to_string(), "PyPI");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Registry {
    Npm,
    NuGet,
    PyPi,
}

impl Registry {
    /// Every registry, in fan-out order.
    pub const ALL: [Self; 3] = [Self::Npm, Self::NuGet, Self::PyPi];

    /// Human-readable registry name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Npm => "NPM",
            Self::NuGet => "NuGet",
            Self::PyPi => "PyPI",
        }
    }

    /// Shell invocation that installs `name` from this registry.
    pub fn install_command(self, name: &str) -> String {
        match self {
            Self::Npm => format!("npm install {}", name),
            Self::NuGet => format!("dotnet add package {}", name),
            Self::PyPi => format!("pip install {}", name),
        }
    }

    /// Package page used when the upstream record does not carry one.
    pub fn package_url(self, name: &str) -> String {
        match self {
            Self::Npm => format!("https://www.npmjs.com/package/{}", name),
            Self::NuGet => format!("https://www.nuget.org/packages/{}", name),
            Self::PyPi => format!("https://pypi.org/project/{}/", name),
        }
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single search hit, normalized across registries.
///
/// Records are built by a registry client and never mutated afterwards; the
/// orchestrator, the cache and the presenter only ever read them.
///
/// # Examples
///
/// ```
/// use pkgsearch_core::{PackageInfo, Registry};
///
/// let pkg = PackageInfo::new(Registry::NuGet, "Newtonsoft.Json", "13.0.3")
///     .with_downloads(5_000_000_000)
///     .with_relevance(1.7);
///
/// assert_eq!(pkg.install_command, "dotnet add package Newtonsoft.Json");
/// assert_eq!(pkg.author, "Unknown");
/// assert_eq!(pkg.relevance_score, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub downloads: u64,
    pub registry: Registry,
    pub install_command: String,
    pub relevance_score: f64,
}

impl PackageInfo {
    /// Creates a record with registry-derived defaults for the install
    /// command and package page.
    pub fn new(registry: Registry, name: impl Into<String>, version: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            install_command: registry.install_command(&name),
            url: registry.package_url(&name),
            version: version.into(),
            description: String::new(),
            author: UNKNOWN_AUTHOR.to_string(),
            downloads: 0,
            registry,
            relevance_score: 0.0,
            name,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.unwrap_or_default();
        self
    }

    /// Blank authors fall back to [`UNKNOWN_AUTHOR`].
    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
        self
    }

    /// Keeps the registry fallback page when `url` is absent or blank.
    pub fn with_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.url = url;
        }
        self
    }

    pub fn with_downloads(mut self, downloads: u64) -> Self {
        self.downloads = downloads;
        self
    }

    /// Sets the relevance score, clamped into `[0, 1]`. NaN becomes `0`.
    pub fn with_relevance(mut self, score: f64) -> Self {
        self.relevance_score = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        };
        self
    }

    /// Key under which records from different registries are deduplicated.
    pub fn dedup_key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Case-insensitive name comparison.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}
