//! Turns ranked search results into display entries.
//!
//! Entries are plain data; the host decides how to render them and how to
//! carry out a [`ContextAction`].

use pkgsearch_core::{PackageInfo, ParsedQuery, Registry};
use serde::Serialize;
use std::fmt;

/// Score of the top-ranked entry; each following entry scores one less.
pub const TOP_SCORE: i64 = 1000;

/// Descriptions longer than this are cut to fit one subtitle line.
const MAX_DESCRIPTION_CHARS: usize = 80;

/// One line of output shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEntry {
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    pub score: i64,
    /// Primary action: the command copied when the entry is chosen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<Registry>,
}

impl ResultEntry {
    fn message(title: impl Into<String>, subtitle: impl Into<String>, score: i64) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            tooltip: None,
            score,
            install_command: None,
            url: None,
            registry: None,
        }
    }
}

impl fmt::Display for ResultEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n    {}", self.title, self.subtitle)
    }
}

/// Secondary actions offered for a package entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum ContextAction {
    CopyInstallCommand(String),
    CopyName(String),
    OpenUrl(String),
    CopyUrl(String),
}

impl ContextAction {
    pub fn title(&self) -> &'static str {
        match self {
            Self::CopyInstallCommand(_) => "Copy install command (Enter)",
            Self::CopyName(_) => "Copy package name (Ctrl+C)",
            Self::OpenUrl(_) => "Open package page (Ctrl+O)",
            Self::CopyUrl(_) => "Copy package URL (Ctrl+U)",
        }
    }

    /// Text copied or URL opened by this action.
    pub fn value(&self) -> &str {
        match self {
            Self::CopyInstallCommand(v)
            | Self::CopyName(v)
            | Self::OpenUrl(v)
            | Self::CopyUrl(v) => v,
        }
    }
}

/// Maps ranked packages to entries, preserving order.
pub fn present(packages: &[PackageInfo]) -> Vec<ResultEntry> {
    packages
        .iter()
        .zip(0_i64..)
        .map(|(package, index)| package_entry(package, index))
        .collect()
}

fn package_entry(package: &PackageInfo, index: i64) -> ResultEntry {
    ResultEntry {
        title: package.name.clone(),
        subtitle: format!(
            "{} • v{} • {} • {}",
            package.registry.display_name(),
            package.version,
            trim_description(&package.description),
            package.author
        ),
        tooltip: Some(tooltip(package)),
        score: TOP_SCORE - index,
        install_command: Some(package.install_command.clone()),
        url: Some(package.url.clone()),
        registry: Some(package.registry),
    }
}

fn tooltip(package: &PackageInfo) -> String {
    format!(
        "{}\nRegistry: {}\nVersion: {}\nAuthor: {}\nDescription: {}\n\nInstall: {}",
        package.name,
        package.registry.display_name(),
        package.version,
        package.author,
        package.description,
        package.install_command
    )
}

/// Shortens a description to one subtitle line; blank becomes "No description".
pub fn trim_description(description: &str) -> String {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return "No description".to_string();
    }

    if trimmed.chars().count() > MAX_DESCRIPTION_CHARS {
        let mut short: String = trimmed.chars().take(MAX_DESCRIPTION_CHARS - 3).collect();
        short.push('…');
        short
    } else {
        trimmed.to_string()
    }
}

/// Actions for a package entry, primary action first.
pub fn context_actions(package: &PackageInfo) -> Vec<ContextAction> {
    vec![
        ContextAction::CopyInstallCommand(package.install_command.clone()),
        ContextAction::CopyName(package.name.clone()),
        ContextAction::OpenUrl(package.url.clone()),
        ContextAction::CopyUrl(package.url.clone()),
    ]
}

/// Help shown when there is no term to search for.
pub fn help_entries(query: &ParsedQuery) -> Vec<ResultEntry> {
    match query.target_registry {
        None => vec![
            ResultEntry::message(
                "Package Manager Search",
                "Type a package name to search NPM, NuGet, and PyPI",
                100,
            ),
            ResultEntry::message(
                "Search All Registries",
                "<package> → searches NPM, NuGet, PyPI (e.g., react)",
                95,
            ),
            ResultEntry::message(
                "Filter by Registry",
                "npm <package> | pip <package> | nuget <package>",
                90,
            ),
            ResultEntry::message(
                "Supported Registries",
                "NPM (Node.js), NuGet (.NET), PyPI (Python)",
                85,
            ),
        ],
        Some(registry) => {
            let name = registry.display_name();
            vec![
                ResultEntry::message(
                    format!("Search {}", name),
                    format!("Type a package name to search in {}", name),
                    100,
                ),
                ResultEntry::message("Examples", examples(registry), 90),
            ]
        }
    }
}

fn examples(registry: Registry) -> &'static str {
    match registry {
        Registry::Npm => "npm react | npm express | npm lodash",
        Registry::NuGet => "nuget entity | nuget newtonsoft | nuget automapper",
        Registry::PyPi => "pip django | pip requests | pip flask",
    }
}

/// Entry shown when a search came back empty.
pub fn no_results_entry(query: &ParsedQuery) -> ResultEntry {
    let scope = if query.is_filtered() {
        query.registry_display_name()
    } else {
        "NPM, NuGet, or PyPI"
    };

    ResultEntry::message(
        "No packages found",
        format!("No packages matching '{}' in {}", query.search_term, scope),
        0,
    )
}
