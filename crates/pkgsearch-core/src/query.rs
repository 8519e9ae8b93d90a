//! Splits raw user input into an optional registry filter and a search term.

use crate::types::Registry;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Leading keywords that scope a query to a single registry.
static REGISTRY_KEYWORDS: Lazy<HashMap<&'static str, Registry>> = Lazy::new(|| {
    HashMap::from([
        ("npm", Registry::Npm),
        ("nuget", Registry::NuGet),
        ("pip", Registry::PyPi),
        ("pypi", Registry::PyPi),
    ])
});

/// A query split into its registry filter and search term.
///
/// If `target_registry` is set, the first whitespace-delimited token of the
/// input was a registry keyword and has been stripped from `search_term`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub search_term: String,
    pub target_registry: Option<Registry>,
}

impl ParsedQuery {
    /// Parses raw input. Total: every string yields a valid query.
    ///
    /// # Examples
    ///
    /// ```
    /// use pkgsearch_core::{ParsedQuery, Registry};
    ///
    /// let q = ParsedQuery::parse("  npm   react ");
    /// assert_eq!(q.target_registry, Some(Registry::Npm));
    /// assert_eq!(q.search_term, "react");
    ///
    /// let q = ParsedQuery::parse("react native");
    /// assert_eq!(q.target_registry, None);
    /// assert_eq!(q.search_term, "react native");
    /// ```
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::default();
        }

        let (first, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((first, rest)) => (first, rest.trim()),
            None => (trimmed, ""),
        };

        match keyword_registry(first) {
            Some(registry) => Self {
                search_term: rest.to_string(),
                target_registry: Some(registry),
            },
            None => Self {
                search_term: trimmed.to_string(),
                target_registry: None,
            },
        }
    }

    /// Returns `true` when the query is scoped to one registry.
    pub fn is_filtered(&self) -> bool {
        self.target_registry.is_some()
    }

    /// Returns `true` when there is nothing to search for.
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty()
    }

    pub fn registry_display_name(&self) -> &'static str {
        self.target_registry
            .map_or("All Registries", Registry::display_name)
    }
}

/// Free-function form of [`ParsedQuery::parse`].
pub fn parse(raw: &str) -> ParsedQuery {
    ParsedQuery::parse(raw)
}

fn keyword_registry(word: &str) -> Option<Registry> {
    REGISTRY_KEYWORDS.get(word.to_lowercase().as_str()).copied()
}

/// Returns `true` if `word` is a registry keyword (case-insensitive).
pub fn is_registry_keyword(word: &str) -> bool {
    keyword_registry(word.trim()).is_some()
}

/// All recognised registry keywords, sorted.
pub fn supported_keywords() -> Vec<&'static str> {
    let mut keywords: Vec<_> = REGISTRY_KEYWORDS.keys().copied().collect();
    keywords.sort_unstable();
    keywords
}
