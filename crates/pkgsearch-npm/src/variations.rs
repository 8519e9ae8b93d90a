//! Query expansion for npm search.

/// Organization scopes tried for unscoped queries, most common first.
const TOP_SCOPES: [&str; 3] = ["@google", "@microsoft", "@types"];

/// Scopes tried for the bare name of a `-cli` query.
const CLI_SCOPES: [&str; 2] = ["@google", "@microsoft"];

const CLI_SUFFIX: &str = "-cli";

/// Expands `term` into search variations, in priority order.
///
/// The original term always comes first. For a `-cli` query the bare name
/// and its scoped forms follow; otherwise the term is tried under the top
/// organization scopes, with a `-cli` suffix, and with the `-js` / `node-`
/// naming conventions. Scoped queries (`@org/name`) are not re-scoped.
///
/// # Examples
///
/// ```
/// use pkgsearch_npm::query_variations;
///
/// let v = query_variations("gemini-cli");
/// assert_eq!(v[0], "gemini-cli");
/// assert_eq!(v[1], "gemini");
/// assert!(v.contains(&"@google/gemini-cli".to_string()));
/// ```
pub fn query_variations(term: &str) -> Vec<String> {
    let cleaned = term.trim();
    if cleaned.is_empty() {
        return Vec::new();
    }

    let lower = cleaned.to_lowercase();
    let is_scoped = cleaned.starts_with('@');
    let has_cli = cleaned
        .get(cleaned.len().saturating_sub(CLI_SUFFIX.len())..)
        .is_some_and(|tail| tail.eq_ignore_ascii_case(CLI_SUFFIX));
    let has_js = lower.ends_with("-js");
    let has_node = lower.ends_with("-node") || lower.starts_with("node-");

    let mut variations = vec![cleaned.to_string()];

    if has_cli {
        let base = &cleaned[..cleaned.len() - CLI_SUFFIX.len()];
        if !base.is_empty() {
            variations.push(base.to_string());
            if !is_scoped {
                for scope in CLI_SCOPES {
                    variations.push(format!("{}/{}", scope, base));
                    variations.push(format!("{}/{}", scope, cleaned));
                }
            }
        }
    } else if !is_scoped {
        for scope in TOP_SCOPES {
            variations.push(format!("{}/{}", scope, cleaned));
        }

        variations.push(format!("{}{}", cleaned, CLI_SUFFIX));
        for scope in CLI_SCOPES {
            variations.push(format!("{}/{}{}", scope, cleaned, CLI_SUFFIX));
        }

        if !has_js && !has_node {
            variations.push(format!("{}-js", cleaned));
            variations.push(format!("node-{}", cleaned));
        }
    }

    let mut seen = std::collections::HashSet::new();
    variations.retain(|v| seen.insert(v.to_lowercase()));
    variations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert!(query_variations("").is_empty());
        assert!(query_variations("   ").is_empty());
    }

    #[test]
    fn test_plain_term() {
        assert_eq!(
            query_variations("react"),
            vec![
                "react",
                "@google/react",
                "@microsoft/react",
                "@types/react",
                "react-cli",
                "@google/react-cli",
                "@microsoft/react-cli",
                "react-js",
                "node-react",
            ]
        );
    }

    #[test]
    fn test_cli_term() {
        assert_eq!(
            query_variations("gemini-cli"),
            vec![
                "gemini-cli",
                "gemini",
                "@google/gemini",
                "@google/gemini-cli",
                "@microsoft/gemini",
                "@microsoft/gemini-cli",
            ]
        );
    }

    #[test]
    fn test_cli_suffix_case_insensitive() {
        let v = query_variations("Azure-CLI");
        assert_eq!(v[0], "Azure-CLI");
        assert_eq!(v[1], "Azure");
    }

    #[test]
    fn test_scoped_term_is_not_rescoped() {
        assert_eq!(query_variations("@google/gemini"), vec!["@google/gemini"]);
        assert_eq!(
            query_variations("@google/gemini-cli"),
            vec!["@google/gemini-cli", "@google/gemini"]
        );
    }

    #[test]
    fn test_js_and_node_conventions_skipped_when_present() {
        let v = query_variations("highlight-js");
        assert!(!v.iter().any(|q| q == "highlight-js-js"));
        assert!(!v.iter().any(|q| q == "node-highlight-js"));

        let v = query_variations("node-fetch");
        assert!(!v.iter().any(|q| q == "node-node-fetch"));
    }

    #[test]
    fn test_bare_suffix_only() {
        assert_eq!(query_variations("-cli"), vec!["-cli"]);
    }

    #[test]
    fn test_original_first_and_unique() {
        for term in ["react", "vue-cli", "@types/node", "lodash-js"] {
            let v = query_variations(term);
            assert_eq!(v[0], term);
            let mut sorted = v.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), v.len());
        }
    }
}
