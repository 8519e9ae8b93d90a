/// Alternative spellings of a PyPI project name, in lookup order.
///
/// The term is lower-cased and trimmed; the lower-cased term itself is not
/// included since the caller looks it up first. Covers the usual separator
/// drift (`-`, `_`, space) and the `python-` prefix convention.
///
/// # Examples
///
/// ```
/// use pkgsearch_pypi::name_variations;
///
/// assert_eq!(
///     name_variations("Flask RESTful"),
///     vec!["flask-restful", "flask_restful", "python-flask restful"]
/// );
/// ```
pub fn name_variations(term: &str) -> Vec<String> {
    let cleaned = term.trim().to_lowercase();
    if cleaned.is_empty() {
        return Vec::new();
    }

    let mut variations = Vec::new();

    if !cleaned.contains('-') {
        variations.push(cleaned.replace(' ', "-"));
        variations.push(cleaned.replace('_', "-"));
    }

    if !cleaned.contains('_') {
        variations.push(cleaned.replace(' ', "_"));
        variations.push(cleaned.replace('-', "_"));
    }

    if !cleaned.starts_with("python-") {
        variations.push(format!("python-{}", cleaned));
    }

    let mut seen = std::collections::HashSet::new();
    seen.insert(cleaned);
    variations.retain(|v| seen.insert(v.clone()));
    variations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name() {
        assert_eq!(name_variations("flask"), vec!["python-flask"]);
    }

    #[test]
    fn test_hyphenated_name() {
        assert_eq!(
            name_variations("django-rest-framework"),
            vec!["django_rest_framework", "python-django-rest-framework"]
        );
    }

    #[test]
    fn test_underscored_name() {
        assert_eq!(
            name_variations("typing_extensions"),
            vec!["typing-extensions", "python-typing_extensions"]
        );
    }

    #[test]
    fn test_python_prefix_not_doubled() {
        assert_eq!(name_variations("python-dateutil"), vec!["python_dateutil"]);
    }

    #[test]
    fn test_mixed_separators() {
        // Both separators present: only the prefix form remains.
        assert_eq!(name_variations("a-b_c"), vec!["python-a-b_c"]);
    }

    #[test]
    fn test_excludes_literal_term() {
        for term in ["Requests", "beautiful soup", "py_yaml"] {
            let lower = term.to_lowercase();
            assert!(!name_variations(term).contains(&lower));
        }
    }

    #[test]
    fn test_empty() {
        assert!(name_variations("  ").is_empty());
    }
}
