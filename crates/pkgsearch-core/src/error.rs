use std::time::Duration;
use thiserror::Error;

/// Core error types for pkgsearch.
///
/// Registry clients never surface these to their callers: every failure is
/// logged and degraded to an empty result set (see [`crate::registry::degrade`]).
/// The enum exists so the fallible internals of each client can use `?` and
/// so that cancellation stays distinguishable from genuine failures.
///
/// # Examples
///
/// ```
/// use pkgsearch_core::error::{Result, SearchError};
///
/// fn lookup(name: &str) -> Result<()> {
///     if name.is_empty() {
///         return Err(SearchError::NotFound(name.into()));
///     }
///     Ok(())
/// }
///
/// assert!(lookup("").is_err());
/// ```
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("registry request failed for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("operation cancelled")]
    Cancelled,

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SearchError {
    /// Returns `true` if the operation was aborted by its cancellation signal.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns `true` for lookups the upstream answered with "no such package".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Convenience type alias for `Result<T, SearchError>`.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = SearchError::Status {
            url: "https://pypi.org/pypi/x/json".into(),
            status: 500,
        };
        assert_eq!(error.to_string(), "HTTP 500 for https://pypi.org/pypi/x/json");
    }

    #[test]
    fn test_cancelled() {
        let error = SearchError::Cancelled;
        assert!(error.is_cancelled());
        assert!(!error.is_not_found());
        assert_eq!(error.to_string(), "operation cancelled");
    }

    #[test]
    fn test_not_found() {
        let error = SearchError::NotFound("flask".into());
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "not found: flask");
    }

    #[test]
    fn test_timeout_display() {
        let error = SearchError::Timeout(Duration::from_secs(5));
        assert_eq!(error.to_string(), "request timed out after 5s");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: SearchError = json_err.into();
        assert!(error.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: SearchError = io_err.into();
        assert!(error.to_string().contains("I/O error"));
    }
}
