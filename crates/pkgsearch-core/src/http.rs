//! Shared upstream transport.
//!
//! One [`HttpTransport`] is created by the orchestrator and handed to every
//! registry client behind an `Arc`. `reqwest::Client` pools connections
//! internally and is safe for concurrent reuse, so a slow registry never
//! blocks requests to the others.

use crate::error::{Result, SearchError};
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// User agent sent with every upstream request.
pub const DEFAULT_USER_AGENT: &str = concat!("pkgsearch/", env!("CARGO_PKG_VERSION"));

/// Long-lived HTTP client shared by all registry clients.
///
/// Timeouts are applied per request rather than on the client, because each
/// registry has its own latency budget.
///
/// # Examples
///
/// ```no_run
/// use pkgsearch_core::HttpTransport;
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> pkgsearch_core::Result<()> {
/// let transport = HttpTransport::new()?;
/// let cancel = CancellationToken::new();
/// let body: serde_json::Value = transport
///     .get_json("https://pypi.org/pypi/flask/json", Duration::from_secs(5), &cancel)
///     .await?;
/// println!("{}", body["info"]["version"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport identifying itself with [`DEFAULT_USER_AGENT`].
    pub fn new() -> Result<Self> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .build()
            .map_err(SearchError::Client)?;

        Ok(Self { client })
    }

    /// Fetches `url` and deserializes the JSON body.
    ///
    /// # Errors
    ///
    /// - `Cancelled` if `cancel` fires before or during the request
    /// - `Timeout` if the request does not finish within `timeout`
    /// - `NotFound` on HTTP 404, `Status` on any other non-2xx status
    /// - `Json` if the body does not match `T`
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let body = self.get_bytes(url, timeout, cancel).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetches the raw response body of `url`.
    ///
    /// An already-cancelled token returns immediately without touching the network.
    pub async fn get_bytes(
        &self,
        url: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<Bytes> {
        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(SearchError::Cancelled),
            result = self.fetch(url, timeout) => result,
        }
    }

    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Bytes> {
        tracing::debug!(url, "fetching");

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| request_error(url, timeout, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SearchError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(SearchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| request_error(url, timeout, e))
    }
}

fn request_error(url: &str, timeout: Duration, source: reqwest::Error) -> SearchError {
    if source.is_timeout() {
        SearchError::Timeout(timeout)
    } else {
        SearchError::Http {
            url: url.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Info {
        name: String,
    }

    fn transport() -> HttpTransport {
        HttpTransport::new().unwrap()
    }

    #[tokio::test]
    async fn test_get_json() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/pkg")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "flask"}"#)
            .create_async()
            .await;

        let url = format!("{}/pkg", server.url());
        let info: Info = transport()
            .get_json(&url, Duration::from_secs(5), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(info.name, "flask");
    }

    #[tokio::test]
    async fn test_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let url = format!("{}/missing", server.url());
        let result = transport()
            .get_bytes(&url, Duration::from_secs(5), &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(SearchError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/boom")
            .with_status(503)
            .create_async()
            .await;

        let url = format!("{}/boom", server.url());
        let result = transport()
            .get_bytes(&url, Duration::from_secs(5), &CancellationToken::new())
            .await;

        match result {
            Err(SearchError::Status { status, .. }) => assert_eq!(status, 503),
            other => panic!("expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/bad")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let url = format!("{}/bad", server.url());
        let result: Result<Info> = transport()
            .get_json(&url, Duration::from_secs(5), &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(SearchError::Json(_))));
    }

    #[tokio::test]
    async fn test_cancelled_before_request_skips_network() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/pkg")
            .with_status(200)
            .expect(0)
            .create_async()
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();

        let url = format!("{}/pkg", server.url());
        let result = transport()
            .get_bytes(&url, Duration::from_secs(5), &cancel)
            .await;

        assert!(matches!(result, Err(SearchError::Cancelled)));
        m.assert_async().await;
    }

    #[test]
    fn test_user_agent_constant() {
        assert!(DEFAULT_USER_AGENT.starts_with("pkgsearch/"));
    }
}
