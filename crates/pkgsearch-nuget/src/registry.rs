//! NuGet search client.
//!
//! Issues a single request against the search query service
//! (<https://azuresearch-usnc.nuget.org/query>), prerelease packages excluded.

use crate::config::NuGetConfig;
use async_trait::async_trait;
use pkgsearch_core::{HttpTransport, PackageInfo, Registry, RegistryClient, Result, degrade};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Client for the NuGet search service.
#[derive(Debug, Clone)]
pub struct NuGetClient {
    transport: Arc<HttpTransport>,
    config: NuGetConfig,
}

impl NuGetClient {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self::with_config(transport, NuGetConfig::default())
    }

    pub fn with_config(transport: Arc<HttpTransport>, config: NuGetConfig) -> Self {
        Self { transport, config }
    }

    fn query_url(&self, term: &str, take: usize) -> String {
        format!(
            "{}/query?q={}&take={}&prerelease=false",
            self.config.registry_url.trim_end_matches('/'),
            urlencoding::encode(term),
            take
        )
    }

    async fn try_search(
        &self,
        term: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageInfo>> {
        let term = term.trim();
        if term.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let url = self.query_url(term, limit);
        let response: QueryResponse = self
            .transport
            .get_json(&url, self.config.timeout(), cancel)
            .await?;

        Ok(response
            .data
            .into_iter()
            .take(limit)
            .map(QueryPackage::into_package)
            .collect())
    }
}

#[async_trait]
impl RegistryClient for NuGetClient {
    fn registry(&self) -> Registry {
        Registry::NuGet
    }

    fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    async fn search(
        &self,
        term: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Vec<PackageInfo> {
        tracing::info!(term, "nuget: searching");
        degrade(Registry::NuGet, term, self.try_search(term, limit, cancel).await)
    }
}

/// Normalizes a download count into `[0, 1]` on a log scale.
///
/// `log10(downloads + 1) / 10`, so ten billion downloads saturate at 1.
///
/// # Examples
///
/// ```
/// use pkgsearch_nuget::popularity_score;
///
/// assert_eq!(popularity_score(0), 0.0);
/// assert!((popularity_score(999_999) - 0.6).abs() < 1e-9);
/// ```
pub fn popularity_score(downloads: u64) -> f64 {
    ((downloads as f64 + 1.0).log10() / 10.0).min(1.0)
}

/// Query response from the NuGet search service.
#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    data: Vec<QueryPackage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryPackage {
    id: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "authors_list")]
    authors: Vec<String>,
    #[serde(default)]
    project_url: Option<String>,
    #[serde(default)]
    total_downloads: u64,
}

impl QueryPackage {
    fn into_package(self) -> PackageInfo {
        let score = popularity_score(self.total_downloads);
        PackageInfo::new(Registry::NuGet, self.id, self.version)
            .with_description(self.description)
            .with_author(self.authors.into_iter().next())
            .with_url(self.project_url)
            .with_downloads(self.total_downloads)
            .with_relevance(score)
    }
}

/// `authors` is documented as an array but older feeds send a single string.
fn authors_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Authors {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Authors>::deserialize(deserializer)? {
        Some(Authors::One(author)) => vec![author],
        Some(Authors::Many(authors)) => authors,
        None => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const QUERY_PAGE: &str = r#"{
  "totalHits": 2,
  "data": [
    {
      "id": "Newtonsoft.Json",
      "version": "13.0.3",
      "description": "Json.NET is a popular high-performance JSON framework for .NET",
      "authors": ["James Newton-King"],
      "projectUrl": "https://www.newtonsoft.com/json",
      "totalDownloads": 4500000000
    },
    {
      "id": "Newtonsoft.Json.Bson",
      "version": "1.0.2",
      "authors": [],
      "totalDownloads": 0
    }
  ]
}"#;

    fn client(server: &mockito::Server) -> NuGetClient {
        NuGetClient::with_config(
            Arc::new(HttpTransport::new().unwrap()),
            NuGetConfig {
                registry_url: server.url(),
                ..NuGetConfig::default()
            },
        )
    }

    #[test]
    fn test_popularity_score() {
        assert_eq!(popularity_score(0), 0.0);
        assert!((popularity_score(9) - 0.1).abs() < 1e-9);
        assert!(popularity_score(1_000) < popularity_score(1_000_000));
        assert_eq!(popularity_score(u64::MAX), 1.0);
    }

    #[test]
    fn test_parse_query_package() {
        let response: QueryResponse = serde_json::from_str(QUERY_PAGE).unwrap();
        let packages: Vec<_> = response
            .data
            .into_iter()
            .map(QueryPackage::into_package)
            .collect();

        let json = &packages[0];
        assert_eq!(json.name, "Newtonsoft.Json");
        assert_eq!(json.author, "James Newton-King");
        assert_eq!(json.url, "https://www.newtonsoft.com/json");
        assert_eq!(json.downloads, 4_500_000_000);
        assert_eq!(json.install_command, "dotnet add package Newtonsoft.Json");
        assert!(json.relevance_score > 0.9);

        let bson = &packages[1];
        assert_eq!(bson.author, "Unknown");
        assert_eq!(bson.url, "https://www.nuget.org/packages/Newtonsoft.Json.Bson");
        assert_eq!(bson.relevance_score, 0.0);
    }

    #[test]
    fn test_authors_as_string() {
        let pkg: QueryPackage =
            serde_json::from_str(r#"{"id": "Serilog", "authors": "Serilog Contributors"}"#)
                .unwrap();
        assert_eq!(pkg.authors, vec!["Serilog Contributors"]);

        let pkg: QueryPackage = serde_json::from_str(r#"{"id": "X", "authors": null}"#).unwrap();
        assert!(pkg.authors.is_empty());
    }

    #[tokio::test]
    async fn test_search() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/query")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "newtonsoft json".into()),
                Matcher::UrlEncoded("take".into(), "5".into()),
                Matcher::UrlEncoded("prerelease".into(), "false".into()),
            ]))
            .with_status(200)
            .with_body(QUERY_PAGE)
            .expect(1)
            .create_async()
            .await;

        let results = client(&server)
            .search("newtonsoft json", 5, &CancellationToken::new())
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].registry, Registry::NuGet);
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_degrades_to_empty() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/query")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let results = client(&server)
            .search("serilog", 5, &CancellationToken::new())
            .await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_degrades_to_empty() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/query")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data": "nope"}"#)
            .create_async()
            .await;

        let results = client(&server)
            .search("serilog", 5, &CancellationToken::new())
            .await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/query")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(QUERY_PAGE)
            .expect(0)
            .create_async()
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();

        assert!(client(&server).search("json", 5, &cancel).await.is_empty());
        m.assert_async().await;
    }

    #[test]
    fn test_client_metadata() {
        let client = NuGetClient::new(Arc::new(HttpTransport::new().unwrap()));
        assert_eq!(client.registry(), Registry::NuGet);
        assert_eq!(client.timeout(), Duration::from_secs(5));
        assert_eq!(
            client.query_url("entity framework", 10),
            "https://azuresearch-usnc.nuget.org/query?q=entity%20framework&take=10&prerelease=false"
        );
    }
}
