//! Semantic Scholar paper search client.
//!
//! Makes exactly one request per call and never retries; throttling and
//! failures are reported through [`FetchOutcome`] instead.
//!
//! ### Specification
//!
//! - **Endpoint**: `https://api.semanticscholar.org/graph/v1/paper/search`
//! - **Query**: the inbound raw query string is appended unchanged, so the
//!   cache key and the upstream request stay in lockstep.
//! - **Authentication**: optional, via the `x-api-key` header.
//! - **Timeout**: chosen per call by the caller (short for live fetches,
//!   longer for background refreshes).

pub mod error;
pub mod response;

pub use error::ScholarError;
pub use response::{SearchEnvelope, classify};

use async_trait::async_trait;
use papercache_core::{AppConfig, FetchOutcome, Upstream};
use reqwest::header;
use std::time::{Duration, Instant};

/// Default Semantic Scholar paper search endpoint.
const DEFAULT_BASE_URL: &str = "https://api.semanticscholar.org/graph/v1/paper/search";

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "papercache/0.1";

/// Scholar client configuration.
#[derive(Debug, Clone)]
pub struct ScholarConfig {
    /// Search endpoint, without a query string.
    pub base_url: String,
    /// Optional API key sent as `x-api-key`.
    pub api_key: Option<String>,
    /// User-agent string.
    pub user_agent: String,
}

impl Default for ScholarConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), api_key: None, user_agent: DEFAULT_USER_AGENT.to_string() }
    }
}

impl From<&AppConfig> for ScholarConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.upstream_url.clone(),
            api_key: config.api_key.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Semantic Scholar search client.
#[derive(Debug, Clone)]
pub struct ScholarClient {
    http: reqwest::Client,
    config: ScholarConfig,
}

impl ScholarClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ScholarConfig) -> Result<Self, ScholarError> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| ScholarError::Build(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Full upstream URL for a raw query string.
    pub fn search_url(&self, query: &str) -> String {
        if query.is_empty() { self.config.base_url.clone() } else { format!("{}?{}", self.config.base_url, query) }
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &ScholarConfig {
        &self.config
    }

    /// Send one request and read the whole body.
    ///
    /// Returns the status and the body decoded as UTF-8 with replacement.
    async fn send(&self, query: &str, timeout: Duration) -> Result<(u16, String), ScholarError> {
        let url = self.search_url(query);

        let mut request = self.http.get(&url).timeout(timeout).header(header::ACCEPT, "application/json");
        if let Some(api_key) = &self.config.api_key {
            request = request.header("x-api-key", api_key);
        }

        let response = request.send().await.map_err(|e| ScholarError::from_reqwest(e, timeout))?;
        let status = response.status().as_u16();

        let bytes = response.bytes().await.map_err(|e| ScholarError::from_reqwest(e, timeout))?;

        Ok((status, String::from_utf8_lossy(&bytes).into_owned()))
    }
}

#[async_trait]
impl Upstream for ScholarClient {
    async fn fetch(&self, query: &str, timeout: Duration) -> FetchOutcome {
        let start = Instant::now();
        tracing::debug!(query = %query, "querying Semantic Scholar");

        match self.send(query, timeout).await {
            Ok((status, body)) => {
                tracing::debug!(status, elapsed = ?start.elapsed(), bytes = body.len(), "upstream responded");
                classify(status, body)
            }
            Err(e) => {
                tracing::debug!(error = %e, elapsed = ?start.elapsed(), "upstream request failed");
                FetchOutcome::Failed(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const SEARCH_PATH: &str = "/graph/v1/paper/search";
    const PAPERS: &str = r#"{"total":1,"offset":0,"data":[{"paperId":"p1","title":"Social robots"}]}"#;

    fn test_client(server_url: &str, api_key: Option<&str>) -> ScholarClient {
        ScholarClient::new(ScholarConfig {
            base_url: format!("{server_url}{SEARCH_PATH}"),
            api_key: api_key.map(str::to_string),
            user_agent: "papercache-test".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = ScholarConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig { api_key: Some("k".into()), user_agent: "ua".into(), ..Default::default() };
        let config = ScholarConfig::from(&app);
        assert_eq!(config.base_url, app.upstream_url);
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.user_agent, "ua");
    }

    #[test]
    fn test_search_url_keeps_query_verbatim() {
        let client = ScholarClient::new(ScholarConfig::default()).unwrap();
        assert_eq!(
            client.search_url("query=social+robots&fields=title%2Cyear&limit=10"),
            format!("{DEFAULT_BASE_URL}?query=social+robots&fields=title%2Cyear&limit=10")
        );
        assert_eq!(client.search_url(""), DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Regex(r"^query=social\+robots&limit=10$".into()))
            .match_header("user-agent", "papercache-test")
            .match_header("x-api-key", Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PAPERS)
            .create_async()
            .await;

        let client = test_client(&server.url(), None);
        let outcome = client.fetch("query=social+robots&limit=10", Duration::from_secs(5)).await;

        mock.assert_async().await;
        match outcome {
            FetchOutcome::Success(body) => assert_eq!(body, PAPERS),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_sends_api_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .match_header("x-api-key", "secret")
            .with_status(200)
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let client = test_client(&server.url(), Some("secret"));
        let outcome = client.fetch("query=a", Duration::from_secs(5)).await;

        mock.assert_async().await;
        assert!(matches!(outcome, FetchOutcome::Success(_)));
    }

    #[tokio::test]
    async fn test_fetch_message_only_is_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"message":"rate limited"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url(), None);
        match client.fetch("query=a", Duration::from_secs(5)).await {
            FetchOutcome::RateLimited(body) => assert_eq!(body, r#"{"message":"rate limited"}"#),
            other => panic!("expected rate limited, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_429() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(r#"{"message":"Too Many Requests"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url(), None);
        assert!(matches!(client.fetch("query=a", Duration::from_secs(5)).await, FetchOutcome::RateLimited(_)));
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let client = test_client(&server.url(), None);
        match client.fetch("query=a", Duration::from_secs(5)).await {
            FetchOutcome::Rejected { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "upstream unavailable");
            }
            other => panic!("expected rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_invalid_utf8_is_replaced() {
        let mut server = mockito::Server::new_async().await;
        let mut body = br#"{"data":[{"paperId":"p1","title":""#.to_vec();
        body.extend_from_slice(&[0xff, 0xfe]);
        body.extend_from_slice(br#""}]}"#);
        server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let client = test_client(&server.url(), None);
        match client.fetch("query=a", Duration::from_secs(5)).await {
            FetchOutcome::Success(body) => assert!(body.contains('\u{fffd}')),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        // Accepts connections and never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = test_client(&format!("http://{addr}"), None);
        let start = Instant::now();
        let outcome = client.fetch("query=a", Duration::from_millis(200)).await;

        assert!(start.elapsed() < Duration::from_secs(3));
        match outcome {
            FetchOutcome::Failed(e) => assert_eq!(e.code(), "UPSTREAM_TIMEOUT"),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = test_client(&format!("http://{addr}"), None);
        match client.fetch("query=a", Duration::from_secs(2)).await {
            FetchOutcome::Failed(e) => assert_eq!(e.code(), "UPSTREAM_TRANSPORT"),
            other => panic!("expected transport failure, got {other:?}"),
        }
    }
}
