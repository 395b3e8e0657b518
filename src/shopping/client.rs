//! Naver Shopping search API client.

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::SearchError;
use crate::metrics;

use super::types::{PageRequest, SearchPage};

/// Header carrying the client id.
pub const CLIENT_ID_HEADER: &str = "X-Naver-Client-Id";

/// Header carrying the client secret.
pub const CLIENT_SECRET_HEADER: &str = "X-Naver-Client-Secret";

/// Source of search result pages.
#[async_trait]
pub trait ShopSearch: Send + Sync {
    /// Fetch a single page.
    async fn fetch_page(&self, request: &PageRequest) -> Result<SearchPage, SearchError>;
}

/// HTTP client for the Naver Shopping search endpoint.
#[derive(Debug, Clone)]
pub struct NaverShoppingClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Full search endpoint URL.
    base_url: String,
    /// Client id credential.
    client_id: String,
    /// Client secret credential.
    client_secret: String,
}

impl NaverShoppingClient {
    /// Create a client from config.
    ///
    /// No request timeout is set; a stalled upstream stalls only the
    /// request waiting on it.
    pub fn new(config: &Config) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .tcp_nodelay(true)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()?;

        Ok(Self::with_http(
            http,
            &config.naver_shop_url,
            &config.client_id,
            &config.client_secret,
        ))
    }

    /// Create a client around an existing HTTP client.
    pub fn with_http(
        http: reqwest::Client,
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Get the search endpoint URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ShopSearch for NaverShoppingClient {
    #[instrument(skip(self, request), fields(query = %request.query, start = request.start))]
    async fn fetch_page(&self, request: &PageRequest) -> Result<SearchPage, SearchError> {
        let _timer = metrics::timer_search_page();

        let response = self
            .http
            .get(&self.base_url)
            .header(CLIENT_ID_HEADER, &self.client_id)
            .header(CLIENT_SECRET_HEADER, &self.client_secret)
            .query(&[("query", request.query.as_str())])
            .query(&[("display", request.display), ("start", request.start)])
            .query(&[("sort", request.sort.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // A 2xx body that is not an envelope carries no items and ends the loop
        let body = response.bytes().await?;
        let page: SearchPage = serde_json::from_slice(&body).unwrap_or_else(|e| {
            warn!(error = %e, bytes = body.len(), "Search response is not a JSON envelope");
            SearchPage::default()
        });

        debug!(
            total = ?page.total,
            display = ?page.display,
            last_build_date = ?page.last_build_date,
            "Fetched search page"
        );
        metrics::inc_search_pages();

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    const PATH: &str = "/v1/search/shop.json";

    fn client(server: &MockServer) -> NaverShoppingClient {
        NaverShoppingClient::with_http(reqwest::Client::new(), server.url(PATH), "my-id", "my-secret")
    }

    #[test]
    fn client_creation_uses_config() {
        let config = Config {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            ..Default::default()
        };
        let client = NaverShoppingClient::new(&config).unwrap();
        assert_eq!(client.base_url(), crate::config::NAVER_SHOP_URL);
    }

    #[tokio::test]
    async fn sends_credentials_and_pagination() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(PATH)
                    .header("x-naver-client-id", "my-id")
                    .header("x-naver-client-secret", "my-secret")
                    .query_param("query", "장미 꽃다발")
                    .query_param("display", "100")
                    .query_param("start", "101")
                    .query_param("sort", "sim");
                then.status(200).json_body(json!({
                    "total": 1,
                    "start": 101,
                    "display": 1,
                    "items": [{"title": "<b>장미</b> 꽃다발", "lprice": "25000"}]
                }));
            })
            .await;

        let page = client(&server)
            .fetch_page(&PageRequest::new("장미 꽃다발", 101))
            .await
            .unwrap();

        mock.assert_async().await;
        let items = page.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["lprice"], "25000");
    }

    #[tokio::test]
    async fn rejected_credentials_are_status_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(PATH);
                then.status(401)
                    .json_body(json!({"errorMessage": "Not Exist Client ID", "errorCode": "024"}));
            })
            .await;

        let result = client(&server).fetch_page(&PageRequest::new("rose", 1)).await;
        match result {
            Err(SearchError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("024"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_json_success_body_is_an_empty_page() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(PATH);
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let page = client(&server)
            .fetch_page(&PageRequest::new("rose", 1))
            .await
            .unwrap();
        assert!(page.into_items().is_empty());
    }

    #[tokio::test]
    async fn string_total_still_yields_items() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(PATH);
                then.status(200)
                    .json_body(json!({"total": "5", "items": [{"a": 1}]}));
            })
            .await;

        let page = client(&server)
            .fetch_page(&PageRequest::new("rose", 1))
            .await
            .unwrap();
        assert_eq!(page.total, Some(json!("5")));
        assert_eq!(page.into_items(), vec![json!({"a": 1})]);
    }

    #[tokio::test]
    async fn unreachable_host_is_http_error() {
        let client = NaverShoppingClient::with_http(
            reqwest::Client::new(),
            "http://127.0.0.1:9/v1/search/shop.json",
            "id",
            "secret",
        );
        let result = client.fetch_page(&PageRequest::new("rose", 1)).await;
        assert!(matches!(result, Err(SearchError::Http(_))));
    }
}
