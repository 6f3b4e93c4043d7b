//! HTTP client for the analytics API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{ApiError, ApiResult};
use crate::core::config::ApiConfig;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Fallback when a failed response carries no usable message.
const UNKNOWN_ERROR: &str = "Unknown error";

/// Read-only access to the analytics API.
///
/// Implementations perform exactly one request per call and never retry.
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    /// `GET` an endpoint path (see [`endpoints`](super::endpoints)) and
    /// return the decoded JSON body.
    async fn get(&self, endpoint: &str) -> ApiResult<Value>;
}

/// `reqwest`-backed [`AnalyticsApi`] implementation.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    user_agent: String,
    timeout: Duration,
}

/// Custom Debug implementation to keep the API key out of logs.
impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiClient {
    /// Create a client for the configured base URL using the given key.
    pub fn new(config: &ApiConfig, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Override the request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The request deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send the request and decode the body, without the deadline.
    async fn fetch(&self, url: &str) -> ApiResult<Value> {
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(&body);
            warn!("API returned {}: {}", status, message);
            return Err(ApiError::status(status.as_u16(), message));
        }

        let bytes = response.bytes().await?;
        debug!("API response received: {} bytes", bytes.len());

        serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidBody(e.to_string()))
    }
}

#[async_trait]
impl AnalyticsApi for ApiClient {
    #[instrument(skip(self), fields(timeout = ?self.timeout))]
    async fn get(&self, endpoint: &str) -> ApiResult<Value> {
        let url = self.url(endpoint);
        debug!("GET {}", url);

        match tokio::time::timeout(self.timeout, self.fetch(&url)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Request to {} timed out", endpoint);
                Err(ApiError::Timeout(self.timeout))
            }
        }
    }
}

/// Extract a human-readable message from a failed response body.
///
/// Prefers a JSON `message` field, then `error`, then the raw text.
fn upstream_message(body: &str) -> String {
    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(body) {
        let field = obj
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| obj.get("error").and_then(Value::as_str))
            .filter(|s| !s.trim().is_empty());
        if let Some(message) = field {
            return message.to_string();
        }
    }

    let raw = body.trim();
    if raw.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::endpoints;
    use mockito::Matcher;
    use serde_json::json;

    const TOKEN: &str = "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984";
    const OTHER: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";

    fn client_for(base_url: String) -> ApiClient {
        let config = ApiConfig {
            base_url,
            ..ApiConfig::default()
        };
        ApiClient::new(&config, "test-key")
    }

    #[test]
    fn test_upstream_message_fallbacks() {
        assert_eq!(upstream_message(r#"{"message":"bad key"}"#), "bad key");
        assert_eq!(upstream_message(r#"{"error":"forbidden"}"#), "forbidden");
        assert_eq!(
            upstream_message(r#"{"message":"first","error":"second"}"#),
            "first"
        );
        assert_eq!(upstream_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(upstream_message(""), "Unknown error");
        assert_eq!(upstream_message("   "), "Unknown error");
        // JSON without either field falls back to the raw body
        assert_eq!(upstream_message(r#"{"code":7}"#), r#"{"code":7}"#);
    }

    #[test]
    fn test_default_timeout_is_thirty_seconds() {
        let client = client_for("http://localhost".to_string());
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = client_for("http://localhost".to_string());
        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("test-key"));
    }

    #[tokio::test]
    async fn test_get_success_sends_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", endpoints::token_info(TOKEN).as_str())
            .match_header(API_KEY_HEADER, "test-key")
            .match_header("user-agent", Matcher::Regex("^token-analytics-mcp/".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name":"Uniswap","symbol":"UNI"}"#)
            .create_async()
            .await;

        let client = client_for(server.url());
        let value = client.get(&endpoints::token_info(TOKEN)).await.unwrap();

        assert_eq!(value, json!({"name": "Uniswap", "symbol": "UNI"}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_overlap_query_string() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/token/two-token-overlap")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("token1".into(), TOKEN.into()),
                Matcher::UrlEncoded("token2".into(), OTHER.into()),
            ]))
            .with_status(200)
            .with_body(r#"{"overlappingHolders":[]}"#)
            .create_async()
            .await;

        let client = client_for(format!("{}/", server.url()));
        let endpoint = endpoints::two_token_overlap(TOKEN, OTHER).unwrap();
        client.get(&endpoint).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_unauthorized_includes_status_and_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", endpoints::top_holders(TOKEN).as_str())
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"bad key"}"#)
            .create_async()
            .await;

        let client = client_for(server.url());
        let err = client.get(&endpoints::top_holders(TOKEN)).await.unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 401, .. }));
        let message = err.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("bad key"));
    }

    #[tokio::test]
    async fn test_get_plain_text_error_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", endpoints::portfolio(TOKEN).as_str())
            .with_status(503)
            .with_body("service unavailable")
            .create_async()
            .await;

        let client = client_for(server.url());
        let err = client.get(&endpoints::portfolio(TOKEN)).await.unwrap_err();

        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("service unavailable"));
    }

    #[tokio::test]
    async fn test_get_empty_error_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", endpoints::avg_entry(TOKEN).as_str())
            .with_status(500)
            .create_async()
            .await;

        let client = client_for(server.url());
        let err = client.get(&endpoints::avg_entry(TOKEN)).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "API request failed with status 500: Unknown error"
        );
    }

    #[tokio::test]
    async fn test_get_invalid_json_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", endpoints::token_info(TOKEN).as_str())
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = client_for(server.url());
        let err = client.get(&endpoints::token_info(TOKEN)).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidBody(_)));
    }

    #[tokio::test]
    async fn test_get_times_out_when_upstream_never_responds() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Accept connections and hold them open without ever answering
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let client = client_for(format!("http://{addr}"))
            .with_timeout(Duration::from_millis(200));
        let err = client.get(&endpoints::token_info(TOKEN)).await.unwrap_err();

        assert!(err.is_timeout());
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_get_connection_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{addr}"));
        let err = client.get(&endpoints::token_info(TOKEN)).await.unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
        assert!(!err.is_timeout());
    }
}
