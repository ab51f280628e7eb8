//! Flowlog HTTP Client
//!
//! A small, type-safe HTTP client for the log API of a workflow orchestration
//! backend.
//!
//! Every operation validates its inputs locally, sends exactly one request and
//! relays the backend response without reshaping it. Nothing is retried.
//!
//! # Example
//!
//! ```no_run
//! use flowlog_client::LogsClient;
//! use flowlog_core::domain::log::LogLevel;
//! use flowlog_core::dto::log::ExecutionLogsQuery;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LogsClient::new("http://localhost:8080/api/v1")?;
//!
//!     let logs = client
//!         .get_execution_logs(
//!             "4Rg5bSJSkZQiUqxCnl9oBe",
//!             &ExecutionLogsQuery {
//!                 min_level: Some(LogLevel::Warn),
//!                 ..Default::default()
//!             },
//!         )
//!         .await?;
//!
//!     println!("{logs}");
//!     Ok(())
//! }
//! ```

pub mod error;
mod logs;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use logs::LogChunkStream;

use flowlog_core::dto::log::DeleteConfirmation;
use reqwest::{Client, Url};
use serde_json::Value;

/// HTTP client for the backend log API
///
/// Cloning is cheap: the underlying `reqwest::Client` is a shared,
/// connection-pooled handle.
#[derive(Debug, Clone)]
pub struct LogsClient {
    /// Base URL every endpoint path is appended to
    base_url: Url,
    /// HTTP client instance
    client: Client,
}

impl LogsClient {
    /// Create a new logs client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the log API (e.g., "http://localhost:8080/api/v1")
    ///
    /// # Example
    /// ```
    /// use flowlog_client::LogsClient;
    ///
    /// let client = LogsClient::new("http://localhost:8080").unwrap();
    /// assert_eq!(client.base_url(), "http://localhost:8080");
    /// ```
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new logs client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the log API
    /// * `client` - A configured reqwest Client
    ///
    /// # Example
    /// ```
    /// use flowlog_client::LogsClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = LogsClient::with_client("http://localhost:8080", http_client).unwrap();
    /// ```
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let mut url = Url::parse(base_url.trim())
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        if url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(format!(
                "{} cannot carry a path",
                base_url
            )));
        }

        url.set_query(None);
        url.set_fragment(None);

        Ok(Self {
            base_url: url,
            client,
        })
    }

    /// Get the base URL of the log API, without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Build the URL of an endpoint below the base URL
    ///
    /// Each segment is percent-encoded on its own, so identifiers containing
    /// `/` or `?` stay a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Turn a non-success status into `ClientError::Http`
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Log API returned {}: {}", status, body);
            return Err(ClientError::http(status.as_u16(), body));
        }

        Ok(response)
    }

    /// Handle an API response and decode its JSON body as-is
    async fn handle_json(&self, response: reqwest::Response) -> Result<Value> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response and return its body as raw text
    async fn handle_text(&self, response: reqwest::Response) -> Result<String> {
        let response = Self::check_status(response).await?;

        Ok(response.text().await?)
    }

    /// Handle a DELETE response whose body may be empty
    ///
    /// An empty body is answered with a synthesized `{"status": "deleted"}`.
    async fn handle_delete(&self, response: reqwest::Response) -> Result<Value> {
        let response = Self::check_status(response).await?;
        let body = response.bytes().await?;

        if body.is_empty() {
            return Ok(DeleteConfirmation::deleted().into());
        }

        serde_json::from_slice(&body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Reject an empty path parameter before it turns into a malformed URL
fn require_non_empty(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ClientError::Validation(format!("{} must not be empty", name)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = LogsClient::new("http://localhost:8080").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = LogsClient::new("http://localhost:8080/api/v1/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api/v1");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = LogsClient::with_client("http://localhost:8080", http_client).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        assert!(matches!(
            LogsClient::new("not a url"),
            Err(ClientError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            LogsClient::new("mailto:ops@example.com"),
            Err(ClientError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = LogsClient::new("http://localhost:8080/api/v1/main").unwrap();
        let url = client.endpoint(&["logs", "abc123", "download"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/v1/main/logs/abc123/download"
        );
    }

    #[test]
    fn test_endpoint_on_bare_host() {
        let client = LogsClient::new("http://localhost:8080").unwrap();
        let url = client.endpoint(&["logs", "search"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/logs/search");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = LogsClient::new("http://localhost:8080/").unwrap();
        let url = client.endpoint(&["logs", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/logs/a%2Fb%20c");
    }

    #[test]
    fn test_base_url_drops_query() {
        let client = LogsClient::new("http://localhost:8080/api?x=1#frag").unwrap();
        let url = client.endpoint(&["logs", "search"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/logs/search");
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("execution_id", "abc").is_ok());
        let err = require_non_empty("execution_id", "").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("execution_id must not be empty"));
    }
}
