//! Exportwatch HTTP Client
//!
//! A small, type-safe HTTP client for the export service's status API.
//!
//! # Example
//!
//! ```no_run
//! use exportwatch_client::ExportClient;
//! use exportwatch_core::domain::export::ExportId;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ExportClient::new("http://localhost:8000");
//!     let export_id = ExportId::new("0b6f1a52-6f0e-4c43-9a55-2f1f0d3c9e11").unwrap();
//!
//!     let status = client.export_status(&export_id).await?;
//!     println!("finished: {}", status.is_finished());
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::{ClientError, Result};

use exportwatch_core::domain::export::{ExportId, ExportStatus};
use exportwatch_core::dto::status::StatusEnvelope;
use reqwest::Client;
use tracing::debug;

/// Path of the status endpoint, relative to the base URL
pub const STATUS_PATH: &str = "/export/status";

/// HTTP client for the export service
#[derive(Debug, Clone)]
pub struct ExportClient {
    /// Base URL of the export service (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl ExportClient {
    /// Create a new export client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the export service (e.g., "http://localhost:8000")
    ///
    /// # Example
    /// ```
    /// use exportwatch_client::ExportClient;
    ///
    /// let client = ExportClient::new("http://localhost:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new export client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use exportwatch_client::ExportClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = ExportClient::with_client("http://localhost:8000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the export service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the current status of an export job
    ///
    /// Issues `GET /export/status?export_id=<id>`. Exactly one request is
    /// sent per call; retries are the caller's business.
    pub async fn export_status(&self, export_id: &ExportId) -> Result<ExportStatus> {
        let url = format!("{}{}", self.base_url, STATUS_PATH);
        debug!("Fetching status of export {}", export_id);

        let response = self
            .client
            .get(&url)
            .query(&[("export_id", export_id.as_str())])
            .send()
            .await?;

        self.handle_status_response(response).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle a status response and unwrap its JSend envelope
    ///
    /// Non-2xx responses become [`ClientError::ApiError`], preferring the
    /// JSend `message` over the raw body when the service sent one.
    async fn handle_status_response(&self, response: reqwest::Response) -> Result<ExportStatus> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<StatusEnvelope>(&error_text)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or(error_text);
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        let envelope: StatusEnvelope = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))?;

        envelope
            .into_status()
            .map_err(|e| ClientError::from_envelope(status.as_u16(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn export_id() -> ExportId {
        ExportId::new("0b6f1a52-6f0e-4c43-9a55-2f1f0d3c9e11").unwrap()
    }

    fn status_query() -> Matcher {
        Matcher::UrlEncoded(
            "export_id".to_string(),
            "0b6f1a52-6f0e-4c43-9a55-2f1f0d3c9e11".to_string(),
        )
    }

    #[test]
    fn test_client_creation() {
        let client = ExportClient::new("http://localhost:8000");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = ExportClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = ExportClient::with_client("http://localhost:8000", http_client);
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_export_status_running() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", STATUS_PATH)
            .match_query(status_query())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"status": "success", "data": {"is_finished": false}}).to_string())
            .expect(1)
            .create_async()
            .await;

        let client = ExportClient::new(server.url());
        let status = client.export_status(&export_id()).await.unwrap();

        assert_eq!(status, ExportStatus::Running);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_export_status_finished() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", STATUS_PATH)
            .match_query(status_query())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "status": "success",
                    "data": {"is_finished": true, "success_count": 12, "failures": ["item-7"]}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ExportClient::new(server.url());
        let status = client.export_status(&export_id()).await.unwrap();

        assert_eq!(
            status,
            ExportStatus::Finished {
                success_count: 12,
                failures: vec![json!("item-7")],
            }
        );
    }

    #[tokio::test]
    async fn test_export_status_server_error_uses_jsend_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", STATUS_PATH)
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(json!({"status": "error", "message": "Invalid export_id"}).to_string())
            .create_async()
            .await;

        let client = ExportClient::new(server.url());
        let err = client.export_status(&export_id()).await.unwrap_err();

        assert!(err.is_server_error());
        assert_eq!(err.to_string(), "API error (status 500): Invalid export_id");
    }

    #[tokio::test]
    async fn test_export_status_plain_error_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", STATUS_PATH)
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let client = ExportClient::new(server.url());
        let err = client.export_status(&export_id()).await.unwrap_err();

        assert!(matches!(err, ClientError::ApiError { status: 502, ref message } if message == "Bad Gateway"));
    }

    #[tokio::test]
    async fn test_export_status_jsend_error_with_ok_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", STATUS_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"status": "fail", "message": "export_id is required"}).to_string())
            .create_async()
            .await;

        let client = ExportClient::new(server.url());
        let err = client.export_status(&export_id()).await.unwrap_err();

        assert!(matches!(err, ClientError::ApiError { status: 200, .. }));
    }

    #[tokio::test]
    async fn test_export_status_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", STATUS_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = ExportClient::new(server.url());
        let err = client.export_status(&export_id()).await.unwrap_err();

        assert!(matches!(err, ClientError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_export_status_timeout() {
        // Connections are queued by the kernel but never answered
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let http_client = Client::builder()
            .timeout(std::time::Duration::from_millis(200))
            .build()
            .unwrap();
        let client = ExportClient::with_client(format!("http://{}", addr), http_client);
        let err = client.export_status(&export_id()).await.unwrap_err();

        assert!(err.is_timeout());
        assert!(!ClientError::api_error(504, "Gateway Timeout").is_timeout());
        drop(listener);
    }

    #[tokio::test]
    async fn test_export_status_unreachable() {
        // Nothing listens on port 9 on a test machine
        let client = ExportClient::new("http://127.0.0.1:9");
        let err = client.export_status(&export_id()).await.unwrap_err();

        assert!(matches!(err, ClientError::RequestFailed(_)));
    }
}
