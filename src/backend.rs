//! HTTP client for the image-generation backend.
//!
//! This module provides:
//!
//! - `BackendClient`: HTTP client wrapper around the backend's three endpoints
//! - `GeneratedImage`: deserialized response of a successful image generation
//! - `BackendError`: normalized error taxonomy with user-facing messages
//!
//! The backend is an opaque collaborator reached over HTTP:
//!
//! - `GET /health`: availability probe, answered with any 2xx status
//! - `POST /generate-image`: returns an image URL plus an enhanced prompt
//! - `POST /generate-negative-prompt`: returns a suggested negative prompt
//!
//! Every call is a single attempt; retrying is left to the user.

use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Base URL used when neither the environment nor the config provides one
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Timeout for the availability probe
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// User agent for backend requests
const USER_AGENT: &str = concat!("Atelier/", env!("CARGO_PKG_VERSION"));

/// A successfully generated image
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedImage {
    /// URL of the rendered image; may be server-relative (`/static/images/...`)
    pub image_url: String,
    /// The backend's elaboration of the original prompt
    pub enhanced_prompt: String,
}

#[derive(Debug, Deserialize)]
struct NegativePromptBody {
    negative_prompt: String,
}

/// Error body shape used by the backend for rejected requests
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Normalized failure modes of a backend call.
///
/// The `Display` strings are shown to the user verbatim, so they name the
/// likely remedy rather than the transport detail.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection refused, DNS failure, timeout - the server never answered
    #[error("Could not connect to the backend server. Please make sure it's running.")]
    Unreachable,

    /// Non-2xx status with a parseable `detail` field in the body
    #[error("{0}")]
    Rejected(String),

    /// Non-2xx status without a usable error body
    #[error("Server error: {code} {reason}")]
    Status { code: u16, reason: String },

    /// 2xx status but the content-type is not JSON (misconfigured backend,
    /// e.g. a proxy answering with an HTML error page)
    #[error("Server returned non-JSON response. Please check if the backend is running correctly.")]
    NotJson,

    /// 2xx status with a JSON content-type but an unparseable body
    #[error("Received invalid response from server. Please check backend logs.")]
    MalformedBody,
}

/// Client for the image-generation backend
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    health_timeout: Duration,
}

impl BackendClient {
    /// Create a new client against the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            client,
            base_url,
            health_timeout: HEALTH_TIMEOUT,
        })
    }

    #[cfg(test)]
    fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    /// The configured base URL (no trailing slash)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe `GET /health`. Any 2xx answer within the timeout counts as
    /// online; everything else (error status, timeout, refused connection)
    /// counts as offline.
    pub async fn check_health(&self) -> bool {
        let url = format!("{}/health", self.base_url);

        match self
            .client
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(response) => {
                let online = response.status().is_success();
                if !online {
                    tracing::warn!("Health check answered with {}", response.status());
                }
                online
            }
            Err(e) => {
                tracing::warn!("Health check failed: {}", e);
                false
            }
        }
    }

    /// Request an image for the given prompt.
    ///
    /// `negative_prompt` may be empty; the backend treats it as optional.
    pub async fn generate_image(
        &self,
        prompt: &str,
        negative_prompt: &str,
    ) -> Result<GeneratedImage, BackendError> {
        self.post_json(
            "/generate-image",
            serde_json::json!({
                "prompt": prompt,
                "negative_prompt": negative_prompt,
            }),
        )
        .await
    }

    /// Ask the backend to suggest a negative prompt for the given prompt
    pub async fn generate_negative_prompt(&self, prompt: &str) -> Result<String, BackendError> {
        let body: NegativePromptBody = self
            .post_json(
                "/generate-negative-prompt",
                serde_json::json!({ "prompt": prompt }),
            )
            .await?;

        Ok(body.negative_prompt)
    }

    /// Resolve an image URL from a generation response against the base URL.
    ///
    /// The backend serves generated images from its own static mount and
    /// returns server-relative paths; absolute URLs pass through untouched.
    pub fn resolve_image_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }

    /// Download the raw bytes of a generated image
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, BackendError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::error!("Image download failed: {}", e);
            BackendError::Unreachable
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown Error").to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|_| BackendError::MalformedBody)?;
        Ok(bytes.to_vec())
    }

    /// POST a JSON body and normalize the response into the error taxonomy
    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {}", url);

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            tracing::error!("Request to {} failed: {}", url, e);
            BackendError::Unreachable
        })?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown Error").to_string();
            // Prefer the backend's own explanation when the body carries one
            return Err(match response.json::<ErrorBody>().await {
                Ok(err) => BackendError::Rejected(err.detail),
                Err(_) => BackendError::Status {
                    code: status.as_u16(),
                    reason,
                },
            });
        }

        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);

        if !is_json {
            return Err(BackendError::NotJson);
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse backend response: {}", e);
            BackendError::MalformedBody
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Spawn a one-shot server that answers any request with a canned
    /// HTTP/1.1 response. Returns the base URL to reach it.
    async fn canned_server(status_line: &str, content_type: &str, body: &str) -> String {
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            content_type,
            body.len(),
            body
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = [0u8; 8192];
                let _ = stream.read(&mut buf).await;
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn error_message_comes_from_detail_field() {
        let base = canned_server(
            "500 Internal Server Error",
            "application/json",
            r#"{"detail":"boom"}"#,
        )
        .await;

        let client = BackendClient::new(base).unwrap();
        let err = client.generate_image("a fox", "").await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn error_message_falls_back_to_status_line() {
        let base = canned_server("500 Internal Server Error", "text/plain", "exploded").await;

        let client = BackendClient::new(base).unwrap();
        let err = client.generate_negative_prompt("a fox").await.unwrap_err();
        assert_eq!(err.to_string(), "Server error: 500 Internal Server Error");
    }

    #[tokio::test]
    async fn success_status_with_wrong_content_type_is_rejected() {
        // Body content is irrelevant; the content-type alone disqualifies it
        let base = canned_server("200 OK", "text/plain", r#"{"negative_prompt":"x"}"#).await;

        let client = BackendClient::new(base).unwrap();
        let err = client.generate_negative_prompt("a fox").await.unwrap_err();
        assert!(matches!(err, BackendError::NotJson));
        assert_eq!(
            err.to_string(),
            "Server returned non-JSON response. Please check if the backend is running correctly."
        );
    }

    #[tokio::test]
    async fn unparseable_json_body_is_reported_as_invalid() {
        let base = canned_server("200 OK", "application/json", "not json at all").await;

        let client = BackendClient::new(base).unwrap();
        let err = client.generate_negative_prompt("a fox").await.unwrap_err();
        assert!(matches!(err, BackendError::MalformedBody));
        assert_eq!(
            err.to_string(),
            "Received invalid response from server. Please check backend logs."
        );
    }

    #[tokio::test]
    async fn parses_negative_prompt_response() {
        let base = canned_server(
            "200 OK",
            "application/json",
            r#"{"negative_prompt":"blurry, extra limbs"}"#,
        )
        .await;

        let client = BackendClient::new(base).unwrap();
        let negative = client.generate_negative_prompt("a fox").await.unwrap();
        assert_eq!(negative, "blurry, extra limbs");
    }

    #[tokio::test]
    async fn parses_image_generation_response() {
        let base = canned_server(
            "200 OK",
            "application/json",
            r#"{"image_url":"https://x/img.png","enhanced_prompt":"a majestic red fox..."}"#,
        )
        .await;

        let client = BackendClient::new(base).unwrap();
        let image = client.generate_image("a red fox in snow", "").await.unwrap();
        assert_eq!(image.image_url, "https://x/img.png");
        assert_eq!(image.enhanced_prompt, "a majestic red fox...");
    }

    #[tokio::test]
    async fn refused_connection_maps_to_unreachable() {
        // Bind to grab a free port, then drop the listener before connecting
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = BackendClient::new(base).unwrap();
        let err = client.generate_image("a fox", "").await.unwrap_err();
        assert!(matches!(err, BackendError::Unreachable));
        assert_eq!(
            err.to_string(),
            "Could not connect to the backend server. Please make sure it's running."
        );
    }

    #[tokio::test]
    async fn health_check_accepts_success_status() {
        let base = canned_server("200 OK", "application/json", r#"{"status":"ok"}"#).await;

        let client = BackendClient::new(base).unwrap();
        assert!(client.check_health().await);
    }

    #[tokio::test]
    async fn health_check_rejects_error_status() {
        let base = canned_server("503 Service Unavailable", "text/plain", "down").await;

        let client = BackendClient::new(base).unwrap();
        assert!(!client.check_health().await);
    }

    #[tokio::test]
    async fn health_check_times_out_on_silent_server() {
        // Accept the connection but never answer
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            if let Ok((stream, _)) = listener.accept().await {
                tokio::time::sleep(Duration::from_secs(30)).await;
                drop(stream);
            }
        });

        let client = BackendClient::new(base)
            .unwrap()
            .with_health_timeout(Duration::from_millis(100));
        assert!(!client.check_health().await);
    }

    #[test]
    fn relative_image_urls_resolve_against_base() {
        let client = BackendClient::new("http://localhost:8000/").unwrap();
        assert_eq!(
            client.resolve_image_url("/static/images/abc.png"),
            "http://localhost:8000/static/images/abc.png"
        );
        assert_eq!(
            client.resolve_image_url("static/images/abc.png"),
            "http://localhost:8000/static/images/abc.png"
        );
    }

    #[test]
    fn absolute_image_urls_pass_through() {
        let client = BackendClient::new("http://localhost:8000").unwrap();
        assert_eq!(
            client.resolve_image_url("https://cdn.example/img.png"),
            "https://cdn.example/img.png"
        );
    }
}
