//! Slip verification HTTP client implementation.

use std::path::Path;

use bytes::Bytes;
use reqwest::{Client as HttpClient, Proxy};
use tracing::debug;
use url::Url;

use super::SlipConfig;
use crate::error::{Error, Result};
use crate::form::SlipSource;
use crate::response::VerifyResponse;
use crate::retry::RetryPolicy;
use crate::{CLIENT_TARGET, VERIFY_TARGET};

/// HTTP client for the slip verification API.
///
/// The client holds its configuration and connection pool and is cheap to
/// clone. It keeps no mutable state between calls, so concurrent
/// verifications are safe without locking.
///
/// # Examples
///
/// ```ignore
/// use slipok_client::{SlipClient, SlipConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), slipok_client::Error> {
///     let client = SlipClient::new(SlipConfig::new("my-api-key"))?;
///
///     let result = client.verify_by_file("slips/transfer.jpg").await?;
///     println!("verified: {}", result.success);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SlipClient {
    /// HTTP client
    http_client: HttpClient,

    /// Configuration
    config: SlipConfig,

    /// Retry behavior derived from the configuration
    policy: RetryPolicy,
}

impl SlipClient {
    /// Create a new verification client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the proxy descriptor is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: SlipConfig) -> Result<Self> {
        let mut client_builder = HttpClient::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent());

        if let Some(proxy_config) = config.proxy() {
            let mut proxy = Proxy::all(proxy_config.url())
                .map_err(|e| Error::config(format!("invalid proxy '{}': {e}", proxy_config.url())))?;

            if let Some(auth) = proxy_config.auth() {
                proxy = proxy.basic_auth(&auth.username, &auth.password);
            }

            client_builder = client_builder.proxy(proxy);
        }

        let http_client = client_builder
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        debug!(
            target: CLIENT_TARGET,
            base_url = %config.base_url(),
            timeout = ?config.timeout(),
            max_retries = config.max_retries(),
            "Slip verification client initialized"
        );

        let policy = RetryPolicy::new(config.max_retries(), config.retry_backoff());

        Ok(Self {
            http_client,
            config,
            policy,
        })
    }

    /// Get a reference to the client configuration.
    pub fn config(&self) -> &SlipConfig {
        &self.config
    }

    /// Verify a slip image stored on disk.
    ///
    /// The file is streamed lazily; an unreadable path surfaces as a
    /// transport failure when the request is sent.
    pub async fn verify_by_file(&self, path: impl AsRef<Path>) -> Result<VerifyResponse> {
        self.verify(SlipSource::file(path.as_ref())).await
    }

    /// Verify a slip image already held in memory.
    ///
    /// The buffer is uploaded as `slip.jpg` with content type `image/jpeg`.
    pub async fn verify_by_bytes(&self, bytes: impl Into<Bytes>) -> Result<VerifyResponse> {
        self.verify(SlipSource::bytes(bytes.into())).await
    }

    /// Verify a slip image by its URL.
    ///
    /// The URL is submitted as a plain form field; the provider fetches the
    /// image itself.
    pub async fn verify_by_url(&self, image_url: impl Into<String>) -> Result<VerifyResponse> {
        self.verify(SlipSource::image_url(image_url)).await
    }

    /// Verify a slip from any [`SlipSource`].
    ///
    /// All verification operations share this dispatch path: one POST per
    /// attempt, retried with exponential backoff while the failure stays
    /// retryable (HTTP 429 or 5xx).
    pub async fn verify(&self, source: SlipSource) -> Result<VerifyResponse> {
        let endpoint = self.verify_endpoint()?;

        debug!(
            target: VERIFY_TARGET,
            base_url = %self.config.base_url(),
            source = source_kind(&source),
            "Submitting slip for verification"
        );

        let endpoint_ref = &endpoint;
        let source_ref = &source;

        self.policy
            .run(|| async move { self.send_once(endpoint_ref, source_ref).await })
            .await
    }

    /// Resolve the full verification endpoint: `{base_url}{verify_path}/{api_key}`.
    fn verify_endpoint(&self) -> Result<Url> {
        let path = format!("{}/{}", self.config.verify_path(), self.config.api_key());

        self.config
            .base_url()
            .join(&path)
            .map_err(|e| Error::config(format!("invalid verification endpoint '{path}': {e}")))
    }

    /// Issue a single POST attempt.
    async fn send_once(&self, endpoint: &Url, source: &SlipSource) -> Result<VerifyResponse> {
        let form = source.to_form(self.config.file_field(), self.config.url_field())?;

        let response = self
            .http_client
            .post(endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::transport(endpoint.as_str(), e))?;

        let status = response.status();

        debug!(
            target: VERIFY_TARGET,
            status = status.as_u16(),
            "Received verification response"
        );

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| Error::transport(endpoint.as_str(), e))?;

            serde_json::from_str(&body).map_err(|e| {
                Error::invalid_response(
                    format!("failed to decode verification response: {e}"),
                    Some(body),
                )
            })
        } else {
            let body = response.text().await.ok().filter(|b| !b.is_empty());
            Err(Error::api(status.as_u16(), endpoint.as_str(), body))
        }
    }
}

fn source_kind(source: &SlipSource) -> &'static str {
    match source {
        SlipSource::File(_) => "file",
        SlipSource::Bytes(_) => "bytes",
        SlipSource::ImageUrl(_) => "image_url",
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;

    const VERIFY_ROUTE: &str = "/api/line/apikey/{key}";

    async fn spawn_provider(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        addr
    }

    fn test_client(addr: SocketAddr, max_retries: u32) -> SlipClient {
        let config = SlipConfig::new("test-key")
            .with_base_url(format!("http://{addr}"))
            .unwrap()
            .with_max_retries(max_retries)
            .with_retry_backoff(Duration::from_millis(1));

        SlipClient::new(config).unwrap()
    }

    #[test]
    fn test_verify_endpoint_construction() {
        let client = SlipClient::new(SlipConfig::new("abc123")).unwrap();
        assert_eq!(
            client.verify_endpoint().unwrap().as_str(),
            "https://api.slipok.com/api/line/apikey/abc123"
        );
    }

    #[tokio::test]
    async fn test_verify_by_file_first_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let handler_calls = calls.clone();

        let router = Router::new().route(
            VERIFY_ROUTE,
            post(move || {
                let calls = handler_calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "success": true, "data": { "amount": 100 } }))
                }
            }),
        );
        let addr = spawn_provider(router).await;

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"\xFF\xD8fake-jpeg-bytes").unwrap();

        let client = test_client(addr, 2);
        let response = client.verify_by_file(file.path()).await.unwrap();

        assert!(response.success);
        assert_eq!(response.data, Some(json!({ "amount": 100 })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_verify_by_url_retries_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let handler_calls = calls.clone();

        let router = Router::new().route(
            VERIFY_ROUTE,
            post(move || {
                let calls = handler_calls.clone();
                async move {
                    let attempt = calls.fetch_add(1, Ordering::SeqCst);
                    if attempt < 3 {
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(json!({ "success": false })),
                        )
                            .into_response()
                    } else {
                        Json(json!({ "success": true })).into_response()
                    }
                }
            }),
        );
        let addr = spawn_provider(router).await;

        let client = test_client(addr, 3);
        let response = client
            .verify_by_url("https://example.com/slip.png")
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_auth_failure_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let handler_calls = calls.clone();

        let router = Router::new().route(
            VERIFY_ROUTE,
            post(move || {
                let calls = handler_calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::UNAUTHORIZED, Json(json!({ "success": false })))
                }
            }),
        );
        let addr = spawn_provider(router).await;

        let client = test_client(addr, 3);
        let err = client
            .verify_by_url("https://example.com/slip.png")
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(401));
        assert_eq!(
            err.endpoint(),
            Some(format!("http://{addr}/api/line/apikey/test-key").as_str())
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_exhausts_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let handler_calls = calls.clone();

        let router = Router::new().route(
            VERIFY_ROUTE,
            post(move || {
                let calls = handler_calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::TOO_MANY_REQUESTS, "slow down")
                }
            }),
        );
        let addr = spawn_provider(router).await;

        let client = test_client(addr, 2);
        let err = client.verify_by_bytes(vec![1u8, 2, 3]).await.unwrap_err();

        assert_eq!(err.status_code(), Some(429));
        assert_eq!(err.body(), Some("slow down"));
        // retries + 1 total attempts
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_verify_by_bytes_success() {
        let router = Router::new().route(
            VERIFY_ROUTE,
            post(|| async {
                Json(json!({
                    "success": true,
                    "code": "1000",
                    "requestId": "req-9"
                }))
            }),
        );
        let addr = spawn_provider(router).await;

        let client = test_client(addr, 0);
        let response = client.verify_by_bytes(vec![0xFFu8, 0xD8]).await.unwrap();

        assert!(response.success);
        assert_eq!(response.code.as_deref(), Some("1000"));
        assert_eq!(response.request_id.as_deref(), Some("req-9"));
    }

    #[tokio::test]
    async fn test_missing_file_fails_at_send_time() {
        let router = Router::new().route(
            VERIFY_ROUTE,
            post(|| async { Json(json!({ "success": true })) }),
        );
        let addr = spawn_provider(router).await;

        let client = test_client(addr, 2);
        let err = client
            .verify_by_file("/nonexistent/slip.jpg")
            .await
            .unwrap_err();

        // Transport failure with no HTTP status, not retried
        assert!(matches!(err, Error::Transport { .. }));
        assert_eq!(err.status_code(), None);
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        let router = Router::new().route(VERIFY_ROUTE, post(|| async { "not json" }));
        let addr = spawn_provider(router).await;

        let client = test_client(addr, 0);
        let err = client
            .verify_by_url("https://example.com/slip.png")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidResponse { .. }));
        assert_eq!(err.body(), Some("not json"));
    }
}
