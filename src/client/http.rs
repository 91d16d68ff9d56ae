//! HTTP transport adapter for storefront API communication.
//!
//! This module provides the [`HttpClient`] type, which executes requests
//! against the configured store and translates every failure mode into
//! exactly one [`ApiError`](crate::ApiError) before it reaches a resource
//! client.
//!
//! # Classification order
//!
//! First match wins:
//!
//! 1. Client-side timeout fired → `Timeout`, status 0, retryable
//! 2. Connection failure or no response → `Network`, status 0, retryable
//! 3. Response received: 401/403 → `Unauthorized`; 404 → `NotFound`;
//!    429 → `RateLimited`; 500/502/503 → `Server`; any other non-2xx →
//!    `Unknown` with the message taken from the body when parseable, else a
//!    status-keyed default
//!
//! No retry or backoff logic lives here — that is the
//! [`RetryPolicy`](crate::RetryPolicy)'s job, driven by the cache layer.

use std::collections::HashMap;

use serde_json::json;

use crate::client::error::{default_status_message, ApiError, ErrorKind};
use crate::client::request::{ApiRequest, HttpMethod};
use crate::client::response::ApiResponse;
use crate::config::StoreConfig;

/// Client version from Cargo.toml.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the storefront API.
///
/// The client handles:
/// - URL construction from the configured base URL
/// - Default headers including User-Agent
/// - Credential query parameters when configured
/// - A fixed per-request timeout classified as `Timeout` when exceeded
/// - Failure classification into the closed error taxonomy
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use woo_storefront::{StoreConfig, BaseUrl};
/// use woo_storefront::client::{ApiRequest, HttpClient, HttpMethod};
///
/// let config = StoreConfig::builder()
///     .base_url(BaseUrl::new("https://shop.example.com")?)
///     .build()?;
/// let client = HttpClient::new(&config);
///
/// let request = ApiRequest::builder(HttpMethod::Get, "/wp-json/wc/v3/products").build()?;
/// let response = client.send(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client, carrying the request timeout.
    client: reqwest::Client,
    /// Base URL (e.g., `https://shop.example.com`).
    base_url: String,
    /// Credential query parameters appended to every request.
    auth_params: Vec<(String, String)>,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for the given store configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent = format!(
            "{user_agent_prefix}WooCommerce Storefront Client v{CLIENT_VERSION} | Rust {rust_version}"
        );

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let auth_params = config.credentials().map_or_else(Vec::new, |creds| {
            vec![
                (
                    "consumer_key".to_string(),
                    creds.consumer_key.as_ref().to_string(),
                ),
                (
                    "consumer_secret".to_string(),
                    creds.consumer_secret.as_ref().to_string(),
                ),
            ]
        });

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url().as_ref().to_string(),
            auth_params,
            default_headers,
        }
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns whether credentials are configured.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.auth_params.is_empty()
    }

    /// Sends a request to the storefront API.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] classified per the module-level ordering. The
    /// error context always names the endpoint; HTTP failures also carry the
    /// status and parsed body.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        request.verify()?;

        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!(method = %request.method, path = %request.path, "sending request");

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &self.default_headers {
            builder = builder.header(key, value);
        }
        builder = builder.query(&request.query);
        if !self.auth_params.is_empty() {
            builder = builder.query(&self.auth_params);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let result = builder.send().await;
        let response = match result {
            Ok(response) => response,
            Err(e) => return Err(classify_transport_failure(&e, &request.path)),
        };

        let status = response.status().as_u16();
        let headers = parse_response_headers(response.headers());
        let body_text = response.text().await.unwrap_or_default();
        let body = parse_body(&body_text);

        if (200..300).contains(&status) {
            return Ok(ApiResponse::new(status, headers, body));
        }

        Err(classify_status(status, &body, &request.path))
    }
}

/// Classifies a failure that produced no HTTP response.
///
/// A fired timeout must surface as a timeout classification, not as a
/// generic network classification, so the timeout check comes first.
fn classify_transport_failure(error: &reqwest::Error, endpoint: &str) -> ApiError {
    let (kind, message) = if error.is_timeout() {
        (
            ErrorKind::Timeout,
            "The request timed out. Please try again",
        )
    } else {
        (
            ErrorKind::Network,
            "The network is unavailable. Please check your internet connection",
        )
    };
    ApiError::new(kind, message, 0)
        .with_context("endpoint", json!(endpoint))
        .with_context("original_error", json!(error.to_string()))
}

/// Classifies a non-2xx HTTP response.
fn classify_status(status: u16, body: &serde_json::Value, endpoint: &str) -> ApiError {
    let message = body_message(body)
        .unwrap_or_else(|| default_status_message(status).to_string());

    let kind = match status {
        401 | 403 => ErrorKind::Unauthorized,
        404 => ErrorKind::NotFound,
        429 => ErrorKind::RateLimited,
        500 | 502 | 503 => ErrorKind::Server,
        _ => ErrorKind::Unknown,
    };

    ApiError::new(kind, message, status)
        .with_context("endpoint", json!(endpoint))
        .with_context("status", json!(status))
        .with_context("body", body.clone())
}

/// Extracts a human-readable message from a response body, if present.
fn body_message(body: &serde_json::Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
}

/// Parses a body leniently: empty or non-JSON bodies become an empty object.
fn parse_body(body_text: &str) -> serde_json::Value {
    if body_text.is_empty() {
        json!({})
    } else {
        serde_json::from_str(body_text).unwrap_or_else(|_| json!({ "raw_body": body_text }))
    }
}

/// Parses response headers into a lowercased single-valued map.
fn parse_response_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
    let mut result = HashMap::new();
    for (name, value) in headers {
        let key = name.as_str().to_lowercase();
        let value = value.to_str().unwrap_or_default().to_string();
        result.insert(key, value);
    }
    result
}
