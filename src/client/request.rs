//! HTTP request types for the storefront API client.
//!
//! This module provides the [`ApiRequest`] type and its builder for
//! describing requests before the transport adapter executes them.

use std::fmt;

use serde_json::json;

use crate::client::error::{ApiError, ErrorKind};

/// HTTP methods used by the storefront API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// An HTTP request to be sent to the storefront API.
///
/// Use [`ApiRequest::builder`] to construct requests with the builder
/// pattern. Bodies are always JSON.
///
/// # Example
///
/// ```rust
/// use woo_storefront::client::{ApiRequest, HttpMethod};
/// use serde_json::json;
///
/// let get = ApiRequest::builder(HttpMethod::Get, "/wp-json/wc/v3/products")
///     .query_param("page", "2")
///     .build()
///     .unwrap();
///
/// let post = ApiRequest::builder(HttpMethod::Post, "/wp-json/wc/v3/cart/add-item")
///     .body(json!({"id": "42", "quantity": 1}))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct ApiRequest {
    /// The HTTP method for this request.
    pub method: HttpMethod,
    /// The path relative to the configured base URL.
    pub path: String,
    /// Query parameters to append to the URL.
    pub query: Vec<(String, String)>,
    /// The JSON request body, if any.
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Creates a new builder for constructing an `ApiRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> ApiRequestBuilder {
        ApiRequestBuilder {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Validates the request before it is sent.
    ///
    /// POST and PUT requests require a body; validation failures never reach
    /// the network.
    ///
    /// # Errors
    ///
    /// Returns a [`Validation`](ErrorKind::Validation)-kind [`ApiError`]
    /// naming the offending method and path in its context.
    pub fn verify(&self) -> Result<(), ApiError> {
        if matches!(self.method, HttpMethod::Post | HttpMethod::Put) && self.body.is_none() {
            return Err(ApiError::new(
                ErrorKind::Validation,
                format!("Cannot send {} request without a body", self.method),
                0,
            )
            .with_context("method", json!(self.method.to_string()))
            .with_context("endpoint", json!(self.path)));
        }
        Ok(())
    }
}

/// Builder for constructing [`ApiRequest`] instances.
#[derive(Debug)]
pub struct ApiRequestBuilder {
    method: HttpMethod,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl ApiRequestBuilder {
    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds several query parameters at once.
    #[must_use]
    pub fn query(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(params);
        self
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Builds and validates the request.
    ///
    /// # Errors
    ///
    /// Returns a [`Validation`](ErrorKind::Validation)-kind error if the
    /// request fails [`ApiRequest::verify`].
    pub fn build(self) -> Result<ApiRequest, ApiError> {
        let request = ApiRequest {
            method: self.method,
            path: self.path,
            query: self.query,
            body: self.body,
        };
        request.verify()?;
        Ok(request)
    }
}
