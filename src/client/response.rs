//! HTTP response types for the storefront API client.
//!
//! This module provides the [`ApiResponse`] type for accessing parsed
//! response data, including the WordPress pagination headers the listing
//! endpoints rely on.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::client::error::{ApiError, ErrorKind};

/// Header carrying the total number of items across all pages.
pub const HEADER_TOTAL: &str = "x-wp-total";
/// Header carrying the total number of pages.
pub const HEADER_TOTAL_PAGES: &str = "x-wp-totalpages";

/// A parsed response from the storefront API.
///
/// The body is always parsed leniently: an empty or non-JSON body becomes an
/// empty JSON object rather than a parse failure, so status classification
/// never depends on body shape.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use serde_json::json;
/// use woo_storefront::client::ApiResponse;
///
/// let mut headers = HashMap::new();
/// headers.insert("x-wp-total".to_string(), "57".to_string());
/// headers.insert("x-wp-totalpages".to_string(), "5".to_string());
///
/// let response = ApiResponse::new(200, headers, json!([]));
/// assert_eq!(response.total_items(), 57);
/// assert_eq!(response.total_pages(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct ApiResponse {
    /// The HTTP status code.
    pub status: u16,
    /// Response headers with lowercased names.
    pub headers: HashMap<String, String>,
    /// The parsed JSON body.
    pub body: serde_json::Value,
}

impl ApiResponse {
    /// Creates a new response.
    #[must_use]
    pub const fn new(
        status: u16,
        headers: HashMap<String, String>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns a header value by (case-insensitive) name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Returns the total item count from `x-wp-total`, defaulting to 0 when
    /// the header is absent or unparseable.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.header(HEADER_TOTAL)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Returns the total page count from `x-wp-totalpages`, defaulting to 1
    /// when the header is absent or unparseable.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.header(HEADER_TOTAL_PAGES)
            .and_then(|v| v.parse().ok())
            .unwrap_or(1)
    }

    /// Deserializes the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns a [`Parse`](ErrorKind::Parse)-kind [`ApiError`] carrying the
    /// deserializer message and raw body in context when the body does not
    /// match the expected shape.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(self.body.clone()).map_err(|e| {
            ApiError::new(
                ErrorKind::Parse,
                "The server returned data in an unexpected format",
                self.status,
            )
            .with_context("parse_error", json!(e.to_string()))
            .with_context("body", self.body.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response_with(headers: &[(&str, &str)], body: serde_json::Value) -> ApiResponse {
        let headers = headers
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ApiResponse::new(200, headers, body)
    }

    #[test]
    fn test_pagination_headers_parsed() {
        let response = response_with(&[("x-wp-total", "120"), ("x-wp-totalpages", "10")], json!([]));
        assert_eq!(response.total_items(), 120);
        assert_eq!(response.total_pages(), 10);
    }

    #[test]
    fn test_pagination_headers_default_when_absent() {
        let response = response_with(&[], json!([]));
        assert_eq!(response.total_items(), 0);
        assert_eq!(response.total_pages(), 1);
    }

    #[test]
    fn test_pagination_headers_default_when_unparseable() {
        let response = response_with(
            &[("x-wp-total", "many"), ("x-wp-totalpages", "")],
            json!([]),
        );
        assert_eq!(response.total_items(), 0);
        assert_eq!(response.total_pages(), 1);
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = response_with(&[("x-wp-total", "3")], json!([]));
        assert_eq!(response.header("X-WP-Total"), Some("3"));
    }

    #[test]
    fn test_json_extracts_typed_value() {
        #[derive(serde::Deserialize)]
        struct Item {
            id: u64,
        }
        let response = response_with(&[], json!({"id": 7}));
        let item: Item = response.json().unwrap();
        assert_eq!(item.id, 7);
    }

    #[test]
    fn test_json_maps_shape_mismatch_to_parse_error() {
        #[derive(Debug, serde::Deserialize)]
        struct Item {
            #[allow(dead_code)]
            id: u64,
        }
        let response = response_with(&[], json!({"id": "not a number"}));
        let error = response.json::<Item>().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Parse);
        assert!(!error.is_retryable());
        assert!(error.context().contains_key("parse_error"));
    }
}
