//! HTTP client types for storefront API communication.
//!
//! This module provides the foundational transport layer: a classified error
//! type, request/response wrappers, and the [`HttpClient`] adapter that
//! translates every failure mode into the closed error taxonomy before it
//! reaches a resource client.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ApiError`] / [`ErrorKind`]: the single classified failure type
//! - [`ErrorPresentation`]: the per-kind user-facing display contract
//! - [`ApiRequest`] / [`HttpMethod`]: a request to be sent to the API
//! - [`ApiResponse`]: a parsed response with WordPress pagination helpers
//! - [`HttpClient`]: the async transport adapter
//!
//! # Example
//!
//! ```rust,ignore
//! use woo_storefront::{StoreConfig, BaseUrl};
//! use woo_storefront::client::{ApiRequest, HttpClient, HttpMethod};
//!
//! let config = StoreConfig::builder()
//!     .base_url(BaseUrl::new("https://shop.example.com")?)
//!     .build()?;
//! let client = HttpClient::new(&config);
//!
//! let request = ApiRequest::builder(HttpMethod::Get, "/wp-json/wc/v3/products")
//!     .query_param("per_page", "12")
//!     .build()?;
//! let response = client.send(request).await?;
//! ```

mod error;
mod http;
mod request;
mod response;

pub use error::{default_status_message, ApiError, ErrorKind, ErrorPresentation};
pub use http::{HttpClient, CLIENT_VERSION};
pub use request::{ApiRequest, ApiRequestBuilder, HttpMethod};
pub use response::{ApiResponse, HEADER_TOTAL, HEADER_TOTAL_PAGES};
