//! Configuration types for the storefront API client.
//!
//! This module provides the core configuration types used to initialize
//! the client for API communication with a WooCommerce store.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`StoreConfig`]: The main configuration struct holding all client settings
//! - [`StoreConfigBuilder`]: A builder for constructing [`StoreConfig`] instances
//! - [`Credentials`]: A consumer key/secret pair
//! - [`BaseUrl`]: A validated API base URL
//! - [`ConsumerKey`]: A validated consumer key newtype
//! - [`ConsumerSecret`]: A validated consumer secret newtype with masked debug output
//!
//! Credentials are optional: the storefront endpoints work without them, so
//! their absence is a warning rather than a configuration failure.
//!
//! # Example
//!
//! ```rust
//! use woo_storefront::{StoreConfig, BaseUrl, ConsumerKey, ConsumerSecret};
//!
//! let config = StoreConfig::builder()
//!     .base_url(BaseUrl::new("https://shop.example.com").unwrap())
//!     .credentials(
//!         ConsumerKey::new("ck_key").unwrap(),
//!         ConsumerSecret::new("cs_secret").unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert!(config.credentials().is_some());
//! ```

mod newtypes;

pub use newtypes::{BaseUrl, ConsumerKey, ConsumerSecret};

use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable holding the API base URL.
pub const ENV_API_URL: &str = "WOO_API_URL";
/// Environment variable holding the consumer key.
pub const ENV_CONSUMER_KEY: &str = "WOO_CONSUMER_KEY";
/// Environment variable holding the consumer secret.
pub const ENV_CONSUMER_SECRET: &str = "WOO_CONSUMER_SECRET";

/// Default per-request timeout.
///
/// Requests exceeding this are classified as timeout failures, not network
/// failures.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A WooCommerce consumer key/secret pair.
///
/// Appended to every outgoing request as `consumer_key` / `consumer_secret`
/// query parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    /// The consumer key.
    pub consumer_key: ConsumerKey,
    /// The consumer secret.
    pub consumer_secret: ConsumerSecret,
}

/// Configuration for the storefront API client.
///
/// This struct holds all configuration needed for client operations,
/// including the store base URL, optional API credentials, and the request
/// timeout.
///
/// # Thread Safety
///
/// `StoreConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use woo_storefront::{StoreConfig, BaseUrl};
///
/// let config = StoreConfig::builder()
///     .base_url(BaseUrl::new("https://shop.example.com").unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(config.base_url().as_ref(), "https://shop.example.com");
/// ```
#[derive(Clone, Debug)]
pub struct StoreConfig {
    base_url: BaseUrl,
    credentials: Option<Credentials>,
    timeout: Duration,
    user_agent_prefix: Option<String>,
}

impl StoreConfig {
    /// Creates a new builder for constructing a `StoreConfig`.
    #[must_use]
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::new()
    }

    /// Loads configuration from environment variables.
    ///
    /// Reads `WOO_API_URL`, `WOO_CONSUMER_KEY`, and `WOO_CONSUMER_SECRET`.
    /// Missing credentials are tolerated with a warning; a missing or
    /// invalid URL is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `WOO_API_URL` is not
    /// set, or [`ConfigError::InvalidBaseUrl`] if it is not a valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var(ENV_API_URL)
            .map_err(|_| ConfigError::MissingRequiredField { field: "base_url" })?;
        let mut builder = Self::builder().base_url(BaseUrl::new(url)?);

        let key = std::env::var(ENV_CONSUMER_KEY).ok();
        let secret = std::env::var(ENV_CONSUMER_SECRET).ok();
        if let (Some(key), Some(secret)) = (key, secret) {
            builder = builder.credentials(ConsumerKey::new(key)?, ConsumerSecret::new(secret)?);
        }

        builder.build()
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the API credentials, if configured.
    #[must_use]
    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the configured User-Agent prefix, if any.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

/// Builder for constructing [`StoreConfig`] instances.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use woo_storefront::{StoreConfig, BaseUrl};
///
/// let config = StoreConfig::builder()
///     .base_url(BaseUrl::new("https://shop.example.com").unwrap())
///     .timeout(Duration::from_secs(5))
///     .user_agent_prefix("MyApp/1.0")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct StoreConfigBuilder {
    base_url: Option<BaseUrl>,
    credentials: Option<Credentials>,
    timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl StoreConfigBuilder {
    /// Creates a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API base URL (required).
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the API credentials.
    #[must_use]
    pub fn credentials(mut self, consumer_key: ConsumerKey, consumer_secret: ConsumerSecret) -> Self {
        self.credentials = Some(Credentials {
            consumer_key,
            consumer_secret,
        });
        self
    }

    /// Sets the per-request timeout (default: 10 seconds).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets a prefix for the User-Agent header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the configuration.
    ///
    /// Logs a warning when no credentials are configured; authenticated
    /// endpoints may reject requests, but that is not a startup failure.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if no base URL was set.
    pub fn build(self) -> Result<StoreConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        if self.credentials.is_none() {
            tracing::warn!(
                "WooCommerce API credentials not configured; authenticated endpoints may not work"
            );
        }

        Ok(StoreConfig {
            base_url,
            credentials: self.credentials,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
