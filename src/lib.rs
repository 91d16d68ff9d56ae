//! # WooCommerce Storefront Client
//!
//! An async Rust client for WooCommerce storefronts, providing type-safe
//! configuration, a classified error taxonomy, resource clients for
//! products, categories, and the cart, plus a query cache with request
//! coalescing and retry.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`StoreConfig`] and [`StoreConfigBuilder`]
//! - Validated newtypes for the base URL and API credentials
//! - A closed error taxonomy ([`ErrorKind`]) where each failure is
//!   classified once and carries a presentation hint and context bag
//! - Resource clients for products, categories, and the cart under
//!   [`resources`]
//! - Exponential-backoff retry via [`RetryPolicy`], with per-use presets
//! - A TTL query cache with coalescing and optimistic cart mutations via
//!   [`Storefront`]
//!
//! ## Quick Start
//!
//! ```rust
//! use woo_storefront::{BaseUrl, ConsumerKey, ConsumerSecret, StoreConfig};
//!
//! let config = StoreConfig::builder()
//!     .base_url(BaseUrl::new("https://shop.example.com").unwrap())
//!     .credentials(
//!         ConsumerKey::new("ck_xxx").unwrap(),
//!         ConsumerSecret::new("cs_xxx").unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Browsing the Catalog
//!
//! ```rust,ignore
//! use woo_storefront::resources::products::ProductFilters;
//! use woo_storefront::Storefront;
//!
//! let store = Storefront::new(&config);
//!
//! // Cached, paginated listing
//! let page = store.products(&ProductFilters::default()).await?;
//! println!("{} of {} products", page.items.len(), page.pagination.total_items);
//!
//! // Search fails fast on queries shorter than 2 characters
//! let results = store.search_products("mug", 1).await?;
//! ```
//!
//! ## Working with the Cart
//!
//! Cart mutations update the cached cart optimistically and roll it back
//! when the server rejects the change:
//!
//! ```rust,ignore
//! let cart = store.add_to_cart(42, 2, None).await?;
//! let cart = store.update_cart_item(&cart.items[0].key, 3).await?;
//!
//! match store.apply_coupon("SUMMER") .await {
//!     Ok(cart) => println!("new total: {}", cart.totals.total),
//!     Err(e) => {
//!         // Every error maps to user-facing presentation copy
//!         let p = e.presentation();
//!         eprintln!("{}: {}", p.title, p.message);
//!     }
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Classified once**: Every failure gets exactly one [`ErrorKind`],
//!   assigned at the earliest layer that can decide it
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio async runtime

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod resources;
pub mod retry;
pub mod storage;
pub mod storefront;

// Re-export public types at crate root for convenience
pub use config::{BaseUrl, ConsumerKey, ConsumerSecret, Credentials, StoreConfig, StoreConfigBuilder};
pub use error::ConfigError;

// Re-export error and transport types
pub use client::{
    ApiError, ApiRequest, ApiRequestBuilder, ApiResponse, ErrorKind, ErrorPresentation, HttpClient,
    HttpMethod,
};

// Re-export caching and retry types
pub use cache::{CachePolicy, CacheService, QueryKey};
pub use retry::RetryPolicy;

// Re-export the facade and storage helper
pub use storage::KeyValueStore;
pub use storefront::{Storefront, StorefrontPolicies};
