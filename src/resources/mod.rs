//! Resource clients and shared resource types.
//!
//! Each submodule owns one entity type: request filters, the typed entities
//! parsed from raw API payloads, and a client struct issuing the REST calls
//! through the transport adapter.
//!
//! Shared across resources:
//!
//! - [`SortOrder`]: ascending/descending sort direction
//! - [`Pagination`]: page metadata with the `has_next`/`has_prev` invariants
//! - [`Paginated<T>`]: a page of entities plus processing metadata

pub mod cart;
pub mod categories;
pub mod products;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Sort direction for listing endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order.
    Asc,
    /// Descending order.
    #[default]
    Desc,
}

impl SortOrder {
    /// Returns the query-parameter value for this order.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Pagination metadata for a listing response.
///
/// Invariants, enforced by the constructor:
/// `has_next ⟺ current_page < total_pages` and
/// `has_prev ⟺ current_page > 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// The page this result represents (1-based).
    pub current_page: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Items per page requested.
    pub items_per_page: u32,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

impl Pagination {
    /// Builds pagination metadata, deriving `has_next`/`has_prev` from the
    /// page counts.
    #[must_use]
    pub const fn new(
        current_page: u32,
        items_per_page: u32,
        total_items: u64,
        total_pages: u32,
    ) -> Self {
        Self {
            current_page,
            total_pages,
            total_items,
            items_per_page,
            has_next: current_page < total_pages,
            has_prev: current_page > 1,
        }
    }
}

/// Where a result was served from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Served from the in-memory cache.
    Hit,
    /// Fetched from the network.
    Miss,
}

/// Processing metadata attached to a listing response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Wall-clock time the operation took.
    pub processing_time: Duration,
    /// Whether the result came from cache or network.
    pub cache_status: CacheStatus,
}

/// A page of entities plus pagination and processing metadata.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use woo_storefront::resources::{CacheStatus, Paginated, Pagination, ResponseMeta};
///
/// let page = Paginated {
///     items: vec!["a", "b"],
///     pagination: Pagination::new(2, 2, 6, 3),
///     meta: ResponseMeta {
///         processing_time: Duration::from_millis(12),
///         cache_status: CacheStatus::Miss,
///     },
/// };
///
/// assert!(page.pagination.has_next);
/// assert!(page.pagination.has_prev);
/// assert_eq!(page.items.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// The entities on this page.
    pub items: Vec<T>,
    /// Pagination metadata.
    pub pagination: Pagination,
    /// Processing metadata.
    pub meta: ResponseMeta,
}
