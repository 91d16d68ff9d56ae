//! Cache key construction.
//!
//! Keys are structured strings with a resource prefix so that whole scopes
//! can be invalidated together (`products/…`, `categories/…`, `cart`).

use std::fmt;

use crate::resources::categories::CategoryFilters;
use crate::resources::products::ProductFilters;

/// Scope prefix for product keys.
pub const SCOPE_PRODUCTS: &str = "products";
/// Scope prefix for category keys.
pub const SCOPE_CATEGORIES: &str = "categories";
/// Scope prefix for the cart key.
pub const SCOPE_CART: &str = "cart";

/// An opaque, hashable cache key.
///
/// Construct keys through the factory methods so that equivalent requests
/// always map to the same entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(String);

impl QueryKey {
    /// Key for a filtered product listing.
    #[must_use]
    pub fn products_list(filters: &ProductFilters) -> Self {
        Self(format!(
            "{SCOPE_PRODUCTS}/list?page={}&per_page={}&order={}&orderby={}&category={}&search={}&min={}&max={}",
            filters.page(),
            filters.per_page(),
            filters.order.unwrap_or_default().as_str(),
            filters.order_by.unwrap_or_default().as_str(),
            filters.category.map_or_else(String::new, |c| c.to_string()),
            filters.search.as_deref().unwrap_or(""),
            filters.min_price.map_or_else(String::new, |p| p.to_string()),
            filters.max_price.map_or_else(String::new, |p| p.to_string()),
        ))
    }

    /// Key for one product's detail.
    #[must_use]
    pub fn product_detail(id: u64) -> Self {
        Self(format!("{SCOPE_PRODUCTS}/detail/{id}"))
    }

    /// Key for one product's variations.
    #[must_use]
    pub fn product_variations(id: u64) -> Self {
        Self(format!("{SCOPE_PRODUCTS}/variations/{id}"))
    }

    /// Key for a page of search results.
    #[must_use]
    pub fn product_search(query: &str, page: u32) -> Self {
        Self(format!("{SCOPE_PRODUCTS}/search/{}/{page}", query.trim()))
    }

    /// Key for a page of one category's products.
    #[must_use]
    pub fn products_by_category(category_id: u64, page: u32) -> Self {
        Self(format!("{SCOPE_PRODUCTS}/by-category/{category_id}/{page}"))
    }

    /// Key for a filtered category listing.
    #[must_use]
    pub fn categories_list(filters: &CategoryFilters) -> Self {
        Self(format!(
            "{SCOPE_CATEGORIES}/list?page={}&per_page={}&parent={}",
            filters.page(),
            filters.per_page(),
            filters.parent.map_or_else(String::new, |p| p.to_string()),
        ))
    }

    /// Key for one category's detail.
    #[must_use]
    pub fn category_detail(id: u64) -> Self {
        Self(format!("{SCOPE_CATEGORIES}/detail/{id}"))
    }

    /// Key for the current cart.
    #[must_use]
    pub fn cart_current() -> Self {
        Self(SCOPE_CART.to_string())
    }

    /// Returns the key's scope prefix.
    #[must_use]
    pub fn scope(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }

    /// Returns the full key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
