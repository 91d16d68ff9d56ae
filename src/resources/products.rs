//! Product entities and the products resource client.
//!
//! [`ProductsClient`] issues the `/wp-json/wc/v3/products` calls, transforms
//! raw payloads into typed entities, and applies the domain post-conditions:
//! zero results after a filtered listing is an error ([`ErrorKind::NoResourcesMatching`]),
//! not an empty success, and listings drop products without a usable image.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::{ApiError, ApiRequest, ErrorKind, HttpClient, HttpMethod};
use crate::resources::{CacheStatus, Paginated, Pagination, ResponseMeta, SortOrder};

/// Listing endpoint path.
pub const PRODUCTS_PATH: &str = "/wp-json/wc/v3/products";

/// Default page size for product listings.
pub const DEFAULT_PER_PAGE: u32 = 12;
/// Page size used by search and by-category listings.
pub const WIDE_PER_PAGE: u32 = 24;
/// Minimum length of a free-text search query.
pub const MIN_SEARCH_LENGTH: usize = 2;

/// A product image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Image id.
    pub id: u64,
    /// Image URL.
    pub src: String,
    /// Alt text; defaults to empty.
    #[serde(default)]
    pub alt: String,
}

/// A category reference embedded in a product payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    /// Category id.
    pub id: u64,
    /// Category name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

/// A product attribute (e.g., size, color) with its options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttribute {
    /// Attribute id.
    pub id: u64,
    /// Attribute name.
    pub name: String,
    /// Available options.
    #[serde(default)]
    pub options: Vec<String>,
}

/// A full product as returned by the detail endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Canonical store URL.
    #[serde(default)]
    pub permalink: String,
    /// Creation timestamp as reported by the store.
    #[serde(default)]
    pub date_created: String,
    /// Current price (monetary string).
    pub price: String,
    /// Regular price before discounts.
    #[serde(default)]
    pub regular_price: String,
    /// Sale price, when on sale.
    #[serde(default)]
    pub sale_price: String,
    /// Long description (HTML).
    #[serde(default)]
    pub description: String,
    /// Short description (HTML).
    #[serde(default)]
    pub short_description: String,
    /// Categories the product belongs to.
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
    /// Product images.
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Attributes with options.
    #[serde(default)]
    pub attributes: Vec<ProductAttribute>,
    /// Ids of the product's variations.
    #[serde(default)]
    pub variations: Vec<u64>,
}

/// A trimmed product shape for listings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Product id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Current price (monetary string).
    pub price: String,
    /// Product images.
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Categories the product belongs to.
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
}

/// A single attribute choice on a variation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationAttribute {
    /// Attribute name.
    pub name: String,
    /// Chosen option.
    pub option: String,
}

/// A product variation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductVariation {
    /// Variation id.
    pub id: u64,
    /// Variation price (monetary string).
    #[serde(default)]
    pub price: String,
    /// The attribute choices this variation represents.
    #[serde(default)]
    pub attributes: Vec<VariationAttribute>,
}

/// Sort field for product listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductOrderBy {
    /// By creation date (default).
    #[default]
    Date,
    /// Alphabetically by title.
    Title,
    /// By price.
    Price,
    /// By popularity.
    Popularity,
}

impl ProductOrderBy {
    /// Returns the query-parameter value for this field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Title => "title",
            Self::Price => "price",
            Self::Popularity => "popularity",
        }
    }
}

/// Filters for product listings.
///
/// Absent fields take the resource defaults: page 1, 12 per page,
/// descending by date.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProductFilters {
    /// Page number (1-based).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
    /// Sort direction.
    pub order: Option<SortOrder>,
    /// Sort field.
    pub order_by: Option<ProductOrderBy>,
    /// Restrict to a category.
    pub category: Option<u64>,
    /// Free-text search.
    pub search: Option<String>,
    /// Lower price bound.
    pub min_price: Option<f64>,
    /// Upper price bound.
    pub max_price: Option<f64>,
}

impl ProductFilters {
    /// Returns whether the caller supplied any narrowing filter.
    ///
    /// Pagination and ordering do not narrow the result set, so they do not
    /// count; this drives the distinction between "no products exist" and
    /// "no products matched your filters".
    #[must_use]
    pub const fn is_filtered(&self) -> bool {
        self.category.is_some()
            || self.search.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
    }

    /// Validates the filters without issuing any request.
    ///
    /// # Errors
    ///
    /// Returns a [`Validation`](ErrorKind::Validation)-kind error when
    /// `page` or `per_page` is 0.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.page == Some(0) {
            return Err(ApiError::new(
                ErrorKind::Validation,
                "Page number must be at least 1",
                400,
            )
            .with_context("page", json!(0)));
        }
        if self.per_page == Some(0) {
            return Err(ApiError::new(
                ErrorKind::Validation,
                "Page size must be greater than 0",
                400,
            )
            .with_context("per_page", json!(0)));
        }
        Ok(())
    }

    /// Returns the effective page (default 1).
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    /// Returns the effective page size (default 12).
    #[must_use]
    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }

    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page().to_string()),
            ("per_page".to_string(), self.per_page().to_string()),
            (
                "order".to_string(),
                self.order.unwrap_or_default().as_str().to_string(),
            ),
            (
                "orderby".to_string(),
                self.order_by.unwrap_or_default().as_str().to_string(),
            ),
        ];
        if let Some(category) = self.category {
            query.push(("category".to_string(), category.to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search".to_string(), search.clone()));
        }
        if let Some(min_price) = self.min_price {
            query.push(("min_price".to_string(), min_price.to_string()));
        }
        if let Some(max_price) = self.max_price {
            query.push(("max_price".to_string(), max_price.to_string()));
        }
        query
    }
}

/// Resource client for the products endpoints.
///
/// # Example
///
/// ```rust,ignore
/// use woo_storefront::resources::products::{ProductFilters, ProductsClient};
///
/// let client = ProductsClient::new(http);
/// let page = client.list(&ProductFilters::default()).await?;
/// for product in &page.items {
///     println!("{}: {}", product.id, product.name);
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ProductsClient {
    http: Arc<HttpClient>,
}

impl ProductsClient {
    /// Creates a products client over the shared transport adapter.
    #[must_use]
    pub const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Lists products with filtering and pagination.
    ///
    /// Products without at least one non-blank image URL are dropped from
    /// the listing.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::NoResourcesMatching`] when filters were supplied and
    ///   nothing matched
    /// - [`ErrorKind::NoResources`] when the unfiltered catalog is empty
    /// - [`ErrorKind::Parse`] when the payload shape is unexpected
    /// - any transport classification, with the filters merged into context
    pub async fn list(&self, filters: &ProductFilters) -> Result<Paginated<ProductSummary>, ApiError> {
        let started = Instant::now();
        filters.validate().map_err(|e| Self::listing_context(e, filters))?;

        let request = ApiRequest::builder(HttpMethod::Get, PRODUCTS_PATH)
            .query(filters.to_query())
            .build()
            .map_err(|e| Self::listing_context(e, filters))?;

        let response = self
            .http
            .send(request)
            .await
            .map_err(|e| Self::listing_context(e, filters))?;

        let total_items = response.total_items();
        let total_pages = response.total_pages();

        let raw: Vec<serde_json::Value> = response
            .json()
            .map_err(|e| Self::listing_context(e, filters))?;

        let mut items = Vec::with_capacity(raw.len());
        for value in raw.into_iter().filter(has_usable_image) {
            let summary: ProductSummary = serde_json::from_value(value.clone()).map_err(|e| {
                Self::listing_context(
                    ApiError::new(ErrorKind::Parse, "Unexpected product shape in listing", 200)
                        .with_context("parse_error", json!(e.to_string()))
                        .with_context("item", value),
                    filters,
                )
            })?;
            items.push(summary);
        }

        if items.is_empty() {
            let error = if filters.is_filtered() {
                ApiError::new(
                    ErrorKind::NoResourcesMatching,
                    "No products matched your search",
                    404,
                )
                .with_context("search", json!(filters.search))
            } else {
                ApiError::new(
                    ErrorKind::NoResources,
                    "No products are available right now",
                    404,
                )
                .with_context("total_products", json!(0))
            };
            return Err(Self::listing_context(error, filters));
        }

        Ok(Paginated {
            items,
            pagination: Pagination::new(filters.page(), filters.per_page(), total_items, total_pages),
            meta: ResponseMeta {
                processing_time: started.elapsed(),
                cache_status: CacheStatus::Miss,
            },
        })
    }

    /// Fetches a single product by id.
    ///
    /// # Errors
    ///
    /// A transport-level 404 is reclassified as
    /// [`ErrorKind::ProductNotFound`]; every error carries `product_id` in
    /// context.
    pub async fn get(&self, id: u64) -> Result<Product, ApiError> {
        let path = format!("{PRODUCTS_PATH}/{id}");
        let attach = |e: ApiError| e.with_context("product_id", json!(id));

        let request = ApiRequest::builder(HttpMethod::Get, path).build().map_err(attach)?;
        let response = self.http.send(request).await.map_err(|e| {
            let e = if e.kind() == ErrorKind::NotFound {
                e.reclassified(
                    ErrorKind::ProductNotFound,
                    "The product was not found or is no longer available",
                )
            } else {
                e
            };
            attach(e)
        })?;

        response.json().map_err(attach)
    }

    /// Fetches the variations of a product.
    ///
    /// # Errors
    ///
    /// Same classification as [`Self::get`]; context carries `product_id`.
    pub async fn variations(&self, product_id: u64) -> Result<Vec<ProductVariation>, ApiError> {
        let path = format!("{PRODUCTS_PATH}/{product_id}/variations");
        let attach = |e: ApiError| e.with_context("product_id", json!(product_id));

        let request = ApiRequest::builder(HttpMethod::Get, path).build().map_err(attach)?;
        let response = self.http.send(request).await.map_err(|e| {
            let e = if e.kind() == ErrorKind::NotFound {
                e.reclassified(
                    ErrorKind::ProductNotFound,
                    "The product was not found or is no longer available",
                )
            } else {
                e
            };
            attach(e)
        })?;

        response.json().map_err(attach)
    }

    /// Searches products by free text.
    ///
    /// A trimmed query shorter than [`MIN_SEARCH_LENGTH`] fails
    /// synchronously with a validation error and never issues a request.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::Validation`] for short queries, otherwise the same
    /// classifications as [`Self::list`], with `search_query` and `page`
    /// merged into context.
    pub async fn search(&self, query: &str, page: u32) -> Result<Paginated<ProductSummary>, ApiError> {
        let trimmed = query.trim();
        if trimmed.len() < MIN_SEARCH_LENGTH {
            return Err(ApiError::new(
                ErrorKind::Validation,
                "Search must contain at least 2 characters",
                400,
            )
            .with_context("query", json!(query))
            .with_context("min_length", json!(MIN_SEARCH_LENGTH)));
        }

        let filters = ProductFilters {
            search: Some(trimmed.to_string()),
            page: Some(page),
            per_page: Some(WIDE_PER_PAGE),
            ..ProductFilters::default()
        };
        self.list(&filters).await.map_err(|e| {
            e.with_context("search_query", json!(query))
                .with_context("page", json!(page))
        })
    }

    /// Lists the products of one category.
    ///
    /// # Errors
    ///
    /// Same classifications as [`Self::list`], with `category_id` and
    /// `page` merged into context.
    pub async fn by_category(
        &self,
        category_id: u64,
        page: u32,
    ) -> Result<Paginated<ProductSummary>, ApiError> {
        let filters = ProductFilters {
            category: Some(category_id),
            page: Some(page),
            per_page: Some(WIDE_PER_PAGE),
            ..ProductFilters::default()
        };
        self.list(&filters).await.map_err(|e| {
            e.with_context("category_id", json!(category_id))
                .with_context("page", json!(page))
        })
    }

    fn listing_context(error: ApiError, filters: &ProductFilters) -> ApiError {
        error
            .with_context("endpoint", json!(PRODUCTS_PATH))
            .with_context("filters", json!(filters))
    }
}

/// Returns whether a raw listing item has at least one non-blank image URL.
fn has_usable_image(value: &serde_json::Value) -> bool {
    value
        .get("images")
        .and_then(serde_json::Value::as_array)
        .is_some_and(|images| {
            images.iter().any(|img| {
                img.get("src")
                    .and_then(serde_json::Value::as_str)
                    .is_some_and(|src| !src.trim().is_empty())
            })
        })
}
