//! Category entities and the categories resource client.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::{ApiError, ApiRequest, ErrorKind, HttpClient, HttpMethod};
use crate::resources::products::ProductImage;
use crate::resources::{CacheStatus, Paginated, Pagination, ResponseMeta, SortOrder};

/// Listing endpoint path.
pub const CATEGORIES_PATH: &str = "/wp-json/wc/v3/products/categories";

/// Default page size for category listings.
pub const DEFAULT_PER_PAGE: u32 = 50;

/// A product category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Parent category id; 0 for top-level.
    #[serde(default)]
    pub parent: u64,
    /// Description (HTML).
    #[serde(default)]
    pub description: String,
    /// Display type reported by the store.
    #[serde(default)]
    pub display: String,
    /// Category image, when one is set.
    #[serde(default)]
    pub image: Option<ProductImage>,
    /// Number of products in the category.
    #[serde(default)]
    pub count: u64,
}

/// Sort field for category listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryOrderBy {
    /// Alphabetically by name (default).
    #[default]
    Name,
    /// By product count.
    Count,
    /// By id.
    Id,
}

impl CategoryOrderBy {
    /// Returns the query-parameter value for this field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Count => "count",
            Self::Id => "id",
        }
    }
}

/// Filters for category listings.
///
/// Absent fields take the resource defaults: page 1, 50 per page,
/// ascending by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CategoryFilters {
    /// Page number (1-based).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
    /// Sort direction.
    pub order: Option<SortOrder>,
    /// Sort field.
    pub order_by: Option<CategoryOrderBy>,
    /// Restrict to children of one category (0 for top-level).
    pub parent: Option<u64>,
}

impl CategoryFilters {
    /// Returns whether the caller supplied any narrowing filter.
    #[must_use]
    pub const fn is_filtered(&self) -> bool {
        self.parent.is_some()
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

    /// Returns the effective page size (default 50).
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
                self.order.unwrap_or(SortOrder::Asc).as_str().to_string(),
            ),
            (
                "orderby".to_string(),
                self.order_by.unwrap_or_default().as_str().to_string(),
            ),
        ];
        if let Some(parent) = self.parent {
            query.push(("parent".to_string(), parent.to_string()));
        }
        query
    }
}

/// Resource client for the category endpoints.
#[derive(Clone, Debug)]
pub struct CategoriesClient {
    http: Arc<HttpClient>,
}

impl CategoriesClient {
    /// Creates a categories client over the shared transport adapter.
    #[must_use]
    pub const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Lists categories with filtering and pagination.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Validation`] when `page` or `per_page` is 0
    /// - [`ErrorKind::NoResourcesMatching`] when a parent filter was
    ///   supplied and nothing matched
    /// - [`ErrorKind::NoResources`] when the store has no categories
    /// - [`ErrorKind::Parse`] when the payload shape is unexpected
    /// - any transport classification, with the filters merged into context
    pub async fn list(&self, filters: &CategoryFilters) -> Result<Paginated<Category>, ApiError> {
        let started = Instant::now();
        let attach = |e: ApiError| {
            e.with_context("endpoint", json!(CATEGORIES_PATH))
                .with_context("filters", json!(filters))
        };
        filters.validate().map_err(attach)?;

        let request = ApiRequest::builder(HttpMethod::Get, CATEGORIES_PATH)
            .query(filters.to_query())
            .build()
            .map_err(attach)?;

        let response = self.http.send(request).await.map_err(attach)?;
        let total_items = response.total_items();
        let total_pages = response.total_pages();

        let items: Vec<Category> = response.json().map_err(attach)?;

        if items.is_empty() {
            let error = if filters.is_filtered() {
                ApiError::new(
                    ErrorKind::NoResourcesMatching,
                    "No categories matched your filters",
                    404,
                )
            } else {
                ApiError::new(
                    ErrorKind::NoResources,
                    "No categories are available right now",
                    404,
                )
            };
            return Err(attach(error));
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

    /// Fetches a single category by id.
    ///
    /// # Errors
    ///
    /// A transport-level 404 is reclassified as
    /// [`ErrorKind::CategoryNotFound`]; every error carries `category_id`
    /// in context.
    pub async fn get(&self, id: u64) -> Result<Category, ApiError> {
        let path = format!("{CATEGORIES_PATH}/{id}");
        let attach = |e: ApiError| e.with_context("category_id", json!(id));

        let request = ApiRequest::builder(HttpMethod::Get, path).build().map_err(attach)?;
        let response = self.http.send(request).await.map_err(|e| {
            let e = if e.kind() == ErrorKind::NotFound {
                e.reclassified(ErrorKind::CategoryNotFound, "The category was not found")
            } else {
                e
            };
            attach(e)
        })?;

        response.json().map_err(attach)
    }
}
