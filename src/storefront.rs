//! The storefront facade.
//!
//! [`Storefront`] is the single entry point applications hold. It wires
//! the transport adapter, the three resource clients, and the query cache
//! together: reads go through the cache with per-resource policies, cart
//! mutations apply optimistically and roll back on failure.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{CachePolicy, CacheService, QueryKey};
use crate::client::{ApiError, ErrorKind, HttpClient};
use crate::config::StoreConfig;
use crate::resources::cart::{Cart, CartClient};
use crate::resources::categories::{CategoriesClient, Category, CategoryFilters};
use crate::resources::products::{
    Product, ProductFilters, ProductSummary, ProductVariation, ProductsClient,
};
use crate::resources::{CacheStatus, Paginated};
use crate::retry::RetryPolicy;

/// Per-resource cache and retry configuration for a [`Storefront`].
#[derive(Clone, Copy, Debug)]
pub struct StorefrontPolicies {
    /// Cache policy for product reads.
    pub products: CachePolicy,
    /// Cache policy for category reads.
    pub categories: CachePolicy,
    /// Cache policy for cart reads.
    pub cart: CachePolicy,
    /// Retry policy for cart mutations.
    pub mutations: RetryPolicy,
}

impl Default for StorefrontPolicies {
    fn default() -> Self {
        Self {
            products: CachePolicy::products(),
            categories: CachePolicy::categories(),
            cart: CachePolicy::cart(),
            mutations: RetryPolicy::mutations(),
        }
    }
}

/// High-level storefront client.
///
/// # Example
///
/// ```rust,ignore
/// use woo_storefront::{BaseUrl, ConsumerKey, ConsumerSecret, StoreConfig, Storefront};
///
/// let config = StoreConfig::builder()
///     .base_url(BaseUrl::new("https://shop.example.com")?)
///     .credentials(ConsumerKey::new("ck_xxx")?, ConsumerSecret::new("cs_xxx")?)
///     .build()?;
/// let store = Storefront::new(&config);
/// let products = store.products(&Default::default()).await?;
/// ```
#[derive(Clone, Debug)]
pub struct Storefront {
    products: ProductsClient,
    categories: CategoriesClient,
    cart: CartClient,
    cache: CacheService,
    policies: StorefrontPolicies,
}

impl Storefront {
    /// Creates a storefront with the default policies.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be created; see
    /// [`HttpClient::new`].
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self::with_policies(config, StorefrontPolicies::default())
    }

    /// Creates a storefront with custom cache and retry policies.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be created; see
    /// [`HttpClient::new`].
    #[must_use]
    pub fn with_policies(config: &StoreConfig, policies: StorefrontPolicies) -> Self {
        let http = Arc::new(HttpClient::new(config));
        Self {
            products: ProductsClient::new(Arc::clone(&http)),
            categories: CategoriesClient::new(Arc::clone(&http)),
            cart: CartClient::new(http),
            cache: CacheService::new(),
            policies,
        }
    }

    /// Returns the underlying cache, mainly for invalidation.
    #[must_use]
    pub const fn cache(&self) -> &CacheService {
        &self.cache
    }

    // --- cached reads -----------------------------------------------------

    /// Lists products, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// See [`ProductsClient::list`].
    pub async fn products(
        &self,
        filters: &ProductFilters,
    ) -> Result<Paginated<ProductSummary>, ApiError> {
        let key = QueryKey::products_list(filters);
        self.cached_page(key, self.policies.products, || self.products.list(filters))
            .await
    }

    /// Fetches one product, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// See [`ProductsClient::get`].
    pub async fn product(&self, id: u64) -> Result<Product, ApiError> {
        let key = QueryKey::product_detail(id);
        let (product, _) = self
            .cached(key, self.policies.products, || self.products.get(id))
            .await?;
        Ok(product)
    }

    /// Fetches one product's variations, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// See [`ProductsClient::variations`].
    pub async fn product_variations(&self, id: u64) -> Result<Vec<ProductVariation>, ApiError> {
        let key = QueryKey::product_variations(id);
        let (variations, _) = self
            .cached(key, self.policies.products, || self.products.variations(id))
            .await?;
        Ok(variations)
    }

    /// Searches products, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// See [`ProductsClient::search`].
    pub async fn search_products(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Paginated<ProductSummary>, ApiError> {
        let key = QueryKey::product_search(query, page);
        self.cached_page(key, self.policies.products, || {
            self.products.search(query, page)
        })
        .await
    }

    /// Lists one category's products, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// See [`ProductsClient::by_category`].
    pub async fn products_by_category(
        &self,
        category_id: u64,
        page: u32,
    ) -> Result<Paginated<ProductSummary>, ApiError> {
        let key = QueryKey::products_by_category(category_id, page);
        self.cached_page(key, self.policies.products, || {
            self.products.by_category(category_id, page)
        })
        .await
    }

    /// Lists categories, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// See [`CategoriesClient::list`].
    pub async fn categories(
        &self,
        filters: &CategoryFilters,
    ) -> Result<Paginated<Category>, ApiError> {
        let key = QueryKey::categories_list(filters);
        self.cached_page(key, self.policies.categories, || {
            self.categories.list(filters)
        })
        .await
    }

    /// Fetches one category, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// See [`CategoriesClient::get`].
    pub async fn category(&self, id: u64) -> Result<Category, ApiError> {
        let key = QueryKey::category_detail(id);
        let (category, _) = self
            .cached(key, self.policies.categories, || self.categories.get(id))
            .await?;
        Ok(category)
    }

    /// Fetches the cart, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// See [`CartClient::get`].
    pub async fn cart(&self) -> Result<Cart, ApiError> {
        let key = QueryKey::cart_current();
        let (cart, _) = self.cached(key, self.policies.cart, || self.cart.get()).await?;
        Ok(cart)
    }

    // --- cart mutations ---------------------------------------------------

    /// Adds a product to the cart.
    ///
    /// The cached cart is updated only once the server confirms; there is
    /// no line to adjust locally before the server assigns one.
    ///
    /// # Errors
    ///
    /// See [`CartClient::add_item`].
    pub async fn add_to_cart(
        &self,
        product_id: u64,
        quantity: u32,
        variation_id: Option<u64>,
    ) -> Result<Cart, ApiError> {
        self.mutate_cart(
            |cart| cart,
            || self.cart.add_item(product_id, quantity, variation_id),
        )
        .await
    }

    /// Changes a cart line's quantity, optimistically.
    ///
    /// The cached cart reflects the new quantity immediately; a quantity
    /// of 0 takes the removal path. On failure the previous cached cart is
    /// restored exactly.
    ///
    /// # Errors
    ///
    /// See [`CartClient::update_item`].
    pub async fn update_cart_item(&self, item_key: &str, quantity: u32) -> Result<Cart, ApiError> {
        if quantity == 0 {
            return self.remove_cart_item(item_key).await;
        }
        self.mutate_cart(
            |mut cart| {
                for item in &mut cart.items {
                    if item.key == item_key {
                        item.quantity = quantity;
                    }
                }
                cart
            },
            || self.cart.update_item(item_key, quantity),
        )
        .await
    }

    /// Removes a cart line, optimistically.
    ///
    /// # Errors
    ///
    /// See [`CartClient::remove_item`].
    pub async fn remove_cart_item(&self, item_key: &str) -> Result<Cart, ApiError> {
        self.mutate_cart(
            |mut cart| {
                let removed: u32 = cart
                    .items
                    .iter()
                    .filter(|item| item.key == item_key)
                    .map(|item| item.quantity)
                    .sum();
                cart.items.retain(|item| item.key != item_key);
                cart.item_count = cart.item_count.saturating_sub(removed);
                cart
            },
            || self.cart.remove_item(item_key),
        )
        .await
    }

    /// Empties the cart, optimistically.
    ///
    /// # Errors
    ///
    /// See [`CartClient::clear`].
    pub async fn clear_cart(&self) -> Result<Cart, ApiError> {
        self.mutate_cart(|_| Cart::default(), || self.cart.clear()).await
    }

    /// Applies a coupon to the cart.
    ///
    /// Totals cannot be predicted locally, so the cached cart updates only
    /// once the server responds.
    ///
    /// # Errors
    ///
    /// See [`CartClient::apply_coupon`].
    pub async fn apply_coupon(&self, code: &str) -> Result<Cart, ApiError> {
        self.mutate_cart(|cart| cart, || self.cart.apply_coupon(code)).await
    }

    // --- lifecycle --------------------------------------------------------

    /// Fences in-flight fetches so their results are not cached.
    ///
    /// Call when the application moves to the background.
    pub fn enter_background(&self) {
        self.cache.enter_background();
    }

    /// Marks all cached entries stale so the next accesses refetch.
    ///
    /// Call when the application returns to the foreground.
    pub async fn enter_foreground(&self) {
        debug!("storefront foregrounded, invalidating cached queries");
        self.cache.invalidate_all().await;
    }

    // --- internals --------------------------------------------------------

    /// Runs a read through the cache, round-tripping the typed result
    /// through JSON so one cache serves every resource shape. Returns the
    /// value along with whether it was served from cache.
    async fn cached<T, F, Fut>(
        &self,
        key: QueryKey,
        policy: CachePolicy,
        fetch: F,
    ) -> Result<(T, CacheStatus), ApiError>
    where
        T: serde::Serialize + serde::de::DeserializeOwned,
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, ApiError>>,
    {
        let (value, status) = self
            .cache
            .get_or_fetch(key, policy, || async {
                let result = fetch().await?;
                serde_json::to_value(result).map_err(|e| {
                    ApiError::new(ErrorKind::Parse, "Could not encode response for caching", 200)
                        .with_context("parse_error", serde_json::json!(e.to_string()))
                })
            })
            .await?;
        let typed = serde_json::from_value(value).map_err(|e| {
            ApiError::new(ErrorKind::Parse, "Cached value no longer matches its type", 200)
                .with_context("parse_error", serde_json::json!(e.to_string()))
        })?;
        Ok((typed, status))
    }

    /// Like [`Self::cached`] for paginated reads, stamping the cache
    /// status into the page's processing metadata.
    async fn cached_page<T, F, Fut>(
        &self,
        key: QueryKey,
        policy: CachePolicy,
        fetch: F,
    ) -> Result<Paginated<T>, ApiError>
    where
        T: serde::Serialize + serde::de::DeserializeOwned,
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<Paginated<T>, ApiError>>,
    {
        let (mut page, status) = self.cached(key, policy, fetch).await?;
        page.meta.cache_status = status;
        Ok(page)
    }

    /// Runs a cart mutation with an optimistic cache write and rollback.
    ///
    /// The cart's cache entry is locked for the whole mutation so reads
    /// coalesce behind it; the pre-mutation snapshot is restored exactly
    /// when the network call fails.
    async fn mutate_cart<A, F, Fut>(&self, apply: A, operation: F) -> Result<Cart, ApiError>
    where
        A: FnOnce(Cart) -> Cart,
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<Cart, ApiError>>,
    {
        let key = QueryKey::cart_current();
        let lock = self.cache.lock_key(&key).await;
        let _guard = lock.lock().await;

        let snapshot = self.cache.peek(&key).await;

        // Optimistic write so readers see the expected outcome immediately.
        if let Some(current) = &snapshot {
            if let Ok(cart) = serde_json::from_value::<Cart>(current.clone()) {
                if let Ok(optimistic) = serde_json::to_value(apply(cart)) {
                    self.cache.set(key.clone(), optimistic).await;
                }
            }
        }

        let result = Self::run_mutation(self.policies.mutations, &operation).await;

        match result {
            Ok(cart) => {
                match serde_json::to_value(&cart) {
                    Ok(value) => self.cache.set(key, value).await,
                    Err(_) => self.cache.remove(&key).await,
                }
                Ok(cart)
            }
            Err(error) => {
                warn!(kind = ?error.kind(), "cart mutation failed, rolling back");
                match snapshot {
                    Some(value) => self.cache.set(key, value).await,
                    None => self.cache.remove(&key).await,
                }
                Err(error)
            }
        }
    }

    /// Runs a mutation through the mutation retry policy.
    async fn run_mutation<F, Fut>(policy: RetryPolicy, operation: &F) -> Result<Cart, ApiError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<Cart, ApiError>>,
    {
        let mut failures: u32 = 0;
        loop {
            match operation().await {
                Ok(cart) => return Ok(cart),
                Err(error) => {
                    failures += 1;
                    if !policy.should_retry(failures, &error) {
                        return Err(error);
                    }
                    tokio::time::sleep(policy.delay(failures - 1)).await;
                }
            }
        }
    }
}

// Storefront is shared across tasks.
const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Storefront>();
};
