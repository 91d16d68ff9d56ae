//! Integration tests for the storefront facade's caching behavior.
//!
//! These tests verify retry exhaustion, cache hits, invalidation, and
//! optimistic cart rollback against a mock server, using millisecond
//! retry delays so failures resolve quickly.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use woo_storefront::resources::products::ProductFilters;
use woo_storefront::resources::CacheStatus;
use woo_storefront::{
    BaseUrl, CachePolicy, ErrorKind, RetryPolicy, StoreConfig, Storefront, StorefrontPolicies,
};

fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(
        max_retries,
        1,
        Duration::from_millis(1),
        Duration::from_millis(4),
    )
}

fn fast_policies() -> StorefrontPolicies {
    let cache = |retry| CachePolicy {
        stale_after: Duration::from_secs(300),
        retain_for: Duration::from_secs(600),
        retry,
    };
    StorefrontPolicies {
        products: cache(fast_retry(3)),
        categories: cache(fast_retry(3)),
        cart: cache(fast_retry(3)),
        mutations: fast_retry(1),
    }
}

fn store_for(server: &MockServer) -> Storefront {
    let config = StoreConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    Storefront::with_policies(&config, fast_policies())
}

fn listing_body() -> serde_json::Value {
    serde_json::json!([{
        "id": 1,
        "name": "Mug",
        "slug": "mug",
        "price": "10.00",
        "images": [{"id": 10, "src": "https://cdn.example.com/mug.jpg"}],
    }])
}

fn cart_body(quantity: u32) -> serde_json::Value {
    serde_json::json!({
        "items": [{"key": "abc", "id": 1, "name": "Mug", "quantity": quantity}],
        "items_count": quantity,
    })
}

#[tokio::test]
async fn test_server_errors_retry_until_policy_exhausted() {
    let server = MockServer::start().await;
    // max_retries 3 means 1 initial try + 3 retries.
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let error = store.products(&ProductFilters::default()).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Server);
}

#[tokio::test]
async fn test_not_found_does_not_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products/9"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let error = store.product(9).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ProductNotFound);
}

#[tokio::test]
async fn test_second_read_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-wp-total", "1")
                .insert_header("x-wp-totalpages", "1")
                .set_body_json(listing_body()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let first = store.products(&ProductFilters::default()).await.unwrap();
    let second = store.products(&ProductFilters::default()).await.unwrap();
    assert_eq!(first.items, second.items);
    assert_eq!(first.meta.cache_status, CacheStatus::Miss);
    assert_eq!(second.meta.cache_status, CacheStatus::Hit);
}

#[tokio::test]
async fn test_concurrent_reads_coalesce_into_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(50))
                .insert_header("x-wp-total", "1")
                .insert_header("x-wp-totalpages", "1")
                .set_body_json(listing_body()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let (a, b) = tokio::join!(
        {
            let store = store.clone();
            async move { store.products(&ProductFilters::default()).await }
        },
        {
            let store = store.clone();
            async move { store.products(&ProductFilters::default()).await }
        },
    );
    assert_eq!(a.unwrap().items, b.unwrap().items);
}

#[tokio::test]
async fn test_foregrounding_invalidates_cached_reads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-wp-total", "1")
                .insert_header("x-wp-totalpages", "1")
                .set_body_json(listing_body()),
        )
        .expect(2)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.products(&ProductFilters::default()).await.unwrap();
    store.enter_foreground().await;
    store.products(&ProductFilters::default()).await.unwrap();
}

#[tokio::test]
async fn test_successful_mutation_updates_cached_cart() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(1)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/wp-json/wc/v3/cart/items/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(3)))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.cart().await.unwrap();

    let updated = store.update_cart_item("abc", 3).await.unwrap();
    assert_eq!(updated.items[0].quantity, 3);

    // The cached cart reflects the committed state; no extra GET.
    let cached = store.cart().await.unwrap();
    assert_eq!(cached.items[0].quantity, 3);
}

#[tokio::test]
async fn test_failed_mutation_rolls_back_cached_cart() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(1)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/wp-json/wc/v3/cart/items/abc"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"message": "Not enough stock"})),
        )
        .mount(&server)
        .await;

    let store = store_for(&server);
    let before = store.cart().await.unwrap();

    let error = store.update_cart_item("abc", 99).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::OutOfStock);

    // Rollback restored the exact pre-mutation cart; served from cache.
    let after = store.cart().await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_result_arriving_after_backgrounding_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products/7"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(100))
                .set_body_json(serde_json::json!({
                    "id": 7, "name": "Mug", "slug": "mug", "price": "10.00",
                })),
        )
        .expect(2)
        .mount(&server)
        .await;

    let store = store_for(&server);

    // Background the store while the first fetch is still in flight.
    let reader = {
        let store = store.clone();
        tokio::spawn(async move { store.product(7).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    store.enter_background();
    reader.await.unwrap().unwrap();

    // The late result was discarded, so the next read hits the network.
    store.product(7).await.unwrap();
}
