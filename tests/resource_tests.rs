//! Integration tests for the resource clients.
//!
//! These tests verify listing transformation, zero-result classification,
//! not-found reclassification, and the cart's domain error mapping against
//! a mock server.

use std::sync::Arc;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use woo_storefront::resources::cart::CartClient;
use woo_storefront::resources::categories::{CategoriesClient, CategoryFilters};
use woo_storefront::resources::products::{ProductFilters, ProductsClient};
use woo_storefront::{BaseUrl, ErrorKind, HttpClient, StoreConfig};

fn client_for(server: &MockServer) -> Arc<HttpClient> {
    let config = StoreConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    Arc::new(HttpClient::new(&config))
}

fn product_json(id: u64, image: Option<&str>) -> serde_json::Value {
    let images = image.map_or_else(Vec::new, |src| {
        vec![serde_json::json!({"id": id * 10, "src": src})]
    });
    serde_json::json!({
        "id": id,
        "name": format!("Product {id}"),
        "slug": format!("product-{id}"),
        "price": "10.00",
        "images": images,
    })
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_list_filters_products_without_images() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-wp-total", "3")
                .insert_header("x-wp-totalpages", "1")
                .set_body_json(serde_json::json!([
                    product_json(1, Some("https://cdn.example.com/1.jpg")),
                    product_json(2, None),
                    product_json(3, Some("https://cdn.example.com/3.jpg")),
                ])),
        )
        .mount(&server)
        .await;

    let products = ProductsClient::new(client_for(&server));
    let page = products.list(&ProductFilters::default()).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert!(page.items.iter().all(|p| p.id != 2));
}

#[tokio::test]
async fn test_list_pagination_derived_from_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "12"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-wp-total", "57")
                .insert_header("x-wp-totalpages", "5")
                .set_body_json(serde_json::json!([
                    product_json(13, Some("https://cdn.example.com/13.jpg")),
                ])),
        )
        .mount(&server)
        .await;

    let products = ProductsClient::new(client_for(&server));
    let filters = ProductFilters {
        page: Some(2),
        ..ProductFilters::default()
    };
    let page = products.list(&filters).await.unwrap();

    assert_eq!(page.pagination.current_page, 2);
    assert_eq!(page.pagination.total_items, 57);
    assert_eq!(page.pagination.total_pages, 5);
    assert!(page.pagination.has_next);
    assert!(page.pagination.has_prev);
}

#[tokio::test]
async fn test_empty_unfiltered_listing_is_no_resources() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let products = ProductsClient::new(client_for(&server));
    let error = products.list(&ProductFilters::default()).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NoResources);
}

#[tokio::test]
async fn test_empty_filtered_listing_is_no_resources_matching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let products = ProductsClient::new(client_for(&server));
    let filters = ProductFilters {
        search: Some("unicorn".to_string()),
        ..ProductFilters::default()
    };
    let error = products.list(&filters).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NoResourcesMatching);
    assert!(!error.is_retryable());
}

#[tokio::test]
async fn test_product_404_reclassified_with_context() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products/999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let products = ProductsClient::new(client_for(&server));
    let error = products.get(999).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ProductNotFound);
    assert_eq!(error.http_status(), 404);
    assert_eq!(
        error.context().get("product_id"),
        Some(&serde_json::json!(999))
    );
}

#[tokio::test]
async fn test_short_search_never_hits_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let products = ProductsClient::new(client_for(&server));
    let error = products.search(" a ", 1).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);
    assert_eq!(
        error.context().get("min_length"),
        Some(&serde_json::json!(2))
    );
}

#[tokio::test]
async fn test_search_uses_wide_page_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .and(query_param("search", "mug"))
        .and(query_param("per_page", "24"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-wp-total", "1")
                .insert_header("x-wp-totalpages", "1")
                .set_body_json(serde_json::json!([
                    product_json(7, Some("https://cdn.example.com/7.jpg")),
                ])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let products = ProductsClient::new(client_for(&server));
    let page = products.search("  mug  ", 1).await.unwrap();
    assert_eq!(page.items[0].id, 7);
}

// ============================================================================
// Categories
// ============================================================================

#[tokio::test]
async fn test_categories_default_to_ascending_name_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products/categories"))
        .and(query_param("order", "asc"))
        .and(query_param("orderby", "name"))
        .and(query_param("per_page", "50"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-wp-total", "2")
                .insert_header("x-wp-totalpages", "1")
                .set_body_json(serde_json::json!([
                    {"id": 1, "name": "Accessories", "slug": "accessories", "count": 4},
                    {"id": 2, "name": "Clothing", "slug": "clothing", "count": 9},
                ])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let categories = CategoriesClient::new(client_for(&server));
    let page = categories.list(&CategoryFilters::default()).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].count, 4);
}

#[tokio::test]
async fn test_category_page_zero_never_hits_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let categories = CategoriesClient::new(client_for(&server));
    let filters = CategoryFilters {
        page: Some(0),
        ..CategoryFilters::default()
    };
    let error = categories.list(&filters).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_category_404_reclassified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products/categories/42"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let categories = CategoriesClient::new(client_for(&server));
    let error = categories.get(42).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::CategoryNotFound);
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_cart_transform_defaults_and_blank_keys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                {"key": "", "id": 5, "name": "Mug", "quantity": 2},
            ],
            "items_count": 2,
        })))
        .mount(&server)
        .await;

    let cart = CartClient::new(client_for(&server)).get().await.unwrap();
    assert_eq!(cart.items[0].key, "5");
    assert_eq!(cart.item_count, 2);
    assert_eq!(cart.totals.total, "0");
    assert_eq!(cart.items[0].totals.subtotal, "0");
}

#[tokio::test]
async fn test_add_item_zero_quantity_never_hits_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let cart = CartClient::new(client_for(&server));
    let error = cart.add_item(5, 0, None).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_add_item_stock_rejection_is_out_of_stock() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wp-json/wc/v3/cart/add-item"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"message": "Not enough stock for Mug"})),
        )
        .mount(&server)
        .await;

    let cart = CartClient::new(client_for(&server));
    let error = cart.add_item(5, 3, None).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::OutOfStock);
    assert!(!error.is_retryable());
}

#[tokio::test]
async fn test_update_zero_quantity_issues_delete_not_put() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/wp-json/wc/v3/cart/items/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [],
            "items_count": 0,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cart = CartClient::new(client_for(&server));
    let updated = cart.update_item("abc", 0).await.unwrap();
    assert!(updated.items.is_empty());
}

#[tokio::test]
async fn test_blank_item_key_never_hits_network() {
    let server = MockServer::start().await;
    // A blank key would make the items route alias the clear-cart
    // endpoint, so neither operation may reach the server.
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let cart = CartClient::new(client_for(&server));

    let error = cart.remove_item("").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);
    assert_eq!(error.context().get("item_key"), Some(&serde_json::json!("")));

    let error = cart.update_item("   ", 2).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);

    // Quantity 0 takes the removal path, which applies the same guard.
    let error = cart.update_item("  ", 0).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_update_quantity_rejection_is_not_a_coupon_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/wp-json/wc/v3/cart/items/abc"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            serde_json::json!({"message": "Invalid quantity for this item"}),
        ))
        .mount(&server)
        .await;

    let cart = CartClient::new(client_for(&server));
    let error = cart.update_item("abc", 7).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Unknown);
    assert_eq!(error.message(), "Invalid quantity for this item");
}

#[tokio::test]
async fn test_update_unknown_item_is_cart_item_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/wp-json/wc/v3/cart/items/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let cart = CartClient::new(client_for(&server));
    let error = cart.update_item("ghost", 2).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::CartItemNotFound);
    assert_eq!(
        error.context().get("item_key"),
        Some(&serde_json::json!("ghost"))
    );
}

#[tokio::test]
async fn test_apply_coupon_expired_wins_over_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wp-json/wc/v3/cart/coupons"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            serde_json::json!({"message": "Coupon SUMMER is invalid: it has expired"}),
        ))
        .mount(&server)
        .await;

    let cart = CartClient::new(client_for(&server));
    let error = cart.apply_coupon("SUMMER").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::CouponExpired);
}

#[tokio::test]
async fn test_apply_blank_coupon_never_hits_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let cart = CartClient::new(client_for(&server));
    let error = cart.apply_coupon("   ").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);
}
