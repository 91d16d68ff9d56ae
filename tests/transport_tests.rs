//! Integration tests for the transport adapter.
//!
//! These tests verify status classification, credential query parameters,
//! timeout handling, and body message extraction against a mock server.

use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use woo_storefront::{
    ApiRequest, BaseUrl, ConsumerKey, ConsumerSecret, ErrorKind, HttpClient, HttpMethod,
    StoreConfig,
};

fn config_for(server: &MockServer) -> StoreConfig {
    StoreConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .credentials(
            ConsumerKey::new("ck_test").unwrap(),
            ConsumerSecret::new("cs_test").unwrap(),
        )
        .build()
        .unwrap()
}

async fn send_get(server: &MockServer, request_path: &str) -> Result<woo_storefront::ApiResponse, woo_storefront::ApiError> {
    let client = HttpClient::new(&config_for(server));
    let request = ApiRequest::builder(HttpMethod::Get, request_path)
        .build()
        .unwrap();
    client.send(request).await
}

#[tokio::test]
async fn test_success_returns_parsed_body_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-wp-total", "57")
                .insert_header("x-wp-totalpages", "5")
                .set_body_json(serde_json::json!([{"id": 1}])),
        )
        .mount(&server)
        .await;

    let response = send_get(&server, "/wp-json/wc/v3/products").await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.total_items(), 57);
    assert_eq!(response.total_pages(), 5);
}

#[tokio::test]
async fn test_credentials_sent_as_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .and(query_param("consumer_key", "ck_test"))
        .and(query_param("consumer_secret", "cs_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let response = send_get(&server, "/wp-json/wc/v3/products").await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_status_classification_table() {
    let cases = [
        (401, ErrorKind::Unauthorized, false),
        (403, ErrorKind::Unauthorized, false),
        (404, ErrorKind::NotFound, false),
        (429, ErrorKind::RateLimited, true),
        (500, ErrorKind::Server, true),
        (502, ErrorKind::Server, true),
        (503, ErrorKind::Server, true),
        (418, ErrorKind::Unknown, false),
    ];

    for (status, expected_kind, expected_retryable) in cases {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wp-json/wc/v3/cart"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let error = send_get(&server, "/wp-json/wc/v3/cart").await.unwrap_err();
        assert_eq!(error.kind(), expected_kind, "status {status}");
        assert_eq!(error.http_status(), status, "status {status}");
        assert_eq!(error.is_retryable(), expected_retryable, "status {status}");
    }
}

#[tokio::test]
async fn test_error_message_extracted_from_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/cart"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({"message": "Database connection lost"})),
        )
        .mount(&server)
        .await;

    let error = send_get(&server, "/wp-json/wc/v3/cart").await.unwrap_err();
    assert_eq!(error.message(), "Database connection lost");
}

#[tokio::test]
async fn test_error_falls_back_to_status_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/cart"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let error = send_get(&server, "/wp-json/wc/v3/cart").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Server);
    assert!(!error.message().is_empty());
}

#[tokio::test]
async fn test_timeout_classified_as_timeout_with_status_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(serde_json::json!([])),
        )
        .mount(&server)
        .await;

    let config = StoreConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let client = HttpClient::new(&config);
    let request = ApiRequest::builder(HttpMethod::Get, "/wp-json/wc/v3/products")
        .build()
        .unwrap();

    let error = client.send(request).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Timeout);
    assert_eq!(error.http_status(), 0);
    assert!(error.is_retryable());
}

#[tokio::test]
async fn test_connection_failure_classified_as_network() {
    // Nothing listens on this port.
    let config = StoreConfig::builder()
        .base_url(BaseUrl::new("http://127.0.0.1:1").unwrap())
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    let client = HttpClient::new(&config);
    let request = ApiRequest::builder(HttpMethod::Get, "/wp-json/wc/v3/products")
        .build()
        .unwrap();

    let error = client.send(request).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Network);
    assert_eq!(error.http_status(), 0);
    assert!(error.is_retryable());
}

#[tokio::test]
async fn test_error_context_carries_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/cart"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let error = send_get(&server, "/wp-json/wc/v3/cart").await.unwrap_err();
    assert_eq!(
        error.context().get("endpoint"),
        Some(&serde_json::json!("/wp-json/wc/v3/cart"))
    );
}

#[tokio::test]
async fn test_post_carries_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wp-json/wc/v3/cart/add-item"))
        .and(wiremock::matchers::body_json(
            serde_json::json!({"id": "42", "quantity": 2}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server));
    let request = ApiRequest::builder(HttpMethod::Post, "/wp-json/wc/v3/cart/add-item")
        .body(serde_json::json!({"id": "42", "quantity": 2}))
        .build()
        .unwrap();

    let response = client.send(request).await.unwrap();
    assert_eq!(response.status, 200);
}
