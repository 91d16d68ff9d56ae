//! Cart entities and the cart resource client.
//!
//! The cart endpoints report domain failures as HTTP 400 with a message
//! body; [`CartClient`] inspects those messages to surface precise kinds
//! (out of stock, expired coupon) instead of a generic validation error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::{ApiError, ApiRequest, ApiResponse, ErrorKind, HttpClient, HttpMethod};

/// Cart endpoint path.
pub const CART_PATH: &str = "/wp-json/wc/v3/cart";

fn zero() -> String {
    "0".to_string()
}

/// Monetary totals of the cart. Missing fields default to `"0"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of line items before discounts.
    #[serde(default = "zero")]
    pub subtotal: String,
    /// Total discount applied.
    #[serde(default = "zero")]
    pub discount_total: String,
    /// Shipping cost.
    #[serde(default = "zero")]
    pub shipping_total: String,
    /// Tax amount.
    #[serde(default = "zero")]
    pub total_tax: String,
    /// Grand total.
    #[serde(default = "zero")]
    pub total: String,
}

impl Default for CartTotals {
    fn default() -> Self {
        Self {
            subtotal: zero(),
            discount_total: zero(),
            shipping_total: zero(),
            total_tax: zero(),
            total: zero(),
        }
    }
}

/// A line item in the cart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Server-assigned line key; falls back to the product id when blank.
    #[serde(default)]
    pub key: String,
    /// Product id.
    pub id: u64,
    /// Product name.
    pub name: String,
    /// Unit price (monetary string).
    #[serde(default)]
    pub price: String,
    /// Quantity in the cart.
    pub quantity: u32,
    /// Line totals.
    #[serde(default)]
    pub totals: CartTotals,
    /// Chosen variation attributes, as name/option pairs.
    #[serde(default)]
    pub variation: Vec<serde_json::Value>,
    /// Product image, when available.
    #[serde(default)]
    pub image: Option<String>,
}

/// The shopping cart.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Line items.
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Total number of units across all lines.
    #[serde(default, alias = "items_count")]
    pub item_count: u32,
    /// Combined item weight, when the store reports one.
    #[serde(default)]
    pub items_weight: Option<f64>,
    /// Whether the cart requires shipping.
    #[serde(default)]
    pub needs_shipping: bool,
    /// Cart-level totals.
    #[serde(default)]
    pub totals: CartTotals,
}

/// Normalizes a raw cart payload into a [`Cart`].
///
/// Line items with a blank `key` get the product id as their key so that
/// every line stays addressable.
fn transform_cart(response: &ApiResponse) -> Result<Cart, ApiError> {
    let mut cart: Cart = response.json()?;
    for item in &mut cart.items {
        if item.key.trim().is_empty() {
            item.key = item.id.to_string();
        }
    }
    Ok(cart)
}

/// Reclassifies a 400 response that reports a stock problem.
fn reclassify_stock_error(error: ApiError) -> ApiError {
    if error.http_status() == 400 && error.message().to_lowercase().contains("stock") {
        return error.reclassified(ErrorKind::OutOfStock, "This product is out of stock");
    }
    error
}

/// Reclassifies a coupon-endpoint 400 response by keywords in its message.
///
/// The order matters: "expired" is checked before "invalid" because
/// expired-coupon messages often contain both words.
fn reclassify_coupon_error(error: ApiError) -> ApiError {
    if error.http_status() != 400 {
        return error;
    }
    let message = error.message().to_lowercase();
    if message.contains("expired") {
        return error.reclassified(ErrorKind::CouponExpired, "This coupon has expired");
    }
    if message.contains("invalid") || message.contains("not found") {
        return error.reclassified(ErrorKind::CouponInvalid, "This coupon code is not valid");
    }
    error
}

/// Reclassifies an add-to-cart 400 response.
///
/// Shares the stock rule with [`reclassify_stock_error`] but maps
/// "not found" to a missing product rather than a bad coupon.
fn reclassify_add_error(error: ApiError) -> ApiError {
    if error.http_status() != 400 {
        return error;
    }
    let message = error.message().to_lowercase();
    if message.contains("stock") {
        return error.reclassified(ErrorKind::OutOfStock, "This product is out of stock");
    }
    if message.contains("not found") {
        return error.reclassified(
            ErrorKind::ProductNotFound,
            "The product was not found or is no longer available",
        );
    }
    error
}

/// Resource client for the cart endpoints.
///
/// All operations return the full updated [`Cart`] so callers can replace
/// their local state wholesale.
#[derive(Clone, Debug)]
pub struct CartClient {
    http: Arc<HttpClient>,
}

impl CartClient {
    /// Creates a cart client over the shared transport adapter.
    #[must_use]
    pub const fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Fetches the current cart.
    ///
    /// # Errors
    ///
    /// Transport classifications only; an empty cart is a success.
    pub async fn get(&self) -> Result<Cart, ApiError> {
        let attach = |e: ApiError| e.with_context("endpoint", json!(CART_PATH));
        let request = ApiRequest::builder(HttpMethod::Get, CART_PATH)
            .build()
            .map_err(attach)?;
        let response = self.http.send(request).await.map_err(attach)?;
        transform_cart(&response).map_err(attach)
    }

    /// Adds a product to the cart.
    ///
    /// A blank `product_id` is unrepresentable here (ids are numeric), but
    /// a zero quantity fails synchronously without issuing a request.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Validation`] when `quantity` is 0
    /// - [`ErrorKind::OutOfStock`] when the store reports a stock problem
    /// - [`ErrorKind::ProductNotFound`] when the store rejects the id
    pub async fn add_item(
        &self,
        product_id: u64,
        quantity: u32,
        variation_id: Option<u64>,
    ) -> Result<Cart, ApiError> {
        let attach = move |e: ApiError| {
            e.with_context("product_id", json!(product_id))
                .with_context("quantity", json!(quantity))
        };
        if quantity == 0 {
            return Err(attach(ApiError::new(
                ErrorKind::Validation,
                "Quantity must be at least 1",
                400,
            )));
        }

        let mut body = json!({ "id": product_id.to_string(), "quantity": quantity });
        if let Some(variation_id) = variation_id {
            body["variation_id"] = json!(variation_id);
        }

        let path = format!("{CART_PATH}/add-item");
        let request = ApiRequest::builder(HttpMethod::Post, path)
            .body(body)
            .build()
            .map_err(attach)?;
        let response = self
            .http
            .send(request)
            .await
            .map_err(|e| attach(reclassify_add_error(e)))?;
        transform_cart(&response).map_err(attach)
    }

    /// Changes the quantity of a cart line.
    ///
    /// A blank key fails synchronously without issuing a request. A
    /// quantity of 0 means removal and is delegated to
    /// [`Self::remove_item`] without issuing a `PUT`.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Validation`] when the key is blank
    /// - [`ErrorKind::CartItemNotFound`] when the line key is unknown
    /// - [`ErrorKind::OutOfStock`] when the store reports a stock problem
    pub async fn update_item(&self, item_key: &str, quantity: u32) -> Result<Cart, ApiError> {
        let attach = |e: ApiError| {
            e.with_context("item_key", json!(item_key))
                .with_context("quantity", json!(quantity))
        };
        if item_key.trim().is_empty() {
            return Err(attach(ApiError::new(
                ErrorKind::Validation,
                "Cart item key must not be blank",
                400,
            )));
        }
        if quantity == 0 {
            return self.remove_item(item_key).await;
        }

        let path = format!("{CART_PATH}/items/{item_key}");
        let request = ApiRequest::builder(HttpMethod::Put, path)
            .body(json!({ "quantity": quantity }))
            .build()
            .map_err(attach)?;
        let response = self.http.send(request).await.map_err(|e| {
            let e = if e.kind() == ErrorKind::NotFound {
                e.reclassified(ErrorKind::CartItemNotFound, "That item is no longer in your cart")
            } else {
                reclassify_stock_error(e)
            };
            attach(e)
        })?;
        transform_cart(&response).map_err(attach)
    }

    /// Removes a line from the cart.
    ///
    /// A blank key fails synchronously without issuing a request: the
    /// items route with an empty key segment would otherwise alias the
    /// clear-cart endpoint.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Validation`] when the key is blank
    /// - [`ErrorKind::CartItemNotFound`] when the line key is unknown
    pub async fn remove_item(&self, item_key: &str) -> Result<Cart, ApiError> {
        let attach = |e: ApiError| e.with_context("item_key", json!(item_key));
        if item_key.trim().is_empty() {
            return Err(attach(ApiError::new(
                ErrorKind::Validation,
                "Cart item key must not be blank",
                400,
            )));
        }

        let path = format!("{CART_PATH}/items/{item_key}");
        let request = ApiRequest::builder(HttpMethod::Delete, path)
            .build()
            .map_err(attach)?;
        let response = self.http.send(request).await.map_err(|e| {
            let e = if e.kind() == ErrorKind::NotFound {
                e.reclassified(ErrorKind::CartItemNotFound, "That item is no longer in your cart")
            } else {
                e
            };
            attach(e)
        })?;
        transform_cart(&response).map_err(attach)
    }

    /// Empties the cart.
    ///
    /// # Errors
    ///
    /// Transport classifications only.
    pub async fn clear(&self) -> Result<Cart, ApiError> {
        let attach = |e: ApiError| e.with_context("endpoint", json!(CART_PATH));
        let path = format!("{CART_PATH}/items");
        let request = ApiRequest::builder(HttpMethod::Delete, path)
            .build()
            .map_err(attach)?;
        let response = self.http.send(request).await.map_err(attach)?;
        transform_cart(&response).map_err(attach)
    }

    /// Applies a coupon code to the cart.
    ///
    /// A blank code fails synchronously without issuing a request.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Validation`] when the code is blank
    /// - [`ErrorKind::CouponExpired`] when the store reports expiry
    /// - [`ErrorKind::CouponInvalid`] when the store rejects the code
    pub async fn apply_coupon(&self, code: &str) -> Result<Cart, ApiError> {
        let attach = |e: ApiError| e.with_context("coupon_code", json!(code));
        if code.trim().is_empty() {
            return Err(attach(ApiError::new(
                ErrorKind::Validation,
                "Enter a coupon code",
                400,
            )));
        }

        let path = format!("{CART_PATH}/coupons");
        let request = ApiRequest::builder(HttpMethod::Post, path)
            .body(json!({ "code": code.trim() }))
            .build()
            .map_err(attach)?;
        let response = self
            .http
            .send(request)
            .await
            .map_err(|e| attach(reclassify_coupon_error(e)))?;
        transform_cart(&response).map_err(attach)
    }
}
