//! The classified error type all API failures normalize into.
//!
//! Every failure in this crate — transport, HTTP status, transform,
//! business rule — is represented by exactly one concrete type,
//! [`ApiError`], carrying a closed [`ErrorKind`], a user-facing message,
//! the associated HTTP status, a retryability flag, and a context bag that
//! accumulates as the error propagates upward.
//!
//! # Retryability contract
//!
//! `retryable` is assigned once at construction from the fixed
//! kind→retryable table and is never recomputed:
//!
//! - retryable: [`ErrorKind::Network`], [`ErrorKind::Timeout`],
//!   [`ErrorKind::Server`], [`ErrorKind::RateLimited`]
//! - not retryable: everything else, including [`ErrorKind::Unknown`]
//!
//! # Context merging
//!
//! Each layer may append keys to `context` via [`ApiError::with_context`];
//! later keys override earlier ones with the same name, and existing keys
//! are never removed. The final error a caller observes therefore always
//! names the offending product id, item id, filters, and so on.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use woo_storefront::{ApiError, ErrorKind};
//!
//! let error = ApiError::new(ErrorKind::OutOfStock, "Requested quantity not in stock", 400)
//!     .with_context("product_id", json!("42"))
//!     .with_context("quantity", json!(3));
//!
//! assert!(!error.is_retryable());
//! assert_eq!(error.http_status(), 400);
//! assert_eq!(error.context()["product_id"], json!("42"));
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

/// The closed taxonomy of API failure kinds.
///
/// Each kind has a fixed retryability (see [`ErrorKind::is_retryable`]) and
/// a fixed presentation tuple (see [`ErrorKind::presentation`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Connection could not be established or no response was received.
    Network,
    /// The client-side request timeout fired.
    Timeout,
    /// The server answered 500/502/503.
    Server,
    /// The server answered 429.
    RateLimited,
    /// The server answered 401 or 403.
    Unauthorized,
    /// The server answered 404 and no resource client reclassified it.
    NotFound,
    /// A product does not exist or is no longer available.
    ProductNotFound,
    /// A category does not exist.
    CategoryNotFound,
    /// A cart item key does not exist in the current cart.
    CartItemNotFound,
    /// A listing returned zero results with no caller-supplied filters.
    NoResources,
    /// A listing returned zero results after applying caller-supplied filters.
    NoResourcesMatching,
    /// Input validation rejected the operation before any request was sent.
    Validation,
    /// A response payload did not match the expected shape.
    Parse,
    /// The server rejected a cart mutation for lack of stock.
    OutOfStock,
    /// A coupon code does not exist or is not valid.
    CouponInvalid,
    /// A coupon code has expired.
    CouponExpired,
    /// Payment processing failed. Reserved for checkout flows.
    PaymentFailed,
    /// A failure that could not be classified.
    Unknown,
}

impl ErrorKind {
    /// Returns whether failures of this kind may be retried.
    ///
    /// This is the single source of truth for the kind→retryable table;
    /// [`ApiError`] captures it once at construction.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Network | Self::Timeout | Self::Server | Self::RateLimited
        )
    }

    /// Returns the user-facing presentation tuple for this kind.
    ///
    /// `show_retry` is true exactly for retryable kinds, so non-retryable
    /// errors never render a retry affordance.
    #[must_use]
    pub const fn presentation(self) -> ErrorPresentation {
        match self {
            Self::Network => ErrorPresentation {
                title: "Connection problem",
                message: "Please check your internet connection and try again",
                action: "Try again",
                icon: "🌐",
                show_retry: true,
            },
            Self::Timeout => ErrorPresentation {
                title: "Request timed out",
                message: "The request is taking longer than expected. Try again",
                action: "Try again",
                icon: "⏱️",
                show_retry: true,
            },
            Self::Server => ErrorPresentation {
                title: "Server error",
                message: "There is a temporary problem with the server. Please try again in a few minutes",
                action: "Try again",
                icon: "🔧",
                show_retry: true,
            },
            Self::RateLimited => ErrorPresentation {
                title: "Too many requests",
                message: "Please wait a few minutes and try again",
                action: "Try again in a minute",
                icon: "⏳",
                show_retry: true,
            },
            Self::Unauthorized => ErrorPresentation {
                title: "Sign-in required",
                message: "Please sign in to continue",
                action: "Sign in",
                icon: "🔒",
                show_retry: false,
            },
            Self::NotFound | Self::ProductNotFound => ErrorPresentation {
                title: "Product not found",
                message: "The product you were looking for was not found or is no longer available",
                action: "Back to catalog",
                icon: "❓",
                show_retry: false,
            },
            Self::CategoryNotFound => ErrorPresentation {
                title: "Category not found",
                message: "The category you were looking for was not found",
                action: "Back to catalog",
                icon: "❓",
                show_retry: false,
            },
            Self::CartItemNotFound => ErrorPresentation {
                title: "Cart problem",
                message: "Some items in your cart are no longer available",
                action: "Update cart",
                icon: "🛒",
                show_retry: false,
            },
            Self::NoResources => ErrorPresentation {
                title: "Nothing found",
                message: "No items are available right now",
                action: "Refresh",
                icon: "🔎",
                show_retry: false,
            },
            Self::NoResourcesMatching => ErrorPresentation {
                title: "Nothing found",
                message: "Try changing the filters or searching for something else",
                action: "Clear filters",
                icon: "🔎",
                show_retry: false,
            },
            Self::Validation => ErrorPresentation {
                title: "Invalid input",
                message: "Please correct the highlighted values and try again",
                action: "Fix and retry",
                icon: "⚠️",
                show_retry: false,
            },
            Self::Parse => ErrorPresentation {
                title: "Unexpected response",
                message: "The server returned data in an unexpected format",
                action: "Refresh",
                icon: "⚠️",
                show_retry: false,
            },
            Self::OutOfStock => ErrorPresentation {
                title: "Item unavailable",
                message: "The requested item is currently out of stock",
                action: "Show similar items",
                icon: "📦",
                show_retry: false,
            },
            Self::CouponInvalid => ErrorPresentation {
                title: "Invalid coupon",
                message: "The coupon code is not valid or does not exist",
                action: "Check the code",
                icon: "🎟️",
                show_retry: false,
            },
            Self::CouponExpired => ErrorPresentation {
                title: "Coupon expired",
                message: "The coupon code has expired",
                action: "Check the code",
                icon: "🎟️",
                show_retry: false,
            },
            Self::PaymentFailed => ErrorPresentation {
                title: "Payment failed",
                message: "Please check your payment details and try again",
                action: "Try again",
                icon: "💳",
                show_retry: false,
            },
            Self::Unknown => ErrorPresentation {
                title: "Something went wrong",
                message: "An unexpected error occurred. Please try again",
                action: "Try again",
                icon: "❗",
                show_retry: false,
            },
        }
    }
}

/// The user-facing presentation of an error kind.
///
/// A localized UI layer maps these fields onto its own strings; the crate
/// ships English defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErrorPresentation {
    /// Short title for the error state.
    pub title: &'static str,
    /// Longer explanation shown below the title.
    pub message: &'static str,
    /// Label for the primary action button.
    pub action: &'static str,
    /// Icon hint for the error state.
    pub icon: &'static str,
    /// Whether a retry affordance should be shown.
    pub show_retry: bool,
}

/// The single error type all API failures are normalized into.
///
/// Constructed once at the point a failure is first recognized (transport
/// layer or a business-rule check inside a resource client); afterwards only
/// `context` is appended to as the error is rethrown upward.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    http_status: u16,
    retryable: bool,
    context: Map<String, Value>,
}

// Verify ApiError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiError>();
};

impl ApiError {
    /// Creates a new classified error.
    ///
    /// `retryable` is derived from `kind` here and nowhere else. Use an
    /// `http_status` of 0 for non-HTTP failures such as connectivity loss.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>, http_status: u16) -> Self {
        Self {
            kind,
            message: message.into(),
            http_status,
            retryable: kind.is_retryable(),
            context: Map::new(),
        }
    }

    /// Appends a context entry, returning the error for chaining.
    ///
    /// A later value for an existing key overrides the earlier one; keys are
    /// never removed.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    /// Merges several context entries at once, with the same override
    /// semantics as [`Self::with_context`].
    #[must_use]
    pub fn with_context_entries(mut self, entries: Map<String, Value>) -> Self {
        for (key, value) in entries {
            self.context.insert(key, value);
        }
        self
    }

    /// Reclassifies this error into a more specific kind, keeping the
    /// accumulated context and HTTP status.
    ///
    /// Used by resource clients for failures the transport adapter could not
    /// know about, such as turning a generic 404 into `ProductNotFound`.
    /// `retryable` is re-derived from the new kind, so the fixed table still
    /// holds.
    #[must_use]
    pub fn reclassified(self, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            http_status: self.http_status,
            retryable: kind.is_retryable(),
            context: self.context,
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status associated with the failure (0 for non-HTTP
    /// failures).
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.http_status
    }

    /// Returns whether this error may be retried.
    ///
    /// Fixed at construction from the kind table; never recomputed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.retryable
    }

    /// Returns the accumulated context bag.
    #[must_use]
    pub const fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    /// Returns the presentation tuple for this error's kind.
    #[must_use]
    pub const fn presentation(&self) -> ErrorPresentation {
        self.kind.presentation()
    }

    /// Returns raw diagnostic detail for unexpected failures.
    ///
    /// Only `Unknown` and `Server` kinds expose their raw context, and only
    /// in development builds; release builds always return `None`.
    #[must_use]
    pub fn diagnostic_detail(&self) -> Option<String> {
        if cfg!(debug_assertions) && matches!(self.kind, ErrorKind::Unknown | ErrorKind::Server) {
            Some(format!(
                "status {}: {} context={}",
                self.http_status,
                self.message,
                Value::Object(self.context.clone())
            ))
        } else {
            None
        }
    }
}

/// Returns the status-keyed default message for an HTTP failure whose body
/// carried no usable message.
#[must_use]
pub fn default_status_message(status: u16) -> &'static str {
    match status {
        400 => "Invalid request",
        401 => "Authentication required",
        403 => "You do not have permission to access this",
        404 => "The requested resource was not found",
        429 => "Too many requests. Please try again in a few minutes",
        500 | 502 | 503 => "Server error. Please try again",
        _ => "Unknown error",
    }
}
