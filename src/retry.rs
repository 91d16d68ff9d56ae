//! Retry decision and backoff policy.
//!
//! [`RetryPolicy`] is a pure function of (failure count so far, most recent
//! [`ApiError`]) deciding whether to retry, paired with an exponential delay
//! function capped per policy. It is shared by all resource flows through
//! the cache layer, which performs the actual sleeping.
//!
//! # Rules
//!
//! - Never retry once `retryable` is false, regardless of attempt count.
//! - Retries are capped per logical operation: 3 for queries, 1 for
//!   mutations. Mutations are more conservative because a retried mutation
//!   risks duplicate side effects.
//! - Delay grows exponentially with attempt index, capped at a per-policy
//!   upper bound (10 s for most flows, 30 s for background refresh flows).
//!   Base and cap differ by call site and stay configurable per resource.
//! - An [`Unknown`](ErrorKind::Unknown)-kind failure — the unexpected,
//!   effectively unclassified case — gets a smaller fixed allowance instead
//!   of the full policy, since its retryability is unknown. Its `retryable`
//!   flag stays false, which is what drives the UI retry affordance.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use woo_storefront::{ApiError, ErrorKind, RetryPolicy};
//!
//! let policy = RetryPolicy::queries();
//! let network = ApiError::new(ErrorKind::Network, "offline", 0);
//! let invalid = ApiError::new(ErrorKind::Validation, "bad input", 400);
//!
//! assert!(policy.should_retry(1, &network));
//! assert!(!policy.should_retry(4, &network)); // ceiling of 3 exhausted
//! assert!(!policy.should_retry(1, &invalid)); // never retried
//! assert_eq!(policy.delay(0), Duration::from_secs(1));
//! assert_eq!(policy.delay(2), Duration::from_secs(4));
//! ```

use std::time::Duration;

use crate::client::{ApiError, ErrorKind};

/// Pure retry decision and backoff configuration.
///
/// One instance per call-site flavor; the differing ceilings and caps across
/// resources are intentional and preserved as per-instance configuration
/// rather than unified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum retries for classified retryable errors.
    max_retries: u32,
    /// Smaller allowance for `Unknown`-kind failures.
    unknown_retries: u32,
    /// First delay; doubles with each attempt.
    base_delay: Duration,
    /// Upper bound on the delay.
    max_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with explicit parameters.
    #[must_use]
    pub const fn new(
        max_retries: u32,
        unknown_retries: u32,
        base_delay: Duration,
        max_delay: Duration,
    ) -> Self {
        Self {
            max_retries,
            unknown_retries,
            base_delay,
            max_delay,
        }
    }

    /// Policy for read queries: 3 retries, 1 s base, 10 s cap.
    #[must_use]
    pub const fn queries() -> Self {
        Self::new(3, 2, Duration::from_secs(1), Duration::from_secs(10))
    }

    /// Policy for cart reads: 3 retries with a tighter 5 s cap.
    #[must_use]
    pub const fn cart_queries() -> Self {
        Self::new(3, 2, Duration::from_secs(1), Duration::from_secs(5))
    }

    /// Policy for mutations: a single retry, 5 s cap.
    ///
    /// A retried mutation risks duplicate side effects, so the ceiling is
    /// deliberately low.
    #[must_use]
    pub const fn mutations() -> Self {
        Self::new(1, 1, Duration::from_secs(1), Duration::from_secs(5))
    }

    /// Policy for background cache refresh flows: 3 retries, 30 s cap.
    #[must_use]
    pub const fn background() -> Self {
        Self::new(3, 2, Duration::from_secs(1), Duration::from_secs(30))
    }

    /// Returns the retry ceiling for classified retryable errors.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Decides whether to retry after the given number of failures.
    ///
    /// `failures` counts the failures observed so far, starting at 1 for the
    /// first failed attempt. Pure: no clock, no state.
    #[must_use]
    pub fn should_retry(&self, failures: u32, error: &ApiError) -> bool {
        if error.kind() == ErrorKind::Unknown {
            return failures <= self.unknown_retries;
        }
        if !error.is_retryable() {
            return false;
        }
        failures <= self.max_retries
    }

    /// Returns the delay before the retry with the given zero-based attempt
    /// index: `min(base_delay * 2^attempt, max_delay)`.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::queries()
    }
}
