//! Query cache with request coalescing and retry.
//!
//! [`CacheService`] sits between the storefront facade and the resource
//! clients. It stores successful responses as JSON values keyed by
//! [`QueryKey`], serves fresh entries without touching the network,
//! coalesces concurrent fetches of the same key behind a per-key lock,
//! and drives failed fetches through a [`RetryPolicy`].
//!
//! Entries age through three states: fresh (served directly), stale
//! (refetched on access, the old value kept as a rollback point), and
//! expired (evicted on access).

pub mod keys;

pub use keys::QueryKey;

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::client::ApiError;
use crate::resources::CacheStatus;
use crate::retry::RetryPolicy;

/// Freshness and retry rules for one class of queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CachePolicy {
    /// Age after which an entry is refetched on access.
    pub stale_after: Duration,
    /// Age after which an entry is evicted on access.
    pub retain_for: Duration,
    /// Retry rules for the fetch behind a miss.
    pub retry: RetryPolicy,
}

impl CachePolicy {
    /// Policy for product queries: fresh 5 minutes, retained 10.
    #[must_use]
    pub const fn products() -> Self {
        Self {
            stale_after: Duration::from_secs(5 * 60),
            retain_for: Duration::from_secs(10 * 60),
            retry: RetryPolicy::queries(),
        }
    }

    /// Policy for cart queries: fresh 2 minutes, retained 5.
    #[must_use]
    pub const fn cart() -> Self {
        Self {
            stale_after: Duration::from_secs(2 * 60),
            retain_for: Duration::from_secs(5 * 60),
            retry: RetryPolicy::cart_queries(),
        }
    }

    /// Policy for category queries: fresh 15 minutes, retained 30.
    ///
    /// Categories change rarely, so they get the longest windows.
    #[must_use]
    pub const fn categories() -> Self {
        Self {
            stale_after: Duration::from_secs(15 * 60),
            retain_for: Duration::from_secs(30 * 60),
            retry: RetryPolicy::queries(),
        }
    }
}

#[derive(Clone, Debug)]
struct CacheEntry {
    value: Value,
    stored_at: Instant,
}

impl CacheEntry {
    fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }
}

/// In-memory query cache shared by all resource reads.
///
/// Cloning is cheap; clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct CacheService {
    entries: Arc<Mutex<HashMap<QueryKey, CacheEntry>>>,
    inflight: Arc<Mutex<HashMap<QueryKey, Arc<Mutex<()>>>>>,
    generation: Arc<AtomicU64>,
}

impl CacheService {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value if fresh, otherwise fetches, retries per
    /// the policy, and stores the result. The returned [`CacheStatus`]
    /// says whether the value came from the cache or the network.
    ///
    /// Concurrent callers for the same key coalesce: one fetch runs, the
    /// rest await it and read the stored value (reported as a hit).
    /// Results produced while the cache was backgrounded (see
    /// [`Self::enter_background`]) are discarded rather than stored.
    ///
    /// # Errors
    ///
    /// The final [`ApiError`] of the fetch once retries are exhausted.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: QueryKey,
        policy: CachePolicy,
        fetch: F,
    ) -> Result<(Value, CacheStatus), ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Value, ApiError>>,
    {
        if let Some(value) = self.fresh_value(&key, policy).await {
            trace!(key = %key, "cache hit");
            return Ok((value, CacheStatus::Hit));
        }

        let lock = self.lock_key(&key).await;
        let _guard = lock.lock().await;

        // Another caller may have populated the entry while we waited.
        if let Some(value) = self.fresh_value(&key, policy).await {
            trace!(key = %key, "cache hit after coalesced fetch");
            return Ok((value, CacheStatus::Hit));
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let value = Self::run_with_retry(&key, policy.retry, fetch).await?;

        if self.generation.load(Ordering::SeqCst) == generation {
            self.set(key, value.clone()).await;
        } else {
            debug!(key = %key, "discarding fetch result from a stale generation");
        }
        Ok((value, CacheStatus::Miss))
    }

    /// Runs the fetch, retrying per the policy with exponential backoff.
    async fn run_with_retry<F, Fut>(
        key: &QueryKey,
        policy: RetryPolicy,
        fetch: F,
    ) -> Result<Value, ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Value, ApiError>>,
    {
        let mut failures: u32 = 0;
        loop {
            match fetch().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    failures += 1;
                    if !policy.should_retry(failures, &error) {
                        return Err(error);
                    }
                    let delay = policy.delay(failures - 1);
                    debug!(
                        key = %key,
                        failures,
                        delay_ms = delay.as_millis() as u64,
                        kind = ?error.kind(),
                        "retrying failed fetch"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Returns the cached value without fetching, regardless of age.
    ///
    /// No freshness check and no eviction happen here: rollback snapshots
    /// must stay readable even once the entry has gone stale.
    pub async fn peek(&self, key: &QueryKey) -> Option<Value> {
        let entries = self.entries.lock().await;
        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Stores a value under a key, resetting its age.
    pub async fn set(&self, key: QueryKey, value: Value) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Removes one entry.
    pub async fn remove(&self, key: &QueryKey) {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
    }

    /// Removes every entry whose key starts with the given scope prefix.
    pub async fn invalidate_scope(&self, scope: &str) {
        let mut entries = self.entries.lock().await;
        entries.retain(|key, _| key.scope() != scope);
    }

    /// Marks every entry stale so the next access refetches it.
    ///
    /// The values stay available to [`Self::peek`] until refreshed.
    pub async fn invalidate_all(&self) {
        let mut entries = self.entries.lock().await;
        let floor = Instant::now()
            .checked_sub(Duration::from_secs(60 * 60 * 24))
            .unwrap_or_else(Instant::now);
        for entry in entries.values_mut() {
            entry.stored_at = floor;
        }
    }

    /// Removes all entries.
    pub async fn clear(&self) {
        let mut entries = self.entries.lock().await;
        entries.clear();
        let mut inflight = self.inflight.lock().await;
        inflight.clear();
    }

    /// Bumps the generation so fetches already in flight discard their
    /// results instead of storing them.
    ///
    /// Futures cannot be interrupted from the outside, so backgrounding
    /// lets them finish but fences their writes.
    pub fn enter_background(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        debug!("cache backgrounded, in-flight results will be discarded");
    }

    /// Returns the per-key coalescing lock, creating it on first use.
    pub(crate) async fn lock_key(&self, key: &QueryKey) -> Arc<Mutex<()>> {
        let mut inflight = self.inflight.lock().await;
        Arc::clone(inflight.entry(key.clone()).or_default())
    }

    /// Returns the value when the entry exists and is within its
    /// freshness window; evicts entries past retention.
    async fn fresh_value(&self, key: &QueryKey, policy: CachePolicy) -> Option<Value> {
        let mut entries = self.entries.lock().await;
        let entry = entries.get(key)?;
        let age = entry.age();
        if age >= policy.retain_for {
            entries.remove(key);
            return None;
        }
        if age >= policy.stale_after {
            return None;
        }
        Some(entry.value.clone())
    }
}
