//! Raw response cache: normalized path → upstream body text.

use std::future::Future;

use moka::future::Cache;

use super::{CacheConfig, RESPONSE_CACHE_LABEL, record_lookup};
use crate::Result;

/// In-memory TTL cache of raw upstream bodies.
///
/// Keys are expected to be normalized paths; normalization is the
/// caller's job (see [`CachePolicy`](crate::proxy::CachePolicy)).
pub struct ResponseCache {
    cache: Cache<String, String>,
}

impl ResponseCache {
    /// Create a new response cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self { cache }
    }

    /// Look up a cached body.
    ///
    /// Returns `None` on miss or expiry. Emits cache hit/miss metrics.
    pub async fn get(&self, key: &str) -> Option<String> {
        let hit = self.cache.get(key).await;
        record_lookup(RESPONSE_CACHE_LABEL, hit.is_some());
        hit
    }

    /// Insert (or replace) a cached body.
    pub async fn insert(&self, key: impl Into<String>, body: String) {
        self.cache.insert(key.into(), body).await;
    }

    /// Return the cached body for `key`, running `init` to populate it on miss.
    ///
    /// Concurrent callers for the same key share a single `init`. If `init`
    /// fails, nothing is stored and every waiter receives the error.
    pub async fn get_or_try_insert_with<F>(&self, key: &str, init: F) -> Result<String>
    where
        F: Future<Output = Result<String>>,
    {
        Ok(self.cache.try_get_with(key.to_string(), init).await?)
    }

    /// Whether a live entry exists for `key`. Does not touch metrics.
    pub fn contains(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }

    /// Apply pending evictions and expirations, so that
    /// [`entry_count`](Self::entry_count) is up to date.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }

    /// Approximate number of live entries.
    ///
    /// Eviction and expiry are applied lazily, so the count can lag.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Evict all entries.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}
