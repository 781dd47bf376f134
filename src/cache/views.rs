//! Ranking view cache: one fixed key → the current repository view set.

use std::future::Future;
use std::sync::Arc;

use moka::future::Cache;

use super::{CacheConfig, VIEW_CACHE_LABEL, record_lookup};
use crate::Result;
use crate::ranking::RepositoryViewSet;

/// The only key the view cache ever holds.
pub const REPOSITORY_VIEWS_KEY: &str = "repository-views";

/// In-memory TTL cache holding the current [`RepositoryViewSet`].
///
/// View sets are shared as `Arc`s and replaced wholesale on refresh.
pub struct ViewCache {
    cache: Cache<String, Arc<RepositoryViewSet>>,
}

impl ViewCache {
    /// Create a new view cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self { cache }
    }

    /// The current view set, if present and not expired.
    ///
    /// Emits cache hit/miss metrics.
    pub async fn get(&self) -> Option<Arc<RepositoryViewSet>> {
        let hit = self.cache.get(REPOSITORY_VIEWS_KEY).await;
        record_lookup(VIEW_CACHE_LABEL, hit.is_some());
        hit
    }

    /// Replace the current view set.
    pub async fn insert(&self, views: Arc<RepositoryViewSet>) {
        self.cache
            .insert(REPOSITORY_VIEWS_KEY.to_string(), views)
            .await;
    }

    /// Return the current view set, running `init` to build one on miss.
    ///
    /// Concurrent callers share a single `init`; a failed `init` stores
    /// nothing.
    pub async fn get_or_try_insert_with<F>(&self, init: F) -> Result<Arc<RepositoryViewSet>>
    where
        F: Future<Output = Result<Arc<RepositoryViewSet>>>,
    {
        Ok(self
            .cache
            .try_get_with(REPOSITORY_VIEWS_KEY.to_string(), init)
            .await?)
    }

    /// Whether a live view set is cached. Does not touch metrics.
    pub fn contains(&self) -> bool {
        self.cache.contains_key(REPOSITORY_VIEWS_KEY)
    }

    /// Apply pending evictions and expirations, so that
    /// [`entry_count`](Self::entry_count) is up to date.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }

    /// Approximate number of live view sets.
    ///
    /// Eviction and expiry are applied lazily, so the count can lag.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Evict the current view set.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}
