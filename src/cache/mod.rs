//! Caching subsystem.
//!
//! Two independent TTL stores, both owned by the proxy:
//!
//! - [`ResponseCache`]: normalized request path → raw upstream body.
//! - [`ViewCache`]: a single fixed key → the current
//!   [`RepositoryViewSet`](crate::ranking::RepositoryViewSet).
//!
//! The view set is kept apart from the raw text because it is a derived
//! aggregate of one specific resource, not the body of any single path.
//! Both stores share one [`CacheConfig`], and therefore one TTL.
//!
//! # Single-flight
//!
//! Both stores expose `get_or_try_insert_with`, backed by moka's
//! `try_get_with`: concurrent callers that miss on the same key wait for
//! one shared initialisation instead of each fetching from the upstream.
//! A failed initialisation is handed to every waiter and nothing is
//! stored.

pub mod response;
pub mod views;

pub use response::ResponseCache;
pub use views::{REPOSITORY_VIEWS_KEY, ViewCache};

use std::time::Duration;

/// Configuration shared by both caches.
///
/// ```rust
/// # use readcache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(1_000)
///     .ttl(Duration::from_secs(30));
/// assert_eq!(config.ttl, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries per store. Default: 10,000.
    pub max_entries: u64,
    /// Time-to-live for cached entries, measured from insertion. Default: 60s.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(60),
        }
    }
}

impl CacheConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Metric label for the raw response store.
pub(crate) const RESPONSE_CACHE_LABEL: &str = "response";
/// Metric label for the ranking view store.
pub(crate) const VIEW_CACHE_LABEL: &str = "views";

pub(crate) fn record_lookup(cache: &'static str, hit: bool) {
    if hit {
        metrics::counter!(crate::telemetry::CACHE_HITS_TOTAL, "cache" => cache).increment(1);
    } else {
        metrics::counter!(crate::telemetry::CACHE_MISSES_TOTAL, "cache" => cache).increment(1);
    }
}
