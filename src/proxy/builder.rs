//! Builder for configuring proxy instances

use std::sync::Arc;
use std::time::Duration;

use super::policy::{CachePolicy, DEFAULT_CACHEABLE_PATHS, DEFAULT_REPOSITORIES_PATH};
use super::service::ReadCacheProxy;
use crate::cache::CacheConfig;
use crate::upstream::{Upstream, UpstreamClient, UpstreamConfig};
use crate::{ProxyError, Result};

/// Longest TTL the cache backend accepts (1000 years).
const MAX_TTL: Duration = Duration::from_secs(1000 * 365 * 24 * 3600);

/// Main entry point for creating proxy instances.
///
/// ```rust,no_run
/// use readcache::ReadCache;
/// use std::time::Duration;
///
/// # fn main() -> readcache::Result<()> {
/// let proxy = ReadCache::builder()
///     .base_url("https://api.github.com")
///     .token("ghp_example")
///     .ttl(Duration::from_secs(60))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ReadCache;

impl ReadCache {
    /// Create a new builder for configuring the proxy.
    pub fn builder() -> ReadCacheBuilder {
        ReadCacheBuilder::new()
    }
}

/// Builder for configuring proxy instances.
pub struct ReadCacheBuilder {
    upstream_config: UpstreamConfig,
    upstream: Option<Arc<dyn Upstream>>,
    cache: CacheConfig,
    cacheable: Vec<String>,
    repositories_path: String,
}

impl ReadCacheBuilder {
    pub fn new() -> Self {
        Self {
            upstream_config: UpstreamConfig::default(),
            upstream: None,
            cache: CacheConfig::default(),
            cacheable: DEFAULT_CACHEABLE_PATHS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            repositories_path: DEFAULT_REPOSITORIES_PATH.to_string(),
        }
    }

    /// Set the upstream base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.upstream_config.base_url = url.into();
        self
    }

    /// Set the upstream API token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.upstream_config.token = Some(token.into());
        self
    }

    /// Set the `per_page` value sent upstream.
    pub fn page_size(mut self, n: u32) -> Self {
        self.upstream_config.page_size = n;
        self
    }

    /// Set the per-request upstream timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.upstream_config.timeout = timeout;
        self
    }

    /// Cap the number of pages followed per fetch.
    pub fn max_pages(mut self, n: u32) -> Self {
        self.upstream_config.max_pages = Some(n);
        self
    }

    /// Replace the whole upstream configuration.
    pub fn upstream_config(mut self, config: UpstreamConfig) -> Self {
        self.upstream_config = config;
        self
    }

    /// Use a custom upstream instead of the HTTP client.
    ///
    /// When set, the upstream settings (base URL, token, page size, ...)
    /// are ignored.
    pub fn upstream(mut self, upstream: Arc<dyn Upstream>) -> Self {
        self.upstream = Some(upstream);
        self
    }

    /// Set the cache configuration shared by both caches.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    /// Set the cache time-to-live.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.cache.ttl = ttl;
        self
    }

    /// Replace the allow-list of cacheable paths.
    pub fn cacheable_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cacheable = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Set the repositories collection path the ranking views are built from.
    ///
    /// The path must also be in the cacheable allow-list.
    pub fn repositories_path(mut self, path: impl Into<String>) -> Self {
        self.repositories_path = path.into();
        self
    }

    /// Build the proxy.
    ///
    /// Fails with [`ProxyError::Configuration`] on a zero or over-long TTL,
    /// a zero capacity,
    /// a repositories path outside the allow-list, or invalid upstream
    /// settings.
    pub fn build(self) -> Result<ReadCacheProxy> {
        if self.cache.ttl.is_zero() {
            return Err(ProxyError::Configuration(
                "cache TTL must be greater than zero".to_string(),
            ));
        }
        if self.cache.ttl > MAX_TTL {
            return Err(ProxyError::Configuration(format!(
                "cache TTL must not exceed {} seconds",
                MAX_TTL.as_secs()
            )));
        }
        if self.cache.max_entries == 0 {
            return Err(ProxyError::Configuration(
                "cache capacity must be greater than zero".to_string(),
            ));
        }

        let policy = CachePolicy::new(&self.cacheable, &self.repositories_path);
        if !policy.is_cacheable(policy.repositories_path()) {
            return Err(ProxyError::Configuration(format!(
                "repositories path {:?} is not in the cacheable paths",
                self.repositories_path
            )));
        }

        let upstream: Arc<dyn Upstream> = match self.upstream {
            Some(upstream) => upstream,
            None => Arc::new(UpstreamClient::new(self.upstream_config)?),
        };

        Ok(ReadCacheProxy::new(upstream, &self.cache, policy))
    }
}

impl Default for ReadCacheBuilder {
    fn default() -> Self {
        Self::new()
    }
}
