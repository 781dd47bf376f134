//! `ReadCacheProxy`: cache-aside proxy, combined refresh, bottom-N selector.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::policy::{CachePolicy, normalize_path};
use crate::cache::{CacheConfig, ResponseCache, ViewCache};
use crate::ranking::{Criterion, RankedEntry, RepositoryViewSet, render_entries};
use crate::telemetry;
use crate::upstream::Upstream;
use crate::Result;

/// Read-through proxy in front of an [`Upstream`].
///
/// Owns both caches; nothing is process-global, so independent instances
/// (e.g. one per test) never share state.
pub struct ReadCacheProxy {
    upstream: Arc<dyn Upstream>,
    responses: ResponseCache,
    views: ViewCache,
    policy: CachePolicy,
}

impl ReadCacheProxy {
    /// Create a proxy over `upstream`. Both caches use `cache`.
    pub fn new(upstream: Arc<dyn Upstream>, cache: &CacheConfig, policy: CachePolicy) -> Self {
        Self {
            upstream,
            responses: ResponseCache::new(cache),
            views: ViewCache::new(cache),
            policy,
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// The raw response cache.
    pub fn responses(&self) -> &ResponseCache {
        &self.responses
    }

    /// The ranking view cache.
    pub fn views(&self) -> &ViewCache {
        &self.views
    }

    /// Serve `path`, from cache when it is allow-listed.
    ///
    /// Paths outside the allow-list are fetched live on every call and
    /// never touch either cache. Allow-listed paths are looked up under
    /// their normalized key; on miss the path as given is fetched and the
    /// body stored under the normalized key. A miss on the repositories
    /// path runs the combined refresh instead.
    #[instrument(skip(self))]
    pub async fn proxy_get(&self, path: &str) -> Result<String> {
        let key = normalize_path(path);
        if !self.policy.is_cacheable(key) {
            debug!("path not cacheable, proxying live");
            return self.upstream.fetch(path).await;
        }

        if let Some(body) = self.responses.get(key).await {
            return Ok(body);
        }

        debug!(key, "response cache miss");
        if self.policy.is_repositories(key) {
            self.responses
                .get_or_try_insert_with(key, async {
                    let (raw, views) = self.load_repositories().await?;
                    self.views.insert(views).await;
                    Ok(raw)
                })
                .await
        } else {
            self.responses
                .get_or_try_insert_with(key, self.upstream.fetch(path))
                .await
        }
    }

    /// Fetch the repositories collection and rebuild its views, replacing
    /// whatever both caches held.
    #[instrument(skip(self))]
    pub async fn refresh_repositories(&self) -> Result<Arc<RepositoryViewSet>> {
        let (raw, views) = self.load_repositories().await?;
        self.responses
            .insert(self.policy.repositories_path(), raw)
            .await;
        self.views.insert(Arc::clone(&views)).await;
        Ok(views)
    }

    /// The current view set, running the combined refresh on miss.
    pub async fn repository_views(&self) -> Result<Arc<RepositoryViewSet>> {
        if let Some(views) = self.views.get().await {
            return Ok(views);
        }

        debug!("view cache miss");
        self.views
            .get_or_try_insert_with(async {
                let (raw, views) = self.load_repositories().await?;
                self.responses
                    .insert(self.policy.repositories_path(), raw)
                    .await;
                Ok(views)
            })
            .await
    }

    /// The `limit` lowest-ranked repositories under `criterion`.
    ///
    /// Entries keep their view order (descending), so the result ends with
    /// the smallest value. An unrecognized criterion name yields an empty
    /// result, not an error.
    #[instrument(skip(self))]
    pub async fn select_bottom_n(&self, criterion: &str, limit: usize) -> Result<Vec<RankedEntry>> {
        let views = self.repository_views().await?;
        let Some(criterion) = Criterion::from_name(criterion) else {
            debug!("unrecognized criterion");
            return Ok(Vec::new());
        };
        Ok(views.bottom(criterion, limit).to_vec())
    }

    /// [`select_bottom_n`](Self::select_bottom_n), rendered as
    /// `[["name", value], ...]`.
    pub async fn bottom_n_json(&self, criterion: &str, limit: usize) -> Result<String> {
        let entries = self.select_bottom_n(criterion, limit).await?;
        Ok(render_entries(&entries))
    }

    /// Whether the upstream currently answers its health check.
    pub async fn upstream_healthy(&self) -> bool {
        match self.upstream.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(upstream = self.upstream.name(), error = %e, "upstream health check failed");
                false
            }
        }
    }

    /// One upstream snapshot of the repositories collection and the views
    /// built from it. Writes nothing.
    async fn load_repositories(&self) -> Result<(String, Arc<RepositoryViewSet>)> {
        let raw = self
            .upstream
            .fetch(self.policy.repositories_path())
            .await?;
        let views = RepositoryViewSet::build(&raw)?;
        metrics::counter!(telemetry::VIEW_BUILDS_TOTAL).increment(1);
        info!(repositories = views.len(), "built repository views");
        Ok((raw, Arc::new(views)))
    }
}
