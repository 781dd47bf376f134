//! Which paths are cached, and under what key.

use std::collections::HashSet;

/// Repositories collection the ranking views are built from.
pub const DEFAULT_REPOSITORIES_PATH: &str = "/orgs/Netflix/repos";

/// Paths cached by default.
pub const DEFAULT_CACHEABLE_PATHS: &[&str] = &[
    "/",
    "/orgs/Netflix",
    "/orgs/Netflix/members",
    DEFAULT_REPOSITORIES_PATH,
];

/// Strip exactly one trailing slash, so `/x` and `/x/` share a cache entry.
///
/// The root path `/` normalizes to the empty string.
pub fn normalize_path(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// The allow-list of cacheable paths plus the special repositories path.
///
/// All stored paths are normalized on construction; lookups expect an
/// already normalized path.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    cacheable: HashSet<String>,
    repositories_path: String,
}

impl CachePolicy {
    pub fn new<I, S>(cacheable: I, repositories_path: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            cacheable: cacheable
                .into_iter()
                .map(|p| normalize_path(p.as_ref()).to_string())
                .collect(),
            repositories_path: normalize_path(repositories_path).to_string(),
        }
    }

    /// Whether responses for this normalized path are cached.
    pub fn is_cacheable(&self, normalized: &str) -> bool {
        self.cacheable.contains(normalized)
    }

    /// Whether this normalized path is the repositories collection.
    pub fn is_repositories(&self, normalized: &str) -> bool {
        self.repositories_path == normalized
    }

    /// The normalized repositories path.
    pub fn repositories_path(&self) -> &str {
        &self.repositories_path
    }

    /// All normalized cacheable paths, in no particular order.
    pub fn cacheable_paths(&self) -> impl Iterator<Item = &str> {
        self.cacheable.iter().map(String::as_str)
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CACHEABLE_PATHS, DEFAULT_REPOSITORIES_PATH)
    }
}
