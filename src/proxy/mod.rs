//! The cache-aside proxy.
//!
//! [`ReadCacheProxy`] sits between inbound requests and the [`Upstream`]:
//!
//! ```text
//! path ─► normalize ─► allow-listed? ──no──► upstream.fetch(path)
//!                          │
//!                         yes
//!                          ▼
//!                  response cache hit? ──yes──► cached body
//!                          │
//!                          no ──► repositories path? ──yes──► combined refresh
//!                                          │
//!                                          no ──► upstream.fetch(path)
//! ```
//!
//! The combined refresh fetches the repositories collection once, builds
//! the ranking views from that same snapshot, and writes both caches, so
//! the raw collection and its views never disagree. Bottom-N queries read
//! only the view cache, populating it through the same refresh on miss.
//!
//! Errors from the upstream or the view builder propagate to the caller
//! unchanged. Nothing is cached on failure and stale entries are never
//! served in place of an error.
//!
//! [`Upstream`]: crate::upstream::Upstream

mod builder;
mod policy;
mod service;

pub use builder::{ReadCache, ReadCacheBuilder};
pub use policy::{CachePolicy, DEFAULT_CACHEABLE_PATHS, DEFAULT_REPOSITORIES_PATH, normalize_path};
pub use service::ReadCacheProxy;
