//! Readcache - read-through caching proxy for paginated REST APIs
//!
//! This crate forwards GET paths to an upstream REST API, transparently
//! following `Link: <...>; rel="next"` pagination to assemble complete
//! collections, and caches an allow-listed subset of paths for a fixed
//! TTL. For one repositories collection it also keeps four pre-sorted
//! ranking views (forks, stars, open issues, last update) and answers
//! "bottom N" queries from them.
//!
//! # Example
//!
//! ```rust,no_run
//! use readcache::ReadCache;
//!
//! #[tokio::main]
//! async fn main() -> readcache::Result<()> {
//!     let proxy = ReadCache::builder()
//!         .base_url("https://api.github.com")
//!         .build()?;
//!
//!     // Cached for the configured TTL
//!     let repos = proxy.proxy_get("/orgs/Netflix/repos").await?;
//!     println!("{repos}");
//!
//!     // [["Netflix/least-forked", 0], ...]
//!     println!("{}", proxy.bottom_n_json("forks", 5).await?);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
pub mod proxy;
pub mod ranking;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod upstream;
pub mod version;

// Re-export main types at crate root
pub use cache::CacheConfig;
pub use error::{ProxyError, Result};
pub use proxy::{CachePolicy, ReadCache, ReadCacheBuilder, ReadCacheProxy};
pub use ranking::{Criterion, OrderValue, RankedEntry, RepositoryViewSet};
pub use upstream::{Upstream, UpstreamClient, UpstreamConfig};
pub use version::{PKG_VERSION, version_string};
