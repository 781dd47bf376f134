//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus,
//! statsd); without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `readcache_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `status`: outcome: "ok" or "error"
//! - `cache`: which store was consulted: "response" or "views"

/// Total upstream fetches (one per `fetch` call, regardless of page count).
///
/// Labels: `status` ("ok" | "error").
pub const UPSTREAM_REQUESTS_TOTAL: &str = "readcache_upstream_requests_total";

/// Upstream fetch duration in seconds, all pages included.
pub const UPSTREAM_REQUEST_DURATION_SECONDS: &str = "readcache_upstream_request_duration_seconds";

/// Total pages received from the upstream.
pub const UPSTREAM_PAGES_TOTAL: &str = "readcache_upstream_pages_total";

/// Total cache hits.
///
/// Labels: `cache`.
pub const CACHE_HITS_TOTAL: &str = "readcache_cache_hits_total";

/// Total cache misses.
///
/// Labels: `cache`.
pub const CACHE_MISSES_TOTAL: &str = "readcache_cache_misses_total";

/// Total ranking view sets built from a repositories snapshot.
pub const VIEW_BUILDS_TOTAL: &str = "readcache_view_builds_total";
