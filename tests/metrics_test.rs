//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use readcache::telemetry;
use readcache::{ProxyError, ReadCache, Result, Upstream, UpstreamClient, UpstreamConfig};

// ============================================================================
// Mock upstream
// ============================================================================

struct StaticUpstream;

#[async_trait]
impl Upstream for StaticUpstream {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self, path: &str) -> Result<String> {
        match path {
            "/orgs/Netflix/repos" => Ok(r#"[{"full_name":"a","forks_count":1,"stargazers_count":1,"open_issues_count":1,"updated_at":"2020"}]"#.to_string()),
            "/orgs/Netflix" => Ok("{}".to_string()),
            _ => Err(ProxyError::Api {
                status: 404,
                message: "Not Found".into(),
            }),
        }
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Sum counter values for a metric name carrying a given label value.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label && l.value() == value)
        })
        .map(|(_, _, _, v)| match v {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn paginated_fetch_records_request_and_pages() {
    let server = MockServer::start().await;
    let next = format!(r#"<{}/repos?page=2>; rel="next""#, server.uri());
    Mock::given(method("GET"))
        .and(wiremock::matchers::query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", next.as_str())
                .set_body_string("[1]"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(wiremock::matchers::query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[2]"))
        .mount(&server)
        .await;

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let client = UpstreamClient::new(UpstreamConfig::new(server.uri())).unwrap();
                client.fetch("/repos").await
            })
        })
    });
    assert_eq!(result.unwrap(), "[1,2]");

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(
        counter_with_label(&snapshot, telemetry::UPSTREAM_REQUESTS_TOTAL, "status", "ok"),
        1,
        "expected 1 request counter"
    );
    assert_eq!(counter_total(&snapshot, telemetry::UPSTREAM_PAGES_TOTAL), 2);
    assert!(
        has_histogram(&snapshot, telemetry::UPSTREAM_REQUEST_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn failed_fetch_records_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let _result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let client = UpstreamClient::new(UpstreamConfig::new(server.uri())).unwrap();
                client.fetch("/repos").await
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_with_label(&snapshot, telemetry::UPSTREAM_REQUESTS_TOTAL, "status", "error"),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cache_lookups_record_hits_and_misses() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let proxy = ReadCache::builder()
                    .upstream(Arc::new(StaticUpstream))
                    .build()
                    .unwrap();
                proxy.proxy_get("/orgs/Netflix").await.unwrap();
                proxy.proxy_get("/orgs/Netflix").await.unwrap();
                proxy.select_bottom_n("forks", 1).await
            })
        })
    });
    assert_eq!(result.unwrap().len(), 1);

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(
        counter_with_label(&snapshot, telemetry::CACHE_MISSES_TOTAL, "cache", "response"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::CACHE_HITS_TOTAL, "cache", "response"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::CACHE_MISSES_TOTAL, "cache", "views"),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::VIEW_BUILDS_TOTAL), 1);
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let proxy = ReadCache::builder()
        .upstream(Arc::new(StaticUpstream))
        .build()
        .unwrap();
    proxy.proxy_get("/orgs/Netflix").await.unwrap();
}
