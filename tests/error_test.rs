use std::sync::Arc;

use readcache::{ProxyError, Result};

#[test]
fn test_error_display() {
    let err = ProxyError::MissingField {
        field: "forks_count",
        index: 3,
    };
    let msg = err.to_string();
    assert!(msg.contains("forks_count"));
    assert!(msg.contains('3'));
}

#[test]
fn test_not_implemented() {
    let err = ProxyError::NotImplemented("ping");
    assert!(err.to_string().contains("not implemented"));
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(ProxyError::PageLimitExceeded { limit: 10 })
    }
    assert!(returns_error().is_err());
}

// ============================================================================
// Upstream classification
// ============================================================================

#[test]
fn upstream_errors() {
    assert!(ProxyError::Http("connection reset".into()).is_upstream());
    assert!(
        ProxyError::Api {
            status: 502,
            message: "bad gateway".into()
        }
        .is_upstream()
    );
}

#[test]
fn local_errors() {
    assert!(!ProxyError::MalformedResponse("x".into()).is_upstream());
    assert!(!ProxyError::Configuration("x".into()).is_upstream());
    assert!(!ProxyError::PageLimitExceeded { limit: 1 }.is_upstream());
    assert!(!ProxyError::NotImplemented("ping").is_upstream());
}

#[test]
fn status_code_only_for_api_errors() {
    let err = ProxyError::Api {
        status: 404,
        message: "Not Found".into(),
    };
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(ProxyError::Http("x".into()).status_code(), None);
}

// ============================================================================
// Conversions
// ============================================================================

#[test]
fn json_errors_are_malformed_responses() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: ProxyError = json_err.into();
    assert!(matches!(err, ProxyError::MalformedResponse(_)));
}

#[test]
fn shared_errors_unwrap() {
    let shared = Arc::new(ProxyError::Http("reset".into()));
    let waiter = Arc::clone(&shared);

    let first: ProxyError = shared.into();
    let second: ProxyError = waiter.into();
    assert!(matches!(first, ProxyError::Http(ref m) if m == "reset"));
    assert!(matches!(second, ProxyError::Http(ref m) if m == "reset"));
}
