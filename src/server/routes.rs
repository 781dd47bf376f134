use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tracing::error;

use crate::{ProxyError, ReadCacheProxy, Result};

type SharedProxy = Arc<ReadCacheProxy>;

/// Build the router.
///
/// - `GET /healthcheck` answers `200` or `503` with the status as body
/// - `GET /view/bottom/{n}/{ordered_by}` answers a bottom-N ranking
/// - any other `GET` is proxied through [`ReadCacheProxy::proxy_get`]
pub fn router(proxy: SharedProxy) -> Router {
    Router::new()
        .route("/healthcheck", get(health_check))
        .route("/view/bottom/{n}/{ordered_by}", get(bottom_n))
        .fallback(forward)
        .with_state(proxy)
}

/// HTTP status for an error surfaced to a client.
///
/// Upstream 4xx responses pass through unchanged and other upstream
/// failures are a bad gateway. An unusable request path is a bad request.
/// Anything else is an internal error.
pub fn status_for(err: &ProxyError) -> StatusCode {
    match err {
        ProxyError::Api { status, .. } if (400..500).contains(status) => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        e if e.is_upstream() => StatusCode::BAD_GATEWAY,
        ProxyError::PageLimitExceeded { .. }
        | ProxyError::MalformedResponse(_)
        | ProxyError::MissingField { .. } => StatusCode::BAD_GATEWAY,
        ProxyError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn health_check(State(proxy): State<SharedProxy>) -> Response {
    let status = if proxy.upstream_healthy().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    json(status, status.as_u16().to_string())
}

async fn bottom_n(
    State(proxy): State<SharedProxy>,
    Path((n, ordered_by)): Path<(usize, String)>,
) -> Response {
    respond(proxy.bottom_n_json(&ordered_by, n).await)
}

async fn forward(State(proxy): State<SharedProxy>, method: Method, uri: Uri) -> Response {
    if method != Method::GET {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }
    respond(proxy.proxy_get(uri.path()).await)
}

fn respond(result: Result<String>) -> Response {
    match result {
        Ok(body) => json(StatusCode::OK, body),
        Err(e) => {
            let status = status_for(&e);
            error!(error = %e, status = status.as_u16(), "request failed");
            json(status, serde_json::json!({ "error": e.to_string() }).to_string())
        }
    }
}

fn json(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
