//! HTTP front end for the proxy.
//!
//! This module provides:
//! - The axum router (`routes`): health check, bottom-N views, and a
//!   catch-all GET forwarder
//! - Configuration types (`config`) for the `readcached` daemon

pub mod config;
mod routes;

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::ReadCacheProxy;

pub use routes::{router, status_for};

/// Serve `proxy` on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    proxy: Arc<ReadCacheProxy>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(proxy).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
}
