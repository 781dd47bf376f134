//! readcached: read-through caching proxy daemon.
//!
//! Serves a [`ReadCacheProxy`](readcache::ReadCacheProxy) over HTTP.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use readcache::server::config::{Config, Secrets};

/// readcached: caching proxy for paginated REST APIs.
#[derive(Parser)]
#[command(name = "readcached")]
#[command(version = readcache::PKG_VERSION)]
#[command(about = "Read-through caching proxy daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;

    let proxy = config.proxy_builder(secrets.token()).build()?;
    let addr = config.bind_address()?;

    info!(version = readcache::version_string(), %addr, "readcached starting");

    let listener = TcpListener::bind(addr).await?;
    readcache::server::serve(listener, Arc::new(proxy), shutdown_signal()).await?;

    info!("readcached stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
