//! The upstream source trait.

use async_trait::async_trait;

use crate::{ProxyError, Result};

/// A source of raw JSON bodies, addressed by request path.
///
/// Implementations are responsible for assembling paginated collections
/// into a single body. Errors are surfaced as-is; the proxy never retries.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Upstream name for logging/debugging.
    fn name(&self) -> &str;

    /// Fetch the complete body for `path`.
    ///
    /// Array bodies are flattened across all pages; anything else is
    /// returned verbatim.
    async fn fetch(&self, path: &str) -> Result<String>;

    /// Check that the upstream is reachable and answering.
    async fn ping(&self) -> Result<()> {
        Err(ProxyError::NotImplemented("ping"))
    }
}
