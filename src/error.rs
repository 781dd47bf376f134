//! Readcache error types

use std::sync::Arc;

/// Readcache error types
///
/// `Clone` so that one failed shared fetch can be handed to every caller
/// waiting on it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProxyError {
    // Upstream errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("upstream error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("pagination exceeded {limit} pages")]
    PageLimitExceeded { limit: u32 },

    // Data errors
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A required repository field is absent (or null) on the record at `index`.
    #[error("missing field '{field}' on record {index}")]
    MissingField { field: &'static str, index: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("operation not implemented: {0}")]
    NotImplemented(&'static str),
}

impl ProxyError {
    /// Whether this error came from reaching (or talking to) the upstream.
    pub fn is_upstream(&self) -> bool {
        matches!(self, ProxyError::Http(_) | ProxyError::Api { .. })
    }

    /// HTTP status reported by the upstream, if it answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProxyError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ProxyError {
    fn from(err: serde_json::Error) -> Self {
        ProxyError::MalformedResponse(err.to_string())
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        ProxyError::Http(err.to_string())
    }
}

impl From<Arc<ProxyError>> for ProxyError {
    fn from(err: Arc<ProxyError>) -> Self {
        Arc::unwrap_or_clone(err)
    }
}

/// Result type alias for readcache operations
pub type Result<T> = std::result::Result<T, ProxyError>;
