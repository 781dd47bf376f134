//! Paginating HTTP client for the upstream REST API.
//!
//! Every request carries `Accept: application/json` and, when a token is
//! configured, `Authorization: token <token>`. Array responses are
//! followed through their `Link: <...>; rel="next"` header until the
//! upstream stops advertising a next page, and all pages are concatenated
//! into one JSON array. Any other body is returned exactly as received.
//!
//! # Page cap
//!
//! The upstream decides when pagination ends. A misbehaving upstream that
//! always advertises a next page keeps the loop going forever unless
//! [`UpstreamConfig::max_pages`] is set, in which case the fetch fails with
//! [`ProxyError::PageLimitExceeded`] instead.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, instrument};

use super::link::next_page_url;
use super::traits::Upstream;
use crate::telemetry;
use crate::{ProxyError, Result};

/// Default base URL for the upstream API.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 150;

const ACCEPT_JSON: &str = "application/json";
const TOKEN_SCHEME: &str = "token";
const PAGE_SIZE_PARAM: &str = "per_page";

/// Connection settings for [`UpstreamClient`].
///
/// ```rust
/// # use readcache::upstream::UpstreamConfig;
/// # use std::time::Duration;
/// let config = UpstreamConfig::new("https://api.github.com")
///     .token("ghp_example")
///     .page_size(100)
///     .timeout(Duration::from_secs(10));
/// assert_eq!(config.page_size, 100);
/// ```
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL every request path is appended to.
    pub base_url: String,
    /// Optional API token, sent as `Authorization: token <token>`.
    pub token: Option<String>,
    /// Value of the `per_page` query parameter. Default: 150.
    pub page_size: u32,
    /// Per-request timeout. Default: 60s.
    pub timeout: Duration,
    /// Hard cap on pages followed by a single fetch. Default: unbounded.
    pub max_pages: Option<u32>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(60),
            max_pages: None,
        }
    }
}

impl UpstreamConfig {
    /// Create a config for the given base URL with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the API token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the page size.
    pub fn page_size(mut self, n: u32) -> Self {
        self.page_size = n;
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Cap the number of pages a single fetch may follow.
    pub fn max_pages(mut self, n: u32) -> Self {
        self.max_pages = Some(n);
        self
    }
}

/// HTTP client that assembles paginated upstream collections.
#[derive(Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    page_size: u32,
    max_pages: Option<u32>,
}

impl UpstreamClient {
    /// Create a client from the given configuration.
    ///
    /// Fails if the base URL does not parse or the page size is zero.
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| {
            ProxyError::Configuration(format!("invalid upstream base URL {base_url:?}: {e}"))
        })?;
        if config.page_size == 0 {
            return Err(ProxyError::Configuration(
                "page size must be greater than zero".to_string(),
            ));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProxyError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            token: config.token,
            page_size: config.page_size,
            max_pages: config.max_pages,
        })
    }

    /// The base URL requests are sent to (without trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url + path` with the page size attached.
    fn first_page_url(&self, path: &str) -> Result<Url> {
        if !path.starts_with('/') {
            return Err(ProxyError::InvalidInput(format!(
                "upstream path {path:?} must start with '/'"
            )));
        }
        let raw = format!("{}{}", self.base_url, path);
        let mut url = Url::parse(&raw)
            .map_err(|e| ProxyError::InvalidInput(format!("invalid upstream URL {raw:?}: {e}")))?;
        url.query_pairs_mut()
            .append_pair(PAGE_SIZE_PARAM, &self.page_size.to_string());
        Ok(url)
    }

    /// Send one authenticated GET. Non-2xx answers become [`ProxyError::Api`].
    async fn send(&self, url: Url) -> Result<Response> {
        let mut request = self.http.get(url).header(ACCEPT, ACCEPT_JSON);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("{TOKEN_SCHEME} {token}"));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProxyError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn fetch_pages(&self, path: &str) -> Result<String> {
        let mut url = self.first_page_url(path)?;
        let mut items: Vec<Value> = Vec::new();
        let mut pages: u32 = 0;

        loop {
            if let Some(limit) = self.max_pages
                && pages >= limit
            {
                return Err(ProxyError::PageLimitExceeded { limit });
            }

            let response = self.send(url).await?;
            let next = response
                .headers()
                .get(LINK)
                .and_then(|value| value.to_str().ok())
                .and_then(next_page_url)
                .map(str::to_owned);
            let body = response.text().await?;
            pages += 1;
            metrics::counter!(telemetry::UPSTREAM_PAGES_TOTAL).increment(1);

            let parsed: Option<Value> = if body.trim().is_empty() {
                None
            } else {
                Some(serde_json::from_str(&body)?)
            };

            match parsed {
                Some(Value::Array(page)) => {
                    debug!(page = pages, items = page.len(), "received page");
                    items.extend(page);
                }
                // Single objects (and empty bodies) are never paginated
                _ if pages == 1 => return Ok(body),
                _ => {
                    return Err(ProxyError::MalformedResponse(format!(
                        "page {pages} of {path} is not a JSON array"
                    )));
                }
            }

            match next {
                Some(next) => {
                    url = Url::parse(&next).map_err(|e| {
                        ProxyError::MalformedResponse(format!("invalid next page link {next:?}: {e}"))
                    })?;
                }
                None => break,
            }
        }

        debug!(pages, items = items.len(), "pagination complete");
        Ok(serde_json::to_string(&Value::Array(items))?)
    }

    fn record_fetch(start: Instant, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL, "status" => status).increment(1);
        metrics::histogram!(telemetry::UPSTREAM_REQUEST_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());
    }
}

#[async_trait]
impl Upstream for UpstreamClient {
    fn name(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self), fields(upstream = %self.base_url))]
    async fn fetch(&self, path: &str) -> Result<String> {
        let start = Instant::now();
        let result = self.fetch_pages(path).await;
        Self::record_fetch(start, result.is_ok());
        result
    }

    #[instrument(skip(self), fields(upstream = %self.base_url))]
    async fn ping(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ProxyError::Configuration(format!("invalid upstream base URL: {e}")))?;
        let response = self.send(url).await?;
        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(ProxyError::Api {
                status: status.as_u16(),
                message: "unexpected health check status".to_string(),
            }),
        }
    }
}
