//! Configuration loading for readcached.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.readcache/config.toml` (user)
//! 3. `/etc/readcache/config.toml` (system)
//! 4. built-in defaults
//!
//! The upstream token is loaded separately with mandatory permission checks:
//! 1. `~/.readcache/secrets.toml` (user, must be 0600)
//! 2. `/etc/readcache/secrets.toml` (system, must be 0600)
//! 3. the `GITHUB_API_TOKEN` environment variable

use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::proxy::{DEFAULT_CACHEABLE_PATHS, DEFAULT_REPOSITORIES_PATH};
use crate::upstream::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, UpstreamConfig};
use crate::{ProxyError, ReadCache, ReadCacheBuilder, Result};

/// Environment variable holding the upstream API token.
pub const TOKEN_ENV_VAR: &str = "GITHUB_API_TOKEN";

/// Environment variable overriding the port of the bind address.
pub const PORT_ENV_VAR: &str = "SERVER_PORT";

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8080).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0:8080".to_string()
}

/// Upstream connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSettings {
    /// Upstream base URL (default: https://api.github.com).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// `per_page` sent with every request (default: 150).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Per-request timeout in seconds (default: 60).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Hard cap on pages per fetch (default: unbounded).
    #[serde(default)]
    pub max_pages: Option<u32>,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            timeout_secs: default_timeout(),
            max_pages: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_timeout() -> u64 {
    60
}

/// Cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Entry time-to-live in seconds, shared by both caches (default: 60).
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
    /// Maximum entries per cache (default: 10,000).
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    /// Allow-listed cacheable paths.
    #[serde(default = "default_cacheable")]
    pub cacheable: Vec<String>,
    /// Repositories collection the ranking views are built from.
    #[serde(default = "default_repositories_path")]
    pub repositories_path: String,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            max_entries: default_max_entries(),
            cacheable: default_cacheable(),
            repositories_path: default_repositories_path(),
        }
    }
}

fn default_ttl() -> u64 {
    60
}

fn default_max_entries() -> u64 {
    10_000
}

fn default_cacheable() -> Vec<String> {
    DEFAULT_CACHEABLE_PATHS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_repositories_path() -> String {
    DEFAULT_REPOSITORIES_PATH.to_string()
}

/// Secrets configuration (upstream token).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub upstream: Option<TokenSecret>,
}

/// A single token secret.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSecret {
    pub token: String,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided; must exist)
    /// 2. `~/.readcache/config.toml`
    /// 3. `/etc/readcache/config.toml`
    /// 4. Built-in defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ProxyError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            ProxyError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path, or `None` to use defaults.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(ProxyError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".readcache").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/readcache/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// The socket address to bind, with the port taken from
    /// `SERVER_PORT` when that variable is set.
    pub fn bind_address(&self) -> Result<SocketAddr> {
        self.bind_address_with_port(std::env::var(PORT_ENV_VAR).ok().as_deref())
    }

    /// The socket address to bind, with an optional port override.
    pub fn bind_address_with_port(&self, port: Option<&str>) -> Result<SocketAddr> {
        let mut addr: SocketAddr = self.server.address.parse().map_err(|e| {
            ProxyError::Configuration(format!("Invalid address {:?}: {e}", self.server.address))
        })?;
        if let Some(port) = port {
            let port: u16 = port.parse().map_err(|e| {
                ProxyError::Configuration(format!("Invalid {PORT_ENV_VAR} {port:?}: {e}"))
            })?;
            addr.set_port(port);
        }
        Ok(addr)
    }

    /// A proxy builder carrying every setting from this config.
    pub fn proxy_builder(&self, token: Option<String>) -> ReadCacheBuilder {
        let mut upstream = UpstreamConfig::new(&self.upstream.base_url)
            .page_size(self.upstream.page_size)
            .timeout(Duration::from_secs(self.upstream.timeout_secs));
        upstream.max_pages = self.upstream.max_pages;
        upstream.token = token;

        ReadCache::builder()
            .upstream_config(upstream)
            .cache(
                CacheConfig::new()
                    .ttl(Duration::from_secs(self.cache.ttl_secs))
                    .max_entries(self.cache.max_entries),
            )
            .cacheable_paths(self.cache.cacheable.iter().cloned())
            .repositories_path(&self.cache.repositories_path)
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Resolution order:
    /// 1. `~/.readcache/secrets.toml` (if exists, must be 0600)
    /// 2. `/etc/readcache/secrets.toml` (if exists, must be 0600)
    ///
    /// Returns empty secrets if no file exists (the token may come from the
    /// environment).
    pub fn load() -> Result<Self> {
        // Try user secrets first
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".readcache").join("secrets.toml");
            if user_secrets.exists() {
                Self::check_permissions(&user_secrets)?;
                return Self::load_from_file(&user_secrets);
            }
        }

        // Try system secrets
        let system_secrets = PathBuf::from("/etc/readcache/secrets.toml");
        if system_secrets.exists() {
            Self::check_permissions(&system_secrets)?;
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ProxyError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            ProxyError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            ProxyError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(ProxyError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// The upstream token, falling back to `GITHUB_API_TOKEN`.
    pub fn token(&self) -> Option<String> {
        self.upstream
            .as_ref()
            .map(|s| s.token.clone())
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok())
    }
}
