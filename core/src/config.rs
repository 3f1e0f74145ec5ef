//! Client configuration options.

use std::time::Duration;

use crate::error::{ApiError, Result};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.ulule.com/v1";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default cap on a response body, in bytes.
pub const DEFAULT_MAX_BODY_SIZE: u64 = 64 * 1024 * 1024;

/// Configuration for `UluleClient`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use ulule_core::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(10))
///     .with_user_agent("my-app/1.0");
/// assert_eq!(config.base_url, "https://api.ulule.com/v1");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root every resource path is appended to, without trailing slash.
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Skip TLS certificate verification. Test environments only.
    pub accept_invalid_certs: bool,
    /// Largest response body read before the request fails, in bytes.
    pub max_body_size: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("ulule-core/{} (Rust)", env!("CARGO_PKG_VERSION")),
            accept_invalid_certs: false,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `ULULE_API_URL` and `ULULE_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("ULULE_API_URL") {
            config = config.with_base_url(url);
        }
        if let Ok(secs) = std::env::var("ULULE_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| ApiError::Config(format!("ULULE_TIMEOUT_SECS is not a number: {secs}")))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Point the client at another API root (a staging host or a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Raise or lower the response body cap. Large supporter or order pages
    /// can exceed a few megabytes.
    pub fn with_max_body_size(mut self, bytes: u64) -> Self {
        self.max_body_size = bytes;
        self
    }

    /// Disable TLS certificate verification.
    ///
    /// Only meant for test servers with self-signed certificates; never
    /// enable this against the production API.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}
