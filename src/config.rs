//! Client configuration and construction of the underlying HTTP client.

use log::{debug, warn};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::time::Duration;

use crate::error::{Error, Result};

/// Version embedded at build time from git tags.
pub const VERSION: &str = env!("LOGVAULT_VERSION");

const USER_AGENT: &str = concat!("logvault-rust/", env!("LOGVAULT_VERSION"));

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.logvault.eu";

/// Configuration for a LogVault client.
///
/// ```
/// use logvault::ClientConfig;
///
/// let config = ClientConfig::new("lv_test_abc123")
///     .base_url("https://sandbox.example.com")
///     .max_retries(5);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) connect_timeout: Duration,
    pub(crate) timeout: Duration,
    pub(crate) max_retries: usize,
    pub(crate) enable_nonce: bool,
}

impl ClientConfig {
    /// Creates a configuration with the default endpoint, timeouts
    /// (5 s connect, 10 s request) and retry budget (3 attempts).
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(10),
            max_retries: 3,
            enable_nonce: false,
        }
    }

    /// Overrides the API endpoint. Trailing slashes are stripped.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Overrides the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Overrides the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the maximum number of attempts per request.
    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Attaches a fresh `X-Nonce` header to every submitted event, for
    /// server-side replay detection.
    pub fn enable_nonce(mut self, enable: bool) -> Self {
        self.enable_nonce = enable;
        self
    }

    /// Builds the underlying reqwest client with bearer auth and version
    /// headers. Fails on an empty API key; an unexpected key prefix only
    /// warns, in case key formats change server-side.
    pub(crate) fn build_http_client(&self) -> Result<reqwest::Client> {
        if self.api_key.is_empty() {
            return Err(Error::Config("API key is required".to_string()));
        }

        if !self.api_key.starts_with("lv_live_") && !self.api_key.starts_with("lv_test_") {
            warn!("API key does not start with expected 'lv_live_'/'lv_test_' prefix");
        } else if self.api_key.len() > 12 {
            debug!(
                "Using API key {}*********{}",
                &self.api_key[..8],
                &self.api_key[self.api_key.len() - 4..]
            );
        }

        let mut headers = HeaderMap::new();
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| Error::Config(format!("API key is not a valid header value: {e}")))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        if let Ok(version) = HeaderValue::from_str(VERSION) {
            headers.insert("X-Client-Version", version);
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .build()?;

        Ok(client)
    }
}
