//! Typed errors for LogVault API operations.

use thiserror::Error;

/// Errors returned by the LogVault client.
#[derive(Debug, Error)]
pub enum Error {
    /// The API rejected the credentials (HTTP 401).
    #[error("authentication failed: {0}. Check your LogVault API key.")]
    Authentication(String),

    /// The request was rejected as invalid, either locally before sending
    /// or by the server (HTTP 422).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Rate limit or monthly quota exceeded (HTTP 429 after retries).
    #[error("rate limit exceeded{}", retry_after_suffix(.retry_after))]
    RateLimit {
        /// Seconds to wait before retrying, from the `Retry-After` header.
        retry_after: Option<u64>,
    },

    /// The requested event does not exist (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other unexpected HTTP status from the API.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code returned by the server.
        status: u16,
        /// Response body or status description.
        message: String,
    },

    /// The request never produced an HTTP response (connect failure,
    /// timeout, TLS error, ...).
    #[error("connection to LogVault failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// An event payload or API response could not be (de)serialized.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The client was constructed with unusable options.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

/// Result type alias for LogVault operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether a request that failed with this error may succeed if sent
    /// again. Transport failures, 5xx responses and rate limits clear on
    /// their own; everything else needs a different request.
    pub fn is_retryable(&self) -> bool {
        match self {
            // Connect failures and timeouts are worth retrying; a body that
            // failed to decode is not going to decode next time either.
            Error::Transport(e) => !e.is_decode() && e.status().is_none_or(|s| s.is_server_error()),
            Error::Api { status, .. } => *status >= 500,
            Error::RateLimit { .. } => true,
            _ => false,
        }
    }
}

fn retry_after_suffix(retry_after: &Option<u64>) -> String {
    match retry_after {
        Some(secs) => format!(", retry after {secs}s"),
        None => String::new(),
    }
}
