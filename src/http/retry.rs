//! Status classification and backoff schedule for retried requests.

use rand::Rng;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::Duration;

use crate::error::Error;

/// Base delay for the first retry; doubles on each subsequent attempt.
const BACKOFF_BASE_MS: u64 = 1000;

/// Upper bound of the random jitter added to each delay.
const JITTER_MS: u64 = 1000;

/// Delay before retry number `attempt` (1-indexed): exponential backoff
/// with random jitter to avoid thundering herds.
pub(crate) fn backoff_delay(attempt: usize) -> Duration {
    let exp = (attempt.min(6) as u32).saturating_sub(1);
    let base = BACKOFF_BASE_MS << exp;
    let jitter = rand::thread_rng().gen_range(0..JITTER_MS);
    Duration::from_millis(base + jitter)
}

/// Extracts the `Retry-After` value in seconds, if present.
pub(crate) fn retry_after_seconds(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// Maps a non-success HTTP response to the typed error.
/// Whether the result is worth retrying is decided by
/// [`Error::is_retryable`]: 429 and 5xx are, other 4xx are terminal.
pub(crate) fn classify_status(status: StatusCode, retry_after: Option<u64>, body: &str) -> Error {
    match status {
        StatusCode::UNAUTHORIZED => Error::Authentication("invalid API key".to_string()),
        StatusCode::UNPROCESSABLE_ENTITY => Error::Validation(message_or(body, "invalid request")),
        StatusCode::TOO_MANY_REQUESTS => Error::RateLimit { retry_after },
        StatusCode::NOT_FOUND => {
            Error::NotFound(message_or(body, "the requested resource was not found"))
        }
        s => Error::Api {
            status: s.as_u16(),
            message: message_or(body, s.canonical_reason().unwrap_or("unexpected status")),
        },
    }
}

fn message_or(body: &str, fallback: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        fallback.to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_exponentially() {
        for attempt in 1..=3 {
            let base = BACKOFF_BASE_MS << (attempt as u32 - 1);
            let delay = backoff_delay(attempt).as_millis() as u64;
            assert!(delay >= base, "attempt {attempt}: {delay} < {base}");
            assert!(delay < base + JITTER_MS);
        }
    }

    #[test]
    fn test_backoff_is_capped() {
        let delay = backoff_delay(50).as_millis() as u64;
        assert!(delay < (BACKOFF_BASE_MS << 5) + JITTER_MS);
    }

    #[test]
    fn test_retry_after_parsed() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, "60".parse().unwrap());
        assert_eq!(retry_after_seconds(&headers), Some(60));
    }

    #[test]
    fn test_retry_after_absent_or_malformed() {
        assert_eq!(retry_after_seconds(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, "Wed, 21 Oct 2026 07:28:00 GMT".parse().unwrap());
        assert_eq!(retry_after_seconds(&headers), None);
    }

    #[test]
    fn test_classify_unauthorized() {
        let err = classify_status(StatusCode::UNAUTHORIZED, None, "");
        assert!(matches!(err, Error::Authentication(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_classify_unprocessable_carries_body() {
        let err = classify_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            None,
            r#"{"error": "bad action"}"#,
        );
        match err {
            Error::Validation(msg) => assert!(msg.contains("bad action")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_rate_limit() {
        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, Some(30), "");
        match err {
            Error::RateLimit { retry_after } => assert_eq!(retry_after, Some(30)),
            other => panic!("expected RateLimit, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_not_found() {
        let err = classify_status(StatusCode::NOT_FOUND, None, "");
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_classify_other_client_error_is_terminal() {
        let err = classify_status(StatusCode::BAD_REQUEST, None, "bad request");
        assert!(matches!(err, Error::Api { status: 400, .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_classify_server_error_is_retryable() {
        let err = classify_status(StatusCode::SERVICE_UNAVAILABLE, None, "");
        assert!(matches!(err, Error::Api { status: 503, .. }));
        assert!(err.is_retryable());
    }
}
