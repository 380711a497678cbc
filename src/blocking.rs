//! Blocking client for the LogVault API.
//!
//! Same operation surface as the non-blocking [`crate::Client`], driven
//! on an owned single-threaded tokio runtime. Intended for synchronous
//! applications; do not use it inside an async context.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::event::{Event, EventDraft, EventPage, EventReceipt, ListQuery, SearchResults, Verification};

/// Blocking client for the LogVault audit-logging API.
///
/// ```no_run
/// use logvault::{blocking, EventDraft};
///
/// # fn example() -> logvault::Result<()> {
/// let client = blocking::Client::new("lv_test_abc123")?;
/// let receipt = client.log(EventDraft::new("user.login").user_id("user_123"))?;
/// println!("recorded {}", receipt.id);
/// # Ok(())
/// # }
/// ```
pub struct Client {
    inner: crate::Client,
    runtime: tokio::runtime::Runtime,
}

impl Client {
    /// Creates a blocking client with default configuration.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Creates a blocking client from an explicit configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Config(format!("failed to start runtime: {e}")))?;
        let inner = crate::Client::with_config(config)?;
        Ok(Self { inner, runtime })
    }

    /// Returns the configured API endpoint.
    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    /// Submits an audit event and returns the server receipt.
    pub fn log(&self, draft: EventDraft) -> Result<EventReceipt> {
        self.runtime.block_on(self.inner.log(draft))
    }

    /// Lists recorded events.
    pub fn list_events(&self, query: ListQuery) -> Result<EventPage> {
        self.runtime.block_on(self.inner.list_events(query))
    }

    /// Fetches a single event by id.
    pub fn get_event(&self, event_id: &str) -> Result<Event> {
        self.runtime.block_on(self.inner.get_event(event_id))
    }

    /// Verifies the cryptographic signature of a recorded event.
    pub fn verify_event(&self, event_id: &str) -> Result<Verification> {
        self.runtime.block_on(self.inner.verify_event(event_id))
    }

    /// Searches events with a natural-language query.
    pub fn search_events(&self, query: &str, limit: usize) -> Result<SearchResults> {
        self.runtime.block_on(self.inner.search_events(query, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocking_log() {
        let mut server = mockito::Server::new();

        let mock = server
            .mock("POST", "/v1/events")
            .match_header("authorization", "Bearer lv_test_abc123")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "event_123", "signature": null}"#)
            .create();

        let client = Client::with_config(
            ClientConfig::new("lv_test_abc123").base_url(server.url()),
        )
        .unwrap();

        let receipt = client
            .log(EventDraft::new("user.login").user_id("user_123"))
            .unwrap();

        mock.assert();
        assert_eq!(receipt.id, "event_123");
    }

    #[test]
    fn test_blocking_list_events() {
        let mut server = mockito::Server::new();

        let mock = server
            .mock("GET", "/v1/events?page=1&page_size=50")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"events": [], "total": 0, "page": 1, "page_size": 50, "has_next": false}"#,
            )
            .create();

        let client = Client::with_config(
            ClientConfig::new("lv_test_abc123").base_url(server.url()),
        )
        .unwrap();

        let page = client.list_events(ListQuery::default()).unwrap();

        mock.assert();
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_blocking_invalid_action() {
        let client = Client::new("lv_test_abc123").unwrap();
        let result = client.log(EventDraft::new("nodots"));
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
