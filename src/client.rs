//! Non-blocking client for the LogVault API.

use async_trait::async_trait;
use log::debug;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::event::{Event, EventDraft, EventPage, EventReceipt, ListQuery, SearchResults, Verification};
use crate::http::HttpClient;

/// Default number of results returned by a search.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// The LogVault operation surface, mockable in consumer tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Submits an audit event.
    async fn log(&self, draft: EventDraft) -> Result<EventReceipt>;
    /// Lists recorded events with optional filters and pagination.
    async fn list_events(&self, query: ListQuery) -> Result<EventPage>;
    /// Fetches a single event by id.
    async fn get_event(&self, event_id: &str) -> Result<Event>;
    /// Verifies the cryptographic signature of a recorded event.
    async fn verify_event(&self, event_id: &str) -> Result<Verification>;
    /// Searches events with a natural-language query.
    async fn search_events(&self, query: &str, limit: usize) -> Result<SearchResults>;
}

/// Non-blocking client for the LogVault audit-logging API.
///
/// ```no_run
/// use logvault::{Client, EventDraft};
///
/// # async fn example() -> logvault::Result<()> {
/// let client = Client::new("lv_test_abc123")?;
/// let receipt = client
///     .log(EventDraft::new("user.login").user_id("user_123"))
///     .await?;
/// println!("recorded {}", receipt.id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    http: HttpClient,
    base_url: String,
    enable_nonce: bool,
}

impl Client {
    /// Creates a client with default configuration.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Creates a client from an explicit configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http = HttpClient::new(config.build_http_client()?, config.max_retries);
        Ok(Self {
            http,
            base_url: config.base_url,
            enable_nonce: config.enable_nonce,
        })
    }

    /// Returns the configured API endpoint.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submits an audit event and returns the server receipt.
    #[tracing::instrument(skip(self, draft), fields(action = draft.action()))]
    pub async fn log(&self, draft: EventDraft) -> Result<EventReceipt> {
        let body = draft.into_body()?;

        let mut headers = Vec::new();
        if self.enable_nonce {
            headers.push(("X-Nonce", Uuid::new_v4().to_string()));
        }

        self.http
            .post_json(&format!("{}/v1/events", self.base_url), body, &headers)
            .await
    }

    /// Lists recorded events.
    #[tracing::instrument(skip(self, query))]
    pub async fn list_events(&self, query: ListQuery) -> Result<EventPage> {
        self.http
            .get_json_with_query(&format!("{}/v1/events", self.base_url), &query.to_params())
            .await
    }

    /// Fetches a single event by id. A missing event is
    /// [`Error::NotFound`].
    #[tracing::instrument(skip(self))]
    pub async fn get_event(&self, event_id: &str) -> Result<Event> {
        self.http
            .get_json(&format!("{}/v1/events/{}", self.base_url, event_id))
            .await
    }

    /// Verifies the cryptographic signature of a recorded event.
    #[tracing::instrument(skip(self))]
    pub async fn verify_event(&self, event_id: &str) -> Result<Verification> {
        self.http
            .get_json(&format!(
                "{}/v1/events/{}/verify",
                self.base_url, event_id
            ))
            .await
    }

    /// Searches events with a natural-language query. Queries shorter
    /// than two characters are rejected locally.
    #[tracing::instrument(skip(self))]
    pub async fn search_events(&self, query: &str, limit: usize) -> Result<SearchResults> {
        if query.chars().count() < 2 {
            return Err(Error::Validation(
                "query must be at least 2 characters".to_string(),
            ));
        }

        debug!("Searching events for {:?} (limit {})...", query, limit);

        self.http
            .get_json_with_query(
                &format!("{}/v1/events/search", self.base_url),
                &[("q", query.to_string()), ("limit", limit.to_string())],
            )
            .await
    }
}

#[async_trait]
impl AuditLog for Client {
    async fn log(&self, draft: EventDraft) -> Result<EventReceipt> {
        Client::log(self, draft).await
    }

    async fn list_events(&self, query: ListQuery) -> Result<EventPage> {
        Client::list_events(self, query).await
    }

    async fn get_event(&self, event_id: &str) -> Result<Event> {
        Client::get_event(self, event_id).await
    }

    async fn verify_event(&self, event_id: &str) -> Result<Verification> {
        Client::verify_event(self, event_id).await
    }

    async fn search_events(&self, query: &str, limit: usize) -> Result<SearchResults> {
        Client::search_events(self, query, limit).await
    }
}
