//! HTTP client with built-in retry logic and error handling.

use log::{debug, warn};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use super::retry::{backoff_delay, classify_status, retry_after_seconds};
use crate::error::Result;

/// HTTP client wrapping a reqwest [`Client`] with bounded
/// exponential-backoff retry for every request.
#[derive(Clone)]
pub(crate) struct HttpClient {
    client: Client,
    max_retries: usize,
}

impl HttpClient {
    /// Creates a new HTTP client. `max_retries` is the total number of
    /// attempts per request; at least one attempt is always made.
    pub(crate) fn new(client: Client, max_retries: usize) -> Self {
        Self {
            client,
            max_retries: max_retries.max(1),
        }
    }

    /// Performs a GET request and deserializes the JSON response.
    /// Automatically retries on transient errors.
    #[tracing::instrument(skip(self))]
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET JSON from {}...", url);

        self.with_retry("GET JSON", || async {
            self.send_json(self.client.get(url)).await
        })
        .await
    }

    /// Performs a GET request with query parameters and deserializes the
    /// JSON response. Automatically retries on transient errors.
    #[tracing::instrument(skip(self, query))]
    pub(crate) async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!("GET JSON from {} with query {:?}...", url, query);

        self.with_retry("GET JSON with query", || async {
            self.send_json(self.client.get(url).query(query)).await
        })
        .await
    }

    /// Performs a POST request with a pre-serialized JSON body and
    /// deserializes the JSON response. Automatically retries on
    /// transient errors.
    #[tracing::instrument(skip(self, body, headers))]
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: String,
        headers: &[(&str, String)],
    ) -> Result<T> {
        debug!("POST JSON to {}...", url);

        self.with_retry("POST JSON", || async {
            let mut request = self
                .client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
            for (name, value) in headers {
                request = request.header(*name, value);
            }
            self.send_json(request).await
        })
        .await
    }

    /// Single attempt: sends the request and maps any non-success status
    /// to the typed error before the body is consumed as JSON.
    async fn send_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let retry_after = retry_after_seconds(response.headers());
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, retry_after, &body))
    }

    /// Executes an async operation with retry logic. Only errors marked
    /// retryable are attempted again; the delay between attempts grows
    /// exponentially with jitter.
    async fn with_retry<F, Fut, T>(&self, operation_name: &str, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !e.is_retryable() {
                        debug!("{}: non-retryable error: {}", operation_name, e);
                        return Err(e);
                    }

                    if attempt >= self.max_retries {
                        warn!(
                            "{}: giving up after {} attempts ({})",
                            operation_name, attempt, e
                        );
                        return Err(e);
                    }

                    let delay = backoff_delay(attempt);
                    warn!(
                        "{}: attempt {}/{} failed ({}), retrying in {:?}...",
                        operation_name, attempt, self.max_retries, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
