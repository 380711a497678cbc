//! HTTP transport with retry logic and status classification.

mod client;
mod retry;

pub(crate) use client::HttpClient;
