//! Client library for the LogVault hosted audit-logging API.
//!
//! Submits structured audit events and reads back previously recorded
//! events over HTTPS, with bounded exponential-backoff retry and typed
//! errors. Both a non-blocking [`Client`] and a [`blocking::Client`]
//! are provided.
//!
//! ```no_run
//! use logvault::{Client, EventDraft, Level};
//!
//! # async fn example() -> logvault::Result<()> {
//! let client = Client::new("lv_test_abc123")?;
//!
//! client
//!     .log(
//!         EventDraft::new("user.login")
//!             .user_id("user_123")
//!             .level(Level::Info)
//!             .metadata_entry("ip", "1.2.3.4"),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod blocking;
mod client;
mod config;
mod error;
mod event;
mod http;

pub use client::{AuditLog, Client, DEFAULT_SEARCH_LIMIT};
pub use config::{ClientConfig, DEFAULT_BASE_URL, VERSION};
pub use error::{Error, Result};
pub use event::{
    Event, EventDraft, EventPage, EventReceipt, Level, ListQuery, MAX_PAYLOAD_BYTES, SearchResults,
    Verification,
};
