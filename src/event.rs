//! Audit event types and submission payload validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::LazyLock;

use crate::error::{Error, Result};

/// Actions follow a "domain.event" dotted format, e.g. `user.login`.
static ACTION_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::RegexBuilder::new(r"^[a-z0-9_]+(\.[a-z0-9_]+)+$")
        .case_insensitive(true)
        .build()
        .expect("invalid action regex")
});

/// Maximum size of a serialized event payload in bytes (1 MiB).
pub const MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

/// Severity level attached to an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    /// Returns the string representation of this level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An audit event to be submitted, built field by field.
///
/// ```
/// use logvault::{EventDraft, Level};
///
/// let draft = EventDraft::new("user.login")
///     .user_id("user_123")
///     .level(Level::Info)
///     .metadata_entry("ip", "1.2.3.4");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    action: String,
    user_id: Option<String>,
    resource: Option<String>,
    metadata: Map<String, Value>,
    level: Level,
    message: Option<String>,
    timestamp: Option<DateTime<Utc>>,
}

impl EventDraft {
    /// Starts a draft for the given action. The action format is checked
    /// when the event is submitted, not here.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            user_id: None,
            resource: None,
            metadata: Map::new(),
            level: Level::Info,
            message: None,
            timestamp: None,
        }
    }

    /// Sets the acting user.
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Sets the resource the action applies to, e.g. `document:456`.
    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Replaces the metadata object.
    pub fn metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Adds a single metadata entry.
    pub fn metadata_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Sets the severity level. Defaults to [`Level::Info`].
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets a free-form message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets an explicit timestamp. Defaults to the submission time.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Returns the action of this draft.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Validates the draft and serializes it to the wire payload.
    /// Fails if the action is not in "domain.event" format or the
    /// serialized payload exceeds [`MAX_PAYLOAD_BYTES`].
    pub(crate) fn into_body(self) -> Result<String> {
        if !ACTION_REGEX.is_match(&self.action) {
            return Err(Error::Validation(format!(
                "invalid action format '{}', expected 'domain.event'",
                self.action
            )));
        }

        let payload = Payload {
            action: &self.action,
            user_id: self.user_id.as_deref(),
            resource: self.resource.as_deref(),
            metadata: &self.metadata,
            level: self.level,
            message: self.message.as_deref(),
            timestamp: self.timestamp.unwrap_or_else(Utc::now).to_rfc3339(),
        };

        let body = serde_json::to_string(&payload)?;
        if body.len() > MAX_PAYLOAD_BYTES {
            return Err(Error::Validation(format!(
                "payload size {} exceeds {} bytes",
                body.len(),
                MAX_PAYLOAD_BYTES
            )));
        }

        Ok(body)
    }
}

#[derive(Serialize)]
struct Payload<'a> {
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource: Option<&'a str>,
    metadata: &'a Map<String, Value>,
    level: Level,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    timestamp: String,
}

/// A recorded audit event as returned by the API.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Event {
    pub id: String,
    pub action: String,
    pub user_id: Option<String>,
    pub resource: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub level: Level,
    pub message: Option<String>,
    pub timestamp: String,
}

/// Response to a successful event submission.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EventReceipt {
    pub id: String,
    /// Server-side signature over the stored event, if signing is enabled.
    pub signature: Option<String>,
}

/// One page of listed events.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EventPage {
    #[serde(default)]
    pub events: Vec<Event>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub has_next: bool,
}

/// Result of verifying the cryptographic signature of a stored event.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Verification {
    pub valid: bool,
    /// Additional verification details reported by the server.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Semantic search results.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SearchResults {
    #[serde(default)]
    pub results: Vec<Event>,
    pub count: u64,
    #[serde(default)]
    pub has_embeddings: bool,
}

/// Filters and pagination for listing events.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    page: u32,
    page_size: u32,
    user_id: Option<String>,
    action: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
            user_id: None,
            action: None,
        }
    }
}

impl ListQuery {
    /// Page number, 1-indexed.
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Events per page. The API caps pages at 100 events.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Only return events for this user.
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Only return events matching this action (wildcards with `*`).
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.min(100).to_string()),
        ];
        if let Some(user_id) = &self.user_id {
            params.push(("user_id", user_id.clone()));
        }
        if let Some(action) = &self.action {
            params.push(("action", action.clone()));
        }
        params
    }
}
