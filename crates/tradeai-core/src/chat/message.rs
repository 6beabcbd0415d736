//! Chat message domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix marking a locally generated, not-yet-confirmed message id.
pub const PROVISIONAL_PREFIX: &str = "temp-";

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Server-side processing state of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ProcessingStatus {
    /// Returns true once the server will no longer change this message.
    pub fn is_settled(self) -> bool {
        matches!(self, ProcessingStatus::Completed | ProcessingStatus::Failed)
    }
}

/// A single chat message as held by the message store.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Durable server id, or a provisional `temp-...` id before the server
    /// has acknowledged the message.
    pub id: String,
    pub role: Role,
    /// Text body; may be empty for image-only messages.
    pub content: String,
    /// Attached image (user) or annotated chart (assistant), if any.
    pub image: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Server-sourced processing state; absent on provisional entries.
    pub status: Option<ProcessingStatus>,
    /// AI analysis fields, present on annotated assistant replies.
    pub prediction: Option<String>,
    pub confidence_pct: Option<String>,
    pub explanation: Option<String>,
}

impl Message {
    /// Creates a provisional user message stamped with the current time.
    pub fn provisional(content: impl Into<String>, image: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: provisional_id(now),
            role: Role::User,
            content: content.into(),
            image,
            timestamp: now,
            status: None,
            prediction: None,
            confidence_pct: None,
            explanation: None,
        }
    }

    /// Returns true if this entry has not been confirmed by the server.
    pub fn is_provisional(&self) -> bool {
        self.id.starts_with(PROVISIONAL_PREFIX)
    }

    /// Creates a bare server-confirmed message (fixture constructor; wire
    /// records carry more fields and convert via the api layer).
    pub fn durable(
        id: impl Into<String>,
        role: Role,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            image: None,
            timestamp,
            status: None,
            prediction: None,
            confidence_pct: None,
            explanation: None,
        }
    }
}

/// Server acknowledgement of a created message.
///
/// Older backends omit the id (and sometimes the timestamp) from the create
/// response; absent fields leave the provisional values in place.
#[derive(Debug, Clone, Default)]
pub struct MessageAck {
    pub id: Option<String>,
    pub image: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub status: Option<ProcessingStatus>,
}

/// Generates a provisional message id: `temp-<millis>-<random>`.
fn provisional_id(now: DateTime<Utc>) -> String {
    let nonce = Uuid::new_v4().simple().to_string();
    format!("{PROVISIONAL_PREFIX}{}-{}", now.timestamp_millis(), &nonce[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provisional_message_has_temp_id() {
        let msg = Message::provisional("hello", None);
        assert!(msg.is_provisional());
        assert!(msg.id.starts_with(PROVISIONAL_PREFIX));
        assert_eq!(msg.role, Role::User);
        assert!(msg.status.is_none());
    }

    #[test]
    fn test_provisional_ids_are_unique() {
        let a = Message::provisional("x", None);
        let b = Message::provisional("x", None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_settled_statuses() {
        assert!(ProcessingStatus::Completed.is_settled());
        assert!(ProcessingStatus::Failed.is_settled());
        assert!(!ProcessingStatus::Pending.is_settled());
        assert!(!ProcessingStatus::Processing.is_settled());
    }
}
