//! Wire types and their normalization into domain values.
//!
//! The API has grown two response shapes for list endpoints (a paginated
//! object and a legacy bare array); both are normalized here, at the
//! boundary, so the rest of the client sees one canonical form.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::chat::message::{Message, MessageAck, ProcessingStatus, Role};

// ============================================================================
// Dual-shape list responses
// ============================================================================

/// A list endpoint response: paginated object or legacy bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Paged<T> {
    Paginated {
        count: Option<u64>,
        next: Option<String>,
        results: Vec<T>,
    },
    Bare(Vec<T>),
}

impl<T> Paged<T> {
    /// Flattens into (items, total, has_more).
    ///
    /// A bare array is the legacy full-history shape: no further pages.
    pub fn flatten(self) -> (Vec<T>, Option<u64>, bool) {
        match self {
            Paged::Paginated {
                count,
                next,
                results,
            } => (results, count, next.is_some()),
            Paged::Bare(items) => {
                let total = items.len() as u64;
                (items, Some(total), false)
            }
        }
    }
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: User,
}

// ============================================================================
// Conversations
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConversationRecord {
    pub id: String,
    pub title: Option<String>,
    pub message_count: Option<u64>,
    pub last_message_preview: Option<String>,
    pub last_message_time: Option<String>,
    pub updated_at: Option<String>,
}

/// A conversation as listed in the picker.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub message_count: u64,
    pub last_message_preview: Option<String>,
    pub last_message_time: Option<DateTime<Utc>>,
}

impl ConversationRecord {
    pub fn into_conversation(self) -> Conversation {
        let last_message_time = self
            .last_message_time
            .or(self.updated_at)
            .as_deref()
            .and_then(parse_timestamp_lenient);
        Conversation {
            id: self.id,
            title: self
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            message_count: self.message_count.unwrap_or(0),
            last_message_preview: self.last_message_preview,
            last_message_time,
        }
    }
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MessageRecord {
    pub id: Option<String>,
    pub sender: Sender,
    #[serde(default)]
    pub content: String,
    pub image_file: Option<String>,
    pub annotated_image: Option<String>,
    pub timestamp: Option<String>,
    pub processing_status: Option<ProcessingStatus>,
    pub prediction: Option<String>,
    pub confidence_percentage: Option<String>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Sender {
    User,
    Ai,
}

impl MessageRecord {
    fn role(&self) -> Role {
        match self.sender {
            Sender::User => Role::User,
            Sender::Ai => Role::Assistant,
        }
    }

    /// Picks the image to display: the assistant's annotated chart wins for
    /// AI messages, the raw upload for user messages.
    fn display_image(&self) -> Option<String> {
        match self.sender {
            Sender::Ai => self.annotated_image.clone().or(self.image_file.clone()),
            Sender::User => self.image_file.clone().or(self.annotated_image.clone()),
        }
    }

    /// Converts a listed record into a domain message.
    ///
    /// Records without an id cannot be addressed for dedup and are dropped
    /// with a warning; list endpoints always assign ids in practice.
    pub fn into_message(self) -> Option<Message> {
        let Some(id) = self.id.clone() else {
            warn!("dropping listed message without id");
            return None;
        };
        let timestamp = parse_timestamp(self.timestamp.as_deref());
        let image = self.display_image();
        Some(Message {
            id,
            role: self.role(),
            content: self.content,
            image,
            timestamp,
            status: self.processing_status,
            prediction: self.prediction,
            confidence_pct: self.confidence_percentage,
            explanation: self.explanation,
        })
    }

    /// Converts a create response into an acknowledgement.
    ///
    /// Missing fields (older backends omit the id) stay `None` so the
    /// provisional entry keeps its values.
    pub fn into_ack(self) -> MessageAck {
        let timestamp = self
            .timestamp
            .as_deref()
            .and_then(parse_timestamp_lenient);
        MessageAck {
            image: self.display_image(),
            id: self.id,
            timestamp,
            status: self.processing_status,
        }
    }
}

/// A normalized page of messages.
#[derive(Debug, Clone)]
pub struct MessagePage {
    /// Messages in ascending timestamp order.
    pub messages: Vec<Message>,
    pub total: Option<u64>,
    pub has_more: bool,
}

/// Normalizes a message-list response (newest-first on the wire) into an
/// ascending page.
pub(crate) fn normalize_message_page(paged: Paged<MessageRecord>) -> MessagePage {
    let (records, total, has_more) = paged.flatten();
    let mut messages: Vec<Message> = records
        .into_iter()
        .filter_map(MessageRecord::into_message)
        .collect();
    // Newest-first on the wire; reverse before the stable sort so equal
    // timestamps keep their server order.
    messages.reverse();
    messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    MessagePage {
        messages,
        total,
        has_more,
    }
}

/// Processing status of a single message.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageStatus {
    pub processing_status: ProcessingStatus,
    #[serde(default)]
    pub has_ai_response: bool,
    pub error_message: Option<String>,
}

// ============================================================================
// News
// ============================================================================

/// Sentiment category of a news item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Bullish,
    Bearish,
    Neutral,
}

impl NewsCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            NewsCategory::Bullish => "bullish",
            NewsCategory::Bearish => "bearish",
            NewsCategory::Neutral => "neutral",
        }
    }

    pub fn all() -> &'static [NewsCategory] {
        &[
            NewsCategory::Bullish,
            NewsCategory::Bearish,
            NewsCategory::Neutral,
        ]
    }
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewsCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bullish" => Ok(NewsCategory::Bullish),
            "bearish" => Ok(NewsCategory::Bearish),
            "neutral" => Ok(NewsCategory::Neutral),
            other => anyhow::bail!("unknown news category: {other}"),
        }
    }
}

/// Expected market impact of a news item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsImpact {
    High,
    Medium,
    Low,
}

impl fmt::Display for NewsImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NewsImpact::High => "high",
            NewsImpact::Medium => "medium",
            NewsImpact::Low => "low",
        };
        f.write_str(s)
    }
}

/// An AI-annotated news item.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub timestamp: String,
    pub category: Option<NewsCategory>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub ai_analysis: String,
    pub impact: Option<NewsImpact>,
    pub url: Option<String>,
}

// ============================================================================
// Timestamp parsing
// ============================================================================

/// Parses an RFC 3339 timestamp, substituting the current time (with a
/// logged warning) when the value is missing or malformed.
pub(crate) fn parse_timestamp(raw: Option<&str>) -> DateTime<Utc> {
    match raw {
        Some(s) => match DateTime::parse_from_rfc3339(s) {
            Ok(dt) => dt.with_timezone(&Utc),
            Err(error) => {
                warn!(raw = s, %error, "malformed timestamp; substituting current time");
                Utc::now()
            }
        },
        None => {
            warn!("missing timestamp; substituting current time");
            Utc::now()
        }
    }
}

/// Parses an RFC 3339 timestamp, returning `None` when missing/malformed.
pub(crate) fn parse_timestamp_lenient(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(error) => {
            warn!(raw, %error, "unparseable timestamp");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: serde_json::Value) -> MessageRecord {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_paginated_shape_flattens_with_next_flag() {
        let paged: Paged<MessageRecord> = serde_json::from_value(serde_json::json!({
            "count": 90,
            "next": "http://localhost:8000/api/conversations/c1/messages/?limit=30&offset=30",
            "results": [
                {"id": "m2", "sender": "ai", "content": "b", "timestamp": "2025-01-01T00:00:02Z"},
                {"id": "m1", "sender": "user", "content": "a", "timestamp": "2025-01-01T00:00:01Z"},
            ]
        }))
        .unwrap();
        let page = normalize_message_page(paged);
        assert_eq!(page.total, Some(90));
        assert!(page.has_more);
        assert_eq!(page.messages.len(), 2);
        // Ascending after normalization.
        assert_eq!(page.messages[0].id, "m1");
        assert_eq!(page.messages[1].id, "m2");
    }

    #[test]
    fn test_bare_array_shape_is_terminal() {
        let paged: Paged<MessageRecord> = serde_json::from_value(serde_json::json!([
            {"id": "m1", "sender": "user", "content": "a", "timestamp": "2025-01-01T00:00:01Z"}
        ]))
        .unwrap();
        let page = normalize_message_page(paged);
        assert_eq!(page.total, Some(1));
        assert!(!page.has_more);
    }

    #[test]
    fn test_sender_maps_to_role() {
        let user = record(serde_json::json!({"id": "m1", "sender": "user", "content": "x"}));
        let ai = record(serde_json::json!({"id": "m2", "sender": "ai", "content": "y"}));
        assert_eq!(user.into_message().unwrap().role, Role::User);
        assert_eq!(ai.into_message().unwrap().role, Role::Assistant);
    }

    #[test]
    fn test_assistant_prefers_annotated_image() {
        let ai = record(serde_json::json!({
            "id": "m1", "sender": "ai", "content": "",
            "image_file": "raw.png", "annotated_image": "annotated.png"
        }));
        assert_eq!(
            ai.into_message().unwrap().image.as_deref(),
            Some("annotated.png")
        );

        let user = record(serde_json::json!({
            "id": "m2", "sender": "user", "content": "",
            "image_file": "raw.png", "annotated_image": "annotated.png"
        }));
        assert_eq!(user.into_message().unwrap().image.as_deref(), Some("raw.png"));
    }

    #[test]
    fn test_malformed_timestamp_substitutes_now() {
        let before = Utc::now();
        let msg = record(serde_json::json!({
            "id": "m1", "sender": "user", "content": "x", "timestamp": "not-a-date"
        }))
        .into_message()
        .unwrap();
        assert!(msg.timestamp >= before);
        assert!(msg.timestamp <= Utc::now());
    }

    #[test]
    fn test_create_ack_tolerates_missing_id() {
        let ack = record(serde_json::json!({
            "sender": "user", "content": "x", "processing_status": "pending"
        }))
        .into_ack();
        assert!(ack.id.is_none());
        assert!(ack.timestamp.is_none());
        assert_eq!(ack.status, Some(ProcessingStatus::Pending));
    }

    #[test]
    fn test_listed_record_without_id_is_dropped() {
        let paged: Paged<MessageRecord> = serde_json::from_value(serde_json::json!([
            {"sender": "user", "content": "a"},
            {"id": "m1", "sender": "user", "content": "b", "timestamp": "2025-01-01T00:00:01Z"}
        ]))
        .unwrap();
        let page = normalize_message_page(paged);
        assert_eq!(page.messages.len(), 1);
        assert_eq!(page.messages[0].id, "m1");
    }

    #[test]
    fn test_conversation_record_normalization() {
        let record: ConversationRecord = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "title": null,
            "message_count": 4,
            "last_message_time": "2025-01-01T10:00:00Z"
        }))
        .unwrap();
        let conversation = record.into_conversation();
        assert_eq!(conversation.title, "Untitled");
        assert_eq!(conversation.message_count, 4);
        assert!(conversation.last_message_time.is_some());
    }

    #[test]
    fn test_news_category_round_trip() {
        for category in NewsCategory::all() {
            assert_eq!(
                category.as_str().parse::<NewsCategory>().unwrap(),
                *category
            );
        }
        assert!("sideways".parse::<NewsCategory>().is_err());
    }
}
