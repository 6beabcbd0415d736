//! Ordered, deduplicated message store for the active conversation.
//!
//! Single source of truth for what the chat view renders. All mutation goes
//! through the methods here; every method leaves the store sorted by
//! timestamp (stable ties) and free of duplicate durable ids.

use chrono::TimeDelta;

use super::message::{Message, MessageAck};

/// Tolerance in seconds when matching messages by role + content instead
/// of id.
///
/// Covers server/client clock skew between a provisional entry (client
/// clock) and the durable record the server writes for it.
pub const DEDUP_WINDOW_SECS: i64 = 5;

/// The dedup rule: is `candidate` the same message as `existing`?
///
/// Matches on durable-id equality, or on role + content with timestamps
/// inside [`DEDUP_WINDOW_SECS`]. Content matching only applies when at least one
/// side is provisional: two durable records with distinct ids never
/// collapse, so a user repeating the same text keeps both messages once the
/// server has assigned ids.
pub fn is_same_message(existing: &Message, candidate: &Message) -> bool {
    if !existing.is_provisional() && !candidate.is_provisional() {
        return existing.id == candidate.id;
    }
    existing.role == candidate.role
        && existing.content == candidate.content
        && (existing.timestamp - candidate.timestamp).abs() <= TimeDelta::seconds(DEDUP_WINDOW_SECS)
}

/// Message store for exactly one conversation.
#[derive(Debug, Default)]
pub struct MessageStore {
    conversation_id: String,
    messages: Vec<Message>,
}

impl MessageStore {
    /// Creates an empty store scoped to one conversation.
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            messages: Vec::new(),
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Replaces the whole store contents (initial page load).
    pub fn replace_all(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.dedup_durable();
        self.sort();
    }

    /// Merges an older history page in at the head.
    ///
    /// Entries already present (by the dedup rule) are skipped. Returns the
    /// number of messages actually inserted.
    pub fn prepend_older(&mut self, older: Vec<Message>) -> usize {
        let fresh: Vec<Message> = older
            .into_iter()
            .filter(|candidate| self.position_of(candidate).is_none())
            .collect();
        let inserted = fresh.len();
        if inserted > 0 {
            self.messages.splice(0..0, fresh);
            self.sort();
        }
        inserted
    }

    /// Inserts a provisional message (optimistic send).
    pub fn insert_optimistic(&mut self, message: Message) {
        self.messages.push(message);
        self.sort();
    }

    /// Reconciles a provisional entry with the server's acknowledgement.
    ///
    /// Fields absent from the ack keep their provisional values, so an ack
    /// without an id leaves the entry provisional with patched fields. If a
    /// poll merge already delivered the durable record, the provisional
    /// entry is dropped instead of duplicated. Idempotent.
    pub fn reconcile(&mut self, temp_id: &str, ack: &MessageAck) {
        let Some(pos) = self.messages.iter().position(|m| m.id == temp_id) else {
            return;
        };
        if let Some(id) = &ack.id
            && self.messages.iter().any(|m| &m.id == id)
        {
            self.messages.remove(pos);
            return;
        }
        let entry = &mut self.messages[pos];
        if let Some(id) = &ack.id {
            entry.id = id.clone();
        }
        if let Some(ts) = ack.timestamp {
            entry.timestamp = ts;
        }
        if ack.image.is_some() {
            entry.image = ack.image.clone();
        }
        if ack.status.is_some() {
            entry.status = ack.status;
        }
        self.sort();
    }

    /// Merges a freshly fetched batch, skipping entries already present.
    ///
    /// A candidate matching a provisional entry replaces it at its slot
    /// (the stable sort keeps near-equal timestamps in place, so the visual
    /// order does not jump). A candidate matching a durable entry refreshes
    /// the fields the server may still be rewriting (content, status,
    /// image, analysis). Returns the number of messages appended.
    pub fn append_if_new<I>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = Message>,
    {
        let mut appended = 0;
        for candidate in batch {
            match self.position_of(&candidate) {
                Some(pos) => {
                    let existing = &mut self.messages[pos];
                    if existing.is_provisional() && !candidate.is_provisional() {
                        *existing = candidate;
                    } else {
                        existing.content = candidate.content;
                        existing.status = candidate.status;
                        if candidate.image.is_some() {
                            existing.image = candidate.image;
                        }
                        existing.prediction = candidate.prediction;
                        existing.confidence_pct = candidate.confidence_pct;
                        existing.explanation = candidate.explanation;
                    }
                }
                None => {
                    self.messages.push(candidate);
                    appended += 1;
                }
            }
        }
        self.sort();
        appended
    }

    /// Removes a message by id (optimistic rollback). Returns true if found.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        before != self.messages.len()
    }

    fn position_of(&self, candidate: &Message) -> Option<usize> {
        self.messages
            .iter()
            .position(|m| is_same_message(m, candidate))
    }

    /// Drops later duplicates of the same durable id (defensive, for
    /// server pages that overlap).
    fn dedup_durable(&mut self) {
        let mut seen: Vec<String> = Vec::with_capacity(self.messages.len());
        self.messages.retain(|m| {
            if m.is_provisional() {
                return true;
            }
            if seen.iter().any(|id| id == &m.id) {
                return false;
            }
            seen.push(m.id.clone());
            true
        });
    }

    /// Stable sort by timestamp; ties keep insertion order.
    fn sort(&mut self) {
        self.messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta, Utc};

    use super::*;
    use crate::chat::message::{ProcessingStatus, Role};

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_735_689_600 + secs, 0).unwrap()
    }

    fn server_msg(id: &str, role: Role, content: &str, secs: i64) -> Message {
        Message::durable(id, role, content, ts(secs))
    }

    #[test]
    fn test_append_if_new_is_idempotent() {
        let mut store = MessageStore::new("c1");
        let batch = vec![
            server_msg("m1", Role::User, "hi", 0),
            server_msg("m2", Role::Assistant, "hello", 2),
        ];
        let first = store.append_if_new(batch.clone());
        let second = store.append_if_new(batch);
        assert_eq!(first, 2);
        assert_eq!(second, 0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_optimistic_reconciliation_replaces_temp_id() {
        let mut store = MessageStore::new("c1");
        let provisional = Message::provisional("Buy signal?", None);
        let temp_id = provisional.id.clone();
        store.insert_optimistic(provisional);
        assert_eq!(store.len(), 1);

        let ack = MessageAck {
            id: Some("m1".to_string()),
            timestamp: Some(ts(1)),
            ..MessageAck::default()
        };
        store.reconcile(&temp_id, &ack);

        assert_eq!(store.len(), 1);
        assert_eq!(store.messages()[0].id, "m1");
        assert_eq!(store.messages()[0].timestamp, ts(1));
        assert!(!store.messages().iter().any(|m| m.id == temp_id));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut store = MessageStore::new("c1");
        let provisional = Message::provisional("x", None);
        let temp_id = provisional.id.clone();
        store.insert_optimistic(provisional);

        let ack = MessageAck {
            id: Some("m1".to_string()),
            ..MessageAck::default()
        };
        store.reconcile(&temp_id, &ack);
        store.reconcile(&temp_id, &ack);
        assert_eq!(store.len(), 1);
        assert_eq!(store.messages()[0].id, "m1");
    }

    #[test]
    fn test_reconcile_without_id_keeps_provisional_entry_alive() {
        let mut store = MessageStore::new("c1");
        let provisional = Message::provisional("chart please", None);
        let temp_id = provisional.id.clone();
        store.insert_optimistic(provisional);

        let ack = MessageAck {
            status: Some(ProcessingStatus::Pending),
            ..MessageAck::default()
        };
        store.reconcile(&temp_id, &ack);

        assert_eq!(store.len(), 1);
        let entry = &store.messages()[0];
        assert_eq!(entry.id, temp_id);
        assert!(entry.is_provisional());
        assert_eq!(entry.status, Some(ProcessingStatus::Pending));
    }

    #[test]
    fn test_reconcile_drops_provisional_when_poll_merged_first() {
        let mut store = MessageStore::new("c1");
        let provisional = Message::provisional("hi", None);
        let temp_id = provisional.id.clone();
        let provisional_ts = provisional.timestamp;
        store.insert_optimistic(provisional);

        // A poll tick delivered the durable record before the create
        // response resolved.
        let mut durable = server_msg("m1", Role::User, "hi", 0);
        durable.timestamp = provisional_ts + TimeDelta::seconds(1);
        store.append_if_new(vec![durable]);
        assert_eq!(store.len(), 1);

        let ack = MessageAck {
            id: Some("m1".to_string()),
            ..MessageAck::default()
        };
        store.reconcile(&temp_id, &ack);
        assert_eq!(store.len(), 1);
        assert_eq!(store.messages()[0].id, "m1");
    }

    #[test]
    fn test_poll_merge_does_not_duplicate_reconciled_message() {
        let mut store = MessageStore::new("c1");
        let provisional = Message::provisional("Buy signal?", None);
        let temp_id = provisional.id.clone();
        store.insert_optimistic(provisional);
        store.reconcile(
            &temp_id,
            &MessageAck {
                id: Some("m1".to_string()),
                timestamp: Some(ts(0)),
                ..MessageAck::default()
            },
        );

        let appended = store.append_if_new(vec![server_msg("m1", Role::User, "Buy signal?", 0)]);
        assert_eq!(appended, 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_durable_candidate_replaces_matching_provisional_in_place() {
        let mut store = MessageStore::new("c1");
        store.append_if_new(vec![server_msg("m0", Role::Assistant, "welcome", -60)]);

        let provisional = Message::provisional("hello", None);
        let provisional_ts = provisional.timestamp;
        store.insert_optimistic(provisional);

        // Durable twin arrives via a fetch, 2s of clock skew.
        let mut durable = server_msg("m1", Role::User, "hello", 0);
        durable.timestamp = provisional_ts + TimeDelta::seconds(2);
        let appended = store.append_if_new(vec![durable]);

        assert_eq!(appended, 0);
        assert_eq!(store.len(), 2);
        assert_eq!(store.messages()[1].id, "m1");
        assert!(!store.messages()[1].is_provisional());
    }

    #[test]
    fn test_identical_durable_messages_are_both_kept() {
        let mut store = MessageStore::new("c1");
        store.append_if_new(vec![
            server_msg("m1", Role::User, "ping", 0),
            server_msg("m2", Role::User, "ping", 1),
        ]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_content_match_outside_window_is_not_deduped() {
        let mut store = MessageStore::new("c1");
        let mut provisional = Message::provisional("hello", None);
        provisional.timestamp = ts(0);
        store.insert_optimistic(provisional);

        let durable = server_msg("m1", Role::User, "hello", 30);
        let appended = store.append_if_new(vec![durable]);
        assert_eq!(appended, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_pagination_ordering() {
        let mut store = MessageStore::new("c1");
        let newer: Vec<Message> = (30..60)
            .map(|i| server_msg(&format!("m{i}"), Role::User, "msg", i))
            .collect();
        store.replace_all(newer);

        let older: Vec<Message> = (0..30)
            .map(|i| server_msg(&format!("m{i}"), Role::User, "msg", i))
            .collect();
        let inserted = store.prepend_older(older);

        assert_eq!(inserted, 30);
        assert_eq!(store.len(), 60);
        let stamps: Vec<_> = store.messages().iter().map(|m| m.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
        let mut ids: Vec<_> = store.messages().iter().map(|m| m.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 60);
    }

    #[test]
    fn test_prepend_older_skips_overlap() {
        let mut store = MessageStore::new("c1");
        store.replace_all(vec![
            server_msg("m2", Role::User, "b", 2),
            server_msg("m3", Role::User, "c", 3),
        ]);
        let inserted = store.prepend_older(vec![
            server_msg("m1", Role::User, "a", 1),
            server_msg("m2", Role::User, "b", 2),
        ]);
        assert_eq!(inserted, 1);
        assert_eq!(store.len(), 3);
        assert_eq!(store.messages()[0].id, "m1");
    }

    #[test]
    fn test_replace_all_sorts_and_drops_duplicate_ids() {
        let mut store = MessageStore::new("c1");
        store.replace_all(vec![
            server_msg("m2", Role::Assistant, "b", 2),
            server_msg("m1", Role::User, "a", 1),
            server_msg("m2", Role::Assistant, "b", 2),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.messages()[0].id, "m1");
    }

    #[test]
    fn test_remove_rolls_back_optimistic_entry() {
        let mut store = MessageStore::new("c1");
        let provisional = Message::provisional("oops", None);
        let temp_id = provisional.id.clone();
        store.insert_optimistic(provisional);
        assert!(store.remove(&temp_id));
        assert!(store.is_empty());
        assert!(!store.remove(&temp_id));
    }

    #[test]
    fn test_merge_refreshes_fields_of_known_message() {
        let mut store = MessageStore::new("c1");
        let mut msg = server_msg("m1", Role::Assistant, "working...", 0);
        msg.status = Some(ProcessingStatus::Processing);
        store.append_if_new(vec![msg]);

        let mut updated = server_msg("m1", Role::Assistant, "done: bullish", 0);
        updated.status = Some(ProcessingStatus::Completed);
        updated.prediction = Some("bullish".to_string());
        let appended = store.append_if_new(vec![updated]);

        assert_eq!(appended, 0);
        let entry = &store.messages()[0];
        assert_eq!(entry.content, "done: bullish");
        assert_eq!(entry.status, Some(ProcessingStatus::Completed));
        assert_eq!(entry.prediction.as_deref(), Some("bullish"));
    }

    #[test]
    fn test_stable_order_for_equal_timestamps() {
        let mut store = MessageStore::new("c1");
        store.append_if_new(vec![
            server_msg("m1", Role::User, "first", 0),
            server_msg("m2", Role::Assistant, "second", 0),
        ]);
        assert_eq!(store.messages()[0].id, "m1");
        assert_eq!(store.messages()[1].id, "m2");
    }
}
