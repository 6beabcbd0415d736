//! Reply poller.
//!
//! After a send, the assistant's reply is computed asynchronously on the
//! server; the client polls the recent-message window until the reply shows
//! up or processing settles. One poller runs per conversation at a time;
//! the handle cancels on drop, so storing a new handle in the session state
//! tears down the previous cycle.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::message::{Message, Role};

/// Default tick interval between poll fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default bound on the fetched recent-message window.
pub const DEFAULT_POLL_WINDOW: usize = 50;

/// Source of the recent-message window, newest page of a conversation.
///
/// The seam that lets the loop run against the real API client in the app
/// and against scripted fixtures in tests.
pub trait RecentMessages: Send + Sync {
    fn recent_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> impl Future<Output = anyhow::Result<Vec<Message>>> + Send;
}

/// What a single poll tick concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollVerdict {
    /// An assistant message newer than the anchor was fetched; merge and stop.
    ReplyArrived,
    /// No tracked message is still pending or processing; stop quietly.
    Settled,
    /// Keep polling; merge the window in case content updated.
    Continue,
}

/// Pure per-tick decision over a fetched window.
///
/// `since` anchors at the sent message's durable timestamp; `tracked` holds
/// the ids whose processing state keeps the cycle alive.
pub fn evaluate_window(
    window: &[Message],
    since: DateTime<Utc>,
    tracked: &[String],
) -> PollVerdict {
    let reply_arrived = window
        .iter()
        .any(|m| m.role == Role::Assistant && m.timestamp > since);
    if reply_arrived {
        return PollVerdict::ReplyArrived;
    }
    let still_processing = window.iter().any(|m| {
        tracked.iter().any(|id| id == &m.id) && m.status.is_some_and(|s| !s.is_settled())
    });
    if still_processing {
        PollVerdict::Continue
    } else {
        PollVerdict::Settled
    }
}

/// Events emitted by a running poller.
///
/// Every event carries the conversation id the poller was started for, so
/// the receiver can discard ticks that resolve after a conversation switch.
#[derive(Debug)]
pub enum PollEvent {
    /// The reply arrived; `messages` is the final window to merge.
    ReplyArrived {
        conversation_id: String,
        messages: Vec<Message>,
    },
    /// Tick fetched updates but no reply yet; merge and keep waiting.
    Merge {
        conversation_id: String,
        messages: Vec<Message>,
    },
    /// Processing settled without a qualifying reply.
    Settled { conversation_id: String },
    /// Fetch failed; the cycle is over (no retry).
    Failed {
        conversation_id: String,
        error: String,
    },
}

/// Poller parameters for one send cycle.
#[derive(Debug, Clone)]
pub struct PollOptions {
    pub conversation_id: String,
    /// Anchor: replies must be strictly newer than this to count.
    pub since: DateTime<Utc>,
    /// Ids whose pending/processing status keeps the cycle alive.
    pub tracked_ids: Vec<String>,
    pub interval: Duration,
    pub window: usize,
}

/// Cancellable handle to a running poller.
///
/// Owned by the chat session state; dropping (or replacing) the handle
/// cancels the loop, so two pollers never run against the same
/// conversation.
#[derive(Debug)]
pub struct PollerHandle {
    conversation_id: String,
    cancel: CancellationToken,
}

impl PollerHandle {
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawns the poll loop on the current tokio runtime.
///
/// Events arrive on `events`; the loop ends after the first terminal event
/// or when the handle is cancelled/dropped.
pub fn spawn_reply_poller<S>(
    source: Arc<S>,
    options: PollOptions,
    events: mpsc::Sender<PollEvent>,
) -> PollerHandle
where
    S: RecentMessages + 'static,
{
    let cancel = CancellationToken::new();
    let handle = PollerHandle {
        conversation_id: options.conversation_id.clone(),
        cancel: cancel.clone(),
    };
    tokio::spawn(run_reply_poller(source, options, events, cancel));
    handle
}

async fn run_reply_poller<S>(
    source: Arc<S>,
    options: PollOptions,
    events: mpsc::Sender<PollEvent>,
    cancel: CancellationToken,
) where
    S: RecentMessages,
{
    let mut ticker = tokio::time::interval(options.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // interval() yields immediately; the first fetch should happen one
    // interval after the send.
    ticker.tick().await;

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                debug!(conversation = %options.conversation_id, "reply poller cancelled");
                return;
            }
            _ = ticker.tick() => {}
        }

        let window = tokio::select! {
            () = cancel.cancelled() => return,
            fetched = source.recent_messages(&options.conversation_id, options.window) => fetched,
        };

        match window {
            Ok(messages) => {
                match evaluate_window(&messages, options.since, &options.tracked_ids) {
                    PollVerdict::ReplyArrived => {
                        let _ = events
                            .send(PollEvent::ReplyArrived {
                                conversation_id: options.conversation_id.clone(),
                                messages,
                            })
                            .await;
                        return;
                    }
                    PollVerdict::Settled => {
                        let _ = events
                            .send(PollEvent::Settled {
                                conversation_id: options.conversation_id.clone(),
                            })
                            .await;
                        return;
                    }
                    PollVerdict::Continue => {
                        let _ = events
                            .send(PollEvent::Merge {
                                conversation_id: options.conversation_id.clone(),
                                messages,
                            })
                            .await;
                    }
                }
            }
            Err(error) => {
                warn!(conversation = %options.conversation_id, %error, "poll fetch failed");
                let _ = events
                    .send(PollEvent::Failed {
                        conversation_id: options.conversation_id.clone(),
                        error: format!("{error:#}"),
                    })
                    .await;
                return;
            }
        }
    }
}
