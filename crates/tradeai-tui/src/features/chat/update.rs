//! Chat reducer logic.
//!
//! Send pipeline, history/pagination merges and poll-event handling. Every
//! async completion is double-checked against the task registry (stale task
//! ids) and the active conversation (conversation-switch guard) before it
//! touches the store.

use tradeai_core::api::Conversation;
use tradeai_core::chat::{Message, PollEvent, PollOptions};

use crate::effects::UiEffect;
use crate::events::{ChatEvent, UiError};
use crate::features::input::Submission;
use crate::state::{Notice, TuiState, View};

/// Switches the active conversation and kicks off its history load.
///
/// The old conversation's poller handle is dropped (cancelling its loop)
/// and all chat-scoped tasks are cleared so their late completions fail the
/// task-id check.
pub fn select_conversation(tui: &mut TuiState, conversation: Conversation) -> Vec<UiEffect> {
    tui.tasks.history.clear();
    tui.tasks.older_page.clear();
    tui.tasks.send.clear();
    tui.chat
        .activate(conversation.clone(), tui.config.history_page_size);
    tui.view = View::Chat;

    let task = tui.task_seq.next_id();
    tui.tasks.history.start(task);
    vec![UiEffect::LoadHistory {
        task,
        conversation_id: conversation.id,
        page_size: tui.config.history_page_size,
    }]
}

/// Handles Enter in the chat input: optimistic insert + submit effect.
pub fn submit_input(tui: &mut TuiState) -> Vec<UiEffect> {
    let submission = tui.input.submit();
    let (content, attachment) = match submission {
        Submission::Message {
            content,
            attachment,
        } => (content, attachment),
        Submission::Handled | Submission::Empty => return vec![],
    };

    let Some(conversation_id) = tui.chat.conversation.as_ref().map(|c| c.id.clone()) else {
        tui.notice = Some(Notice::error("No active conversation"));
        tui.input.restore(content, attachment);
        return vec![];
    };
    if tui.tasks.send.is_running() || tui.chat.awaiting_reply {
        tui.notice = Some(Notice::info("Still waiting for the assistant..."));
        tui.input.restore(content, attachment);
        return vec![];
    }

    let marker = attachment
        .as_ref()
        .map(|p| p.to_string_lossy().into_owned());
    let message = Message::provisional(content.clone(), marker);
    let temp_id = message.id.clone();
    tui.chat.store.insert_optimistic(message);
    tui.chat.scroll.scroll_to_bottom();
    tui.chat.awaiting_reply = true;
    tui.notice = None;

    let task = tui.task_seq.next_id();
    tui.tasks.send.start(task);
    vec![UiEffect::SubmitMessage {
        task,
        conversation_id,
        temp_id,
        content,
        attachment,
    }]
}

/// Emits an older-page load when the viewport is near the top and the
/// pager allows it.
pub fn maybe_load_older(tui: &mut TuiState) -> Vec<UiEffect> {
    let height = tui.transcript_height();
    if !tui.chat.history_loaded || !tui.chat.scroll.near_top(height) {
        return vec![];
    }
    let Some(conversation_id) = tui.chat.conversation.as_ref().map(|c| c.id.clone()) else {
        return vec![];
    };
    let Some(offset) = tui.chat.pager.begin() else {
        return vec![];
    };
    let task = tui.task_seq.next_id();
    tui.tasks.older_page.start(task);
    vec![UiEffect::LoadOlder {
        task,
        conversation_id,
        offset,
        page_size: tui.chat.pager.page_size(),
    }]
}

/// Applies a chat completion event.
pub fn handle_event(tui: &mut TuiState, event: ChatEvent) -> Vec<UiEffect> {
    match event {
        ChatEvent::HistoryLoaded {
            task,
            conversation_id,
            result,
        } => {
            if !tui.tasks.history.finish_if_active(task) || !tui.chat.is_active(&conversation_id) {
                return vec![];
            }
            match result {
                Ok(page) => {
                    let fetched = page.messages.len();
                    tui.chat.store.replace_all(page.messages);
                    tui.chat.pager.reset(fetched, page.has_more);
                    tui.chat.history_loaded = true;
                    tui.chat.scroll.scroll_to_bottom();
                }
                Err(err) => return apply_error(tui, &err),
            }
            vec![]
        }
        ChatEvent::OlderLoaded {
            task,
            conversation_id,
            result,
        } => {
            if !tui.tasks.older_page.finish_if_active(task) || !tui.chat.is_active(&conversation_id)
            {
                return vec![];
            }
            match result {
                Ok(page) => {
                    let fetched = page.messages.len();
                    let inserted = tui.chat.store.prepend_older(page.messages);
                    tui.chat.pending_prepend += inserted;
                    tui.chat.pager.complete(fetched, page.has_more);
                }
                Err(err) => {
                    tui.chat.pager.fail();
                    return apply_error(tui, &err);
                }
            }
            vec![]
        }
        ChatEvent::SendFinished {
            task,
            conversation_id,
            temp_id,
            result,
        } => {
            if !tui.tasks.send.finish_if_active(task) || !tui.chat.is_active(&conversation_id) {
                return vec![];
            }
            match result {
                Ok(ack) => {
                    tui.chat.store.reconcile(&temp_id, &ack);
                    // Anchor at the durable timestamp when the server gave
                    // one; otherwise the provisional entry's own stamp.
                    let since = ack
                        .timestamp
                        .or_else(|| {
                            tui.chat
                                .store
                                .messages()
                                .iter()
                                .find(|m| Some(&m.id) == ack.id.as_ref() || m.id == temp_id)
                                .map(|m| m.timestamp)
                        })
                        .unwrap_or_else(chrono::Utc::now);
                    let tracked_ids = ack.id.clone().into_iter().collect();

                    tui.chat.poller = None;
                    vec![UiEffect::StartPoller {
                        options: PollOptions {
                            conversation_id,
                            since,
                            tracked_ids,
                            interval: tui.config.poll_interval(),
                            window: tui.config.poll_window,
                        },
                    }]
                }
                Err(err) => {
                    tui.chat.store.remove(&temp_id);
                    tui.chat.awaiting_reply = false;
                    apply_error(tui, &err)
                }
            }
        }
        ChatEvent::PollerStarted { handle } => {
            if tui.chat.is_active(handle.conversation_id()) {
                tui.chat.poller = Some(handle);
            }
            // A handle for a stale conversation is dropped here, which
            // cancels its loop immediately.
            vec![]
        }
        ChatEvent::Poll(poll_event) => handle_poll_event(tui, poll_event),
    }
}

fn handle_poll_event(tui: &mut TuiState, event: PollEvent) -> Vec<UiEffect> {
    match event {
        PollEvent::ReplyArrived {
            conversation_id,
            messages,
        } => {
            if !tui.chat.is_active(&conversation_id) {
                return vec![];
            }
            merge_poll_window(tui, messages);
            tui.chat.awaiting_reply = false;
            tui.chat.poller = None;
            vec![]
        }
        PollEvent::Merge {
            conversation_id,
            messages,
        } => {
            if !tui.chat.is_active(&conversation_id) {
                return vec![];
            }
            merge_poll_window(tui, messages);
            vec![]
        }
        PollEvent::Settled { conversation_id } => {
            if !tui.chat.is_active(&conversation_id) {
                return vec![];
            }
            tui.chat.awaiting_reply = false;
            tui.chat.poller = None;
            vec![]
        }
        PollEvent::Failed {
            conversation_id, ..
        } => {
            // Poll failures stop politely: indicator off, no notice spam
            // (the poller already logged the error).
            if !tui.chat.is_active(&conversation_id) {
                return vec![];
            }
            tui.chat.awaiting_reply = false;
            tui.chat.poller = None;
            vec![]
        }
    }
}

/// Merges a fetched window and applies the auto-scroll policy: follow the
/// new message only if the viewport was already at/near the bottom.
fn merge_poll_window(tui: &mut TuiState, messages: Vec<Message>) {
    let height = tui.transcript_height();
    let was_near_bottom = tui.chat.scroll.near_bottom(height);
    let appended = tui.chat.store.append_if_new(messages);
    if appended > 0 && was_near_bottom {
        tui.chat.scroll.scroll_to_bottom();
    }
}

/// Routes an async failure: auth failures switch to the login view, the
/// rest become a status-line notice.
pub fn apply_error(tui: &mut TuiState, err: &UiError) -> Vec<UiEffect> {
    if err.auth_required {
        tui.user = None;
        tui.chat.deactivate();
        tui.auth.reset();
        tui.auth.error = Some("Session expired, please log in".to_string());
        tui.view = View::Login;
    } else {
        tui.notice = Some(Notice::error(err.message.clone()));
    }
    vec![]
}
