//! UI event types.
//!
//! Everything that can reach the reducer flows through [`UiEvent`]: terminal
//! input, frame geometry, and the completions of async work the runtime
//! spawned. Completion events carry the conversation they were started for
//! so the reducer can discard ticks that resolve after a switch.

use tradeai_core::api::{AuthRequired, Conversation, MessagePage, NewsCategory, NewsItem, User};
use tradeai_core::chat::{MessageAck, PollEvent, PollerHandle};

use crate::common::TaskId;

/// Error payload carried across the inbox.
///
/// Flattened from `anyhow::Error` at the spawn site; `auth_required` is set
/// when the failure was a 401/403 so the reducer can route to login.
#[derive(Debug, Clone)]
pub struct UiError {
    pub message: String,
    pub auth_required: bool,
}

impl UiError {
    pub fn from_error(err: &anyhow::Error) -> Self {
        Self {
            message: format!("{err:#}"),
            auth_required: err.downcast_ref::<AuthRequired>().is_some(),
        }
    }
}

pub type UiResult<T> = Result<T, UiError>;

/// Top-level event fed to the reducer.
#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick (spinner animation).
    Tick,
    /// Frame geometry, emitted before each render.
    Frame { width: u16, height: u16 },
    /// Raw terminal input.
    Terminal(crossterm::event::Event),
    Session(SessionEvent),
    Conversations(ConversationsEvent),
    Chat(ChatEvent),
    News(NewsEvent),
}

#[derive(Debug)]
pub enum SessionEvent {
    LoginFinished {
        task: TaskId,
        result: UiResult<User>,
    },
    RegisterFinished {
        task: TaskId,
        result: UiResult<User>,
    },
    LogoutFinished {
        task: TaskId,
        result: UiResult<()>,
    },
    /// Startup session probe (cookie may already be valid).
    SessionChecked {
        task: TaskId,
        result: UiResult<User>,
    },
}

#[derive(Debug)]
pub enum ConversationsEvent {
    Loaded {
        task: TaskId,
        result: UiResult<Vec<Conversation>>,
    },
    Created {
        task: TaskId,
        result: UiResult<Conversation>,
    },
}

#[derive(Debug)]
pub enum ChatEvent {
    /// Initial history page for a conversation.
    HistoryLoaded {
        task: TaskId,
        conversation_id: String,
        result: UiResult<MessagePage>,
    },
    /// An older page from upward pagination.
    OlderLoaded {
        task: TaskId,
        conversation_id: String,
        result: UiResult<MessagePage>,
    },
    /// The message-creation request resolved.
    SendFinished {
        task: TaskId,
        conversation_id: String,
        temp_id: String,
        result: UiResult<MessageAck>,
    },
    /// The runtime spawned a reply poller; the reducer owns the handle.
    PollerStarted { handle: PollerHandle },
    /// A poll tick resolved (already scoped by conversation id).
    Poll(PollEvent),
}

#[derive(Debug)]
pub enum NewsEvent {
    Loaded {
        task: TaskId,
        category: Option<NewsCategory>,
        result: UiResult<Vec<NewsItem>>,
    },
}
