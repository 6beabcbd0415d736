//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── view: View               (login, chat, news)
//! │   ├── user: Option<User>       (session identity)
//! │   ├── chat: ChatState          (store, pager, scroll, poller)
//! │   ├── news: NewsState
//! │   ├── auth: AuthState          (login/register form)
//! │   ├── input: InputState        (message editor)
//! │   ├── conversations            (cached list)
//! │   ├── tasks / task_seq         (async task lifecycle)
//! │   └── notice                   (transient status text)
//! └── overlay: Option<Overlay>     (modal overlays)
//! ```
//!
//! State is split between `TuiState` and `Option<Overlay>` so overlay
//! handlers can take `&mut Overlay` and `&mut TuiState` without borrow
//! conflicts.

use tradeai_core::api::{Conversation, User};
use tradeai_core::config::Config;

use crate::common::{TaskSeq, Tasks};
use crate::features::auth::AuthState;
use crate::features::chat::ChatState;
use crate::features::conversations::PickerState;
use crate::features::input::InputState;
use crate::features::news::NewsState;

/// Which full-screen view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Chat,
    News,
}

/// Modal overlays drawn above the active view.
#[derive(Debug)]
pub enum Overlay {
    ConversationPicker(PickerState),
}

/// A transient status-line notice.
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub error: bool,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: true,
        }
    }
}

/// Combined application state for the TUI.
pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            tui: TuiState::new(config),
            overlay: None,
        }
    }
}

/// TUI application state (non-overlay).
pub struct TuiState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// Active full-screen view.
    pub view: View,
    /// Logged-in user, if the session cookie is valid.
    pub user: Option<User>,
    /// Chat session (store, pager, scroll, poller).
    pub chat: ChatState,
    /// News view state.
    pub news: NewsState,
    /// Login/register form state.
    pub auth: AuthState,
    /// Message editor state.
    pub input: InputState,
    /// Cached conversation list (picker + auto-select).
    pub conversations: Vec<Conversation>,
    /// Task id sequence for async operations.
    pub task_seq: TaskSeq,
    /// Task lifecycle state for async operations.
    pub tasks: Tasks,
    /// Client configuration.
    pub config: Config,
    /// Transient status-line notice.
    pub notice: Option<Notice>,
    /// Terminal size from the last frame.
    pub viewport: (u16, u16),
    /// Spinner animation frame counter.
    pub spinner_frame: usize,
}

impl TuiState {
    pub fn new(config: Config) -> Self {
        Self {
            should_quit: false,
            view: View::Login,
            user: None,
            chat: ChatState::default(),
            news: NewsState::default(),
            auth: AuthState::default(),
            input: InputState::default(),
            conversations: Vec::new(),
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            config,
            notice: None,
            viewport: (80, 24),
            spinner_frame: 0,
        }
    }

    /// Transcript height for the current viewport: total minus header,
    /// input block and status line.
    pub fn transcript_height(&self) -> usize {
        usize::from(self.viewport.1.saturating_sub(5))
    }
}
