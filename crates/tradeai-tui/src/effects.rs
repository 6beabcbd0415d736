//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations), which
//! keeps the reducer pure: it mutates state and returns effects, never
//! performs I/O itself.

use std::path::PathBuf;

use tradeai_core::api::NewsCategory;
use tradeai_core::chat::PollOptions;

use crate::common::TaskId;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Log in with credentials.
    Login {
        task: TaskId,
        username: String,
        password: String,
    },

    /// Register a new account.
    Register {
        task: TaskId,
        username: String,
        email: String,
        password: String,
    },

    /// Log out and clear the session cookie server-side.
    Logout { task: TaskId },

    /// Probe whether the stored session cookie is still valid.
    CheckSession { task: TaskId },

    /// Load the conversation list.
    LoadConversations { task: TaskId },

    /// Create a conversation.
    CreateConversation {
        task: TaskId,
        title: Option<String>,
    },

    /// Load the newest history page of a conversation.
    LoadHistory {
        task: TaskId,
        conversation_id: String,
        page_size: usize,
    },

    /// Load an older history page (upward pagination).
    LoadOlder {
        task: TaskId,
        conversation_id: String,
        offset: usize,
        page_size: usize,
    },

    /// Submit a message (multipart create), optionally with an image file.
    SubmitMessage {
        task: TaskId,
        conversation_id: String,
        temp_id: String,
        content: String,
        attachment: Option<PathBuf>,
    },

    /// Spawn a reply poller for the active conversation.
    StartPoller { options: PollOptions },

    /// Fetch news, optionally filtered by category.
    FetchNews {
        task: TaskId,
        category: Option<NewsCategory>,
    },
}
