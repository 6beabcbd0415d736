//! Chat session state.
//!
//! Holds the message store, pager, scroll controller and the reply-poller
//! handle for the active conversation. Switching conversations replaces the
//! whole session; dropping the old poller handle cancels its loop.

use tradeai_core::api::Conversation;
use tradeai_core::chat::{HistoryPager, MessageStore, PollerHandle};

use super::scroll::ScrollState;

/// State for the chat view, scoped to one active conversation.
#[derive(Debug, Default)]
pub struct ChatState {
    /// Active conversation; `None` until one is selected/created.
    pub conversation: Option<Conversation>,
    pub store: MessageStore,
    pub pager: HistoryPager,
    pub scroll: ScrollState,
    /// True between a successful send and the poller resolving.
    pub awaiting_reply: bool,
    /// Reply poller for this conversation; replacing it cancels the old one.
    pub poller: Option<PollerHandle>,
    /// True once the initial history page has been applied.
    pub history_loaded: bool,
    /// Messages prepended by the last pagination merge; the next render
    /// converts this to a line delta and shifts the scroll anchor.
    pub pending_prepend: usize,
}

impl ChatState {
    /// Switches to a conversation: fresh store, pager, scroll and no poller.
    pub fn activate(&mut self, conversation: Conversation, page_size: usize) {
        self.poller = None;
        self.store = MessageStore::new(conversation.id.clone());
        self.pager = HistoryPager::new(page_size);
        self.scroll.reset();
        self.awaiting_reply = false;
        self.history_loaded = false;
        self.pending_prepend = 0;
        self.conversation = Some(conversation);
    }

    /// Clears everything (logout).
    pub fn deactivate(&mut self) {
        self.poller = None;
        self.conversation = None;
        self.store = MessageStore::default();
        self.pager = HistoryPager::default();
        self.scroll.reset();
        self.awaiting_reply = false;
        self.history_loaded = false;
        self.pending_prepend = 0;
    }

    /// Conversation-switch guard: async completions are applied only when
    /// their conversation is still the active one.
    pub fn is_active(&self, conversation_id: &str) -> bool {
        self.conversation
            .as_ref()
            .is_some_and(|c| c.id == conversation_id)
    }

    /// Consumes the pending-prepend count (render-time adjustment).
    pub fn take_pending_prepend(&mut self) -> usize {
        std::mem::take(&mut self.pending_prepend)
    }
}
