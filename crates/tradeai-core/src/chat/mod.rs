//! Message-synchronization engine.
//!
//! The ordered message store, the dedup/reconciliation rules, the reply
//! poller, and the history pager. Everything here is UI-free; the TUI
//! reducer drives these types and owns when they run.

pub mod message;
pub mod pager;
pub mod poller;
pub mod store;

pub use message::{Message, MessageAck, ProcessingStatus, Role};
pub use pager::HistoryPager;
pub use poller::{
    PollEvent, PollOptions, PollVerdict, PollerHandle, RecentMessages, spawn_reply_poller,
};
pub use store::MessageStore;
