//! Inbox channel types.
//!
//! Handlers send `UiEvent`s directly to the inbox; the runtime drains it
//! each frame. This keeps per-operation receivers out of the state.

use tokio::sync::mpsc;

use crate::events::UiEvent;

pub type UiEventSender = mpsc::UnboundedSender<UiEvent>;
pub type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

pub fn channel() -> (UiEventSender, UiEventReceiver) {
    mpsc::unbounded_channel()
}
