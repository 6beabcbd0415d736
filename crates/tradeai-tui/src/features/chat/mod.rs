//! Chat feature: message transcript, send pipeline, polling, pagination.

pub mod render;
pub mod scroll;
mod state;
pub mod update;

pub use render::render_chat;
pub use scroll::{ScrollMode, ScrollState};
pub use state::ChatState;
