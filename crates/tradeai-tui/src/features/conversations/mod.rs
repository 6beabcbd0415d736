//! Conversation list and picker overlay.

pub mod render;
mod state;
pub mod update;

pub use render::render_picker;
pub use state::PickerState;
pub use update::{handle_event, handle_picker_key, open_picker};
