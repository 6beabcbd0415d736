//! Conversation picker overlay state.

/// State for the conversation picker overlay.
///
/// The conversation list itself lives on `TuiState`; the picker only tracks
/// cursor position and the in-flight refresh.
#[derive(Debug, Default)]
pub struct PickerState {
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
}

impl PickerState {
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }
}
