//! Message input state.
//!
//! Single-line editor with history navigation and an attachment slot. The
//! `/attach <path>` and `/detach` commands manage the pending chart image;
//! everything else submits as a message.

use std::path::PathBuf;

/// What pressing Enter produced.
#[derive(Debug, PartialEq, Eq)]
pub enum Submission {
    /// Send this content (with the pending attachment, if any).
    Message {
        content: String,
        attachment: Option<PathBuf>,
    },
    /// An input-local command was handled; nothing to send.
    Handled,
    /// Nothing to do (empty input, no attachment).
    Empty,
}

/// User input state.
#[derive(Debug, Default)]
pub struct InputState {
    pub value: String,
    /// Cursor position in chars.
    pub cursor: usize,
    /// Previously sent messages for Up/Down navigation.
    pub history: Vec<String>,
    history_index: Option<usize>,
    /// Draft saved while navigating history.
    draft: Option<String>,
    /// Chart image staged for the next send.
    pub attachment: Option<PathBuf>,
}

impl InputState {
    pub fn insert_char(&mut self, c: char) {
        let byte_idx = self.byte_index();
        self.value.insert(byte_idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let byte_idx = self.byte_index();
        self.value.remove(byte_idx);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Consumes the current line as a submission.
    ///
    /// Input-local commands (`/attach`, `/detach`) mutate the attachment
    /// slot and report [`Submission::Handled`].
    pub fn submit(&mut self) -> Submission {
        let line = self.take_value();
        let trimmed = line.trim();

        if let Some(path) = trimmed.strip_prefix("/attach ") {
            let path = path.trim();
            if path.is_empty() {
                return Submission::Handled;
            }
            self.attachment = Some(PathBuf::from(path));
            return Submission::Handled;
        }
        if trimmed == "/detach" {
            self.attachment = None;
            return Submission::Handled;
        }

        let attachment = self.attachment.take();
        if trimmed.is_empty() && attachment.is_none() {
            return Submission::Empty;
        }
        if !trimmed.is_empty() {
            self.history.push(trimmed.to_string());
        }
        Submission::Message {
            content: trimmed.to_string(),
            attachment,
        }
    }

    /// Restores a submission that could not be sent (no active
    /// conversation, send already in flight).
    pub fn restore(&mut self, content: String, attachment: Option<PathBuf>) {
        self.cursor = content.chars().count();
        self.value = content;
        self.attachment = attachment;
    }

    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let next_index = match self.history_index {
            None => {
                self.draft = Some(self.value.clone());
                self.history.len() - 1
            }
            Some(0) => 0,
            Some(i) => i - 1,
        };
        self.history_index = Some(next_index);
        self.value = self.history[next_index].clone();
        self.cursor = self.value.chars().count();
    }

    pub fn history_next(&mut self) {
        let Some(index) = self.history_index else {
            return;
        };
        if index + 1 < self.history.len() {
            self.history_index = Some(index + 1);
            self.value = self.history[index + 1].clone();
        } else {
            self.history_index = None;
            self.value = self.draft.take().unwrap_or_default();
        }
        self.cursor = self.value.chars().count();
    }

    fn take_value(&mut self) -> String {
        self.cursor = 0;
        self.history_index = None;
        self.draft = None;
        std::mem::take(&mut self.value)
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace_are_char_aware() {
        let mut input = InputState::default();
        for c in "héllo".chars() {
            input.insert_char(c);
        }
        assert_eq!(input.value, "héllo");
        input.backspace();
        input.backspace();
        assert_eq!(input.value, "hél");
    }

    #[test]
    fn test_submit_trims_and_records_history() {
        let mut input = InputState::default();
        input.restore("  Buy signal?  ".to_string(), None);
        let submission = input.submit();
        assert_eq!(
            submission,
            Submission::Message {
                content: "Buy signal?".to_string(),
                attachment: None,
            }
        );
        assert!(input.value.is_empty());
        assert_eq!(input.history, vec!["Buy signal?".to_string()]);
    }

    #[test]
    fn test_empty_submit_without_attachment_is_rejected() {
        let mut input = InputState::default();
        assert_eq!(input.submit(), Submission::Empty);
    }

    #[test]
    fn test_attach_command_stages_image_and_allows_bare_send() {
        let mut input = InputState::default();
        input.restore("/attach charts/btc.png".to_string(), None);
        assert_eq!(input.submit(), Submission::Handled);
        assert_eq!(input.attachment, Some(PathBuf::from("charts/btc.png")));

        // An image-only send is valid.
        let submission = input.submit();
        assert_eq!(
            submission,
            Submission::Message {
                content: String::new(),
                attachment: Some(PathBuf::from("charts/btc.png")),
            }
        );
        assert!(input.attachment.is_none());
    }

    #[test]
    fn test_detach_command_clears_attachment() {
        let mut input = InputState::default();
        input.restore("/detach".to_string(), Some(PathBuf::from("x.png")));
        assert_eq!(input.submit(), Submission::Handled);
        assert!(input.attachment.is_none());
    }

    #[test]
    fn test_history_navigation_round_trip() {
        let mut input = InputState::default();
        input.history = vec!["first".to_string(), "second".to_string()];
        input.restore("draft".to_string(), None);

        input.history_prev();
        assert_eq!(input.value, "second");
        input.history_prev();
        assert_eq!(input.value, "first");
        input.history_next();
        assert_eq!(input.value, "second");
        input.history_next();
        assert_eq!(input.value, "draft");
    }
}
