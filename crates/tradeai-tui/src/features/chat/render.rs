//! Chat view rendering.
//!
//! Builds the transcript as a flat list of lines so the scroll controller
//! can work in exact line units; the pending-prepend adjustment happens
//! here, right before the first paint after a pagination merge.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use tradeai_core::chat::message::{Message, ProcessingStatus, Role};

use crate::state::TuiState;

/// Spinner frames for the "Analyzing..." indicator.
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Greeting shown for an empty conversation.
const WELCOME: &str = "Hello! I'm your AI trading assistant.\n\
Ask about trading analysis, or attach a chart image with /attach <path>.";

pub fn render_chat(frame: &mut Frame, area: Rect, tui: &mut TuiState) {
    let [transcript_area, input_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(area);
    render_transcript(frame, transcript_area, tui);
    render_input(frame, input_area, tui);
}

fn render_transcript(frame: &mut Frame, area: Rect, tui: &mut TuiState) {
    let width = usize::from(area.width).max(10);
    let height = usize::from(area.height);

    let (lines, per_message) = build_transcript_lines(tui, width);

    // Pagination merge happened since the last frame: shift the anchor by
    // the prepended height so the visible lines stay put.
    let pending = tui.chat.take_pending_prepend();
    if pending > 0 {
        let added: usize = per_message.iter().take(pending).sum();
        tui.chat.scroll.adjust_for_prepended(added);
    }
    tui.chat.scroll.cached_line_count = lines.len();

    let offset = tui.chat.scroll.get_offset(height);
    let visible: Vec<Line> = lines.into_iter().skip(offset).take(height).collect();
    frame.render_widget(Paragraph::new(visible), area);
}

/// Builds all transcript lines plus the per-message line counts (used for
/// the prepend scroll adjustment).
fn build_transcript_lines(tui: &TuiState, width: usize) -> (Vec<Line<'static>>, Vec<usize>) {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut per_message: Vec<usize> = Vec::new();

    if tui.chat.store.is_empty() && tui.chat.history_loaded && !tui.chat.awaiting_reply {
        for chunk in WELCOME.lines() {
            for wrapped in wrap_text(chunk, width) {
                lines.push(Line::from(Span::styled(
                    wrapped,
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        return (lines, per_message);
    }

    for message in tui.chat.store.messages() {
        let count = push_message_lines(&mut lines, message, width);
        per_message.push(count);
    }

    if tui.chat.awaiting_reply {
        let spinner = SPINNER_FRAMES[tui.spinner_frame % SPINNER_FRAMES.len()];
        lines.push(Line::from(vec![
            Span::styled(spinner.to_string(), Style::default().fg(Color::Magenta)),
            Span::raw(" "),
            Span::styled("Analyzing...", Style::default().fg(Color::DarkGray)),
        ]));
    }

    (lines, per_message)
}

/// Appends one message's lines; returns how many were added.
fn push_message_lines(lines: &mut Vec<Line<'static>>, message: &Message, width: usize) -> usize {
    let start = lines.len();

    let (name, name_style) = match message.role {
        Role::User => ("You", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Role::Assistant => (
            "TradeAI",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
    };
    let mut header = vec![
        Span::styled(name, name_style),
        Span::styled(
            format!("  {}", message.timestamp.format("%H:%M")),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if message.is_provisional() {
        header.push(Span::styled(
            "  sending...",
            Style::default().fg(Color::DarkGray),
        ));
    } else if message.status == Some(ProcessingStatus::Failed) {
        header.push(Span::styled("  failed", Style::default().fg(Color::Red)));
    }
    lines.push(Line::from(header));

    if let Some(image) = &message.image {
        lines.push(Line::from(Span::styled(
            format!("[chart] {image}"),
            Style::default().fg(Color::Yellow),
        )));
    }

    for chunk in message.content.lines() {
        for wrapped in wrap_text(chunk, width) {
            lines.push(Line::from(Span::raw(wrapped)));
        }
    }

    if let Some(prediction) = &message.prediction {
        let confidence = message
            .confidence_pct
            .as_deref()
            .map(|c| format!(" ({c})"))
            .unwrap_or_default();
        lines.push(Line::from(Span::styled(
            format!("prediction: {prediction}{confidence}"),
            Style::default().fg(Color::Green),
        )));
    }
    if let Some(explanation) = &message.explanation {
        for wrapped in wrap_text(explanation, width) {
            lines.push(Line::from(Span::styled(
                wrapped,
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.len() - start
}

fn render_input(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let title = match &tui.input.attachment {
        Some(path) => format!(" Message  [chart: {}] ", path.display()),
        None => " Message ".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(tui.input.value.as_str());
    frame.render_widget(paragraph, inner);

    // Cursor position in display-width units.
    let prefix: String = tui.input.value.chars().take(tui.input.cursor).collect();
    let cursor_x = inner.x + prefix.width() as u16;
    frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
}

/// Greedy word wrap at `width` display columns; words longer than the width
/// are hard-broken. Always yields at least one line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_width = word.width();
        let current_width = current.width();
        if current.is_empty() {
            if word_width <= width {
                current.push_str(word);
            } else {
                hard_break(word, width, &mut out, &mut current);
            }
        } else if current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            out.push(std::mem::take(&mut current));
            if word_width <= width {
                current.push_str(word);
            } else {
                hard_break(word, width, &mut out, &mut current);
            }
        }
    }
    out.push(current);
    out
}

/// Splits an over-long word into width-sized pieces; the tail stays in
/// `current` so following words can share its line.
fn hard_break(word: &str, width: usize, out: &mut Vec<String>, current: &mut String) {
    for c in word.chars() {
        let c_width = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if current.width() + c_width > width {
            out.push(std::mem::take(current));
        }
        current.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 10);
        assert!(lines.iter().all(|l| l.width() <= 10));
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn test_wrap_empty_text_yields_one_line() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn test_wrap_hard_breaks_long_words() {
        let lines = wrap_text("abcdefghijklmnop", 5);
        assert_eq!(lines, vec!["abcde", "fghij", "klmno", "p"]);
    }

    #[test]
    fn test_wrap_is_unicode_width_aware() {
        // CJK chars are two columns wide.
        let lines = wrap_text("你好世界", 4);
        assert_eq!(lines, vec!["你好", "世界"]);
    }
}
