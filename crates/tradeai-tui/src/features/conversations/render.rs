//! Conversation picker overlay rendering.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::state::AppState;

use super::state::PickerState;

pub fn render_picker(frame: &mut Frame, picker: &PickerState, app: &AppState) {
    let area = centered_rect(frame.area(), 60, 16);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Conversations  (Enter: open, n: new, Esc: close) ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    if picker.loading && app.tui.conversations.is_empty() {
        lines.push(Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        )));
    } else if let Some(error) = &picker.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else if app.tui.conversations.is_empty() {
        lines.push(Line::from(Span::styled(
            "No conversations yet; press n to start one.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let visible = usize::from(inner.height).saturating_sub(lines.len());
    let skip = picker.selected.saturating_sub(visible.saturating_sub(1));
    for (i, conversation) in app.tui.conversations.iter().enumerate().skip(skip) {
        let marker = if i == picker.selected { "> " } else { "  " };
        let style = if i == picker.selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let when = conversation
            .last_message_time
            .map(|t| t.format("%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let preview = conversation
            .last_message_preview
            .as_deref()
            .map(|p| format!("  {p}"))
            .unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{}", conversation.title), style),
            Span::styled(
                format!("  {} msgs  {when}{preview}", conversation.message_count),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Centers a `width` x `height` box in `area`, clamped to fit.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
