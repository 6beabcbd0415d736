//! Auth view rendering.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::state::TuiState;

use super::state::{AuthField, AuthMode};

pub fn render_auth(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let form_height = 12u16.min(area.height);
    let form_width = 48u16.min(area.width);
    let form = Rect {
        x: area.x + (area.width - form_width) / 2,
        y: area.y + (area.height - form_height) / 2,
        width: form_width,
        height: form_height,
    };

    let title = match tui.auth.mode {
        AuthMode::Login => " Sign in  (Ctrl+T: register) ",
        AuthMode::Register => " Register  (Ctrl+T: sign in) ",
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(form);
    frame.render_widget(block, form);

    let mut lines: Vec<Line> = Vec::new();
    for field in tui.auth.fields() {
        let (label, value, mask) = match field {
            AuthField::Username => ("Username", &tui.auth.username, false),
            AuthField::Email => ("Email", &tui.auth.email, false),
            AuthField::Password => ("Password", &tui.auth.password, true),
            AuthField::Confirm => ("Confirm", &tui.auth.confirm, true),
        };
        let shown = if mask {
            "*".repeat(value.chars().count())
        } else {
            value.clone()
        };
        let style = if *field == tui.auth.focus {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{label:>9}: "), style),
            Span::raw(shown),
        ]));
    }
    lines.push(Line::from(""));
    if tui.auth.submitting {
        lines.push(Line::from(Span::styled(
            "Signing in...",
            Style::default().fg(Color::DarkGray),
        )));
    } else if let Some(error) = &tui.auth.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Enter to submit, Tab to move",
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
