//! Top-level rendering: header, active view, status line, overlays.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::features::auth::render::render_auth;
use crate::features::chat::render_chat;
use crate::features::conversations::render_picker;
use crate::features::news::render_news;
use crate::state::{AppState, Overlay, View};

pub fn render(frame: &mut Frame, app: &mut AppState) {
    let [header_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header_area, app);

    match app.tui.view {
        View::Login => render_auth(frame, body_area, &app.tui),
        View::Chat => render_chat(frame, body_area, &mut app.tui),
        View::News => render_news(frame, body_area, &app.tui),
    }

    render_status(frame, status_area, app);

    if let Some(Overlay::ConversationPicker(picker)) = &app.overlay {
        render_picker(frame, picker, app);
    }
}

fn render_header(frame: &mut Frame, area: ratatui::layout::Rect, app: &AppState) {
    let mut spans = vec![Span::styled(
        " TradeAI ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(conversation) = &app.tui.chat.conversation {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            conversation.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(user) = &app.tui.user {
        spans.push(Span::styled(
            format!("  ({})", user.username),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status(frame: &mut Frame, area: ratatui::layout::Rect, app: &AppState) {
    let line = match &app.tui.notice {
        Some(notice) => {
            let style = if notice.error {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Green)
            };
            Line::from(Span::styled(format!(" {}", notice.text), style))
        }
        None => Line::from(Span::styled(
            " Ctrl+L conversations · Ctrl+G news · Ctrl+D logout · Ctrl+C quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}
