//! News view rendering: item list on top, AI analysis of the selection
//! below.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use tradeai_core::api::{NewsCategory, NewsItem};

use crate::state::TuiState;

pub fn render_news(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let [list_area, detail_area] =
        Layout::vertical([Constraint::Percentage(55), Constraint::Fill(1)]).areas(area);

    render_list(frame, list_area, tui);
    render_detail(frame, detail_area, tui.news.selected_item());
}

fn category_style(category: Option<NewsCategory>) -> Style {
    match category {
        Some(NewsCategory::Bullish) => Style::default().fg(Color::Green),
        Some(NewsCategory::Bearish) => Style::default().fg(Color::Red),
        Some(NewsCategory::Neutral) => Style::default().fg(Color::Yellow),
        None => Style::default().fg(Color::DarkGray),
    }
}

fn render_list(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let filter = tui
        .news
        .category
        .map_or("all".to_string(), |c| c.to_string());
    let title = format!(" Market News [{filter}]  (c: filter, r: refresh, Esc: chat) ");
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    if tui.news.loading {
        lines.push(Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        )));
    } else if let Some(error) = &tui.news.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else if tui.news.items.is_empty() {
        lines.push(Line::from(Span::styled(
            "No news for this filter.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let visible = usize::from(inner.height);
    let skip = tui.news.selected.saturating_sub(visible.saturating_sub(1));
    for (i, item) in tui.news.items.iter().enumerate().skip(skip) {
        let marker = if i == tui.news.selected { "> " } else { "  " };
        let style = if i == tui.news.selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let category = item
            .category
            .map_or("-".to_string(), |c| c.to_string());
        let impact = item.impact.map_or(String::new(), |i| format!(" [{i}]"));
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{}", item.title), style),
            Span::raw("  "),
            Span::styled(category, category_style(item.category)),
            Span::styled(impact, Style::default().fg(Color::DarkGray)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_detail(frame: &mut Frame, area: Rect, item: Option<&NewsItem>) {
    let block = Block::default().borders(Borders::ALL).title(" AI Analysis ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(item) = item else {
        return;
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(
            item.source.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", item.timestamp),
            Style::default().fg(Color::DarkGray),
        ),
    ])];
    if !item.summary.is_empty() {
        lines.push(Line::from(item.summary.clone()));
        lines.push(Line::from(""));
    }
    if !item.ai_analysis.is_empty() {
        lines.push(Line::from(Span::styled(
            item.ai_analysis.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
