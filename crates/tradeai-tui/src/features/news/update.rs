//! News view reducer logic.

use crossterm::event::{KeyCode, KeyEvent};
use tradeai_core::api::NewsCategory;

use crate::effects::UiEffect;
use crate::events::NewsEvent;
use crate::features::chat;
use crate::state::{TuiState, View};

/// Switches to the news view, fetching on first entry.
pub fn open(tui: &mut TuiState) -> Vec<UiEffect> {
    tui.view = View::News;
    if tui.news.loaded || tui.news.loading {
        return vec![];
    }
    // Seed the filter from config on first open.
    if tui.news.category.is_none()
        && let Some(raw) = &tui.config.news_category
        && let Ok(category) = raw.parse::<NewsCategory>()
    {
        tui.news.category = Some(category);
    }
    fetch(tui)
}

pub fn handle_key(tui: &mut TuiState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Esc => {
            tui.view = View::Chat;
            vec![]
        }
        KeyCode::Up => {
            tui.news.select_prev();
            vec![]
        }
        KeyCode::Down => {
            tui.news.select_next();
            vec![]
        }
        KeyCode::Char('c') => {
            tui.news.cycle_category();
            fetch(tui)
        }
        KeyCode::Char('r') => fetch(tui),
        _ => vec![],
    }
}

pub fn handle_event(tui: &mut TuiState, event: NewsEvent) -> Vec<UiEffect> {
    match event {
        NewsEvent::Loaded {
            task,
            category,
            result,
        } => {
            if !tui.tasks.news.finish_if_active(task) {
                return vec![];
            }
            // A filter change while the fetch was in flight wins.
            if category != tui.news.category {
                return vec![];
            }
            match result {
                Ok(items) => {
                    tui.news.apply(items);
                    vec![]
                }
                Err(err) => {
                    tui.news.loading = false;
                    tui.news.error = Some(err.message.clone());
                    chat::update::apply_error(tui, &err)
                }
            }
        }
    }
}

fn fetch(tui: &mut TuiState) -> Vec<UiEffect> {
    let task = tui.task_seq.next_id();
    tui.tasks.news.start(task);
    tui.news.loading = true;
    tui.news.error = None;
    vec![UiEffect::FetchNews {
        task,
        category: tui.news.category,
    }]
}
