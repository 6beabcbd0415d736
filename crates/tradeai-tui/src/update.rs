//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects. This is the single source of truth
//! for how events modify state.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::{auth, chat, conversations, news};
use crate::state::{AppState, View};

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Frame { width, height } => {
            app.tui.viewport = (width, height);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::Session(session_event) => {
            auth::handle_session_event(&mut app.tui, session_event)
        }
        UiEvent::Conversations(conversations_event) => {
            conversations::handle_event(app, conversations_event)
        }
        UiEvent::Chat(chat_event) => chat::update::handle_event(&mut app.tui, chat_event),
        UiEvent::News(news_event) => news::update::handle_event(&mut app.tui, news_event),
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => scroll_up(app, 3),
            MouseEventKind::ScrollDown => {
                scroll_down(app, 3);
                vec![]
            }
            _ => vec![],
        },
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    // Ctrl+C quits from anywhere.
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.tui.should_quit = true;
        return vec![UiEffect::Quit];
    }

    if app.overlay.is_some() {
        return conversations::handle_picker_key(app, key);
    }

    match app.tui.view {
        View::Login => auth::handle_key(&mut app.tui, key),
        View::News => news::update::handle_key(&mut app.tui, key),
        View::Chat => handle_chat_key(app, key),
    }
}

fn handle_chat_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            conversations::open_picker(app)
        }
        KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            news::update::open(&mut app.tui)
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => logout(app),
        KeyCode::Enter => chat::update::submit_input(&mut app.tui),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.tui.input.insert_char(c);
            vec![]
        }
        KeyCode::Backspace => {
            app.tui.input.backspace();
            vec![]
        }
        KeyCode::Left => {
            app.tui.input.move_left();
            vec![]
        }
        KeyCode::Right => {
            app.tui.input.move_right();
            vec![]
        }
        KeyCode::Home => {
            app.tui.input.move_home();
            vec![]
        }
        KeyCode::End => {
            app.tui.input.move_end();
            vec![]
        }
        KeyCode::Up => {
            app.tui.input.history_prev();
            vec![]
        }
        KeyCode::Down => {
            app.tui.input.history_next();
            vec![]
        }
        KeyCode::PageUp => {
            let lines = page_lines(&app.tui);
            scroll_up(app, lines)
        }
        KeyCode::PageDown => {
            let lines = page_lines(&app.tui);
            scroll_down(app, lines);
            vec![]
        }
        _ => vec![],
    }
}

fn page_lines(tui: &crate::state::TuiState) -> usize {
    tui.transcript_height().max(1)
}

/// Scrolls the chat transcript up and triggers upward pagination when the
/// viewport reaches the top.
fn scroll_up(app: &mut AppState, lines: usize) -> Vec<UiEffect> {
    if app.tui.view != View::Chat {
        return vec![];
    }
    let height = app.tui.transcript_height();
    app.tui.chat.scroll.scroll_up(lines, height);
    chat::update::maybe_load_older(&mut app.tui)
}

fn scroll_down(app: &mut AppState, lines: usize) {
    if app.tui.view != View::Chat {
        return;
    }
    let height = app.tui.transcript_height();
    app.tui.chat.scroll.scroll_down(lines, height);
}

fn logout(app: &mut AppState) -> Vec<UiEffect> {
    if app.tui.tasks.logout.is_running() {
        return vec![];
    }
    let task = app.tui.task_seq.next_id();
    app.tui.tasks.logout.start(task);
    vec![UiEffect::Logout { task }]
}
