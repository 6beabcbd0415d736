//! Auth view reducer logic.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::effects::UiEffect;
use crate::events::SessionEvent;
use crate::state::{Notice, TuiState, View};

use super::state::AuthMode;

pub fn handle_key(tui: &mut TuiState, key: KeyEvent) -> Vec<UiEffect> {
    if tui.auth.submitting {
        return vec![];
    }
    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            tui.auth.focus_next();
            vec![]
        }
        KeyCode::BackTab | KeyCode::Up => {
            tui.auth.focus_prev();
            vec![]
        }
        KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            tui.auth.toggle_mode();
            vec![]
        }
        KeyCode::Backspace => {
            let focus = tui.auth.focus;
            tui.auth.field_value_mut(focus).pop();
            vec![]
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let focus = tui.auth.focus;
            tui.auth.field_value_mut(focus).push(c);
            vec![]
        }
        KeyCode::Enter => submit(tui),
        _ => vec![],
    }
}

fn submit(tui: &mut TuiState) -> Vec<UiEffect> {
    if let Err(message) = tui.auth.validate() {
        tui.auth.error = Some(message);
        return vec![];
    }
    tui.auth.error = None;
    tui.auth.submitting = true;
    let task = tui.task_seq.next_id();
    match tui.auth.mode {
        AuthMode::Login => {
            tui.tasks.login.start(task);
            vec![UiEffect::Login {
                task,
                username: tui.auth.username.clone(),
                password: tui.auth.password.clone(),
            }]
        }
        AuthMode::Register => {
            tui.tasks.register.start(task);
            vec![UiEffect::Register {
                task,
                username: tui.auth.username.clone(),
                email: tui.auth.email.clone(),
                password: tui.auth.password.clone(),
            }]
        }
    }
}

/// Applies session lifecycle completions (login, register, logout, the
/// startup cookie probe).
pub fn handle_session_event(tui: &mut TuiState, event: SessionEvent) -> Vec<UiEffect> {
    match event {
        SessionEvent::LoginFinished { task, result } => {
            if !tui.tasks.login.finish_if_active(task) {
                return vec![];
            }
            tui.auth.submitting = false;
            apply_auth_result(tui, result)
        }
        SessionEvent::RegisterFinished { task, result } => {
            if !tui.tasks.register.finish_if_active(task) {
                return vec![];
            }
            tui.auth.submitting = false;
            apply_auth_result(tui, result)
        }
        SessionEvent::SessionChecked { task, result } => {
            if !tui.tasks.session_check.finish_if_active(task) {
                return vec![];
            }
            match result {
                // The stored cookie is still valid; skip the login form.
                Ok(user) => finish_login(tui, user),
                Err(_) => {
                    tui.view = View::Login;
                    vec![]
                }
            }
        }
        SessionEvent::LogoutFinished { task, result } => {
            if !tui.tasks.logout.finish_if_active(task) {
                return vec![];
            }
            if let Err(err) = result {
                tracing::warn!(error = %err.message, "logout request failed");
            }
            tui.user = None;
            tui.chat.deactivate();
            tui.conversations.clear();
            tui.tasks.clear_all();
            tui.auth.reset();
            tui.view = View::Login;
            vec![]
        }
    }
}

fn apply_auth_result(
    tui: &mut TuiState,
    result: Result<tradeai_core::api::User, crate::events::UiError>,
) -> Vec<UiEffect> {
    match result {
        Ok(user) => finish_login(tui, user),
        Err(err) => {
            tui.auth.error = Some(err.message);
            vec![]
        }
    }
}

fn finish_login(tui: &mut TuiState, user: tradeai_core::api::User) -> Vec<UiEffect> {
    tui.notice = Some(Notice::info(format!("Signed in as {}", user.username)));
    tui.user = Some(user);
    tui.auth.reset();
    tui.view = View::Chat;

    // Load the conversation list; its completion auto-selects the most
    // recent conversation (or creates the first one).
    let task = tui.task_seq.next_id();
    tui.tasks.conversations.start(task);
    vec![UiEffect::LoadConversations { task }]
}
