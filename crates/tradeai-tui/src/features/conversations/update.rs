//! Conversation list/picker reducer logic.

use crossterm::event::{KeyCode, KeyEvent};

use crate::effects::UiEffect;
use crate::events::ConversationsEvent;
use crate::features::chat;
use crate::state::{AppState, Overlay, TuiState};

use super::state::PickerState;

/// Opens the picker overlay and refreshes the list.
pub fn open_picker(app: &mut AppState) -> Vec<UiEffect> {
    let mut picker = PickerState {
        loading: true,
        ..PickerState::default()
    };
    // Pre-select the active conversation if it is in the cached list.
    if let Some(active) = &app.tui.chat.conversation
        && let Some(pos) = app.tui.conversations.iter().position(|c| c.id == active.id)
    {
        picker.selected = pos;
    }
    app.overlay = Some(Overlay::ConversationPicker(picker));

    let task = app.tui.task_seq.next_id();
    app.tui.tasks.conversations.start(task);
    vec![UiEffect::LoadConversations { task }]
}

/// Key handling while the picker overlay is open.
pub fn handle_picker_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let Some(Overlay::ConversationPicker(picker)) = app.overlay.as_mut() else {
        return vec![];
    };
    match key.code {
        KeyCode::Esc => {
            app.overlay = None;
            vec![]
        }
        KeyCode::Up => {
            picker.select_prev();
            vec![]
        }
        KeyCode::Down => {
            picker.select_next(app.tui.conversations.len());
            vec![]
        }
        KeyCode::Enter => {
            let selected = app.tui.conversations.get(picker.selected).cloned();
            app.overlay = None;
            match selected {
                Some(conversation) => chat::update::select_conversation(&mut app.tui, conversation),
                None => vec![],
            }
        }
        KeyCode::Char('n') => {
            if app.tui.tasks.conversation_create.is_running() {
                return vec![];
            }
            let task = app.tui.task_seq.next_id();
            app.tui.tasks.conversation_create.start(task);
            vec![UiEffect::CreateConversation { task, title: None }]
        }
        _ => vec![],
    }
}

/// Applies conversation-list completions.
pub fn handle_event(app: &mut AppState, event: ConversationsEvent) -> Vec<UiEffect> {
    match event {
        ConversationsEvent::Loaded { task, result } => {
            if !app.tui.tasks.conversations.finish_if_active(task) {
                return vec![];
            }
            match result {
                Ok(conversations) => {
                    app.tui.conversations = conversations;
                    if let Some(Overlay::ConversationPicker(picker)) = app.overlay.as_mut() {
                        picker.loading = false;
                        picker.selected = picker
                            .selected
                            .min(app.tui.conversations.len().saturating_sub(1));
                    }
                    // First load after login: enter the most recent
                    // conversation, or create one for an empty account.
                    if app.tui.chat.conversation.is_none() {
                        return match app.tui.conversations.first().cloned() {
                            Some(conversation) => {
                                chat::update::select_conversation(&mut app.tui, conversation)
                            }
                            None => create_conversation(&mut app.tui),
                        };
                    }
                    vec![]
                }
                Err(err) => {
                    if let Some(Overlay::ConversationPicker(picker)) = app.overlay.as_mut() {
                        picker.loading = false;
                        picker.error = Some(err.message.clone());
                    }
                    chat::update::apply_error(&mut app.tui, &err)
                }
            }
        }
        ConversationsEvent::Created { task, result } => {
            if !app.tui.tasks.conversation_create.finish_if_active(task) {
                return vec![];
            }
            match result {
                Ok(conversation) => {
                    app.tui.conversations.insert(0, conversation.clone());
                    app.overlay = None;
                    chat::update::select_conversation(&mut app.tui, conversation)
                }
                Err(err) => chat::update::apply_error(&mut app.tui, &err),
            }
        }
    }
}

fn create_conversation(tui: &mut TuiState) -> Vec<UiEffect> {
    if tui.tasks.conversation_create.is_running() {
        return vec![];
    }
    let task = tui.task_seq.next_id();
    tui.tasks.conversation_create.start(task);
    vec![UiEffect::CreateConversation { task, title: None }]
}
