//! Effect handler implementations.
//!
//! Pure async functions: the runtime spawns them and forwards the returned
//! event to the inbox. Each function flattens its errors into [`UiError`]
//! so the reducer never sees `anyhow` directly.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tradeai_core::api::{ApiClient, ImageAttachment, NewsCategory};

use crate::common::TaskId;
use crate::events::{
    ChatEvent, ConversationsEvent, NewsEvent, SessionEvent, UiError, UiEvent, UiResult,
};

fn flatten<T>(result: anyhow::Result<T>) -> UiResult<T> {
    result.map_err(|err| UiError::from_error(&err))
}

pub async fn login(
    client: Arc<ApiClient>,
    task: TaskId,
    username: String,
    password: String,
) -> UiEvent {
    let result = flatten(client.login(&username, &password).await);
    UiEvent::Session(SessionEvent::LoginFinished { task, result })
}

pub async fn register(
    client: Arc<ApiClient>,
    task: TaskId,
    username: String,
    email: String,
    password: String,
) -> UiEvent {
    let result = flatten(client.register(&username, &email, &password).await);
    UiEvent::Session(SessionEvent::RegisterFinished { task, result })
}

pub async fn logout(client: Arc<ApiClient>, task: TaskId) -> UiEvent {
    let result = flatten(client.logout().await);
    UiEvent::Session(SessionEvent::LogoutFinished { task, result })
}

pub async fn check_session(client: Arc<ApiClient>, task: TaskId) -> UiEvent {
    let result = flatten(client.current_user().await);
    UiEvent::Session(SessionEvent::SessionChecked { task, result })
}

pub async fn load_conversations(client: Arc<ApiClient>, task: TaskId) -> UiEvent {
    let result = flatten(client.conversations().await);
    UiEvent::Conversations(ConversationsEvent::Loaded { task, result })
}

pub async fn create_conversation(
    client: Arc<ApiClient>,
    task: TaskId,
    title: Option<String>,
) -> UiEvent {
    let result = flatten(client.create_conversation(title.as_deref()).await);
    UiEvent::Conversations(ConversationsEvent::Created { task, result })
}

pub async fn load_history(
    client: Arc<ApiClient>,
    task: TaskId,
    conversation_id: String,
    page_size: usize,
) -> UiEvent {
    let result = flatten(client.messages(&conversation_id, page_size, 0).await);
    UiEvent::Chat(ChatEvent::HistoryLoaded {
        task,
        conversation_id,
        result,
    })
}

pub async fn load_older(
    client: Arc<ApiClient>,
    task: TaskId,
    conversation_id: String,
    offset: usize,
    page_size: usize,
) -> UiEvent {
    let result = flatten(client.messages(&conversation_id, page_size, offset).await);
    UiEvent::Chat(ChatEvent::OlderLoaded {
        task,
        conversation_id,
        result,
    })
}

pub async fn submit_message(
    client: Arc<ApiClient>,
    task: TaskId,
    conversation_id: String,
    temp_id: String,
    content: String,
    attachment: Option<PathBuf>,
) -> UiEvent {
    let result = flatten(send_with_attachment(&client, &conversation_id, &content, attachment).await);
    UiEvent::Chat(ChatEvent::SendFinished {
        task,
        conversation_id,
        temp_id,
        result,
    })
}

async fn send_with_attachment(
    client: &ApiClient,
    conversation_id: &str,
    content: &str,
    attachment: Option<PathBuf>,
) -> anyhow::Result<tradeai_core::chat::MessageAck> {
    let image = match attachment {
        Some(path) => {
            let read_path = path.clone();
            let bytes = tokio::task::spawn_blocking(move || std::fs::read(&read_path))
                .await
                .context("Image read task failed")?
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "chart.png".to_string());
            Some(ImageAttachment { file_name, bytes })
        }
        None => None,
    };
    client.create_message(conversation_id, content, image).await
}

pub async fn fetch_news(
    client: Arc<ApiClient>,
    task: TaskId,
    category: Option<NewsCategory>,
) -> UiEvent {
    let result = flatten(client.news(category).await);
    UiEvent::News(NewsEvent::Loaded {
        task,
        category,
        result,
    })
}
