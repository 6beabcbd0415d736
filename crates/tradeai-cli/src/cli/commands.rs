//! One-shot command implementations.
//!
//! Each command builds a fresh client, signs in when credentials were
//! given, performs its request and prints human-readable output. Auth
//! failures get a hint instead of a bare error chain.

use anyhow::{Context, Result};
use tradeai_core::api::{ApiClient, AuthRequired, NewsCategory};
use tradeai_core::config::Config;

async fn client_signed_in(
    config: &Config,
    username: &Option<String>,
    password: &Option<String>,
) -> Result<ApiClient> {
    let client = ApiClient::from_config(config)?;
    if let (Some(username), Some(password)) = (username, password) {
        client
            .login(username, password)
            .await
            .context("Login failed")?;
    }
    Ok(client)
}

/// Rewrites 401/403 failures into a login hint.
fn auth_hint(err: anyhow::Error) -> anyhow::Error {
    if err.downcast_ref::<AuthRequired>().is_some() {
        anyhow::anyhow!(
            "authentication required; pass --username/--password or set \
             TRADEAI_USERNAME and TRADEAI_PASSWORD"
        )
    } else {
        err
    }
}

pub async fn register(config: &Config, username: &str, email: &str, password: &str) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let user = client.register(username, email, password).await?;
    println!("Registered {} <{}> (id {})", user.username, user.email, user.id);
    Ok(())
}

pub async fn whoami(
    config: &Config,
    username: &Option<String>,
    password: &Option<String>,
) -> Result<()> {
    let client = client_signed_in(config, username, password).await?;
    let user = client.current_user().await.map_err(auth_hint)?;
    println!("{} <{}> (id {})", user.username, user.email, user.id);
    Ok(())
}

pub async fn conversations_list(
    config: &Config,
    username: &Option<String>,
    password: &Option<String>,
) -> Result<()> {
    let client = client_signed_in(config, username, password).await?;
    let conversations = client.conversations().await.map_err(auth_hint)?;
    if conversations.is_empty() {
        println!("No conversations.");
        return Ok(());
    }
    for conversation in conversations {
        let when = conversation
            .last_message_time
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}  {}  ({} messages, last {})",
            conversation.id, conversation.title, conversation.message_count, when
        );
    }
    Ok(())
}

pub async fn conversations_new(
    config: &Config,
    title: Option<&str>,
    username: &Option<String>,
    password: &Option<String>,
) -> Result<()> {
    let client = client_signed_in(config, username, password).await?;
    let conversation = client.create_conversation(title).await.map_err(auth_hint)?;
    println!("{}  {}", conversation.id, conversation.title);
    Ok(())
}

pub async fn news(
    config: &Config,
    category: Option<&str>,
    username: &Option<String>,
    password: &Option<String>,
) -> Result<()> {
    let category = match category.or(config.news_category.as_deref()) {
        Some(raw) => Some(raw.parse::<NewsCategory>()?),
        None => None,
    };
    let client = client_signed_in(config, username, password).await?;
    let items = client.news(category).await.map_err(auth_hint)?;
    if items.is_empty() {
        println!("No news.");
        return Ok(());
    }
    for item in items {
        let category = item
            .category
            .map_or("-".to_string(), |c| c.to_string());
        let impact = item
            .impact
            .map_or(String::new(), |i| format!(", impact {i}"));
        println!("{}  [{category}{impact}]  {}", item.title, item.source);
        if !item.summary.is_empty() {
            println!("  {}", item.summary);
        }
        if !item.ai_analysis.is_empty() {
            println!("  AI: {}", item.ai_analysis);
        }
        println!();
    }
    Ok(())
}
