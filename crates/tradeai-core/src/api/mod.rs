//! TradeAI API client: session auth, conversations, messages, news.

mod client;
mod error;
mod types;

pub use client::{ApiClient, ImageAttachment, USER_AGENT};
pub use error::AuthRequired;
pub use types::{
    Conversation, MessagePage, MessageStatus, NewsCategory, NewsImpact, NewsItem, User,
};
