pub mod auth;
pub mod chat;
pub mod conversations;
pub mod input;
pub mod news;
