//! Core library for the TradeAI terminal client.
//!
//! Contains everything that is independent of the terminal UI:
//! - `api` - HTTP client for the TradeAI backend (auth, conversations,
//!   messages, news), including wire-shape normalization
//! - `chat` - the message-synchronization engine (store, dedup rules,
//!   reply poller, history pager)
//! - `config` - configuration loading from `${TRADEAI_HOME}/config.toml`
//! - `logging` - file-based tracing bootstrap

pub mod api;
pub mod chat;
pub mod config;
pub mod logging;
