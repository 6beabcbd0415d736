//! Full-screen TUI for the TradeAI client.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};

use anyhow::Result;
use tradeai_core::api::ApiClient;
use tradeai_core::config::Config;

pub use runtime::TuiRuntime;

/// Runs the interactive client until the user quits.
pub async fn run_interactive(config: Config) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "Chat mode requires a terminal.\n\
             Use `tradeai news` or `tradeai conversations list` for non-interactive output."
        );
    }

    let client = ApiClient::from_config(&config)?;
    let mut runtime = TuiRuntime::new(config, client)?;
    let result = runtime.run();
    drop(runtime); // restores the terminal before anything is printed
    result
}
