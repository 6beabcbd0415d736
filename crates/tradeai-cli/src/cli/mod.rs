//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use tradeai_core::config::{Config, paths};

mod commands;

#[derive(Parser)]
#[command(name = "tradeai")]
#[command(version)]
#[command(about = "Terminal client for the TradeAI trading assistant")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the API base URL from config
    #[arg(long, env = "TRADEAI_API_URL", value_name = "URL")]
    api_url: Option<String>,
}

/// Credentials for one-shot commands.
///
/// The TUI keeps its session cookie alive for the whole run; one-shot
/// commands sign in per invocation instead.
#[derive(clap::Args, Debug, Clone, Default)]
struct AuthArgs {
    /// Username for API login
    #[arg(long, env = "TRADEAI_USERNAME")]
    username: Option<String>,

    /// Password for API login
    #[arg(long, env = "TRADEAI_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Interactive chat (the default when no command is given)
    Chat,

    /// Register a new account
    Register {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        /// Password for the new account
        #[arg(long, env = "TRADEAI_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show the logged-in user
    Whoami {
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Manage conversations
    Conversations {
        #[command(subcommand)]
        command: ConversationCommands,
    },

    /// Show AI-annotated market news
    News {
        /// Filter by category: bullish, bearish or neutral
        #[arg(long)]
        category: Option<String>,

        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConversationCommands {
    /// List conversations
    List {
        #[command(flatten)]
        auth: AuthArgs,
    },
    /// Create a conversation
    New {
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        auth: AuthArgs,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Print the config file path
    Path,
    /// Print the effective configuration
    Show,
    /// Write the default config file if none exists
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }

    // Config commands need no runtime or network.
    if let Some(Commands::Config { command }) = &cli.command {
        return match command {
            ConfigCommands::Path => {
                println!("{}", paths::config_path().display());
                Ok(())
            }
            ConfigCommands::Show => {
                print!("{}", toml::to_string_pretty(&config)?);
                Ok(())
            }
            ConfigCommands::Init => {
                let path = paths::config_path();
                Config::init(&path)?;
                println!("{}", path.display());
                Ok(())
            }
        };
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async move {
        match cli.command {
            None | Some(Commands::Chat) => {
                let _log_guard = tradeai_core::logging::init()?;
                tradeai_tui::run_interactive(config).await
            }
            Some(Commands::Register {
                username,
                email,
                password,
            }) => commands::register(&config, &username, &email, &password).await,
            Some(Commands::Whoami { auth }) => {
                commands::whoami(&config, &auth.username, &auth.password).await
            }
            Some(Commands::Conversations { command }) => match command {
                ConversationCommands::List { auth } => {
                    commands::conversations_list(&config, &auth.username, &auth.password).await
                }
                ConversationCommands::New { title, auth } => {
                    commands::conversations_new(
                        &config,
                        title.as_deref(),
                        &auth.username,
                        &auth.password,
                    )
                    .await
                }
            },
            Some(Commands::News { category, auth }) => {
                commands::news(&config, category.as_deref(), &auth.username, &auth.password).await
            }
            Some(Commands::Config { .. }) => unreachable!("handled above"),
        }
    })
}
