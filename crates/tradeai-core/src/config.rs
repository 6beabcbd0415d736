//! Configuration management.
//!
//! Loads configuration from ${TRADEAI_HOME}/config.toml with sensible
//! defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the TradeAI API.
    pub api_base_url: String,

    /// Seconds between reply-poll fetches.
    pub poll_interval_secs: u64,

    /// Bound on the recent-message window each poll tick fetches.
    pub poll_window: usize,

    /// Messages per history page when paginating upward.
    pub history_page_size: usize,

    /// Default news category filter (bullish, bearish, neutral).
    pub news_category: Option<String>,
}

impl Config {
    pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
    const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;
    const DEFAULT_POLL_WINDOW: usize = 50;
    const DEFAULT_HISTORY_PAGE_SIZE: usize = 30;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the default config template if no file exists yet.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            poll_interval_secs: Self::DEFAULT_POLL_INTERVAL_SECS,
            poll_window: Self::DEFAULT_POLL_WINDOW,
            history_page_size: Self::DEFAULT_HISTORY_PAGE_SIZE,
            news_category: None,
        }
    }
}

/// Default config.toml contents written by `init`.
fn default_config_template() -> &'static str {
    r#"# TradeAI client configuration

# Base URL of the TradeAI API.
api_base_url = "http://localhost:8000/api"

# Seconds between reply-poll fetches.
poll_interval_secs = 2

# Recent-message window fetched on each poll tick.
poll_window = 50

# Messages per history page when scrolling upward.
history_page_size = 30

# Default news category filter: bullish, bearish or neutral.
# news_category = "bullish"
"#
}

pub mod paths {
    //! Path resolution for TradeAI configuration and data directories.
    //!
    //! TRADEAI_HOME resolution order:
    //! 1. TRADEAI_HOME environment variable (if set)
    //! 2. ~/.config/tradeai (default)

    use std::path::PathBuf;

    /// Returns the TradeAI home directory.
    ///
    /// Checks TRADEAI_HOME env var first, falls back to ~/.config/tradeai
    pub fn tradeai_home() -> PathBuf {
        if let Ok(home) = std::env::var("TRADEAI_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("tradeai"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        tradeai_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        tradeai_home().join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.api_base_url, Config::DEFAULT_API_BASE_URL);
        assert_eq!(config.poll_interval_secs, 2);
        assert_eq!(config.poll_window, 50);
        assert_eq!(config.history_page_size, 30);
        assert!(config.news_category.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_base_url = \"https://api.example.com/api\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com/api");
        assert_eq!(config.history_page_size, 30);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_base_url = [not toml").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_init_writes_parseable_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::init(&path).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_base_url, Config::DEFAULT_API_BASE_URL);

        // Re-init must not clobber an existing file.
        fs::write(&path, "poll_interval_secs = 7\n").unwrap();
        Config::init(&path).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.poll_interval_secs, 7);
    }

    #[test]
    fn test_poll_interval_floors_at_one_second() {
        let mut config = Config::default();
        config.poll_interval_secs = 0;
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }
}
