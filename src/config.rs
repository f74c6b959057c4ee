use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Url;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
pub const DEFAULT_CHAT_PATH: &str = "/chat";
pub const DEFAULT_START_MESSAGE: &str = "start";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Terminal chat client for a /chat JSON endpoint", long_about = None)]
pub struct Cli {
    /// Base URL of the chat server
    #[arg(long, env = "CHAT_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// Path of the chat endpoint
    #[arg(long, env = "CHAT_PATH", default_value = DEFAULT_CHAT_PATH)]
    pub chat_path: String,

    /// Message sent on startup to fetch the first conversation node
    #[arg(long, env = "CHAT_START_MESSAGE", default_value = DEFAULT_START_MESSAGE)]
    pub start_message: String,

    /// Give up on a request after this many seconds (no limit when unset)
    #[arg(long, env = "CHAT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Clear the option list on network errors as well as server errors
    #[arg(long, env = "CHAT_CLEAR_OPTIONS_ON_NETWORK_ERROR")]
    pub clear_options_on_network_error: bool,

    /// Do not fetch the first conversation node on startup
    #[arg(long)]
    pub no_start: bool,
}

/// Behaviour knobs for [`crate::services::widget::ChatWidget`].
#[derive(Debug, Clone, Default)]
pub struct WidgetConfig {
    pub clear_options_on_network_error: bool,
}

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub endpoint: Url,
    pub start_message: String,
    pub timeout: Option<Duration>,
}

impl TransportConfig {
    pub fn new(base_url: &str, chat_path: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .with_context(|| format!("invalid server url: {base_url}"))?;
        let endpoint = base
            .join(chat_path)
            .with_context(|| format!("invalid chat path: {chat_path}"))?;
        Ok(Self {
            endpoint,
            start_message: DEFAULT_START_MESSAGE.to_string(),
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Cli {
    pub fn widget_config(&self) -> WidgetConfig {
        WidgetConfig {
            clear_options_on_network_error: self.clear_options_on_network_error,
        }
    }

    pub fn transport_config(&self) -> Result<TransportConfig> {
        let mut cfg = TransportConfig::new(&self.server_url, &self.chat_path)?;
        cfg.start_message = self.start_message.clone();
        cfg.timeout = self.timeout_secs.map(Duration::from_secs);
        Ok(cfg)
    }
}
