//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::amazon::marketplace::Marketplace;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Referral tag appended to every affiliate link.
pub const DEFAULT_AFFILIATE_TAG: &str = "crdt25-21";

/// Catalog endpoint that stores submitted products.
pub const DEFAULT_CATALOG_URL: &str = "https://amazon-backend-47xw.onrender.com/products";

/// Application configuration with layered loading.
///
/// Built once at startup and handed by reference to every component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Amazon storefront for product and affiliate URLs
    #[serde(default)]
    pub marketplace: Marketplace,

    /// Referral tag for affiliate URLs
    #[serde(default = "default_affiliate_tag")]
    pub affiliate_tag: String,

    /// Catalog endpoint receiving product records
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,

    /// Telegram bot token; only ever read from the environment or CLI
    #[serde(default, skip_serializing)]
    pub telegram_token: Option<String>,

    /// User-Agent sent with product page fetches
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Proxy URL (e.g., socks5://host:port) for page fetches
    #[serde(default)]
    pub proxy: Option<String>,

    /// Upper bound on a product page fetch, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Upper bound on a catalog submission, in seconds
    #[serde(default = "default_submit_timeout_secs")]
    pub submit_timeout_secs: u64,

    /// Telegram long-poll window, in seconds
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,

    /// Base delay after a failed getUpdates call
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Random jitter added to the retry delay (0 to this value)
    #[serde(default = "default_retry_jitter_ms")]
    pub retry_jitter_ms: u64,

    /// Title used when the page has none
    #[serde(default = "default_title_placeholder")]
    pub title_placeholder: String,

    /// Price used when the page shows none
    #[serde(default = "default_price_placeholder")]
    pub price_placeholder: String,

    /// Output format for CLI lookups
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_affiliate_tag() -> String {
    DEFAULT_AFFILIATE_TAG.to_string()
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

fn default_submit_timeout_secs() -> u64 {
    15
}

fn default_poll_timeout_secs() -> u64 {
    30
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_retry_jitter_ms() -> u64 {
    1000
}

fn default_title_placeholder() -> String {
    "Producto Amazon".to_string()
}

fn default_price_placeholder() -> String {
    "No disponible".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marketplace: Marketplace::Es,
            affiliate_tag: default_affiliate_tag(),
            catalog_url: default_catalog_url(),
            telegram_token: None,
            user_agent: default_user_agent(),
            proxy: None,
            fetch_timeout_secs: default_fetch_timeout_secs(),
            submit_timeout_secs: default_submit_timeout_secs(),
            poll_timeout_secs: default_poll_timeout_secs(),
            retry_delay_ms: default_retry_delay_ms(),
            retry_jitter_ms: default_retry_jitter_ms(),
            title_placeholder: default_title_placeholder(),
            price_placeholder: default_price_placeholder(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("amz-relay").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(marketplace) = std::env::var("RELAY_MARKETPLACE") {
            if let Ok(m) = marketplace.parse() {
                self.marketplace = m;
            }
        }

        if let Ok(tag) = std::env::var("RELAY_AFFILIATE_TAG") {
            self.affiliate_tag = tag;
        }

        if let Ok(url) = std::env::var("RELAY_CATALOG_URL") {
            self.catalog_url = url;
        }

        if let Ok(proxy) = std::env::var("RELAY_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(token) = std::env::var("TELEGRAM_TOKEN") {
            if !token.trim().is_empty() {
                self.telegram_token = Some(token);
            }
        }

        self
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    /// Returns the bot token or fails with a hint on where to set it.
    pub fn require_token(&self) -> Result<&str> {
        self.telegram_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .context("Telegram bot token missing. Set TELEGRAM_TOKEN or pass --token")
    }
}

/// Output format for lookup results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}
