//! Serve command: run the Telegram bot.

use crate::amazon::AmazonClient;
use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::relay::Relay;
use crate::resolver::Resolver;
use crate::telegram::{Bot, TelegramApi};
use anyhow::{Context, Result};

/// Runs the long-polling bot until interrupted.
pub struct ServeCommand {
    config: Config,
}

impl ServeCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> Result<()> {
        let token = self.config.require_token()?;

        let pages = AmazonClient::new(&self.config).context("Failed to create HTTP client")?;
        let catalog = CatalogClient::new(&self.config)?;
        let relay = Relay::new(Resolver::new(&self.config, pages), catalog);
        let api = TelegramApi::new(token, self.config.poll_timeout())?;

        println!("Bot iniciado! 🚀");
        Bot::new(&self.config, api, relay).run().await
    }
}
