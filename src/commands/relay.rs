//! One-shot relay command: run a single message through the full pipeline.

use crate::amazon::{AmazonClient, ProductPages};
use crate::catalog::{Catalog, CatalogClient};
use crate::config::Config;
use crate::relay::{Outcome, Relay, ReplySink};
use crate::resolver::Resolver;
use anyhow::{Context, Result};
use async_trait::async_trait;

/// Prints every reply on its own line.
pub struct StdoutReplies;

#[async_trait]
impl ReplySink for StdoutReplies {
    async fn reply(&self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }
}

/// Handles one message as if it had arrived from chat.
pub struct RelayCommand {
    config: Config,
}

impl RelayCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn execute(&self, text: &str) -> Result<Outcome> {
        let pages = AmazonClient::new(&self.config).context("Failed to create HTTP client")?;
        let catalog = CatalogClient::new(&self.config)?;

        self.execute_with_clients(pages, catalog, text, &StdoutReplies).await
    }

    /// Runs the pipeline with provided collaborators (for testing).
    pub async fn execute_with_clients(
        &self,
        pages: impl ProductPages,
        catalog: impl Catalog,
        text: &str,
        sink: &dyn ReplySink,
    ) -> Result<Outcome> {
        let relay = Relay::new(Resolver::new(&self.config, pages), catalog);
        relay.handle(text, sink).await
    }
}
