//! Lookup command: resolve a message or ASIN and print the record.

use crate::amazon::{AmazonClient, ProductPages};
use crate::asin;
use crate::config::Config;
use crate::format::Formatter;
use crate::resolver::Resolver;
use anyhow::{Context, Result};
use tracing::info;

/// Resolves a product without submitting it anywhere.
pub struct LookupCommand {
    config: Config,
}

impl LookupCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Resolves the product in `text` and returns formatted output.
    pub async fn execute(&self, text: &str) -> Result<String> {
        let client = AmazonClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(client, text).await
    }

    /// Resolves with a provided page source (for testing).
    pub async fn execute_with_client(&self, pages: impl ProductPages, text: &str) -> Result<String> {
        let asin = asin::extract(text)
            .with_context(|| format!("No ASIN found in '{}'", text.trim()))?;

        info!("Looking up product: {}", asin);

        let resolver = Resolver::new(&self.config, pages);
        let record = resolver.try_resolve(&asin).await?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_record(&record))
    }
}
