//! Client for the remote catalog API that publishes product records.

use crate::amazon::models::ProductRecord;
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;

/// Catalog reply to a submitted product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogReceipt {
    /// Public page the catalog created for the product
    pub product_page: String,
}

/// Trait for catalog submission - enables mocking for tests.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Submits a record and returns the catalog's receipt.
    async fn submit(&self, record: &ProductRecord) -> Result<CatalogReceipt>;
}

/// HTTP client for the catalog API.
pub struct CatalogClient {
    client: Client,
    endpoint: String,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.submit_timeout())
            .connect_timeout(Duration::from_secs(10).min(config.submit_timeout()))
            .build()
            .context("Failed to build catalog client")?;

        Ok(Self { client, endpoint: config.catalog_url.clone() })
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn submit(&self, record: &ProductRecord) -> Result<CatalogReceipt> {
        let body = serde_json::to_string(record).context("Failed to encode product record")?;

        info!("Submitting {} to catalog", record.identifier);
        debug!("POST {}", self.endpoint);

        let response = self
            .client
            .post(self.endpoint.as_str())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .body(body)
            .send()
            .await
            .context("Failed to send catalog request")?;

        // Status is not checked: a usable body is what counts
        debug!("Catalog status: {}", response.status());

        let text = response.text().await.context("Failed to read catalog response")?;

        serde_json::from_str(&text)
            .with_context(|| format!("Unexpected catalog response: {}", truncate(&text, 200)))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
