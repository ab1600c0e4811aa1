//! Message handling: one chat message in, a short sequence of replies out.
//!
//! The relay does not care how messages arrive. Transports hand it the raw
//! text plus a [`ReplySink`] that delivers replies back to the sender.

use crate::amazon::client::ProductPages;
use crate::asin::{self, Asin};
use crate::catalog::Catalog;
use crate::resolver::Resolver;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fmt;
use tracing::info;

/// User-facing replies, in the order a lookup produces them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Greeting,
    InvalidIdentifier,
    Fetching(Asin),
    Unavailable,
    Uploading,
    Published(String),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Greeting => write!(f, "Hola! Envíame un ASIN o enlace de Amazon y lo proceso 🚀"),
            Reply::InvalidIdentifier => write!(f, "❌ Ese texto no contiene un ASIN válido."),
            Reply::Fetching(asin) => write!(f, "🔍 Buscando información de {}...", asin),
            Reply::Unavailable => write!(f, "⚠️ No pude obtener los datos del producto."),
            Reply::Uploading => write!(f, "📡 Subiendo a tu backend..."),
            Reply::Published(url) => write!(f, "✅ Producto añadido!\n🔗 Enlace: {}", url),
        }
    }
}

/// Outbound reply channel back to whoever sent the message.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn reply(&self, text: &str) -> Result<()>;
}

/// How a handled message ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No ASIN in the text; nothing was fetched.
    Rejected,
    /// The product page could not be fetched.
    Unavailable(Asin),
    /// The catalog accepted the product.
    Published { asin: Asin, product_page: String },
}

impl Outcome {
    /// Whether the product reached the catalog.
    pub fn is_published(&self) -> bool {
        matches!(self, Outcome::Published { .. })
    }
}

/// Extract, resolve, submit, report.
pub struct Relay<P, C> {
    resolver: Resolver<P>,
    catalog: C,
}

impl<P: ProductPages, C: Catalog> Relay<P, C> {
    pub fn new(resolver: Resolver<P>, catalog: C) -> Self {
        Self { resolver, catalog }
    }

    pub fn resolver(&self) -> &Resolver<P> {
        &self.resolver
    }

    /// Handles one inbound message.
    ///
    /// Invalid input and unreachable product pages are reported to the
    /// sender and end in `Ok`. Catalog failures are not reported to the
    /// sender; they surface as `Err` for the transport to log.
    pub async fn handle(&self, text: &str, sink: &dyn ReplySink) -> Result<Outcome> {
        let Some(asin) = asin::extract(text) else {
            info!("No ASIN in message");
            send(sink, Reply::InvalidIdentifier).await?;
            return Ok(Outcome::Rejected);
        };

        send(sink, Reply::Fetching(asin.clone())).await?;

        let Some(record) = self.resolver.resolve(&asin).await else {
            send(sink, Reply::Unavailable).await?;
            return Ok(Outcome::Unavailable(asin));
        };

        send(sink, Reply::Uploading).await?;

        let receipt = self
            .catalog
            .submit(&record)
            .await
            .with_context(|| format!("Catalog submission failed for {}", asin))?;

        info!("Published {} at {}", asin, receipt.product_page);
        send(sink, Reply::Published(receipt.product_page.clone())).await?;

        Ok(Outcome::Published { asin, product_page: receipt.product_page })
    }
}

async fn send(sink: &dyn ReplySink, reply: Reply) -> Result<()> {
    sink.reply(&reply.to_string()).await.context("Failed to deliver reply")
}
