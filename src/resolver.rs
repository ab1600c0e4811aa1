//! Turns an ASIN into a normalized product record.

use crate::amazon::client::{FetchError, ProductPages};
use crate::amazon::models::ProductRecord;
use crate::amazon::parser::Parser;
use crate::asin::Asin;
use crate::config::Config;
use tracing::{info, warn};

/// Fetches a product page and normalizes it into a [`ProductRecord`].
pub struct Resolver<P> {
    pages: P,
    parser: Parser,
    affiliate_tag: String,
    title_placeholder: String,
    price_placeholder: String,
}

impl<P: ProductPages> Resolver<P> {
    pub fn new(config: &Config, pages: P) -> Self {
        Self {
            pages,
            parser: Parser::new(),
            affiliate_tag: config.affiliate_tag.clone(),
            title_placeholder: config.title_placeholder.clone(),
            price_placeholder: config.price_placeholder.clone(),
        }
    }

    pub fn pages(&self) -> &P {
        &self.pages
    }

    /// Untagged product page URL on the configured storefront.
    pub fn canonical_url(&self, asin: &Asin) -> String {
        format!("{}/dp/{}", self.pages.marketplace().base_url(), asin)
    }

    /// Canonical URL with the referral tag appended.
    pub fn affiliate_url(&self, asin: &Asin) -> String {
        format!("{}/?tag={}", self.canonical_url(asin), urlencoding::encode(&self.affiliate_tag))
    }

    /// Fetches and normalizes a product, reporting why a fetch failed.
    ///
    /// Missing page fields never fail the lookup; they fall back to the
    /// configured placeholders (image is simply left out).
    pub async fn try_resolve(&self, asin: &Asin) -> Result<ProductRecord, FetchError> {
        let html = self.pages.product_page(asin).await?;
        let fields = self.parser.parse_product_page(&html);

        Ok(ProductRecord {
            title: fields.title.unwrap_or_else(|| self.title_placeholder.clone()),
            identifier: asin.clone(),
            canonical_url: self.canonical_url(asin),
            affiliate_url: self.affiliate_url(asin),
            image_url: fields.image_url,
            price: fields.price.unwrap_or_else(|| self.price_placeholder.clone()),
        })
    }

    /// Like [`Resolver::try_resolve`], with every fetch failure collapsed to `None`.
    pub async fn resolve(&self, asin: &Asin) -> Option<ProductRecord> {
        match self.try_resolve(asin).await {
            Ok(record) => {
                info!("Resolved {}: {} ({})", asin, record.title, record.price);
                Some(record)
            }
            Err(e) => {
                warn!("Could not resolve {}: {}", asin, e);
                None
            }
        }
    }
}
