//! Data models for scraped product pages and normalized product records.

use crate::asin::Asin;
use serde::Serialize;

/// Raw fields lifted from a product page. Absent fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFields {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
}

/// Normalized product sent to the catalog API.
///
/// Field names on the wire follow the catalog's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    /// Product display name, or the title placeholder
    pub title: String,
    /// Source ASIN
    #[serde(rename = "asin")]
    pub identifier: Asin,
    /// Untagged product page URL
    #[serde(rename = "amazon_url")]
    pub canonical_url: String,
    /// Canonical URL carrying the referral tag
    pub affiliate_url: String,
    /// Product image URL; serialized as null when the page has none
    pub image_url: Option<String>,
    /// Display price, or the price placeholder
    pub price: String,
}
