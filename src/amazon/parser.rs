//! HTML parser for Amazon product pages.

use crate::amazon::models::PageFields;
use crate::amazon::selectors::{errors, product};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// Parser for Amazon product pages.
///
/// Parsing never fails: every field the page lacks comes back as `None`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Self
    }

    /// Lifts title, image and price from a product page.
    pub fn parse_product_page(&self, html: &str) -> PageFields {
        let document = Html::parse_document(html);

        self.warn_on_block_page(&document);

        let title = first_text(&document, &product::TITLE);

        let image_url = document
            .select(&product::IMAGE)
            .next()
            .and_then(|e| e.value().attr(product::IMAGE_ATTR))
            .map(String::from);

        // Regular price outranks the deal price regardless of document order
        let price = first_text(&document, &product::PRICE)
            .or_else(|| first_text(&document, &product::DEAL_PRICE));

        debug!(
            "Parsed page (title: {}, image: {}, price: {})",
            title.is_some(),
            image_url.is_some(),
            price.is_some()
        );

        PageFields { title, image_url, price }
    }

    /// Logs CAPTCHA and error pages; they still degrade to placeholders.
    fn warn_on_block_page(&self, document: &Html) {
        if document.select(&errors::CAPTCHA).next().is_some() {
            warn!("CAPTCHA page served instead of product page; fields will fall back");
        } else if document.select(&errors::DOG_PAGE).next().is_some() {
            warn!("Amazon error page served instead of product page; fields will fall back");
        }
    }
}

/// Trimmed text of the first match; blank text counts as missing.
fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().map(element_text).filter(|text| !text.is_empty())
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
