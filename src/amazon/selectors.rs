//! CSS selectors for Amazon product pages.
//!
//! Update this file when Amazon changes their HTML structure, and add a
//! fixture under `tests/fixtures/` covering the new markup.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for individual product pages (ASIN lookup).
pub mod product {
    use super::*;

    /// Product title.
    pub static TITLE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("#productTitle").unwrap());

    /// Main product image; the URL lives in its `src` attribute.
    pub static IMAGE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("#landingImage").unwrap());

    pub static IMAGE_ATTR: &str = "src";

    /// Regular price block.
    pub static PRICE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("#priceblock_ourprice").unwrap());

    /// Deal price block, consulted only when the regular one is missing.
    pub static DEAL_PRICE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("#priceblock_dealprice").unwrap());
}

/// Selectors for detecting error/captcha pages.
pub mod errors {
    use super::*;

    /// CAPTCHA form.
    pub static CAPTCHA: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "form[action*='validateCaptcha'], \
             img[src*='captcha']",
        )
        .unwrap()
    });

    /// Dog page (Amazon's error page).
    pub static DOG_PAGE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "img[alt*='dog'], \
             .a-box-inner a[href='/ref=cs_503_link']",
        )
        .unwrap()
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_selectors_compile() {
        let _ = &*product::TITLE;
        let _ = &*product::IMAGE;
        let _ = &*product::PRICE;
        let _ = &*product::DEAL_PRICE;
        let _ = &*errors::CAPTCHA;
        let _ = &*errors::DOG_PAGE;
    }

    #[test]
    fn test_id_selectors_match() {
        let html = Html::parse_document(
            r#"<div>
                <span id="productTitle">Title</span>
                <img id="landingImage" src="https://m.media-amazon.com/images/I/x.jpg">
                <span id="priceblock_dealprice">19,99 €</span>
            </div>"#,
        );

        assert_eq!(html.select(&product::TITLE).count(), 1);
        assert_eq!(html.select(&product::DEAL_PRICE).count(), 1);
        assert_eq!(html.select(&product::PRICE).count(), 0);

        let image = html.select(&product::IMAGE).next().unwrap();
        assert_eq!(
            image.value().attr(product::IMAGE_ATTR),
            Some("https://m.media-amazon.com/images/I/x.jpg")
        );
    }
}
