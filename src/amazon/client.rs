//! HTTP client for Amazon product pages using wreq for TLS fingerprint emulation.

use crate::amazon::marketplace::Marketplace;
use crate::asin::Asin;
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Why a product page could not be fetched.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Anything but 200 OK.
    #[error("product page returned status {0}")]
    Status(u16),

    #[error("product page request timed out")]
    Timeout,

    #[error("product page request failed: {0}")]
    Transport(String),
}

impl From<wreq::Error> for FetchError {
    fn from(err: wreq::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// Trait for product page fetching - enables mocking for tests.
#[async_trait]
pub trait ProductPages: Send + Sync {
    /// Fetches the product page HTML for an ASIN.
    async fn product_page(&self, asin: &Asin) -> Result<String, FetchError>;

    /// Returns the storefront pages are fetched from.
    fn marketplace(&self) -> Marketplace;
}

/// Amazon HTTP client with browser impersonation.
pub struct AmazonClient {
    client: Client,
    marketplace: Marketplace,
    user_agent: String,
    base_url: Option<String>,
}

impl AmazonClient {
    /// Creates a new Amazon client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, None)
    }

    /// Creates a new Amazon client with an optional custom base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .redirect(wreq::redirect::Policy::limited(10))
            .timeout(config.fetch_timeout())
            .connect_timeout(Duration::from_secs(10).min(config.fetch_timeout()));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build page client")?;

        Ok(Self {
            client,
            marketplace: config.marketplace,
            user_agent: config.user_agent.clone(),
            base_url,
        })
    }

    /// Returns the base URL (custom for testing, or marketplace-based for production).
    fn base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| self.marketplace.base_url())
    }

    /// Performs a single GET. No retries.
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", self.marketplace.accept_language())
            .send()
            .await?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status.as_u16() != 200 {
            if status.as_u16() == 503 {
                warn!("Amazon answered 503; the request was probably flagged as a bot");
            }
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.uri().to_string();
        if self.base_url.is_none() && !final_url.contains(self.marketplace.domain()) {
            warn!("Redirected off {} to {}", self.marketplace.domain(), final_url);
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl ProductPages for AmazonClient {
    async fn product_page(&self, asin: &Asin) -> Result<String, FetchError> {
        let url = format!("{}/dp/{}", self.base_url(), asin);

        info!("Fetching product page: {}", asin);
        self.get(&url).await
    }

    fn marketplace(&self) -> Marketplace {
        self.marketplace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn asin() -> Asin {
        Asin::parse("B08N5WRWNW").unwrap()
    }

    #[tokio::test]
    async fn test_product_page_success() {
        let mock_server = MockServer::start().await;

        let html = r#"<html><body><span id="productTitle">Amazing Product</span></body></html>"#;

        Mock::given(method("GET"))
            .and(path("/dp/B08N5WRWNW"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = AmazonClient::with_base_url(&Config::default(), Some(mock_server.uri())).unwrap();

        let body = client.product_page(&asin()).await.unwrap();
        assert!(body.contains("Amazing Product"));
    }

    #[tokio::test]
    async fn test_http_error_404() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dp/B08N5WRWNW"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = AmazonClient::with_base_url(&Config::default(), Some(mock_server.uri())).unwrap();

        let err = client.product_page(&asin()).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(404)));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_http_error_503_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dp/B08N5WRWNW"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = AmazonClient::with_base_url(&Config::default(), Some(mock_server.uri())).unwrap();

        let err = client.product_page(&asin()).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(503)));
    }

    #[tokio::test]
    async fn test_non_200_success_is_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dp/B08N5WRWNW"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let client = AmazonClient::with_base_url(&Config::default(), Some(mock_server.uri())).unwrap();

        let err = client.product_page(&asin()).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(204)));
    }

    #[tokio::test]
    async fn test_slow_page_is_bounded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dp/B08N5WRWNW"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&mock_server)
            .await;

        let config = Config { fetch_timeout_secs: 1, ..Config::default() };
        let client = AmazonClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let err = client.product_page(&asin()).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout), "expected timeout, got {:?}", err);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_failure() {
        let client =
            AmazonClient::with_base_url(&Config::default(), Some("http://127.0.0.1:1".to_string()))
                .unwrap();

        let err = client.product_page(&asin()).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)), "expected transport failure, got {:?}", err);
    }

    #[tokio::test]
    async fn test_redirect_is_followed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dp/B08N5WRWNW"))
            .respond_with(
                ResponseTemplate::new(301)
                    .insert_header("Location", format!("{}/dp/B0MERGED99", mock_server.uri())),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/dp/B0MERGED99"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<span id="productTitle">Merged Product</span>"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = AmazonClient::with_base_url(&Config::default(), Some(mock_server.uri())).unwrap();

        let body = client.product_page(&asin()).await.unwrap();
        assert!(body.contains("Merged Product"));
    }

    #[tokio::test]
    async fn test_base_url_default() {
        let client = AmazonClient::new(&Config::default()).unwrap();
        assert_eq!(client.base_url(), "https://www.amazon.es");
        assert_eq!(client.marketplace(), Marketplace::Es);
    }

    #[tokio::test]
    async fn test_base_url_custom() {
        let client =
            AmazonClient::with_base_url(&Config::default(), Some("http://custom.url".to_string()))
                .unwrap();
        assert_eq!(client.base_url(), "http://custom.url");
    }

    #[tokio::test]
    async fn test_different_marketplace() {
        let config = Config { marketplace: Marketplace::De, ..Config::default() };
        let client = AmazonClient::new(&config).unwrap();
        assert_eq!(client.marketplace(), Marketplace::De);
        assert_eq!(client.base_url(), "https://www.amazon.de");
    }
}
