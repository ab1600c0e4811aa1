//! End-to-end tests: real HTTP clients against mock Amazon and catalog servers.

use amz_relay::amazon::parser::Parser;
use amz_relay::amazon::AmazonClient;
use amz_relay::catalog::CatalogClient;
use amz_relay::{Config, Outcome, Relay, ReplySink, Resolver};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRODUCT_FIXTURE: &str = include_str!("fixtures/product_page.html");

/// Collects replies in order.
#[derive(Default)]
struct Transcript(Mutex<Vec<String>>);

impl Transcript {
    fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplySink for Transcript {
    async fn reply(&self, text: &str) -> Result<()> {
        self.0.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn relay_for(
    amazon: &MockServer,
    catalog: &MockServer,
) -> Relay<AmazonClient, CatalogClient> {
    let config = Config {
        catalog_url: format!("{}/products", catalog.uri()),
        fetch_timeout_secs: 5,
        submit_timeout_secs: 5,
        ..Config::default()
    };

    let pages = AmazonClient::with_base_url(&config, Some(amazon.uri())).unwrap();
    let catalog = CatalogClient::new(&config).unwrap();
    Relay::new(Resolver::new(&config, pages), catalog)
}

#[test]
fn test_parse_product_fixture() {
    let fields = Parser::new().parse_product_page(PRODUCT_FIXTURE);

    assert_eq!(
        fields.title.as_deref(),
        Some("Echo Dot (5.ª generación, modelo de 2022) | Altavoz inteligente wifi y Bluetooth con Alexa")
    );
    assert_eq!(
        fields.image_url.as_deref(),
        Some("https://m.media-amazon.com/images/I/71xoR4A6q-L._AC_SX425_.jpg")
    );
    // Regular price wins over the deal price regardless of position
    assert_eq!(fields.price.as_deref(), Some("64,99 €"));
}

#[tokio::test]
async fn test_link_is_published_with_affiliate_tag() {
    let amazon = MockServer::start().await;
    let catalog = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B0ABCDEF12"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PRODUCT_FIXTURE))
        .expect(1)
        .mount(&amazon)
        .await;

    Mock::given(method("POST"))
        .and(path("/products"))
        .and(body_json(serde_json::json!({
            "title": "Echo Dot (5.ª generación, modelo de 2022) | Altavoz inteligente wifi y Bluetooth con Alexa",
            "asin": "B0ABCDEF12",
            "amazon_url": "https://www.amazon.es/dp/B0ABCDEF12",
            "affiliate_url": "https://www.amazon.es/dp/B0ABCDEF12/?tag=crdt25-21",
            "image_url": "https://m.media-amazon.com/images/I/71xoR4A6q-L._AC_SX425_.jpg",
            "price": "64,99 €"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "product_page": "https://catalog.test/p/echo-dot"
        })))
        .expect(1)
        .mount(&catalog)
        .await;

    let relay = relay_for(&amazon, &catalog);
    let transcript = Transcript::default();

    let outcome = relay
        .handle("https://www.amazon.es/dp/B0ABCDEF12/ref=xyz", &transcript)
        .await
        .unwrap();

    match outcome {
        Outcome::Published { asin, product_page } => {
            assert_eq!(asin.as_str(), "B0ABCDEF12");
            assert_eq!(product_page, "https://catalog.test/p/echo-dot");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    assert_eq!(
        transcript.lines(),
        vec![
            "🔍 Buscando información de B0ABCDEF12...".to_string(),
            "📡 Subiendo a tu backend...".to_string(),
            "✅ Producto añadido!\n🔗 Enlace: https://catalog.test/p/echo-dot".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_bare_page_uses_placeholders() {
    let amazon = MockServer::start().await;
    let catalog = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dp/B0ABCDEF12"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&amazon)
        .await;

    Mock::given(method("POST"))
        .and(path("/products"))
        .and(body_json(serde_json::json!({
            "title": "Producto Amazon",
            "asin": "B0ABCDEF12",
            "amazon_url": "https://www.amazon.es/dp/B0ABCDEF12",
            "affiliate_url": "https://www.amazon.es/dp/B0ABCDEF12/?tag=crdt25-21",
            "image_url": null,
            "price": "No disponible"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "product_page": "https://catalog.test/p/1"
        })))
        .expect(1)
        .mount(&catalog)
        .await;

    let relay = relay_for(&amazon, &catalog);
    let transcript = Transcript::default();

    let outcome = relay.handle("B0ABCDEF12", &transcript).await.unwrap();
    assert!(matches!(outcome, Outcome::Published { .. }));
}

#[tokio::test]
async fn test_blocked_page_is_not_submitted() {
    let amazon = MockServer::start().await;
    let catalog = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&amazon)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&catalog)
        .await;

    let relay = relay_for(&amazon, &catalog);
    let transcript = Transcript::default();

    let outcome = relay.handle("mira esto amazon.es/dp/B0ABCDEF12", &transcript).await.unwrap();
    assert!(matches!(outcome, Outcome::Unavailable(_)));
    assert_eq!(
        transcript.lines(),
        vec![
            "🔍 Buscando información de B0ABCDEF12...".to_string(),
            "⚠️ No pude obtener los datos del producto.".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_text_without_asin_makes_no_requests() {
    let amazon = MockServer::start().await;
    let catalog = MockServer::start().await;

    Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&amazon).await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&catalog).await;

    let relay = relay_for(&amazon, &catalog);
    let transcript = Transcript::default();

    let outcome = relay.handle("hola, ¿qué tal?", &transcript).await.unwrap();
    assert_eq!(outcome, Outcome::Rejected);
    assert_eq!(transcript.lines(), vec!["❌ Ese texto no contiene un ASIN válido.".to_string()]);
}

#[tokio::test]
async fn test_catalog_garbage_is_an_error() {
    let amazon = MockServer::start().await;
    let catalog = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PRODUCT_FIXTURE))
        .mount(&amazon)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&catalog)
        .await;

    let relay = relay_for(&amazon, &catalog);
    let transcript = Transcript::default();

    let err = relay.handle("B0ABCDEF12", &transcript).await.unwrap_err();
    assert!(err.to_string().contains("Catalog submission failed for B0ABCDEF12"));
    assert_eq!(transcript.lines().last().map(String::as_str), Some("📡 Subiendo a tu backend..."));
}
