//! Minimal Telegram Bot API client over wreq.

use super::types::{
    GetUpdatesRequest, SendMessageRequest, SentMessage, TelegramResponse, Update, User, API_BASE,
};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use wreq::Client;

/// Slack on top of the long-poll window before the HTTP request gives up.
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Telegram Bot API client bound to one bot token.
pub struct TelegramApi {
    client: Client,
    token: String,
    base_url: String,
}

impl TelegramApi {
    /// Creates a client whose request timeout covers `poll_timeout`.
    pub fn new(token: &str, poll_timeout: Duration) -> Result<Self> {
        Self::with_base_url(token, poll_timeout, API_BASE.to_string())
    }

    /// Creates a client against a custom API base URL (for testing).
    pub fn with_base_url(token: &str, poll_timeout: Duration, base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(poll_timeout + POLL_GRACE)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build Telegram client")?;

        Ok(Self { client, token: token.to_string(), base_url })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Calls a Bot API method with a JSON body and unwraps the result.
    async fn call<Req, Res>(&self, method: &str, request: &Req) -> Result<Res>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let body = serde_json::to_string(request)
            .with_context(|| format!("Failed to encode {} request", method))?;

        // The URL embeds the token; log only the method
        debug!("Telegram {}", method);

        let response = self
            .client
            .post(self.method_url(method).as_str())
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .with_context(|| format!("Telegram {} request failed", method))?;

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read Telegram {} response", method))?;

        let parsed: TelegramResponse<Res> = serde_json::from_str(&text)
            .with_context(|| format!("Malformed Telegram {} response", method))?;

        if !parsed.ok {
            anyhow::bail!(
                "Telegram {} failed: {}",
                method,
                parsed.description.unwrap_or_else(|| "no description".to_string())
            );
        }

        parsed.result.with_context(|| format!("Telegram {} returned no result", method))
    }

    /// Returns the bot's own account; fails when the token is rejected.
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-polls for new message updates starting at `offset`.
    pub async fn get_updates(&self, offset: Option<i64>, timeout: Duration) -> Result<Vec<Update>> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: vec!["message".to_string()],
        };

        self.call("getUpdates", &request).await
    }

    /// Sends a plain-text message to a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<SentMessage> {
        let request = SendMessageRequest {
            chat_id,
            text: text.to_string(),
            disable_web_page_preview: Some(false),
        };

        self.call("sendMessage", &request).await
    }

    /// Removes any webhook so getUpdates is allowed.
    pub async fn delete_webhook(&self) -> Result<bool> {
        self.call("deleteWebhook", &serde_json::json!({})).await
    }
}
