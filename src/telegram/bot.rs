//! Long-polling bot loop feeding chat messages into the relay.

use super::api::TelegramApi;
use super::types::{Message, Update};
use crate::amazon::client::ProductPages;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::relay::{Relay, Reply, ReplySink};
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// What to do with an incoming message.
#[derive(Debug, PartialEq, Eq)]
enum Action<'a> {
    Greet,
    Relay(&'a str),
    Ignore,
}

fn classify(message: &Message) -> Action<'_> {
    if message.from.as_ref().is_some_and(|u| u.is_bot) {
        return Action::Ignore;
    }

    let Some(text) = message.text.as_deref() else {
        return Action::Ignore;
    };

    let Some(command) = text.trim_start().strip_prefix('/') else {
        return Action::Relay(text);
    };

    let name = command.split_whitespace().next().unwrap_or_default();
    let name = name.split('@').next().unwrap_or_default();

    match name {
        "start" => Action::Greet,
        _ => Action::Ignore,
    }
}

/// Replies into the chat a message came from.
pub struct ChatReplies<'a> {
    api: &'a TelegramApi,
    chat_id: i64,
}

#[async_trait]
impl ReplySink for ChatReplies<'_> {
    async fn reply(&self, text: &str) -> Result<()> {
        self.api.send_message(self.chat_id, text).await.map(|_| ())
    }
}

/// Telegram front end for a [`Relay`].
pub struct Bot<P, C> {
    api: TelegramApi,
    relay: Relay<P, C>,
    poll_timeout: Duration,
    retry_delay_ms: u64,
    retry_jitter_ms: u64,
}

impl<P: ProductPages, C: Catalog> Bot<P, C> {
    pub fn new(config: &Config, api: TelegramApi, relay: Relay<P, C>) -> Self {
        Self {
            api,
            relay,
            poll_timeout: config.poll_timeout(),
            retry_delay_ms: config.retry_delay_ms,
            retry_jitter_ms: config.retry_jitter_ms,
        }
    }

    /// Polls until Ctrl-C or SIGTERM.
    pub async fn run(&self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Polls until `shutdown` resolves.
    ///
    /// The signal only interrupts the long poll and the retry backoff. A batch
    /// already received is always handled to the end, and its offset is
    /// confirmed to Telegram before returning.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        let me = self.api.get_me().await.context("Telegram rejected the bot token")?;
        info!("Authorized as @{}", me.username.as_deref().unwrap_or(me.first_name.as_str()));

        if let Err(e) = self.api.delete_webhook().await {
            warn!("Failed to delete webhook before polling: {:#}", e);
        }

        info!("Bot started, polling for messages");

        tokio::pin!(shutdown);
        let mut offset = None;
        loop {
            let polled = tokio::select! {
                signal = &mut shutdown => {
                    signal?;
                    return self.confirm(offset).await;
                }
                polled = self.api.get_updates(offset, self.poll_timeout) => polled,
            };

            match polled {
                Ok(updates) => {
                    self.handle_batch(&updates, &mut offset).await;
                }
                Err(e) => {
                    warn!("getUpdates failed: {:#}", e);
                    tokio::select! {
                        signal = &mut shutdown => {
                            signal?;
                            return self.confirm(offset).await;
                        }
                        _ = self.backoff() => {}
                    }
                }
            }
        }
    }

    /// Fetches one batch of updates and handles them in order.
    ///
    /// `offset` is advanced past every update received, handled or not.
    pub async fn poll_once(&self, offset: &mut Option<i64>) -> Result<usize> {
        let updates = self.api.get_updates(*offset, self.poll_timeout).await?;
        self.handle_batch(&updates, offset).await;

        Ok(updates.len())
    }

    async fn handle_batch(&self, updates: &[Update], offset: &mut Option<i64>) {
        for update in updates {
            *offset = Some(update.update_id + 1);
            self.handle_update(update).await;
        }
    }

    /// Tells Telegram the handled updates are done so a restart does not replay them.
    async fn confirm(&self, offset: Option<i64>) -> Result<()> {
        info!("Shutting down");

        if offset.is_some() {
            if let Err(e) = self.api.get_updates(offset, Duration::ZERO).await {
                warn!("Failed to confirm handled updates: {:#}", e);
            }
        }

        Ok(())
    }

    async fn handle_update(&self, update: &Update) {
        let Some(message) = &update.message else {
            return;
        };

        let chat_id = message.chat.id;
        let sink = ChatReplies { api: &self.api, chat_id };

        let handled = match classify(message) {
            Action::Ignore => {
                debug!("Ignoring update {}", update.update_id);
                return;
            }
            Action::Greet => sink.reply(&Reply::Greeting.to_string()).await,
            Action::Relay(text) => self.relay.handle(text, &sink).await.map(|outcome| {
                debug!("Chat {} outcome: {:?}", chat_id, outcome);
            }),
        };

        if let Err(e) = handled {
            error!("Failed to handle message {} in chat {}: {:#}", message.message_id, chat_id, e);
        }
    }

    async fn backoff(&self) {
        let jitter = if self.retry_jitter_ms > 0 {
            rand::rng().random_range(0..=self.retry_jitter_ms)
        } else {
            0
        };

        let total_delay = self.retry_delay_ms + jitter;
        debug!("Retrying in {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }
}

/// Resolves on Ctrl-C or, on unix, SIGTERM. Fails if a handler cannot be installed.
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { tokio::signal::ctrl_c().await.context("Failed to install Ctrl-C handler") };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<(), anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        result = ctrl_c => {
            result?;
            info!("Ctrl-C received");
        }
        result = terminate => {
            result?;
            info!("SIGTERM received");
        }
    }

    Ok(())
}
