//! Telegram transport: Bot API client and the long-polling loop.

pub mod api;
pub mod bot;
pub mod types;

pub use api::TelegramApi;
pub use bot::{Bot, ChatReplies};
