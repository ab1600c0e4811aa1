//! amz-relay - Telegram relay for Amazon affiliate links
//!
//! Takes a chat message with an ASIN or product link, scrapes the product
//! page, tags the link with a referral code and publishes the result to a
//! catalog API.

pub mod amazon;
pub mod asin;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod format;
pub mod relay;
pub mod resolver;
pub mod telegram;

pub use amazon::{Marketplace, ProductRecord};
pub use asin::{extract, Asin};
pub use config::Config;
pub use relay::{Outcome, Relay, Reply, ReplySink};
pub use resolver::Resolver;
