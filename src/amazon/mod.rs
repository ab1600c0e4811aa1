//! Amazon-specific modules for page fetching, parsing, and data models.

pub mod client;
pub mod marketplace;
pub mod models;
pub mod parser;
pub mod selectors;

pub use client::{AmazonClient, FetchError, ProductPages};
pub use marketplace::Marketplace;
pub use models::{PageFields, ProductRecord};
pub use parser::Parser;
