//! amz-relay - Telegram bot that relays Amazon products to a catalog API
//!
//! Uses TLS fingerprint emulation for reliable product page scraping.

use amz_relay::amazon::Marketplace;
use amz_relay::commands::{LookupCommand, RelayCommand, ServeCommand};
use amz_relay::config::{Config, OutputFormat};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "amz-relay",
    version,
    about = "Relay Amazon products from Telegram to a catalog API",
    long_about = "Extracts an ASIN from chat messages, scrapes the product page, builds an affiliate link and publishes the record to a catalog backend."
)]
struct Cli {
    /// Amazon marketplace to scrape
    #[arg(short, long, global = true, env = "RELAY_MARKETPLACE")]
    marketplace: Option<Marketplace>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "RELAY_PROXY")]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format for lookups
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Telegram bot (long polling)
    Serve {
        /// Telegram bot token
        #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Resolve a product without publishing it
    #[command(alias = "l")]
    Lookup {
        /// ASIN, Amazon link or free text containing one
        text: String,
    },

    /// Run one message through the full pipeline, printing the replies
    Relay {
        /// ASIN, Amazon link or free text containing one
        text: String,
    },

    /// List supported marketplaces
    Marketplaces,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(marketplace) = cli.marketplace {
        config.marketplace = marketplace;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Serve { token } => {
            if let Some(token) = token {
                config.telegram_token = Some(token);
            }

            ServeCommand::new(config).execute().await?;
        }

        Commands::Lookup { text } => {
            let output = LookupCommand::new(config).execute(&text).await?;
            println!("{}", output);
        }

        Commands::Relay { text } => {
            let outcome = RelayCommand::new(config).execute(&text).await?;
            if !outcome.is_published() {
                std::process::exit(1);
            }
        }

        Commands::Marketplaces => {
            println!("Supported Amazon marketplaces:\n");
            println!("{:<6} {:<20} {:<10}", "Code", "Domain", "Language");
            println!("{:-<6} {:-<20} {:-<10}", "", "", "");

            for marketplace in Marketplace::all() {
                println!(
                    "{:<6} {:<20} {:<10}",
                    marketplace.to_string(),
                    marketplace.domain(),
                    marketplace.accept_language()
                );
            }
        }
    }

    Ok(())
}
