//! Shopfront CLI - operator tools for the headless storefront.
//!
//! # Usage
//!
//! ```bash
//! # Build a checkout permalink
//! shopfront checkout-url gid://shopify/ProductVariant/11:2 22:1
//!
//! # Dump the product sitemap
//! shopfront sitemap products
//!
//! # List active promotions (or every discount with --all)
//! shopfront promotions --all
//!
//! # Update a variant price through the Admin API
//! shopfront price set --product gid://shopify/Product/1 \
//!     --variant gid://shopify/ProductVariant/11 --price 18.00 --compare-at 25.00
//!
//! # Sign a webhook payload for local testing
//! shopfront webhook sign payload.json
//! ```
//!
//! Commands that talk to Shopify load the storefront configuration from the
//! environment (and `.env`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::sitemap::SitemapKind;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a checkout permalink from `VARIANT:QTY` lines
    CheckoutUrl {
        /// Store URL, e.g. `https://shop.example.com`
        #[arg(long, env = "SHOPIFY_STORE_URL")]
        store_url: String,

        /// Lines as `VARIANT:QTY`; the variant may be a GID or a numeric ID
        lines: Vec<String>,
    },
    /// Print a sitemap document
    Sitemap {
        #[arg(value_enum, default_value = "index")]
        kind: SitemapKind,
    },
    /// List promotions from the Admin API as JSON
    Promotions {
        /// List every discount instead of the active banner promotions
        #[arg(long)]
        all: bool,
    },
    /// Manage variant prices
    Price {
        #[command(subcommand)]
        action: PriceAction,
    },
    /// Webhook helpers
    Webhook {
        #[command(subcommand)]
        action: WebhookAction,
    },
}

#[derive(Subcommand)]
enum PriceAction {
    /// Set a variant's price
    Set {
        /// Product GID
        #[arg(long)]
        product: String,

        /// Variant GID
        #[arg(long)]
        variant: String,

        /// New price (decimal, e.g. 18.00)
        #[arg(long)]
        price: String,

        /// Compare-at price, shown struck through
        #[arg(long)]
        compare_at: Option<String>,
    },
}

#[derive(Subcommand)]
enum WebhookAction {
    /// Print the `X-Shopify-Hmac-Sha256` value for a payload file
    Sign {
        /// Payload file (raw bytes are signed)
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::CheckoutUrl { store_url, lines } => {
            commands::checkout::checkout_url(&store_url, &lines)?;
        }
        Commands::Sitemap { kind } => commands::sitemap::print(kind).await?,
        Commands::Promotions { all } => commands::promotions::list(all).await?,
        Commands::Price { action } => match action {
            PriceAction::Set {
                product,
                variant,
                price,
                compare_at,
            } => {
                commands::price::set(&product, &variant, &price, compare_at.as_deref()).await?;
            }
        },
        Commands::Webhook { action } => match action {
            WebhookAction::Sign { file } => commands::webhook::sign_file(&file)?,
        },
    }
    Ok(())
}
