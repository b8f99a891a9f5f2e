//! CLI command implementations.

pub mod checkout;
pub mod price;
pub mod promotions;
pub mod sitemap;
pub mod webhook;

use std::io::Write;

use shopfront_storefront::config::{ConfigError, StorefrontConfig};
use shopfront_storefront::shopify::ShopifyError;
use shopfront_storefront::sitemap::SitemapError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Shopify API call failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Sitemap rendering failed.
    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid command-line input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A secret the command needs is not configured.
    #[error("Missing secret: {0}")]
    MissingSecret(&'static str),
}

fn load_config() -> Result<StorefrontConfig, CliError> {
    Ok(StorefrontConfig::from_env()?)
}

/// Write one line to stdout.
fn emit(text: &str) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{text}")?;
    Ok(())
}
