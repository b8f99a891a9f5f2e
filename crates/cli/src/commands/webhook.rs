//! Webhook signing helper for local testing.

use std::path::Path;

use secrecy::SecretString;
use shopfront_storefront::webhooks::sign;

use super::{CliError, emit};

/// Print the signature Shopify would send for the file's raw bytes, using
/// `SHOPIFY_WEBHOOK_SECRET`.
pub fn sign_file(path: &Path) -> Result<(), CliError> {
    let secret = std::env::var("SHOPIFY_WEBHOOK_SECRET")
        .ok()
        .filter(|s| !s.is_empty())
        .map(SecretString::from)
        .ok_or(CliError::MissingSecret("SHOPIFY_WEBHOOK_SECRET"))?;

    let body = std::fs::read(path)?;
    let signature =
        sign(&body, &secret).ok_or(CliError::MissingSecret("SHOPIFY_WEBHOOK_SECRET"))?;

    emit(&signature)
}
