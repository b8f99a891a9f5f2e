//! Variant price command.

use shopfront_core::parse_amount;
use shopfront_storefront::shopify::AdminClient;

use super::{CliError, emit, load_config};

/// Set a variant's price (and compare-at price) through the Admin API.
pub async fn set(
    product_id: &str,
    variant_id: &str,
    price: &str,
    compare_at: Option<&str>,
) -> Result<(), CliError> {
    validate_amount(price)?;
    if let Some(compare_at) = compare_at {
        validate_amount(compare_at)?;
    }

    let config = load_config()?;
    let updated = AdminClient::new(&config.shopify)
        .update_variant_price(product_id, variant_id, price, compare_at)
        .await?;

    tracing::info!(variant_id = %updated.id, price = %updated.price, "Price updated");
    emit(&format!(
        "{} {} (compare at {})",
        updated.id,
        updated.price,
        updated.compare_at_price.as_deref().unwrap_or("none")
    ))
}

fn validate_amount(amount: &str) -> Result<(), CliError> {
    match parse_amount(amount) {
        Some(value) if value.is_sign_positive() => Ok(()),
        _ => Err(CliError::InvalidInput(format!("invalid amount: {amount}"))),
    }
}
