//! Promotions listing command.

use shopfront_storefront::shopify::AdminClient;

use super::{CliError, emit, load_config};

/// Print active promotions, or every discount with `all`, as JSON.
pub async fn list(all: bool) -> Result<(), CliError> {
    let config = load_config()?;
    let admin = AdminClient::new(&config.shopify);

    let json = if all {
        serde_json::to_string_pretty(&admin.all_discounts().await?)?
    } else {
        serde_json::to_string_pretty(&admin.active_discounts().await?)?
    };

    emit(&json)
}
