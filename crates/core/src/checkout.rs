//! Checkout permalink builder.
//!
//! Shopify accepts cart permalinks of the form
//! `https://{store}/cart/{variant}:{qty},{variant}:{qty}` which create a fresh
//! checkout with the given lines. This is a pure data transform with no error
//! cases.

use serde::{Deserialize, Serialize};

use crate::types::numeric_id;

/// A single line for a checkout permalink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermalinkLine {
    /// Variant global ID (`gid://shopify/ProductVariant/N`) or bare numeric ID.
    pub variant_id: String,
    /// Quantity of the variant.
    pub quantity: u32,
}

impl PermalinkLine {
    /// Create a permalink line.
    #[must_use]
    pub fn new(variant_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            variant_id: variant_id.into(),
            quantity,
        }
    }
}

/// Build the checkout permalink for a sequence of lines.
///
/// An empty sequence maps to the bare cart URL.
///
/// ```rust
/// # use shopfront_core::{PermalinkLine, checkout_permalink};
/// let url = checkout_permalink(
///     "https://shop.example.com",
///     &[PermalinkLine::new("gid://shopify/ProductVariant/11", 2)],
/// );
/// assert_eq!(url, "https://shop.example.com/cart/11:2");
/// ```
#[must_use]
pub fn checkout_permalink(store_url: &str, lines: &[PermalinkLine]) -> String {
    let cart_url = format!("{}/cart", store_url.trim_end_matches('/'));

    if lines.is_empty() {
        return cart_url;
    }

    let items = lines
        .iter()
        .map(|line| format!("{}:{}", numeric_id(&line.variant_id), line.quantity))
        .collect::<Vec<_>>()
        .join(",");

    format!("{cart_url}/{items}")
}
