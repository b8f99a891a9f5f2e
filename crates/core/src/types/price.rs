//! Type-safe price representation using decimal arithmetic.
//!
//! Shopify transports amounts as decimal strings (`"19.99"`). Comparisons are
//! done on parsed [`Decimal`] values, never on floats or strings.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Parse a Shopify `MoneyV2` pair (`amount`, `currencyCode`).
    ///
    /// Returns `None` if the amount is not a decimal or the currency is not one
    /// we know about.
    #[must_use]
    pub fn parse(amount: &str, currency_code: &str) -> Option<Self> {
        Some(Self::new(
            parse_amount(amount)?,
            CurrencyCode::from_code(currency_code)?,
        ))
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Look up a currency by its ISO code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "USD" => Some(Self::USD),
            "EUR" => Some(Self::EUR),
            "GBP" => Some(Self::GBP),
            "CAD" => Some(Self::CAD),
            "AUD" => Some(Self::AUD),
            _ => None,
        }
    }

    /// Currency symbol used for display.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

/// Parse a decimal amount string.
#[must_use]
pub fn parse_amount(amount: &str) -> Option<Decimal> {
    Decimal::from_str(amount.trim()).ok()
}

/// Whether a compare-at amount is strictly greater than the current price.
///
/// A missing or unparseable compare-at amount never counts as a markdown.
#[must_use]
pub fn compare_at_exceeds(price: &str, compare_at: Option<&str>) -> bool {
    let Some(compare_at) = compare_at.and_then(parse_amount) else {
        return false;
    };
    parse_amount(price).is_some_and(|price| compare_at > price)
}
