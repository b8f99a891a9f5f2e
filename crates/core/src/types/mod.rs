//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod promotion;

pub use id::*;
pub use price::{CurrencyCode, Price, compare_at_exceeds, parse_amount};
pub use promotion::{Promotion, PromotionKind, PromotionsSummary};
