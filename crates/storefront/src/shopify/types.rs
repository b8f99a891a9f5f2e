//! Catalog and cart shapes shared by the clients and the HTTP layer.
//!
//! Connections are flattened to plain `Vec`s by the conversion layer. Leaf
//! objects keep Shopify's camelCase names so the same struct deserializes a
//! GraphQL selection and serializes into our API responses.

use serde::{Deserialize, Serialize};

// =============================================================================
// Money
// =============================================================================

/// An amount as Shopify sends it: a decimal string plus currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Kept as a string; parse with `shopfront_core::parse_amount`.
    pub amount: String,
    pub currency_code: String,
}

/// Lowest and highest variant price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_variant_price: Money,
    pub max_variant_price: Money,
}

// =============================================================================
// Images and search metadata
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default)]
    pub id: Option<String>,
    /// CDN URL.
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
}

/// Search-engine overrides; `None` falls back to the resource title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seo {
    pub title: Option<String>,
    pub description: Option<String>,
}

// =============================================================================
// Products
// =============================================================================

/// One `name: value` pair of a variant, e.g. `Size: M`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

/// An option axis of a product and every value it can take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub id: String,
    pub name: String,
    pub values: Vec<String>,
}

/// A purchasable variant. Its `id` is what cart lines and checkout permalinks
/// reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    #[serde(default)]
    pub sku: Option<String>,
    pub price: Money,
    /// Struck-through price; a deal when it exceeds `price`.
    #[serde(default)]
    pub compare_at_price: Option<Money>,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
    #[serde(default)]
    pub image: Option<Image>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub description_html: String,
    pub available_for_sale: bool,
    pub product_type: String,
    pub vendor: String,
    pub tags: Vec<String>,
    /// RFC 3339; feeds sitemap `lastmod`.
    pub updated_at: Option<String>,
    pub seo: Option<Seo>,
    pub price_range: PriceRange,
    /// Absent when no variant has a compare-at price.
    pub compare_at_price_range: Option<PriceRange>,
    pub featured_image: Option<Image>,
    pub images: Vec<Image>,
    pub options: Vec<ProductOption>,
    pub variants: Vec<ProductVariant>,
}

// =============================================================================
// Collections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub updated_at: Option<String>,
    pub seo: Option<Seo>,
    pub image: Option<Image>,
    /// Only the page that was requested, not the whole collection.
    pub products: Vec<Product>,
}

// =============================================================================
// Pagination
// =============================================================================

/// Forward-pagination cursor state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    /// Pass as `after` to fetch the next page.
    #[serde(default)]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductConnection {
    pub products: Vec<Product>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionConnection {
    pub collections: Vec<Collection>,
    pub page_info: PageInfo,
}

/// A handle and its last change, the only fields a sitemap needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapRecord {
    pub handle: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

// =============================================================================
// Navigation
// =============================================================================

/// A navigation menu as configured in the Shopify admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// Menu entry; nests up to three levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    /// `COLLECTION`, `PRODUCT`, `HTTP`, ...
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

// =============================================================================
// Cart
// =============================================================================

/// Line or cart attribute as returned by Shopify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: Option<String>,
}

/// Attribute sent with a mutation; the value is required here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeInput {
    pub key: String,
    pub value: String,
}

/// The product a cart line's variant belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMerchandiseProduct {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub featured_image: Option<Image>,
}

/// The variant on a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMerchandise {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub available_for_sale: bool,
    pub price: Money,
    #[serde(default)]
    pub compare_at_price: Option<Money>,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
    #[serde(default)]
    pub image: Option<Image>,
    pub product: CartMerchandiseProduct,
}

/// Per-line amounts; `total_amount` is after line discounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCost {
    pub amount_per_quantity: Money,
    #[serde(default)]
    pub compare_at_amount_per_quantity: Option<Money>,
    pub subtotal_amount: Money,
    pub total_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountAllocation {
    pub discounted_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: String,
    pub quantity: i64,
    pub attributes: Vec<Attribute>,
    pub cost: CartLineCost,
    pub merchandise: CartMerchandise,
    pub discount_allocations: Vec<DiscountAllocation>,
}

/// Cart totals. Tax is `None` until Shopify can estimate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    pub subtotal_amount: Money,
    pub total_amount: Money,
    #[serde(default)]
    pub total_tax_amount: Option<Money>,
}

/// A code on the cart. Shopify keeps codes it cannot apply, flagged with
/// `applicable: false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartDiscountCode {
    pub code: String,
    pub applicable: bool,
}

/// A shopping cart.
///
/// Shopify owns the cart: totals, discounts and availability are always the
/// values returned by the last API call, never computed locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: String,
    /// Shopify-hosted checkout for this exact cart.
    pub checkout_url: String,
    pub note: Option<String>,
    pub total_quantity: i64,
    pub cost: CartCost,
    pub discount_codes: Vec<CartDiscountCode>,
    pub lines: Vec<CartLine>,
}

/// A line to add, or to seed a new cart with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    /// Variant GID.
    pub merchandise_id: String,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<AttributeInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selling_plan_id: Option<String>,
}

impl CartLineInput {
    /// A plain line: variant and quantity, no attributes.
    #[must_use]
    pub fn new(merchandise_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            merchandise_id: merchandise_id.into(),
            quantity,
            attributes: None,
            selling_plan_id: None,
        }
    }
}

/// Changes to an existing line; omitted fields are left alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdateInput {
    /// Cart line GID.
    pub id: String,
    /// Zero removes the line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchandise_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<AttributeInput>>,
}

/// A mutation `userErrors` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub code: Option<String>,
    /// Input path, e.g. `["lines", "0", "quantity"]`.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

// =============================================================================
// Sorting
// =============================================================================

/// `ProductSortKeys` values accepted by the products query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductSortKey {
    Title,
    UpdatedAt,
    CreatedAt,
    BestSelling,
    Price,
    Id,
    Relevance,
}
