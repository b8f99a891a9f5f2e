//! Cache types for Storefront API responses.

use crate::shopify::types::{
    Collection, CollectionConnection, Menu, Product, ProductConnection, ProductSortKey,
};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(String),
    Products {
        first: i64,
        cursor: Option<String>,
        sort_key: Option<ProductSortKey>,
        reverse: Option<bool>,
    },
    Collection {
        handle: String,
        product_count: i64,
        cursor: Option<String>,
    },
    Collections {
        first: i64,
        cursor: Option<String>,
    },
    Menu(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(ProductConnection),
    Collection(Box<Collection>),
    Collections(CollectionConnection),
    Menu(Menu),
}
