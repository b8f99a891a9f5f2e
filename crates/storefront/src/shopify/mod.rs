//! Shopify Storefront and Admin API clients.
//!
//! # Architecture
//!
//! - Operations implement [`graphql_client::GraphQLQuery`] over hand-written
//!   documents, so every request goes through one typed `execute::<Q>()`
//! - Shopify is the source of truth: no local sync, no local cart math
//! - Catalog reads are cached in memory via `moka` (5 minute TTL)
//! - Nothing is retried; failures surface to the caller
//!
//! # APIs
//!
//! ## Storefront API
//! - Products, collections, menus, sitemap listings, cart operations
//! - Private token (server-side) or public access token
//!
//! ## Admin API
//! - Discount listings for the promotions banner
//! - Variant price updates
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_storefront::shopify::{CartLineInput, StorefrontClient};
//!
//! let client = StorefrontClient::new(&config.shopify);
//!
//! let cart = client.create_cart(vec![]).await?;
//! let cart = client
//!     .add_to_cart(&cart.id, vec![CartLineInput::new("gid://shopify/ProductVariant/1", 1)])
//!     .await?;
//! ```

/// Declare a GraphQL operation struct bound to its document.
///
/// `$module` must contain `Variables` and `ResponseData`. The operation name
/// sent to Shopify is the struct name, so it has to match the name declared in
/// the document.
macro_rules! graphql_operation {
    ($(#[$meta:meta])* $name:ident, $module:ident, $document:expr) => {
        $(#[$meta])*
        pub struct $name;

        impl ::graphql_client::GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(
                variables: Self::Variables,
            ) -> ::graphql_client::QueryBody<Self::Variables> {
                ::graphql_client::QueryBody {
                    variables,
                    query: $document,
                    operation_name: stringify!($name),
                }
            }
        }
    };
}

pub mod admin;
mod storefront;
mod transport;
pub mod types;

pub use admin::AdminClient;
pub use storefront::StorefrontClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with Shopify APIs.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),
}

impl ShopifyError {
    /// A single-message GraphQL error with no location or path.
    pub(crate) fn graphql(message: impl Into<String>) -> Self {
        Self::GraphQL(vec![GraphQLError {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }])
    }

    /// Fold mutation `userErrors` into one error, or `None` when there are none.
    pub(crate) fn from_user_errors(errors: &[UserError]) -> Option<Self> {
        if errors.is_empty() {
            return None;
        }
        Some(Self::UserError(
            errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        ))
    }
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(error: graphql_client::Error) -> Self {
        Self {
            message: error.message,
            locations: error.locations.map_or_else(Vec::new, |locs| {
                locs.into_iter()
                    .map(|l| GraphQLErrorLocation {
                        line: i64::from(l.line),
                        column: i64::from(l.column),
                    })
                    .collect()
            }),
            path: error.path.map_or_else(Vec::new, |p| {
                p.into_iter()
                    .map(|fragment| match fragment {
                        graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                        graphql_client::PathFragment::Index(i) => {
                            serde_json::Value::Number(i.into())
                        }
                    })
                    .collect()
            }),
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
