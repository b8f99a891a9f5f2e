//! GraphQL operations for the Shopify Admin API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shopify::types::{PageInfo, UserError};

use super::DiscountStatus;

graphql_operation!(
    /// Page through discount nodes, optionally filtered by a search query.
    DiscountNodes,
    discount_nodes,
    include_str!("../../../graphql/admin/discounts.graphql")
);

pub mod discount_nodes {
    use super::{DateTime, Deserialize, DiscountStatus, PageInfo, Serialize, Utc};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
        pub after: Option<String>,
        pub query: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub discount_nodes: DiscountNodeConnection,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DiscountNodeConnection {
        pub nodes: Vec<DiscountNode>,
        pub page_info: PageInfo,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct DiscountNode {
        pub id: String,
        pub discount: DiscountFields,
    }

    /// Fields shared by every member of the `Discount` union. App discounts
    /// carry no `summary`.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DiscountFields {
        #[serde(rename = "__typename")]
        pub typename: String,
        #[serde(default)]
        pub title: Option<String>,
        #[serde(default)]
        pub summary: Option<String>,
        #[serde(default)]
        pub status: Option<DiscountStatus>,
        #[serde(default)]
        pub starts_at: Option<DateTime<Utc>>,
        #[serde(default)]
        pub ends_at: Option<DateTime<Utc>>,
    }
}

graphql_operation!(
    /// Set price and compare-at price on a single variant.
    UpdateVariantPrice,
    update_variant_price,
    include_str!("../../../graphql/admin/variants.graphql")
);

pub mod update_variant_price {
    use super::{Deserialize, Serialize, UserError};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: String,
        pub variants: Vec<ProductVariantsBulkInput>,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductVariantsBulkInput {
        pub id: String,
        pub price: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub compare_at_price: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_variants_bulk_update: Option<Payload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        #[serde(default)]
        pub product_variants: Option<Vec<UpdatedVariantNode>>,
        #[serde(default)]
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UpdatedVariantNode {
        pub id: String,
        pub price: String,
        pub compare_at_price: Option<String>,
    }
}
