//! GraphQL operations for the Shopify Storefront API.
//!
//! Each operation is a unit struct implementing [`graphql_client::GraphQLQuery`]
//! plus a module holding its `Variables` and `ResponseData`. Shared selections
//! live in `graphql/storefront/fragments/` and are concatenated into each
//! document at compile time.

use serde::{Deserialize, Serialize};

use crate::shopify::types::{
    CartCost, CartDiscountCode, CartLine, CartLineInput, CartLineUpdateInput, Image, Menu,
    PageInfo, PriceRange, ProductOption, ProductSortKey, ProductVariant, Seo, SitemapRecord,
    UserError,
};

// =============================================================================
// Shared wire shapes
// =============================================================================

/// A connection selected with `nodes { ... }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nodes<T> {
    pub nodes: Vec<T>,
    #[serde(default)]
    pub page_info: PageInfo,
}

/// `ProductFields` as returned by Shopify.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub description_html: String,
    pub available_for_sale: bool,
    pub product_type: String,
    pub vendor: String,
    pub tags: Vec<String>,
    pub updated_at: Option<String>,
    pub seo: Option<Seo>,
    pub price_range: PriceRange,
    pub compare_at_price_range: Option<PriceRange>,
    pub featured_image: Option<Image>,
    pub images: Nodes<Image>,
    pub options: Vec<ProductOption>,
    pub variants: Nodes<ProductVariant>,
}

/// Collection selection; `products` is only present on the by-handle query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub updated_at: Option<String>,
    pub seo: Option<Seo>,
    pub image: Option<Image>,
    #[serde(default)]
    pub products: Option<Nodes<ProductNode>>,
}

/// `CartFields` as returned by Shopify.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartNode {
    pub id: String,
    pub checkout_url: String,
    pub note: Option<String>,
    pub total_quantity: i64,
    pub cost: CartCost,
    pub discount_codes: Vec<CartDiscountCode>,
    pub lines: Nodes<CartLine>,
}

/// Payload shared by every cart mutation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    pub cart: Option<CartNode>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

// =============================================================================
// Products
// =============================================================================

graphql_operation!(
    /// Fetch a single product by handle.
    GetProductByHandle,
    get_product_by_handle,
    concat!(
        include_str!("../../../graphql/storefront/fragments/money.graphql"),
        include_str!("../../../graphql/storefront/fragments/image.graphql"),
        include_str!("../../../graphql/storefront/fragments/product.graphql"),
        r"
query GetProductByHandle($handle: String!) {
  product(handle: $handle) {
    ...ProductFields
  }
}
"
    )
);

pub mod get_product_by_handle {
    use super::{Deserialize, ProductNode, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<ProductNode>,
    }
}

graphql_operation!(
    /// Fetch a page of products.
    GetProducts,
    get_products,
    concat!(
        include_str!("../../../graphql/storefront/fragments/money.graphql"),
        include_str!("../../../graphql/storefront/fragments/image.graphql"),
        include_str!("../../../graphql/storefront/fragments/product.graphql"),
        r"
query GetProducts($first: Int!, $after: String, $query: String, $sortKey: ProductSortKeys, $reverse: Boolean) {
  products(first: $first, after: $after, query: $query, sortKey: $sortKey, reverse: $reverse) {
    nodes {
      ...ProductFields
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"
    )
);

pub mod get_products {
    use super::{Deserialize, Nodes, ProductNode, ProductSortKey, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub first: i64,
        pub after: Option<String>,
        pub query: Option<String>,
        pub sort_key: Option<ProductSortKey>,
        pub reverse: Option<bool>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Nodes<ProductNode>,
    }
}

// =============================================================================
// Collections
// =============================================================================

graphql_operation!(
    /// Fetch a collection and its first page of products.
    GetCollectionByHandle,
    get_collection_by_handle,
    concat!(
        include_str!("../../../graphql/storefront/fragments/money.graphql"),
        include_str!("../../../graphql/storefront/fragments/image.graphql"),
        include_str!("../../../graphql/storefront/fragments/product.graphql"),
        r"
query GetCollectionByHandle($handle: String!, $productCount: Int!, $after: String) {
  collection(handle: $handle) {
    id
    handle
    title
    description
    updatedAt
    seo {
      title
      description
    }
    image {
      ...ImageFields
    }
    products(first: $productCount, after: $after) {
      nodes {
        ...ProductFields
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}
"
    )
);

pub mod get_collection_by_handle {
    use super::{CollectionNode, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub handle: String,
        pub product_count: i64,
        pub after: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collection: Option<CollectionNode>,
    }
}

graphql_operation!(
    /// Fetch a page of collections (without products).
    GetCollections,
    get_collections,
    concat!(
        include_str!("../../../graphql/storefront/fragments/image.graphql"),
        r"
query GetCollections($first: Int!, $after: String, $query: String) {
  collections(first: $first, after: $after, query: $query) {
    nodes {
      id
      handle
      title
      description
      updatedAt
      seo {
        title
        description
      }
      image {
        ...ImageFields
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"
    )
);

pub mod get_collections {
    use super::{CollectionNode, Deserialize, Nodes, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
        pub after: Option<String>,
        pub query: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collections: Nodes<CollectionNode>,
    }
}

// =============================================================================
// Navigation
// =============================================================================

graphql_operation!(
    /// Fetch a navigation menu, three levels deep.
    GetMenu,
    get_menu,
    r"
query GetMenu($handle: String!) {
  menu(handle: $handle) {
    handle
    title
    items {
      id
      title
      url
      type
      items {
        id
        title
        url
        type
        items {
          id
          title
          url
          type
        }
      }
    }
  }
}
"
);

pub mod get_menu {
    use super::{Deserialize, Menu, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub menu: Option<Menu>,
    }
}

// =============================================================================
// Sitemap listings
// =============================================================================

graphql_operation!(
    /// Product handles and update times, one page.
    SitemapProducts,
    sitemap_products,
    r"
query SitemapProducts($first: Int!, $after: String) {
  products(first: $first, after: $after) {
    nodes {
      handle
      updatedAt
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"
);

pub mod sitemap_products {
    use super::{Deserialize, Nodes, Serialize, SitemapRecord};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
        pub after: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Nodes<SitemapRecord>,
    }
}

graphql_operation!(
    /// Collection handles and update times, one page.
    SitemapCollections,
    sitemap_collections,
    r"
query SitemapCollections($first: Int!, $after: String) {
  collections(first: $first, after: $after) {
    nodes {
      handle
      updatedAt
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"
);

pub mod sitemap_collections {
    use super::{Deserialize, Nodes, Serialize, SitemapRecord};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
        pub after: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collections: Nodes<SitemapRecord>,
    }
}

// =============================================================================
// Cart
// =============================================================================

graphql_operation!(
    /// Fetch a cart by ID. Expired or unknown carts come back as `null`.
    GetCart,
    get_cart,
    concat!(
        include_str!("../../../graphql/storefront/fragments/money.graphql"),
        include_str!("../../../graphql/storefront/fragments/image.graphql"),
        include_str!("../../../graphql/storefront/fragments/cart.graphql"),
        r"
query GetCart($cartId: ID!) {
  cart(id: $cartId) {
    ...CartFields
  }
}
"
    )
);

pub mod get_cart {
    use super::{CartNode, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub cart: Option<CartNode>,
    }
}

graphql_operation!(
    /// Create a cart, optionally seeded with lines.
    CreateCart,
    create_cart,
    concat!(
        include_str!("../../../graphql/storefront/fragments/money.graphql"),
        include_str!("../../../graphql/storefront/fragments/image.graphql"),
        include_str!("../../../graphql/storefront/fragments/cart.graphql"),
        r"
mutation CreateCart($input: CartInput!) {
  cartCreate(input: $input) {
    cart {
      ...CartFields
    }
    userErrors {
      code
      field
      message
    }
  }
}
"
    )
);

pub mod create_cart {
    use super::{CartLineInput, CartPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: CartInput,
    }

    #[derive(Debug, Clone, Default, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartInput {
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub lines: Vec<CartLineInput>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub note: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<CartPayload>,
    }
}

graphql_operation!(
    /// Add lines to a cart.
    AddToCart,
    add_to_cart,
    concat!(
        include_str!("../../../graphql/storefront/fragments/money.graphql"),
        include_str!("../../../graphql/storefront/fragments/image.graphql"),
        include_str!("../../../graphql/storefront/fragments/cart.graphql"),
        r"
mutation AddToCart($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart {
      ...CartFields
    }
    userErrors {
      code
      field
      message
    }
  }
}
"
    )
);

pub mod add_to_cart {
    use super::{CartLineInput, CartPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub lines: Vec<CartLineInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_add: Option<CartPayload>,
    }
}

graphql_operation!(
    /// Change quantities (or merchandise) of existing lines.
    UpdateCartLines,
    update_cart_lines,
    concat!(
        include_str!("../../../graphql/storefront/fragments/money.graphql"),
        include_str!("../../../graphql/storefront/fragments/image.graphql"),
        include_str!("../../../graphql/storefront/fragments/cart.graphql"),
        r"
mutation UpdateCartLines($cartId: ID!, $lines: [CartLineUpdateInput!]!) {
  cartLinesUpdate(cartId: $cartId, lines: $lines) {
    cart {
      ...CartFields
    }
    userErrors {
      code
      field
      message
    }
  }
}
"
    )
);

pub mod update_cart_lines {
    use super::{CartLineUpdateInput, CartPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub lines: Vec<CartLineUpdateInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_update: Option<CartPayload>,
    }
}

graphql_operation!(
    /// Remove lines from a cart.
    RemoveFromCart,
    remove_from_cart,
    concat!(
        include_str!("../../../graphql/storefront/fragments/money.graphql"),
        include_str!("../../../graphql/storefront/fragments/image.graphql"),
        include_str!("../../../graphql/storefront/fragments/cart.graphql"),
        r"
mutation RemoveFromCart($cartId: ID!, $lineIds: [ID!]!) {
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {
    cart {
      ...CartFields
    }
    userErrors {
      code
      field
      message
    }
  }
}
"
    )
);

pub mod remove_from_cart {
    use super::{CartPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub line_ids: Vec<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_remove: Option<CartPayload>,
    }
}

graphql_operation!(
    /// Replace the full set of discount codes on a cart.
    UpdateCartDiscountCodes,
    update_cart_discount_codes,
    concat!(
        include_str!("../../../graphql/storefront/fragments/money.graphql"),
        include_str!("../../../graphql/storefront/fragments/image.graphql"),
        include_str!("../../../graphql/storefront/fragments/cart.graphql"),
        r"
mutation UpdateCartDiscountCodes($cartId: ID!, $discountCodes: [String!]!) {
  cartDiscountCodesUpdate(cartId: $cartId, discountCodes: $discountCodes) {
    cart {
      ...CartFields
    }
    userErrors {
      code
      field
      message
    }
  }
}
"
    )
);

pub mod update_cart_discount_codes {
    use super::{CartPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub discount_codes: Vec<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_discount_codes_update: Option<CartPayload>,
    }
}
