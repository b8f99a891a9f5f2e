//! Flatten Storefront API response shapes into domain types.

use crate::shopify::types::{Cart, Collection, CollectionConnection, Product, ProductConnection};

use super::queries::{CartNode, CollectionNode, Nodes, ProductNode};

impl From<ProductNode> for Product {
    fn from(node: ProductNode) -> Self {
        Self {
            id: node.id,
            handle: node.handle,
            title: node.title,
            description: node.description,
            description_html: node.description_html,
            available_for_sale: node.available_for_sale,
            product_type: node.product_type,
            vendor: node.vendor,
            tags: node.tags,
            updated_at: node.updated_at,
            seo: node.seo,
            price_range: node.price_range,
            compare_at_price_range: node.compare_at_price_range,
            featured_image: node.featured_image,
            images: node.images.nodes,
            options: node.options,
            variants: node.variants.nodes,
        }
    }
}

impl From<CollectionNode> for Collection {
    fn from(node: CollectionNode) -> Self {
        Self {
            id: node.id,
            handle: node.handle,
            title: node.title,
            description: node.description,
            updated_at: node.updated_at,
            seo: node.seo,
            image: node.image,
            products: node
                .products
                .map(|p| p.nodes.into_iter().map(Product::from).collect())
                .unwrap_or_default(),
        }
    }
}

impl From<CartNode> for Cart {
    fn from(node: CartNode) -> Self {
        Self {
            id: node.id,
            checkout_url: node.checkout_url,
            note: node.note,
            total_quantity: node.total_quantity,
            cost: node.cost,
            discount_codes: node.discount_codes,
            lines: node.lines.nodes,
        }
    }
}

pub fn convert_product_connection(connection: Nodes<ProductNode>) -> ProductConnection {
    ProductConnection {
        products: connection.nodes.into_iter().map(Product::from).collect(),
        page_info: connection.page_info,
    }
}

pub fn convert_collection_connection(connection: Nodes<CollectionNode>) -> CollectionConnection {
    CollectionConnection {
        collections: connection.nodes.into_iter().map(Collection::from).collect(),
        page_info: connection.page_info,
    }
}
