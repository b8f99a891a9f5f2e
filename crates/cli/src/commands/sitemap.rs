//! Sitemap dump command.

use clap::ValueEnum;
use shopfront_storefront::shopify::StorefrontClient;
use shopfront_storefront::sitemap::{
    collection_entries, index_locations, page_entries, product_entries, render_index,
    render_urlset,
};

use super::{CliError, emit, load_config};

/// Which sitemap document to print.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SitemapKind {
    Index,
    Pages,
    Products,
    Collections,
}

/// Print a sitemap built from live catalog reads.
///
/// Unlike the HTTP endpoint, a catalog failure is an error here.
pub async fn print(kind: SitemapKind) -> Result<(), CliError> {
    let config = load_config()?;
    let base_url = &config.base_url;

    let xml = match kind {
        SitemapKind::Index => render_index(&index_locations(base_url))?,
        SitemapKind::Pages => render_urlset(&page_entries(base_url))?,
        SitemapKind::Products => {
            let records = StorefrontClient::new(&config.shopify)
                .sitemap_products()
                .await?;
            tracing::info!(count = records.len(), "Listed products");
            render_urlset(&product_entries(base_url, &records))?
        }
        SitemapKind::Collections => {
            let records = StorefrontClient::new(&config.shopify)
                .sitemap_collections()
                .await?;
            tracing::info!(count = records.len(), "Listed collections");
            render_urlset(&collection_entries(base_url, &records))?
        }
    };

    emit(&xml)
}
