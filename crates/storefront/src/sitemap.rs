//! Sitemap generation (sitemaps.org protocol 0.9).

use chrono::DateTime;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use thiserror::Error;

use crate::shopify::SitemapRecord;

/// Sitemap XML namespace.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Fallback document when even the empty urlset cannot be rendered.
const EMPTY_URLSET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"></urlset>"#;

/// Sitemap rendering failed.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("XML write error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("sitemap is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// How often a page is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFreq {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// One `<url>` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: Option<String>,
    pub changefreq: Option<ChangeFreq>,
    pub priority: Option<f32>,
}

/// Entries for product pages: `{base}/products/{handle}`, daily, 0.8.
#[must_use]
pub fn product_entries(base_url: &str, records: &[SitemapRecord]) -> Vec<SitemapEntry> {
    records
        .iter()
        .map(|r| SitemapEntry {
            loc: format!("{}/products/{}", base_url.trim_end_matches('/'), r.handle),
            lastmod: r.updated_at.as_deref().and_then(lastmod_date),
            changefreq: Some(ChangeFreq::Daily),
            priority: Some(0.8),
        })
        .collect()
}

/// Entries for collection pages: `{base}/collections/{handle}`, weekly, 0.7.
#[must_use]
pub fn collection_entries(base_url: &str, records: &[SitemapRecord]) -> Vec<SitemapEntry> {
    records
        .iter()
        .map(|r| SitemapEntry {
            loc: format!("{}/collections/{}", base_url.trim_end_matches('/'), r.handle),
            lastmod: r.updated_at.as_deref().and_then(lastmod_date),
            changefreq: Some(ChangeFreq::Weekly),
            priority: Some(0.7),
        })
        .collect()
}

/// Entries for the static pages.
#[must_use]
pub fn page_entries(base_url: &str) -> Vec<SitemapEntry> {
    let base = base_url.trim_end_matches('/');
    [
        ("/", ChangeFreq::Daily, 1.0),
        ("/products", ChangeFreq::Daily, 0.9),
        ("/collections", ChangeFreq::Weekly, 0.8),
    ]
    .into_iter()
    .map(|(path, changefreq, priority)| SitemapEntry {
        loc: format!("{base}{path}"),
        lastmod: None,
        changefreq: Some(changefreq),
        priority: Some(priority),
    })
    .collect()
}

/// Child sitemap URLs listed by `/sitemap.xml`.
#[must_use]
pub fn index_locations(base_url: &str) -> Vec<String> {
    let base = base_url.trim_end_matches('/');
    ["sitemap-pages.xml", "sitemap-products.xml", "sitemap-collections.xml"]
        .iter()
        .map(|name| format!("{base}/{name}"))
        .collect()
}

/// Date part (`YYYY-MM-DD`) of an ISO 8601 timestamp.
fn lastmod_date(updated_at: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(updated_at)
        .ok()
        .map(|dt| dt.date_naive().to_string())
}

/// Render a `<urlset>` document.
///
/// # Errors
///
/// Returns an error if the XML writer fails.
pub fn render_urlset(entries: &[SitemapEntry]) -> Result<String, SitemapError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NS)]),
    ))?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", &entry.loc)?;
        if let Some(lastmod) = &entry.lastmod {
            write_text_element(&mut writer, "lastmod", lastmod)?;
        }
        if let Some(changefreq) = entry.changefreq {
            write_text_element(&mut writer, "changefreq", changefreq.as_str())?;
        }
        if let Some(priority) = entry.priority {
            write_text_element(&mut writer, "priority", &format!("{priority:.1}"))?;
        }
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;
    Ok(String::from_utf8(writer.into_inner())?)
}

/// Render a `<sitemapindex>` document.
///
/// # Errors
///
/// Returns an error if the XML writer fails.
pub fn render_index(locations: &[String]) -> Result<String, SitemapError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("sitemapindex").with_attributes([("xmlns", SITEMAP_NS)]),
    ))?;

    for loc in locations {
        writer.write_event(Event::Start(BytesStart::new("sitemap")))?;
        write_text_element(&mut writer, "loc", loc)?;
        writer.write_event(Event::End(BytesEnd::new("sitemap")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("sitemapindex")))?;
    Ok(String::from_utf8(writer.into_inner())?)
}

/// The empty-but-valid urlset served when catalog reads fail.
#[must_use]
pub fn empty_urlset() -> String {
    render_urlset(&[]).unwrap_or_else(|_| EMPTY_URLSET.to_string())
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), SitemapError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
