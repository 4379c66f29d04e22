//! Sitemap fetching and URL counting
//!
//! The sitemap size is the only pre-crawl signal used to pick a profile, and
//! its `<loc>` entries seed the frontier when a profile crawls sitemap-first.

use crate::ScanError;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

/// Child sitemaps followed from a sitemap index
pub const MAX_CHILD_SITEMAPS: usize = 50;

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// A `<urlset>` listing page URLs
    UrlSet(Vec<String>),
    /// A `<sitemapindex>` listing child sitemap URLs
    Index(Vec<String>),
}

/// Returns `<origin>/sitemap.xml` for a site
pub fn sitemap_url(site: &Url) -> Result<Url, ScanError> {
    Ok(site.join("/sitemap.xml")?)
}

/// Parses sitemap XML into page or child-sitemap locations
///
/// Uses the lenient HTML parser, which keeps unknown elements such as
/// `<urlset>` and `<loc>` in the tree. Blank `<loc>` entries are skipped.
///
/// # Returns
///
/// `None` if the body has neither a `<urlset>` nor a `<sitemapindex>`
/// element, e.g. an HTML page served for a missing sitemap
pub fn parse_sitemap(xml: &str) -> Option<SitemapDocument> {
    let document = Html::parse_document(xml);
    let has = |name: &str| {
        Selector::parse(name)
            .map(|selector| document.select(&selector).next().is_some())
            .unwrap_or(false)
    };

    let is_index = has("sitemapindex");
    if !is_index && !has("urlset") {
        return None;
    }

    let locs = match Selector::parse("loc") {
        Ok(selector) => document
            .select(&selector)
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|loc| !loc.is_empty())
            .collect(),
        Err(_) => Vec::new(),
    };

    if is_index {
        Some(SitemapDocument::Index(locs))
    } else {
        Some(SitemapDocument::UrlSet(locs))
    }
}

/// Fetches one sitemap document
///
/// Returns `Ok(None)` on a non-success status or a body that is not a
/// sitemap.
async fn fetch_document(client: &Client, url: &str) -> Result<Option<SitemapDocument>, ScanError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        tracing::debug!("Sitemap {} returned {}", url, response.status());
        return Ok(None);
    }

    let body = response.text().await?;
    let document = parse_sitemap(&body);
    if document.is_none() {
        tracing::debug!("{} is not a sitemap document", url);
    }
    Ok(document)
}

/// Fetches the page URLs listed in a site's sitemap
///
/// A sitemap index is followed one level deep: at most
/// [`MAX_CHILD_SITEMAPS`] children are fetched and their page URLs
/// concatenated. Nested indexes and failing children are skipped.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `site` - Root URL of the site
///
/// # Returns
///
/// * `Ok(Some(urls))` - The sitemap's page URLs
/// * `Ok(None)` - The site has no reachable sitemap, or `/sitemap.xml`
///   serves something else
/// * `Err(ScanError)` - Network failure fetching the top-level sitemap
pub async fn fetch_sitemap_urls(
    client: &Client,
    site: &Url,
) -> Result<Option<Vec<String>>, ScanError> {
    let url = sitemap_url(site)?;

    let children = match fetch_document(client, url.as_str()).await? {
        None => return Ok(None),
        Some(SitemapDocument::UrlSet(urls)) => return Ok(Some(urls)),
        Some(SitemapDocument::Index(children)) => children,
    };

    if children.len() > MAX_CHILD_SITEMAPS {
        tracing::info!(
            "Sitemap index lists {} sitemaps, following the first {}",
            children.len(),
            MAX_CHILD_SITEMAPS
        );
    }

    let mut urls = Vec::new();
    for child in children.iter().take(MAX_CHILD_SITEMAPS) {
        match fetch_document(client, child).await {
            Ok(Some(SitemapDocument::UrlSet(child_urls))) => urls.extend(child_urls),
            Ok(Some(SitemapDocument::Index(_))) => {
                tracing::debug!("Skipping nested sitemap index {}", child);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to fetch child sitemap {}: {}", child, e),
        }
    }

    Ok(Some(urls))
}

/// Counts the page URLs in a site's sitemap
///
/// # Returns
///
/// * `Ok(Some(n))` - Number of `<loc>` page entries
/// * `Ok(None)` - No reachable sitemap (no count hint)
pub async fn count_sitemap_urls(client: &Client, site: &Url) -> Result<Option<u64>, ScanError> {
    let urls = fetch_sitemap_urls(client, site).await?;
    let count = urls.map(|urls| urls.len() as u64);
    tracing::debug!("Sitemap count for {}: {:?}", site, count);
    Ok(count)
}
