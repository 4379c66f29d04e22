//! Link extraction for the scan frontier
//!
//! A fetched page contributes the same-site pages it links to. Returned URLs
//! are already normalized, so the frontier only has to dedupe them.

use crate::url::{normalize_parsed, same_site};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements whose `href` points at another page
const PAGE_LINKS: &str = "a[href], area[href], link[rel~='canonical'][href]";

/// Extracts the distinct same-site pages a document links to
///
/// Hrefs resolve against `<base href>` when the page declares one, otherwise
/// against `page_url`. A link is kept when it:
/// - resolves to an http(s) URL on the same site as `site`
/// - is not a fragment-only jump within the page
/// - does not carry a `download` attribute
///
/// Schemes such as `javascript:`, `mailto:` or `data:` fail the http(s)
/// check. `rel="nofollow"` links are kept since they are still site pages.
///
/// # Arguments
///
/// * `html` - The page body
/// * `page_url` - Final URL the body was served from
/// * `site` - Root URL of the site being scanned
///
/// # Returns
///
/// Normalized URLs in document order, without duplicates
///
/// # Example
///
/// ```
/// use scan_budget::crawler::extract_site_links;
/// use url::Url;
///
/// let site = Url::parse("https://shop.example/").unwrap();
/// let page = site.join("/products/").unwrap();
/// let html = r#"<a href="mug?utm_source=nav">Mug</a><a href="https://elsewhere.example/">Partner</a>"#;
///
/// let links = extract_site_links(html, &page, &site);
/// assert_eq!(links, vec![Url::parse("https://shop.example/products/mug").unwrap()]);
/// ```
pub fn extract_site_links(html: &str, page_url: &Url, site: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let base = document_base(&document, page_url);

    let Ok(selector) = Selector::parse(PAGE_LINKS) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    document
        .select(&selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_href(href, &base))
        .filter(|url| same_site(site, url))
        .filter_map(|url| normalize_parsed(url).ok())
        .filter(|url| seen.insert(url.as_str().to_string()))
        .collect()
}

/// URL relative hrefs resolve against
fn document_base(document: &Html, page_url: &Url) -> Url {
    Selector::parse("base[href]")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone())
}

fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let url = base.join(href).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}
