use crate::UrlError;
use url::Url;

/// Query parameters that never change page content
const TRACKING_PARAMS: &[&str] = &[
    "fbclid", "gclid", "gclsrc", "dclid", "msclkid", "mc_cid", "mc_eid", "igshid", "_ga", "_gl",
    "ref", "source",
];

/// Normalizes a URL so that equivalent links dedupe to one frontier entry
///
/// Two links to the same page should cost the scan one page, not two. The
/// `url` crate already lowercases the host, drops default ports and resolves
/// `.`/`..` segments; on top of that:
///
/// - only http and https are accepted, and the scheme is kept
/// - empty path segments and a trailing slash are dropped (`/` stays)
/// - the fragment is dropped
/// - `utm_*` and other tracking parameters are dropped, the rest sorted
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Not parseable, not http(s), or no host
///
/// # Examples
///
/// ```
/// use scan_budget::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.COM/pricing/?utm_source=ad#plans").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/pricing");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Normalizes an already parsed URL
pub fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                other
            )))
        }
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    let path = collapse_path(&url);
    url.set_path(&path);
    url.set_fragment(None);

    let kept = content_params(&url);
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }

    Ok(url)
}

fn collapse_path(url: &Url) -> String {
    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    format!("/{}", segments.join("/"))
}

/// Query pairs that can change the page, sorted by key then value
fn content_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    params.sort();
    params
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}
