use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use scan_budget::url::extract_domain;
///
/// let url = Url::parse("https://Shop.Example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("shop.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true when two URLs belong to the same site
///
/// Hosts are compared without a leading `www.` and ports must match. The
/// scheme is ignored so an http link on an https site still counts.
pub fn same_site(a: &Url, b: &Url) -> bool {
    match (extract_domain(a), extract_domain(b)) {
        (Some(ha), Some(hb)) => strip_www(&ha) == strip_www(&hb) && a.port() == b.port(),
        _ => false,
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}
