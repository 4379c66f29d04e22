//! HTTP fetching for scanned pages
//!
//! Every fetch ends in exactly one [`FetchResult`]. Failures are values, not
//! errors: a page that could not be loaded still used up one page of the
//! scan budget.

use crate::config::UserAgentConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed for a single page
const MAX_REDIRECTS: usize = 10;

/// Upper bound on the TCP/TLS connect phase
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Media types scanned as pages
const HTML_MEDIA_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// Outcome of fetching one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// An HTML page, links can be extracted from `body`
    Html {
        /// Where the page was served from after redirects
        final_url: Url,
        body: String,
    },

    /// The page loaded but is not HTML (PDF, image, feed...)
    NotHtml {
        /// Media type without parameters, empty if the header was missing
        media_type: String,
    },

    /// Server answered with a non-success status
    HttpError { status_code: u16 },

    /// No usable response (DNS, connect, timeout, redirect loop, body read)
    NetworkError { error: String },
}

impl FetchResult {
    /// True if the page could not be loaded at all
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::HttpError { .. } | Self::NetworkError { .. })
    }
}

/// Formats the scanner's user agent string
///
/// Format: `Name/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds the HTTP client shared by page and sitemap fetches
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Whole-request timeout; the connect phase is capped at 10s
///
/// # Example
///
/// ```no_run
/// use scan_budget::config::UserAgentConfig;
/// use scan_budget::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "ScanBudget".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(timeout)
        .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one page for the scan
///
/// Fetched once with no retry. The body is only downloaded for HTML
/// responses.
pub async fn fetch_page(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchResult::NetworkError {
                error: describe_request_error(&e),
            }
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let media_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(media_type_of)
        .unwrap_or_default();

    if !HTML_MEDIA_TYPES.contains(&media_type.as_str()) {
        return FetchResult::NotHtml { media_type };
    }

    let final_url = response.url().clone();
    match response.text().await {
        Ok(body) => FetchResult::Html { final_url, body },
        Err(e) => FetchResult::NetworkError {
            error: format!("Failed to read body: {}", e),
        },
    }
}

/// Lowercased media type of a Content-Type header, without parameters
fn media_type_of(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn describe_request_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else if e.is_redirect() {
        format!("Too many redirects: {}", e)
    } else {
        e.to_string()
    }
}
