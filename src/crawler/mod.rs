//! Crawler module for budgeted site scans
//!
//! This module contains the crawl plumbing the budget tracker is driven by:
//! - HTTP fetching and user agent setup
//! - Same-site link extraction
//! - Sitemap fetching and counting
//! - The priority-ordered frontier
//! - Overall scan coordination

mod coordinator;
mod fetcher;
mod links;
mod scheduler;
mod sitemap;
mod source;

pub use coordinator::ScanCoordinator;
pub use fetcher::{build_http_client, fetch_page, user_agent_string, FetchResult};
pub use links::extract_site_links;
pub use scheduler::{Frontier, QueuedUrl};
pub use sitemap::{
    count_sitemap_urls, fetch_sitemap_urls, parse_sitemap, sitemap_url, SitemapDocument,
    MAX_CHILD_SITEMAPS,
};
pub use source::{HttpPageSource, PageSource};
