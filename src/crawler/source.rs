//! Page sources for the scan coordinator
//!
//! The coordinator only needs "give me this page"; keeping that behind a
//! trait lets tests drive a full scan from an in-memory site.

use crate::crawler::fetcher::{fetch_page, FetchResult};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

/// Anything that can fetch a page for the coordinator
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches a single page
    async fn fetch(&self, url: &Url) -> FetchResult;
}

/// Live HTTP page source backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &Url) -> FetchResult {
        fetch_page(&self.client, url).await
    }
}
