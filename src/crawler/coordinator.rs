//! Scan coordinator - the budgeted crawl loop
//!
//! This module drives one scan end to end:
//! - Seeding the frontier with the site root and sitemap URLs
//! - Fetching pages in profile priority order
//! - Keeping same-site links
//! - Feeding one progress tick per page into the budget tracker
//!
//! The loop stops as soon as the tracker reaches a terminal state.

use crate::crawler::fetcher::FetchResult;
use crate::crawler::links::extract_site_links;
use crate::crawler::scheduler::{Frontier, QueuedUrl};
use crate::crawler::source::PageSource;
use crate::profile::ScanProfile;
use crate::state::{
    Clock, CrawlBudgetState, CrawlBudgetTracker, ProgressEvent, StopReason, SystemClock,
    TrackerConfig,
};
use crate::url::{normalize_url, same_site};
use crate::ScanError;
use std::time::{Duration, Instant};
use url::Url;

/// Pages between progress log lines
const PROGRESS_INTERVAL: u64 = 10;

/// Main scan coordinator structure
pub struct ScanCoordinator<S: PageSource, C: Clock = SystemClock> {
    site: Url,
    tracker: CrawlBudgetTracker<C>,
    frontier: Frontier,
    source: S,
    request_delay: Duration,
    pages_fetched: u64,
    pages_failed: u64,
}

impl<S: PageSource> ScanCoordinator<S> {
    /// Creates a coordinator that tracks time with the system clock
    ///
    /// # Arguments
    ///
    /// * `site` - Root URL of the site to scan
    /// * `profile` - The selected scan profile
    /// * `config` - Tracker configuration
    /// * `source` - Where pages are fetched from
    ///
    /// # Returns
    ///
    /// * `Ok(ScanCoordinator)` - Coordinator with the site root queued
    /// * `Err(ScanError)` - The site URL is not a valid http(s) URL
    pub fn new(
        site: &str,
        profile: ScanProfile,
        config: TrackerConfig,
        source: S,
    ) -> Result<Self, ScanError> {
        Self::with_clock(site, profile, config, source, SystemClock)
    }
}

impl<S: PageSource, C: Clock> ScanCoordinator<S, C> {
    /// Creates a coordinator with an explicit tracker clock
    pub fn with_clock(
        site: &str,
        profile: ScanProfile,
        config: TrackerConfig,
        source: S,
        clock: C,
    ) -> Result<Self, ScanError> {
        let site = normalize_url(site)?;
        let tracker = CrawlBudgetTracker::with_clock(profile, config, clock);

        let mut frontier = Frontier::for_budget(&tracker.state().budget);
        frontier.push(site.clone());

        Ok(Self {
            site,
            tracker,
            frontier,
            source,
            request_delay: Duration::ZERO,
            pages_fetched: 0,
            pages_failed: 0,
        })
    }

    /// Queues sitemap URLs when the profile crawls sitemap-first
    ///
    /// Off-site and unparseable entries are dropped. Seeds count as
    /// discovered only once crawled or linked, so a large sitemap alone does
    /// not trip enterprise detection before any sampling happens.
    pub fn with_sitemap_seeds<I>(mut self, seeds: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        if !self.tracker.state().budget.sitemap_first {
            return self;
        }

        let mut queued = 0;
        for seed in seeds {
            match Url::parse(&seed) {
                Ok(url) if same_site(&self.site, &url) => {
                    if self.frontier.push_seed(url) {
                        queued += 1;
                    }
                }
                Ok(_) => tracing::debug!("Skipping off-site sitemap URL {}", seed),
                Err(e) => tracing::debug!("Skipping sitemap URL {}: {}", seed, e),
            }
        }

        tracing::info!("Seeded frontier with {} sitemap URLs", queued);
        self
    }

    /// Sets the minimum delay between page requests
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn tracker(&self) -> &CrawlBudgetTracker<C> {
        &self.tracker
    }

    /// Stops the scan from outside the loop (e.g. on interrupt)
    ///
    /// Returns false if the tracker had already stopped.
    pub fn stop(&mut self, reason: StopReason) -> bool {
        self.tracker.force_stop(reason)
    }

    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Runs the crawl loop until the tracker stops
    ///
    /// Each fetched page, successful or not, is one progress tick with a
    /// crawled delta of 1. Calling `run` again after a stop returns the same
    /// terminal state without fetching anything.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlBudgetState)` - The tracker's terminal state
    /// * `Err(ScanError)` - The tracker rejected a progress event
    pub async fn run(&mut self) -> Result<CrawlBudgetState, ScanError> {
        let budget = &self.tracker.state().budget;
        tracing::info!(
            "Starting {} scan of {} (max {} pages, {:?})",
            self.tracker.state().profile,
            self.site,
            budget.max_urls,
            budget.max_duration
        );

        let start_time = Instant::now();
        let mut last_request: Option<Instant> = None;

        while !self.tracker.is_stopped() {
            let Some(queued) = self.frontier.pop() else {
                tracing::info!("Frontier is empty, scan complete");
                self.tracker.force_stop(StopReason::Complete);
                break;
            };

            if let Some(previous) = last_request {
                let wait = self.request_delay.saturating_sub(previous.elapsed());
                if !wait.is_zero() {
                    tokio::time::sleep(wait).await;
                }
            }
            last_request = Some(Instant::now());

            self.process_url(&queued).await;

            let event = ProgressEvent {
                discovered_urls: to_event_count(self.frontier.discovered()),
                crawled_delta: 1,
                frontier_size_now: to_event_count(self.frontier.len()),
            };
            self.tracker.on_progress(event)?;

            let crawled = self.tracker.state().urls_crawled;
            if crawled % PROGRESS_INTERVAL == 0 {
                let rate = crawled as f64 / start_time.elapsed().as_secs_f64().max(0.001);
                tracing::info!(
                    "Progress: {} pages crawled, {} discovered, {} in frontier, {:.2} pages/sec",
                    crawled,
                    self.tracker.state().urls_discovered,
                    self.frontier.len(),
                    rate
                );
            }
        }

        tracing::info!(
            "Scan finished: {} pages fetched, {} failed, {} left in frontier",
            self.pages_fetched,
            self.pages_failed,
            self.frontier.len()
        );

        Ok(self.tracker.state().clone())
    }

    /// Fetches one page and queues its same-site links
    async fn process_url(&mut self, queued: &QueuedUrl) {
        tracing::debug!("Fetching {} ({})", queued.url, queued.priority);

        let result = self.source.fetch(&queued.url).await;
        if result.is_failure() {
            self.pages_failed += 1;
        } else {
            self.pages_fetched += 1;
        }

        match result {
            FetchResult::Html { final_url, body } => {
                let mut added = 0;
                for url in extract_site_links(&body, &final_url, &self.site) {
                    if self.frontier.push(url) {
                        added += 1;
                    }
                }
                tracing::debug!("{} new links from {}", added, queued.url);
            }

            FetchResult::NotHtml { media_type } => {
                tracing::debug!("Not following links in {} ({})", queued.url, media_type);
            }

            FetchResult::HttpError { status_code } => {
                tracing::warn!("HTTP {} for {}", status_code, queued.url);
            }

            FetchResult::NetworkError { error } => {
                tracing::warn!("Failed to fetch {}: {}", queued.url, error);
            }
        }
    }
}

fn to_event_count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
