//! Site-size estimation strategies
//!
//! When a crawl stops early the true number of pages on the site is
//! unknown. The tracker asks a `TotalEstimator` for a best-effort figure,
//! which becomes the denominator of the coverage percentage and the
//! `estimated_pages` of an enterprise detection.

use crate::state::StopReason;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Everything an estimator may look at when the crawl stops
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateInput {
    pub urls_crawled: u64,
    pub urls_discovered: u64,
    pub frontier_size: u64,
    pub elapsed: Duration,
    pub max_duration: Duration,
    pub sitemap_url_count: Option<u64>,
    pub stop_reason: StopReason,
}

/// Strategy for estimating the total number of pages on a site
pub trait TotalEstimator: fmt::Debug + Send {
    /// Returns the estimated page count, or None if nothing is known
    fn estimate(&self, input: &EstimateInput) -> Option<u64>;
}

/// Uses what the crawl has actually seen
///
/// - a completed crawl has seen the whole site
/// - otherwise the sitemap count is trusted when present
/// - otherwise the discovered count is the best lower bound
#[derive(Debug, Clone, Copy, Default)]
pub struct SitemapOrDiscovered;

impl TotalEstimator for SitemapOrDiscovered {
    fn estimate(&self, input: &EstimateInput) -> Option<u64> {
        if input.stop_reason == StopReason::Complete {
            return Some(input.urls_crawled.max(input.urls_discovered));
        }

        if let Some(sitemap) = input.sitemap_url_count {
            return Some(sitemap.max(input.urls_discovered));
        }

        (input.urls_discovered > 0).then_some(input.urls_discovered)
    }
}

/// Projects the discovery rate over the rest of the profile's time budget
///
/// Never estimates below the discovered count or the sitemap count.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearExtrapolation;

impl TotalEstimator for LinearExtrapolation {
    fn estimate(&self, input: &EstimateInput) -> Option<u64> {
        let elapsed_secs = input.elapsed.as_secs_f64();
        if input.stop_reason == StopReason::Complete || elapsed_secs <= 0.0 {
            return SitemapOrDiscovered.estimate(input);
        }

        let rate = input.urls_discovered as f64 / elapsed_secs;
        let remaining = input.max_duration.saturating_sub(input.elapsed).as_secs_f64();
        let projected = (input.urls_discovered as f64 + rate * remaining).round() as u64;

        let floor = input
            .urls_discovered
            .max(input.sitemap_url_count.unwrap_or(0));

        let estimate = projected.max(floor);
        (estimate > 0).then_some(estimate)
    }
}

/// Estimator selection as written in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimatorKind {
    #[default]
    Sitemap,
    Linear,
}

impl EstimatorKind {
    pub fn build(&self) -> Box<dyn TotalEstimator> {
        match self {
            Self::Sitemap => Box::new(SitemapOrDiscovered),
            Self::Linear => Box::new(LinearExtrapolation),
        }
    }
}
