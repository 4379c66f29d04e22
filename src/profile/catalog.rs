//! Static budget table for each scan profile
//!
//! Budgets are plain data. They are never mutated at runtime; callers that
//! need different limits construct their own `ProfileBudget`.

use crate::detection::DEFAULT_URL_THRESHOLD;
use crate::profile::types::{CrawlStrategy, PagePriority, ScanProfile};
use serde::Serialize;
use std::time::Duration;

/// QUICK visits navigation ahead of product pages
pub const QUICK_PRIORITY_ORDER: [PagePriority; 5] = [
    PagePriority::Homepage,
    PagePriority::Navigation,
    PagePriority::Product,
    PagePriority::Content,
    PagePriority::Utility,
];

/// SMART and DEEP visit product pages ahead of navigation
pub const SAMPLING_PRIORITY_ORDER: [PagePriority; 5] = [
    PagePriority::Homepage,
    PagePriority::Product,
    PagePriority::Navigation,
    PagePriority::Content,
    PagePriority::Utility,
];

/// Crawl limits and strategy for one profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileBudget {
    /// Hard ceiling on pages crawled
    pub max_urls: u32,

    /// Hard ceiling on wall-clock crawl time
    pub max_duration: Duration,

    /// How the crawl engine should spend the budget
    pub strategy: CrawlStrategy,

    /// Whether the sitemap seeds the frontier before link discovery
    pub sitemap_first: bool,

    /// Frontier ordering, highest priority first
    pub priority_order: [PagePriority; 5],

    /// Discovered-URL count above which the site is treated as enterprise scale
    pub enterprise_detection_threshold: Option<u64>,

    /// Whether an interrupted crawl may resume
    pub resumable: Option<bool>,

    /// Pages between checkpoints for resumable crawls
    pub checkpoint_interval: Option<u32>,
}

impl ProfileBudget {
    /// Returns the position of a page category in this budget's priority order
    ///
    /// Lower ranks are crawled first.
    pub fn rank_of(&self, priority: PagePriority) -> usize {
        self.priority_order
            .iter()
            .position(|p| *p == priority)
            .unwrap_or(self.priority_order.len())
    }

    /// Whether this budget opts into mid-crawl enterprise detection
    pub fn detects_enterprise(&self) -> bool {
        self.enterprise_detection_threshold.is_some()
    }
}

/// Returns the budget for a profile
///
/// # Examples
///
/// ```
/// use scan_budget::profile::{budget_for, ScanProfile};
///
/// let budget = budget_for(ScanProfile::Quick);
/// assert_eq!(budget.max_urls, 50);
/// ```
pub fn budget_for(profile: ScanProfile) -> ProfileBudget {
    match profile {
        ScanProfile::Quick => ProfileBudget {
            max_urls: 50,
            max_duration: Duration::from_secs(5 * 60),
            strategy: CrawlStrategy::Complete,
            sitemap_first: true,
            priority_order: QUICK_PRIORITY_ORDER,
            enterprise_detection_threshold: None,
            resumable: None,
            checkpoint_interval: None,
        },
        ScanProfile::Smart => ProfileBudget {
            max_urls: 150,
            max_duration: Duration::from_secs(10 * 60),
            strategy: CrawlStrategy::PrioritySampling,
            sitemap_first: true,
            priority_order: SAMPLING_PRIORITY_ORDER,
            enterprise_detection_threshold: Some(DEFAULT_URL_THRESHOLD),
            resumable: None,
            checkpoint_interval: None,
        },
        ScanProfile::Deep => ProfileBudget {
            max_urls: 1000,
            max_duration: Duration::from_secs(30 * 60),
            strategy: CrawlStrategy::Comprehensive,
            sitemap_first: true,
            priority_order: SAMPLING_PRIORITY_ORDER,
            enterprise_detection_threshold: None,
            resumable: Some(true),
            checkpoint_interval: Some(100),
        },
    }
}
