//! Crawl frontier ordered by page priority
//!
//! This module handles:
//! - Priority queue management for URLs to crawl
//! - Deduplication on the normalized URL
//! - Counting discovered URLs, where sitemap seeds only count once they are
//!   crawled or linked from a crawled page

use crate::profile::{PagePriority, ProfileBudget};
use crate::url::{classify_page, normalize_parsed};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use url::Url;

/// A URL queued for fetching with priority information
#[derive(Debug, Clone)]
pub struct QueuedUrl {
    /// The normalized URL to fetch
    pub url: Url,

    /// Page category the URL was classified as
    pub priority: PagePriority,

    /// Position of `priority` in the profile's order (lower is crawled first)
    pub rank: usize,

    /// Discovery sequence, breaks ties in first-seen order
    pub seq: u64,
}

// Lower (rank, seq) pairs are popped first from the max-heap
impl Ord for QueuedUrl {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .rank
            .cmp(&self.rank)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedUrl {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedUrl {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank && self.seq == other.seq
    }
}

impl Eq for QueuedUrl {}

/// Frontier of URLs waiting to be crawled
#[derive(Debug)]
pub struct Frontier {
    /// Queue of URLs to fetch (lowest rank first)
    queue: BinaryHeap<QueuedUrl>,

    /// Normalized URLs ever pushed, including ones already popped
    seen: HashSet<String>,

    /// Sitemap seeds not yet crawled or linked
    sitemap_only: HashSet<String>,

    priority_order: [PagePriority; 5],
    next_seq: u64,
}

impl Frontier {
    /// Creates an empty frontier for a category order
    pub fn new(priority_order: [PagePriority; 5]) -> Self {
        Self {
            queue: BinaryHeap::new(),
            seen: HashSet::new(),
            sitemap_only: HashSet::new(),
            priority_order,
            next_seq: 0,
        }
    }

    /// Creates an empty frontier ordered by a profile's budget
    pub fn for_budget(budget: &ProfileBudget) -> Self {
        Self::new(budget.priority_order)
    }

    /// Adds a URL found on the site (the root or a crawled page's link)
    ///
    /// A link to a queued sitemap seed marks the seed as discovered.
    ///
    /// # Returns
    ///
    /// `true` if the URL was new and queued; `false` if it was a duplicate or
    /// not an http(s) URL
    pub fn push(&mut self, url: Url) -> bool {
        let Some(url) = normalize_for_queue(url) else {
            return false;
        };

        if self.sitemap_only.remove(url.as_str()) {
            return false;
        }
        self.enqueue(url)
    }

    /// Adds a URL listed in the sitemap
    ///
    /// Seeds are crawled in priority order like any other URL but are not
    /// counted by [`Frontier::discovered`] until crawled or linked.
    pub fn push_seed(&mut self, url: Url) -> bool {
        let Some(url) = normalize_for_queue(url) else {
            return false;
        };

        let key = url.as_str().to_string();
        let queued = self.enqueue(url);
        if queued {
            self.sitemap_only.insert(key);
        }
        queued
    }

    fn enqueue(&mut self, url: Url) -> bool {
        if !self.seen.insert(url.as_str().to_string()) {
            return false;
        }

        let priority = classify_page(&url);
        let rank = self
            .priority_order
            .iter()
            .position(|p| *p == priority)
            .unwrap_or(self.priority_order.len());

        self.queue.push(QueuedUrl {
            url,
            priority,
            rank,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        true
    }

    /// Removes the highest-priority URL
    pub fn pop(&mut self) -> Option<QueuedUrl> {
        let queued = self.queue.pop()?;
        self.sitemap_only.remove(queued.url.as_str());
        Some(queued)
    }

    /// URLs still waiting to be crawled
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Distinct URLs ever queued, including sitemap seeds
    pub fn seen(&self) -> usize {
        self.seen.len()
    }

    /// Distinct URLs crawled or linked from crawled pages
    pub fn discovered(&self) -> usize {
        self.seen.len() - self.sitemap_only.len()
    }
}

fn normalize_for_queue(url: Url) -> Option<Url> {
    match normalize_parsed(url) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::trace!("Not queueing URL: {}", e);
            None
        }
    }
}
