//! Crawl budget tracker
//!
//! The tracker owns the budget state of exactly one scan. The crawl loop
//! reports progress once per logical tick; after each tick the tracker
//! checks its stop conditions in priority order:
//!
//! 1. enterprise detection (SMART only, when enabled)
//! 2. URL ceiling
//! 3. duration ceiling
//! 4. empty frontier
//!
//! The first condition that holds moves the tracker to its terminal state.
//! Once stopped, further ticks are ignored and the terminal state is
//! returned unchanged.

use crate::detection::{DetectionInput, DetectionResult, DetectorConfig};
use crate::profile::{budget_for, ProfileBudget, ScanProfile};
use crate::state::clock::{elapsed_between, Clock, SystemClock};
use crate::state::estimate::{EstimateInput, SitemapOrDiscovered, TotalEstimator};
use crate::state::{StopReason, TrackerStatus};
use crate::TrackerError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// One progress report from the crawl loop
///
/// Counts are signed because they arrive from an external engine; negative
/// values are rejected rather than clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Total URLs discovered so far (cumulative)
    pub discovered_urls: i64,

    /// URLs crawled since the previous tick
    pub crawled_delta: i64,

    /// Current number of discovered-but-not-crawled URLs
    pub frontier_size_now: i64,
}

/// A progress event that passed validation
#[derive(Debug, Clone, Copy)]
struct ValidTick {
    discovered_urls: u64,
    urls_crawled: u64,
    frontier_size: u64,
}

impl ProgressEvent {
    /// Checks the event against the current crawled count
    fn validate(&self, urls_crawled: u64) -> Result<ValidTick, TrackerError> {
        let discovered_urls = u64::try_from(self.discovered_urls).map_err(|_| {
            TrackerError::Validation(format!(
                "discovered_urls must be >= 0, got {}",
                self.discovered_urls
            ))
        })?;

        let crawled_delta = u64::try_from(self.crawled_delta).map_err(|_| {
            TrackerError::Validation(format!(
                "crawled_delta must be >= 0, got {} (crawled count cannot decrease)",
                self.crawled_delta
            ))
        })?;

        let frontier_size = u64::try_from(self.frontier_size_now).map_err(|_| {
            TrackerError::Validation(format!(
                "frontier_size_now must be >= 0, got {}",
                self.frontier_size_now
            ))
        })?;

        let urls_crawled = urls_crawled.checked_add(crawled_delta).ok_or_else(|| {
            TrackerError::Validation(format!(
                "crawled_delta {} overflows crawled count {}",
                crawled_delta, urls_crawled
            ))
        })?;

        Ok(ValidTick {
            discovered_urls,
            urls_crawled,
            frontier_size,
        })
    }
}

/// Details recorded when a site is flagged as enterprise scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnterpriseDetection {
    pub result: DetectionResult,

    /// Best-effort estimate of the site's total page count
    pub estimated_pages: Option<u64>,

    /// Discovered URL count at the tick that triggered detection
    pub detected_at_urls: u64,

    /// Crawl time at the tick that triggered detection
    pub detected_after: Duration,
}

/// Budget state of one scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlBudgetState {
    pub profile: ScanProfile,
    pub budget: ProfileBudget,
    pub urls_crawled: u64,
    pub urls_discovered: u64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub elapsed: Duration,

    /// Frontier size at the previous tick, None before the first tick
    pub last_frontier_size: Option<u64>,
    pub peak_frontier_size: u64,
    pub ticks: u64,

    pub status: TrackerStatus,
    pub enterprise_detection: Option<EnterpriseDetection>,

    /// Estimated total pages, filled in when the crawl stops
    pub estimated_total_urls: Option<u64>,
}

impl CrawlBudgetState {
    /// Fresh state for a scan starting at `started_at`
    pub fn new(profile: ScanProfile, started_at: DateTime<Utc>) -> Self {
        Self {
            profile,
            budget: budget_for(profile),
            urls_crawled: 0,
            urls_discovered: 0,
            started_at,
            ended_at: None,
            elapsed: Duration::ZERO,
            last_frontier_size: None,
            peak_frontier_size: 0,
            ticks: 0,
            status: TrackerStatus::Running,
            enterprise_detection: None,
            estimated_total_urls: None,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.status.stop_reason()
    }

    /// Pages left before the URL ceiling
    pub fn urls_remaining(&self) -> u64 {
        u64::from(self.budget.max_urls).saturating_sub(self.urls_crawled)
    }

    /// Time left before the duration ceiling
    pub fn time_remaining(&self) -> Duration {
        self.budget.max_duration.saturating_sub(self.elapsed)
    }
}

/// Knobs for a tracker, passed in at construction
#[derive(Debug)]
pub struct TrackerConfig {
    /// Detection thresholds
    pub detector: DetectorConfig,

    /// Master switch for mid-crawl enterprise detection
    pub enterprise_detection: bool,

    /// Sitemap size, if the caller fetched one
    pub sitemap_url_count: Option<u64>,

    /// Strategy for estimating the site's total size on stop
    pub estimator: Box<dyn TotalEstimator>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            enterprise_detection: true,
            sitemap_url_count: None,
            estimator: Box::new(SitemapOrDiscovered),
        }
    }
}

impl TrackerConfig {
    pub fn with_detector(mut self, detector: DetectorConfig) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_enterprise_detection(mut self, enabled: bool) -> Self {
        self.enterprise_detection = enabled;
        self
    }

    pub fn with_sitemap_url_count(mut self, count: Option<u64>) -> Self {
        self.sitemap_url_count = count;
        self
    }

    pub fn with_estimator(mut self, estimator: Box<dyn TotalEstimator>) -> Self {
        self.estimator = estimator;
        self
    }
}

/// Stateful budget enforcement for one scan
///
/// Not shared across threads: the crawl loop that owns the tracker is the
/// only caller of `on_progress` and `force_stop`.
#[derive(Debug)]
pub struct CrawlBudgetTracker<C: Clock = SystemClock> {
    state: CrawlBudgetState,
    config: TrackerConfig,
    clock: C,
}

impl CrawlBudgetTracker<SystemClock> {
    /// Starts tracking a scan now
    pub fn new(profile: ScanProfile, config: TrackerConfig) -> Self {
        Self::with_clock(profile, config, SystemClock)
    }
}

impl<C: Clock> CrawlBudgetTracker<C> {
    /// Starts tracking a scan with an explicit clock
    pub fn with_clock(profile: ScanProfile, config: TrackerConfig, clock: C) -> Self {
        let state = CrawlBudgetState::new(profile, clock.now());
        tracing::debug!(
            "Tracking {} scan: max {} urls, max {:?}",
            profile,
            state.budget.max_urls,
            state.budget.max_duration
        );

        Self {
            state,
            config,
            clock,
        }
    }

    /// Read-only view of the current state
    pub fn state(&self) -> &CrawlBudgetState {
        &self.state
    }

    /// Consumes the tracker, returning its final state
    pub fn into_state(self) -> CrawlBudgetState {
        self.state
    }

    pub fn is_stopped(&self) -> bool {
        self.state.is_stopped()
    }

    /// Applies one progress tick and evaluates stop conditions
    ///
    /// # Arguments
    ///
    /// * `event` - Cumulative discovered count, newly crawled count and
    ///   current frontier size
    ///
    /// # Returns
    ///
    /// * `Ok(&CrawlBudgetState)` - State after the tick (unchanged if already stopped)
    /// * `Err(TrackerError::Validation)` - Event had negative or overflowing
    ///   counts; state is left untouched
    pub fn on_progress(
        &mut self,
        event: ProgressEvent,
    ) -> Result<&CrawlBudgetState, TrackerError> {
        if self.state.is_stopped() {
            tracing::trace!("Ignoring progress after stop: {:?}", event);
            return Ok(&self.state);
        }

        let tick = event.validate(self.state.urls_crawled)?;
        let now = self.clock.now();

        let frontier_growing = self
            .state
            .last_frontier_size
            .map_or(false, |previous| tick.frontier_size > previous);

        self.state.urls_crawled = tick.urls_crawled;
        self.state.urls_discovered = self.state.urls_discovered.max(tick.discovered_urls);
        self.state.elapsed = elapsed_between(self.state.started_at, now);
        self.state.last_frontier_size = Some(tick.frontier_size);
        self.state.peak_frontier_size = self.state.peak_frontier_size.max(tick.frontier_size);
        self.state.ticks += 1;

        tracing::trace!(
            "Tick {}: crawled={} discovered={} frontier={} growing={} elapsed={:?}",
            self.state.ticks,
            self.state.urls_crawled,
            self.state.urls_discovered,
            tick.frontier_size,
            frontier_growing,
            self.state.elapsed
        );

        if let Some(result) = self.check_enterprise(frontier_growing) {
            self.finish(StopReason::EnterpriseDetected, now, Some(result));
        } else if self.state.urls_crawled >= u64::from(self.state.budget.max_urls) {
            self.finish(StopReason::UrlLimit, now, None);
        } else if self.state.elapsed >= self.state.budget.max_duration {
            self.finish(StopReason::TimeLimit, now, None);
        } else if tick.frontier_size == 0 {
            self.finish(StopReason::Complete, now, None);
        }

        Ok(&self.state)
    }

    /// Stops the crawl with an explicit reason
    ///
    /// The first stop wins: if the tracker has already stopped this does
    /// nothing and returns false.
    pub fn force_stop(&mut self, reason: StopReason) -> bool {
        if self.state.is_stopped() {
            tracing::debug!(
                "Ignoring force stop ({}), already stopped: {:?}",
                reason,
                self.state.stop_reason()
            );
            return false;
        }

        let now = self.clock.now();
        self.state.elapsed = elapsed_between(self.state.started_at, now);
        self.finish(reason, now, None);
        true
    }

    /// Runs the detector if this scan opted into enterprise detection
    fn check_enterprise(&self, frontier_growing: bool) -> Option<DetectionResult> {
        if !self.config.enterprise_detection || !self.state.budget.detects_enterprise() {
            return None;
        }

        let input = DetectionInput {
            discovered_urls: self.state.urls_discovered,
            elapsed_minutes: self.state.elapsed.as_secs_f64() / 60.0,
            frontier_growing,
        };

        let result = self.config.detector.detect(&input);
        result.is_enterprise().then_some(result)
    }

    fn estimate_input(&self, stop_reason: StopReason) -> EstimateInput {
        EstimateInput {
            urls_crawled: self.state.urls_crawled,
            urls_discovered: self.state.urls_discovered,
            frontier_size: self.state.last_frontier_size.unwrap_or(0),
            elapsed: self.state.elapsed,
            max_duration: self.state.budget.max_duration,
            sitemap_url_count: self.config.sitemap_url_count,
            stop_reason,
        }
    }

    /// Moves to the terminal state
    fn finish(
        &mut self,
        reason: StopReason,
        now: DateTime<Utc>,
        detection: Option<DetectionResult>,
    ) {
        let estimated = self.config.estimator.estimate(&self.estimate_input(reason));

        if let Some(result) = detection {
            self.state.enterprise_detection = Some(EnterpriseDetection {
                result,
                estimated_pages: estimated,
                detected_at_urls: self.state.urls_discovered,
                detected_after: self.state.elapsed,
            });
            tracing::info!(
                "Enterprise-scale site detected ({:?}) after {} discovered urls, estimated {:?} pages",
                result.reason(),
                self.state.urls_discovered,
                estimated
            );
        }

        self.state.status = TrackerStatus::Stopped(reason);
        self.state.ended_at = Some(now);
        self.state.estimated_total_urls = estimated;

        tracing::info!(
            "{} scan stopped ({}): {} crawled, {} discovered in {:?}",
            self.state.profile,
            reason,
            self.state.urls_crawled,
            self.state.urls_discovered,
            self.state.elapsed
        );
    }
}
