//! Coverage summary generation
//!
//! Turns the terminal state of a crawl budget tracker into the record the
//! reporting layer persists and the gating banner reads.

use crate::profile::{budget_for, ScanProfile};
use crate::state::{CrawlBudgetState, EnterpriseDetection, StopReason};
use crate::CoverageError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Final coverage record for one scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSummary {
    pub profile: ScanProfile,
    pub scanned_urls: u64,
    pub estimated_total_urls: Option<u64>,

    /// Share of the estimated site that was scanned, 0-100
    pub coverage_percent: u8,

    /// True when a limit cut the scan short
    pub reached_limit: bool,
    pub stop_reason: StopReason,
    pub enterprise_detection: Option<EnterpriseDetection>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub pages_crawled: u64,
    pub discovered_urls: u64,
}

impl CoverageSummary {
    /// Wall-clock length of the scan in seconds
    pub fn duration_seconds(&self) -> u64 {
        (self.ended_at - self.started_at).num_seconds().max(0) as u64
    }

    /// Message for the partial-coverage banner, None for full scans
    pub fn banner(&self) -> Option<String> {
        if !self.reached_limit {
            return None;
        }

        let estimate = match self.estimated_total_urls {
            Some(total) => format!("about {}", total),
            None => "an unknown number of".to_string(),
        };
        let budget = budget_for(self.profile);

        let message = match self.stop_reason {
            StopReason::EnterpriseDetected => format!(
                "This looks like an enterprise-scale site. We scanned {} of {} pages ({}% coverage). \
                 A DEEP scan covers up to {} pages.",
                self.scanned_urls,
                estimate,
                self.coverage_percent,
                budget_for(ScanProfile::Deep).max_urls
            ),
            StopReason::UrlLimit => format!(
                "The {} scan stopped at its {}-page limit. We scanned {} of {} pages ({}% coverage).",
                self.profile, budget.max_urls, self.scanned_urls, estimate, self.coverage_percent
            ),
            StopReason::TimeLimit => format!(
                "The {} scan stopped at its {}-minute limit. We scanned {} of {} pages ({}% coverage).",
                self.profile,
                budget.max_duration.as_secs() / 60,
                self.scanned_urls,
                estimate,
                self.coverage_percent
            ),
            StopReason::Complete | StopReason::Budget => return None,
        };

        Some(message)
    }
}

/// Builds the coverage summary for a stopped crawl
///
/// # Arguments
///
/// * `state` - Terminal tracker state
///
/// # Returns
///
/// * `Ok(CoverageSummary)` - The summary
/// * `Err(CoverageError::IncompleteState)` - The crawl is still running
pub fn summarize(state: &CrawlBudgetState) -> Result<CoverageSummary, CoverageError> {
    let stop_reason = state.stop_reason().ok_or(CoverageError::IncompleteState)?;

    let ended_at = state.ended_at.unwrap_or_else(|| {
        state.started_at
            + chrono::Duration::from_std(state.elapsed).unwrap_or_else(|_| chrono::Duration::zero())
    });

    Ok(CoverageSummary {
        profile: state.profile,
        scanned_urls: state.urls_crawled,
        estimated_total_urls: state.estimated_total_urls,
        coverage_percent: coverage_percent(
            state.urls_crawled,
            state.estimated_total_urls,
            stop_reason,
        ),
        reached_limit: stop_reason.is_limit(),
        stop_reason,
        enterprise_detection: state.enterprise_detection,
        started_at: state.started_at,
        ended_at,
        pages_crawled: state.urls_crawled,
        discovered_urls: state.urls_discovered,
    })
}

/// Rounded, clamped coverage percentage
///
/// An unknown or zero estimate counts as full coverage only for a crawl
/// that completed naturally.
pub fn coverage_percent(scanned: u64, estimated_total: Option<u64>, stop_reason: StopReason) -> u8 {
    match estimated_total {
        Some(total) if total > 0 => {
            let percent = (100.0 * scanned as f64 / total as f64).round();
            percent.clamp(0.0, 100.0) as u8
        }
        _ => {
            if stop_reason == StopReason::Complete {
                100
            } else {
                0
            }
        }
    }
}
