//! Statistics generation from stored coverage summaries
//!
//! This module provides functionality for aggregating and displaying
//! coverage statistics from the storage layer.

use crate::output::coverage::CoverageSummary;
use crate::profile::ScanProfile;
use crate::state::StopReason;
use crate::storage::{Storage, StoredSummary};
use crate::ScanError;
use std::collections::HashMap;

/// Aggregate statistics over stored scans
#[derive(Debug, Clone, Default)]
pub struct CoverageStatistics {
    /// Total number of stored scans
    pub total_scans: u64,

    /// Count of scans by profile
    pub scans_by_profile: HashMap<ScanProfile, u64>,

    /// Count of scans by stop reason
    pub scans_by_reason: HashMap<StopReason, u64>,

    /// Scans cut short by a limit
    pub partial_scans: u64,

    /// Scans that flagged an enterprise-scale site
    pub enterprise_sites: u64,

    /// Mean coverage percentage across scans
    pub average_coverage: f64,

    /// Total pages crawled across scans
    pub total_pages_crawled: u64,
}

impl CoverageStatistics {
    /// Aggregates a set of summaries
    pub fn from_summaries<'a>(summaries: impl IntoIterator<Item = &'a CoverageSummary>) -> Self {
        let mut stats = Self::default();
        let mut coverage_sum = 0u64;

        for summary in summaries {
            stats.total_scans += 1;
            *stats.scans_by_profile.entry(summary.profile).or_insert(0) += 1;
            *stats.scans_by_reason.entry(summary.stop_reason).or_insert(0) += 1;
            if summary.reached_limit {
                stats.partial_scans += 1;
            }
            if summary.enterprise_detection.is_some() {
                stats.enterprise_sites += 1;
            }
            coverage_sum += u64::from(summary.coverage_percent);
            stats.total_pages_crawled += summary.pages_crawled;
        }

        if stats.total_scans > 0 {
            stats.average_coverage = coverage_sum as f64 / stats.total_scans as f64;
        }

        stats
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
/// * `limit` - Maximum number of recent scans to include
///
/// # Returns
///
/// * `Ok((CoverageStatistics, Vec<StoredSummary>))` - Aggregates and the scans they cover
/// * `Err(ScanError)` - Failed to query storage
pub fn load_statistics(
    storage: &dyn Storage,
    limit: u32,
) -> Result<(CoverageStatistics, Vec<StoredSummary>), ScanError> {
    let recent = storage.list_summaries(limit)?;
    let stats = CoverageStatistics::from_summaries(recent.iter().map(|r| &r.summary));
    Ok((stats, recent))
}

/// Prints a single scan summary to stdout
pub fn print_summary(site: &str, summary: &CoverageSummary) {
    println!("=== Scan Coverage ===\n");
    println!("  Site: {}", site);
    println!("  Profile: {}", summary.profile);
    println!("  Stop reason: {}", summary.stop_reason);
    println!("  Pages scanned: {}", summary.scanned_urls);
    println!("  URLs discovered: {}", summary.discovered_urls);
    match summary.estimated_total_urls {
        Some(total) => println!("  Estimated total pages: {}", total),
        None => println!("  Estimated total pages: unknown"),
    }
    println!("  Coverage: {}%", summary.coverage_percent);
    println!("  Duration: {}s", summary.duration_seconds());

    if let Some(banner) = summary.banner() {
        println!("\n⚠ {}", banner);
    }
}

/// Prints aggregate statistics and recent scans to stdout
pub fn print_statistics(stats: &CoverageStatistics, recent: &[StoredSummary]) {
    println!("=== Coverage Statistics ===\n");

    println!("Overview:");
    println!("  Total scans: {}", stats.total_scans);
    println!("  Partial scans: {}", stats.partial_scans);
    println!("  Enterprise-scale sites: {}", stats.enterprise_sites);
    println!("  Pages crawled: {}", stats.total_pages_crawled);
    println!("  Average coverage: {:.1}%", stats.average_coverage);
    println!();

    if !stats.scans_by_profile.is_empty() {
        println!("Scans by Profile:");
        for profile in ScanProfile::all() {
            if let Some(count) = stats.scans_by_profile.get(&profile) {
                println!("  {}: {}", profile, count);
            }
        }
        println!();
    }

    if !stats.scans_by_reason.is_empty() {
        println!("Scans by Stop Reason:");
        let mut reason_counts: Vec<_> = stats.scans_by_reason.iter().collect();
        reason_counts.sort_by(|a, b| b.1.cmp(a.1));
        for (reason, count) in reason_counts {
            println!("  {}: {}", reason, count);
        }
        println!();
    }

    if !recent.is_empty() {
        println!("Recent Scans:");
        for record in recent {
            println!(
                "  #{} {} [{}] {}% ({})",
                record.id,
                record.site,
                record.summary.profile,
                record.summary.coverage_percent,
                record.summary.stop_reason
            );
        }
    }
}
