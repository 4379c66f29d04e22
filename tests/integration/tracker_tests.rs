//! End-to-end budget scenarios without any network

use scan_budget::detection::DetectionReason;
use scan_budget::output::summarize;
use scan_budget::profile::{select_profile, ScanProfile, UserTier};
use scan_budget::state::{
    CrawlBudgetTracker, EstimatorKind, ManualClock, ProgressEvent, StopReason, TrackerConfig,
};
use std::time::Duration;

fn event(discovered: i64, delta: i64, frontier: i64) -> ProgressEvent {
    ProgressEvent {
        discovered_urls: discovered,
        crawled_delta: delta,
        frontier_size_now: frontier,
    }
}

#[test]
fn test_free_tier_small_site_scans_completely() {
    let profile = select_profile(UserTier::Free, None, None).unwrap();
    assert_eq!(profile, ScanProfile::Quick);

    let clock = ManualClock::default();
    let mut tracker =
        CrawlBudgetTracker::with_clock(profile, TrackerConfig::default(), clock.clone());

    for i in 1..=49 {
        assert!(!tracker.is_stopped(), "stopped early at tick {}", i);
        clock.advance(Duration::from_secs(1));
        tracker.on_progress(event(i, 1, 49 - i)).unwrap();
    }

    let state = tracker.into_state();
    assert_eq!(state.stop_reason(), Some(StopReason::Complete));
    assert_eq!(state.urls_crawled, 49);

    let summary = summarize(&state).unwrap();
    assert_eq!(summary.coverage_percent, 100);
    assert!(!summary.reached_limit);
    assert!(summary.banner().is_none());
}

#[test]
fn test_pro_tier_large_sitemap_hits_enterprise_detection() {
    let profile = select_profile(UserTier::Pro, Some(600), None).unwrap();
    assert_eq!(profile, ScanProfile::Smart);

    let config = TrackerConfig::default().with_sitemap_url_count(Some(600));
    let mut tracker = CrawlBudgetTracker::with_clock(profile, config, ManualClock::default());

    let mut discovered = 1;
    while !tracker.is_stopped() {
        discovered += 12;
        tracker.on_progress(event(discovered, 1, discovered - 1)).unwrap();
    }

    let state = tracker.into_state();
    assert_eq!(state.stop_reason(), Some(StopReason::EnterpriseDetected));
    assert_eq!(state.estimated_total_urls, Some(600));

    let detection = state.enterprise_detection.unwrap();
    assert_eq!(detection.result.reason(), Some(DetectionReason::UrlThreshold));
    assert_eq!(detection.estimated_pages, Some(600));
    assert!(detection.detected_at_urls > 150);

    let summary = summarize(&state).unwrap();
    assert!(summary.reached_limit);
    assert_eq!(summary.coverage_percent, 2);
    assert!(summary.banner().unwrap().contains("enterprise-scale"));
}

#[test]
fn test_slow_growing_site_detected_by_time_rule() {
    let clock = ManualClock::default();
    let mut tracker =
        CrawlBudgetTracker::with_clock(ScanProfile::Smart, TrackerConfig::default(), clock.clone());

    // 40 seconds per page, frontier keeps growing slowly
    let mut ticks = 0;
    while !tracker.is_stopped() {
        ticks += 1;
        clock.advance(Duration::from_secs(40));
        tracker.on_progress(event(ticks * 2 + 1, 1, ticks + 1)).unwrap();
    }

    let state = tracker.state();
    assert_eq!(state.stop_reason(), Some(StopReason::EnterpriseDetected));
    assert_eq!(
        state.enterprise_detection.unwrap().result.reason(),
        Some(DetectionReason::TimeFrontier)
    );
    // 5 minutes is crossed strictly after the 8th tick (320s)
    assert_eq!(ticks, 8);
}

#[test]
fn test_linear_estimator_extrapolates_on_time_limit() {
    let clock = ManualClock::default();
    let config = TrackerConfig::default()
        .with_enterprise_detection(false)
        .with_estimator(EstimatorKind::Linear.build());
    let mut tracker = CrawlBudgetTracker::with_clock(ScanProfile::Smart, config, clock.clone());

    for i in 1..=10 {
        clock.advance(Duration::from_secs(60));
        tracker.on_progress(event(i * 10, 1, i * 9)).unwrap();
    }

    let state = tracker.into_state();
    assert_eq!(state.stop_reason(), Some(StopReason::TimeLimit));
    // Time budget fully spent: no remaining time to extrapolate into
    assert_eq!(state.estimated_total_urls, Some(100));

    let summary = summarize(&state).unwrap();
    assert_eq!(summary.coverage_percent, 10);
    assert!(summary.banner().unwrap().contains("10-minute limit"));
}

#[test]
fn test_counters_never_decrease() {
    let mut tracker = CrawlBudgetTracker::with_clock(
        ScanProfile::Deep,
        TrackerConfig::default(),
        ManualClock::default(),
    );

    let events = [event(10, 1, 9), event(4, 0, 8), event(12, 2, 9), event(12, 0, 7)];
    let mut last = (0, 0);
    for e in events {
        let state = tracker.on_progress(e).unwrap();
        assert!(state.urls_crawled >= last.0);
        assert!(state.urls_discovered >= last.1);
        last = (state.urls_crawled, state.urls_discovered);
    }
    assert_eq!(last, (3, 12));
}
