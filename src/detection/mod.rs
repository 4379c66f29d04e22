//! Enterprise-scale site detection
//!
//! A site is treated as enterprise scale when either:
//! - more than `url_threshold` URLs have been discovered, or
//! - the crawl has run longer than `time_threshold_minutes` and the frontier
//!   is still growing
//!
//! Detection is a pure function of per-tick telemetry. The crawl budget
//! tracker computes the telemetry and calls it once per tick.

mod detector;

pub use detector::{
    detect, DetectionInput, DetectionReason, DetectionResult, DetectorConfig,
    DEFAULT_TIME_THRESHOLD_MINUTES, DEFAULT_URL_THRESHOLD,
};
