use serde::{Deserialize, Serialize};
use std::fmt;

/// Discovered-URL count above which a site is enterprise scale
///
/// SMART's `enterprise_detection_threshold` is derived from this value.
pub const DEFAULT_URL_THRESHOLD: u64 = 150;

/// Elapsed minutes after which a still-growing frontier means enterprise scale
pub const DEFAULT_TIME_THRESHOLD_MINUTES: f64 = 5.0;

/// Telemetry for one detection tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionInput {
    /// Total URLs discovered so far
    pub discovered_urls: u64,

    /// Wall-clock minutes since the crawl started
    pub elapsed_minutes: f64,

    /// Whether the frontier grew since the previous tick
    pub frontier_growing: bool,
}

/// Which rule flagged the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionReason {
    UrlThreshold,
    TimeFrontier,
}

impl DetectionReason {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::UrlThreshold => "url_threshold",
            Self::TimeFrontier => "time_frontier",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "url_threshold" => Some(Self::UrlThreshold),
            "time_frontier" => Some(Self::TimeFrontier),
            _ => None,
        }
    }
}

impl fmt::Display for DetectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Outcome of a detection tick
///
/// `reason` is set if and only if `is_enterprise` is true. The fields are
/// private so that invariant can only be established through the constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    is_enterprise: bool,
    reason: Option<DetectionReason>,
}

impl DetectionResult {
    /// A result for a site that is not enterprise scale
    pub fn not_enterprise() -> Self {
        Self {
            is_enterprise: false,
            reason: None,
        }
    }

    /// A result for a site flagged by `reason`
    pub fn enterprise(reason: DetectionReason) -> Self {
        Self {
            is_enterprise: true,
            reason: Some(reason),
        }
    }

    pub fn is_enterprise(&self) -> bool {
        self.is_enterprise
    }

    pub fn reason(&self) -> Option<DetectionReason> {
        self.reason
    }
}

/// Tunable detection thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Rule A fires when discovered URLs exceed this count
    pub url_threshold: u64,

    /// Rule B fires when elapsed minutes exceed this and the frontier is growing
    pub time_threshold_minutes: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            url_threshold: DEFAULT_URL_THRESHOLD,
            time_threshold_minutes: DEFAULT_TIME_THRESHOLD_MINUTES,
        }
    }
}

impl DetectorConfig {
    /// Evaluates both rules against one tick of telemetry
    ///
    /// Rule A (URL threshold) is checked first and wins when both would fire.
    /// Both comparisons are strict.
    pub fn detect(&self, input: &DetectionInput) -> DetectionResult {
        if input.discovered_urls > self.url_threshold {
            return DetectionResult::enterprise(DetectionReason::UrlThreshold);
        }

        if input.elapsed_minutes > self.time_threshold_minutes && input.frontier_growing {
            return DetectionResult::enterprise(DetectionReason::TimeFrontier);
        }

        DetectionResult::not_enterprise()
    }
}

/// Evaluates detection with the default thresholds
///
/// # Examples
///
/// ```
/// use scan_budget::detection::{detect, DetectionInput, DetectionReason};
///
/// let result = detect(&DetectionInput {
///     discovered_urls: 151,
///     elapsed_minutes: 0.0,
///     frontier_growing: false,
/// });
/// assert!(result.is_enterprise());
/// assert_eq!(result.reason(), Some(DetectionReason::UrlThreshold));
/// ```
pub fn detect(input: &DetectionInput) -> DetectionResult {
    DetectorConfig::default().detect(input)
}
