use crate::detection::{DetectorConfig, DEFAULT_TIME_THRESHOLD_MINUTES, DEFAULT_URL_THRESHOLD};
use crate::profile::{ScanProfile, UserTier};
use crate::state::{EstimatorKind, TrackerConfig};
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Scan-Budget
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scan: ScanConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Builds the tracker configuration for a scan
    ///
    /// # Arguments
    ///
    /// * `sitemap_url_count` - Sitemap size resolved before the scan, if any
    pub fn tracker_config(&self, sitemap_url_count: Option<u64>) -> TrackerConfig {
        TrackerConfig::default()
            .with_detector(self.detection.detector_config())
            .with_enterprise_detection(self.detection.enabled)
            .with_sitemap_url_count(sitemap_url_count)
            .with_estimator(self.detection.estimator.build())
    }
}

/// The site being scanned and who is scanning it
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Root URL of the site
    pub site: String,

    /// Subscription tier of the requesting user
    pub tier: UserTier,

    /// Explicit profile override
    #[serde(default)]
    pub profile: Option<ScanProfile>,

    /// Known sitemap size; when set the sitemap is not fetched
    #[serde(rename = "sitemap-url-count", default)]
    pub sitemap_url_count: Option<u64>,

    /// Whether to fetch `sitemap.xml` to size the site before choosing a profile
    #[serde(rename = "fetch-sitemap", default = "default_true")]
    pub fetch_sitemap: bool,
}

/// Enterprise detection settings
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(rename = "url-threshold", default = "default_url_threshold")]
    pub url_threshold: u64,

    #[serde(
        rename = "time-threshold-minutes",
        default = "default_time_threshold_minutes"
    )]
    pub time_threshold_minutes: f64,

    #[serde(default)]
    pub estimator: EstimatorKind,
}

impl DetectionConfig {
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            url_threshold: self.url_threshold,
            time_threshold_minutes: self.time_threshold_minutes,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url_threshold: DEFAULT_URL_THRESHOLD,
            time_threshold_minutes: DEFAULT_TIME_THRESHOLD_MINUTES,
            estimator: EstimatorKind::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Minimum time between requests (milliseconds)
    #[serde(rename = "minimum-time-on-page", default = "default_minimum_time_on_page")]
    pub minimum_time_on_page: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.minimum_time_on_page)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            minimum_time_on_page: default_minimum_time_on_page(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown coverage report
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}

fn default_true() -> bool {
    true
}

fn default_url_threshold() -> u64 {
    DEFAULT_URL_THRESHOLD
}

fn default_time_threshold_minutes() -> f64 {
    DEFAULT_TIME_THRESHOLD_MINUTES
}

fn default_minimum_time_on_page() -> u64 {
    250
}

fn default_request_timeout() -> u64 {
    30
}
