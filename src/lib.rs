//! Scan-Budget: crawl budgeting and enterprise-site detection
//!
//! This crate decides how aggressively to crawl a site for an accessibility
//! scan (QUICK / SMART / DEEP), tracks crawl progress against the selected
//! profile's budget, detects mid-crawl that a site is enterprise scale, and
//! reports how much of the site was actually covered.

pub mod config;
pub mod crawler;
pub mod detection;
pub mod output;
pub mod profile;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Scan-Budget operations
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("Coverage error: {0}")]
    Coverage(#[from] CoverageError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Profile selection errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// The requested profile is gated behind a higher tier
    #[error("{profile} profile requires {required} tier (user is on {actual})")]
    TierRequired {
        profile: profile::ScanProfile,
        required: profile::UserTier,
        actual: profile::UserTier,
    },
}

/// Errors raised by the crawl budget tracker
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// A progress event carried negative or inconsistent counts
    #[error("Invalid progress event: {0}")]
    Validation(String),
}

/// Errors raised while building a coverage summary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoverageError {
    /// The tracker has not reached a terminal state yet
    #[error("Cannot summarize a crawl that is still running")]
    IncompleteState,
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Scan-Budget operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use detection::{detect, DetectionInput, DetectionReason, DetectionResult, DetectorConfig};
pub use output::{summarize, CoverageSummary};
pub use profile::{budget_for, can_use_profile, select_profile, ProfileBudget, ScanProfile, UserTier};
pub use state::{CrawlBudgetState, CrawlBudgetTracker, ProgressEvent, StopReason, TrackerConfig};
