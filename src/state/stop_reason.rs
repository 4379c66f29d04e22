/// Stop reasons and tracker status
///
/// A crawl is either running or stopped for exactly one reason. Reasons are
/// listed in the order the tracker evaluates them.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The site was flagged as enterprise scale and coverage was capped
    EnterpriseDetected,

    /// The profile's URL ceiling was reached
    UrlLimit,

    /// The profile's duration ceiling was reached
    TimeLimit,

    /// The frontier emptied naturally
    Complete,

    /// An external caller stopped the crawl for other resource reasons
    Budget,
}

impl StopReason {
    /// Returns true if the crawl ended because a limit cut it short
    ///
    /// Partial scans (URL limit, time limit, enterprise detection) are
    /// surfaced to the user; `Complete` and `Budget` are not.
    pub fn is_limit(&self) -> bool {
        matches!(
            self,
            Self::UrlLimit | Self::TimeLimit | Self::EnterpriseDetected
        )
    }

    /// Converts the stop reason to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::EnterpriseDetected => "enterprise_detected",
            Self::UrlLimit => "url_limit",
            Self::TimeLimit => "time_limit",
            Self::Complete => "complete",
            Self::Budget => "budget",
        }
    }

    /// Parses a stop reason from a database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "enterprise_detected" => Some(Self::EnterpriseDetected),
            "url_limit" => Some(Self::UrlLimit),
            "time_limit" => Some(Self::TimeLimit),
            "complete" => Some(Self::Complete),
            "budget" => Some(Self::Budget),
            _ => None,
        }
    }

    /// Returns all stop reasons in evaluation order
    pub fn all_reasons() -> Vec<Self> {
        vec![
            Self::EnterpriseDetected,
            Self::UrlLimit,
            Self::TimeLimit,
            Self::Complete,
            Self::Budget,
        ]
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Lifecycle of a crawl budget tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackerStatus {
    Running,
    Stopped(StopReason),
}

impl TrackerStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped(_))
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        match self {
            Self::Running => None,
            Self::Stopped(reason) => Some(*reason),
        }
    }
}
