/// Profile, tier and page-priority definitions
///
/// These are the closed vocabularies the budgeting engine works with. Each
/// carries a stable string form used in configuration files and the database.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named crawl budget/strategy preset, selected once per scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanProfile {
    /// Small sites: crawl everything within a tight budget
    Quick,

    /// Mid-size sites: sample by page priority, watch for enterprise scale
    Smart,

    /// Full-depth crawl, enterprise tier only
    Deep,
}

impl ScanProfile {
    /// Converts the profile to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Quick => "QUICK",
            Self::Smart => "SMART",
            Self::Deep => "DEEP",
        }
    }

    /// Parses a profile from its database string representation
    ///
    /// Matching is case-insensitive. Returns None for unknown names.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QUICK" => Some(Self::Quick),
            "SMART" => Some(Self::Smart),
            "DEEP" => Some(Self::Deep),
            _ => None,
        }
    }

    /// Returns all profiles, cheapest first
    pub fn all() -> [Self; 3] {
        [Self::Quick, Self::Smart, Self::Deep]
    }
}

impl fmt::Display for ScanProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

impl FromStr for ScanProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_string(s).ok_or_else(|| {
            format!("unknown scan profile '{}', expected QUICK, SMART or DEEP", s)
        })
    }
}

/// Subscription level of the user requesting the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserTier {
    Free,
    Pro,
    Enterprise,
}

impl UserTier {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Some(Self::Free),
            "pro" => Some(Self::Pro),
            "enterprise" => Some(Self::Enterprise),
            _ => None,
        }
    }
}

impl fmt::Display for UserTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

impl FromStr for UserTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_string(s)
            .ok_or_else(|| format!("unknown tier '{}', expected free, pro or enterprise", s))
    }
}

/// How the crawl engine should spend its budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrawlStrategy {
    /// Try to visit every page
    Complete,

    /// Visit pages in priority order and accept partial coverage
    PrioritySampling,

    /// Exhaustive crawl with checkpoints
    Comprehensive,
}

impl CrawlStrategy {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::PrioritySampling => "priority-sampling",
            Self::Comprehensive => "comprehensive",
        }
    }
}

impl fmt::Display for CrawlStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Category of a page, used to order the crawl frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagePriority {
    Homepage,
    Product,
    Navigation,
    Content,
    Utility,
}

impl PagePriority {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Homepage => "homepage",
            Self::Product => "product",
            Self::Navigation => "navigation",
            Self::Content => "content",
            Self::Utility => "utility",
        }
    }
}

impl fmt::Display for PagePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
