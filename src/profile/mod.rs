//! Scan profiles and profile selection
//!
//! This module provides:
//! - The closed set of profiles (QUICK, SMART, DEEP) and user tiers
//! - The static budget attached to each profile
//! - Tier-gated profile selection

mod catalog;
mod selector;
mod types;

pub use catalog::{budget_for, ProfileBudget, QUICK_PRIORITY_ORDER, SAMPLING_PRIORITY_ORDER};
pub use selector::{can_use_profile, select_profile, QUICK_SITEMAP_CEILING};
pub use types::{CrawlStrategy, PagePriority, ScanProfile, UserTier};
