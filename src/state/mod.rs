//! State module for tracking crawl budgets
//!
//! This module provides budget enforcement for a single scan.
//!
//! # Components
//!
//! - `CrawlBudgetTracker`: consumes progress ticks and decides when to stop
//! - `StopReason` / `TrackerStatus`: the tracker's terminal states
//! - `TotalEstimator`: pluggable site-size estimation used on stop
//! - `Clock`: injectable time source

mod clock;
mod estimate;
mod stop_reason;
mod tracker;

// Re-export main types
pub use clock::{elapsed_between, Clock, ManualClock, SystemClock};
pub use estimate::{
    EstimateInput, EstimatorKind, LinearExtrapolation, SitemapOrDiscovered, TotalEstimator,
};
pub use stop_reason::{StopReason, TrackerStatus};
pub use tracker::{
    CrawlBudgetState, CrawlBudgetTracker, EnterpriseDetection, ProgressEvent, TrackerConfig,
};
