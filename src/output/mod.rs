//! Output module for coverage summaries and reports
//!
//! This module handles:
//! - Building the coverage summary from a stopped tracker
//! - Generating markdown coverage reports
//! - Aggregating and printing coverage statistics

mod coverage;
mod markdown;
pub mod stats;

pub use coverage::{coverage_percent, summarize, CoverageSummary};
pub use markdown::{format_markdown_report, write_markdown_report};
pub use stats::{load_statistics, print_statistics, print_summary, CoverageStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
