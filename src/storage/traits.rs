//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::output::CoverageSummary;
use crate::storage::StoredSummary;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Summary not found: {0}")]
    SummaryNotFound(i64),

    #[error("Corrupt record {id}: {message}")]
    CorruptRecord { id: i64, message: String },

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Summaries are immutable once written: there is no update operation.
pub trait Storage {
    /// Persists a coverage summary
    ///
    /// # Arguments
    ///
    /// * `site` - The scanned site
    /// * `summary` - The coverage summary
    /// * `config_hash` - Hash of the configuration the scan ran with
    ///
    /// # Returns
    ///
    /// The ID of the stored record
    fn save_summary(
        &mut self,
        site: &str,
        summary: &CoverageSummary,
        config_hash: &str,
    ) -> StorageResult<i64>;

    /// Gets a stored summary by ID
    fn get_summary(&self, id: i64) -> StorageResult<StoredSummary>;

    /// Gets the most recent summary for a site
    fn latest_summary_for(&self, site: &str) -> StorageResult<Option<StoredSummary>>;

    /// Lists the most recent summaries, newest first
    fn list_summaries(&self, limit: u32) -> StorageResult<Vec<StoredSummary>>;

    /// Counts stored summaries
    fn count_summaries(&self) -> StorageResult<u64>;
}
