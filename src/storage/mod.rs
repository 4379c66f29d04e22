//! Storage module for persisting coverage summaries
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Writing finished coverage summaries
//! - Querying past scans for reports and statistics

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::output::CoverageSummary;
use crate::ScanError;

use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(ScanError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, ScanError> {
    SqliteStorage::new(path)
}

/// A coverage summary as stored in the database
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSummary {
    pub id: i64,
    pub site: String,
    pub config_hash: String,
    pub recorded_at: String,
    pub summary: CoverageSummary,
}
