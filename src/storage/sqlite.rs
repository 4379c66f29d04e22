//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::detection::{DetectionReason, DetectionResult};
use crate::output::CoverageSummary;
use crate::profile::ScanProfile;
use crate::state::{EnterpriseDetection, StopReason};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::StoredSummary;
use crate::ScanError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::Duration;

const SELECT_SUMMARY: &str = "SELECT id, site, config_hash, recorded_at, profile, scanned_urls,
     estimated_total_urls, coverage_percent, reached_limit, stop_reason, started_at, ended_at,
     pages_crawled, discovered_urls, enterprise_reason, enterprise_estimated_pages,
     enterprise_detected_at_urls, enterprise_detected_after_ms
     FROM coverage_summaries";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(ScanError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, ScanError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, ScanError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Raw column values of one summary row
struct SummaryRow {
    id: i64,
    site: String,
    config_hash: String,
    recorded_at: String,
    profile: String,
    scanned_urls: i64,
    estimated_total_urls: Option<i64>,
    coverage_percent: i64,
    reached_limit: bool,
    stop_reason: String,
    started_at: String,
    ended_at: String,
    pages_crawled: i64,
    discovered_urls: i64,
    enterprise_reason: Option<String>,
    enterprise_estimated_pages: Option<i64>,
    enterprise_detected_at_urls: Option<i64>,
    enterprise_detected_after_ms: Option<i64>,
}

impl SummaryRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            site: row.get(1)?,
            config_hash: row.get(2)?,
            recorded_at: row.get(3)?,
            profile: row.get(4)?,
            scanned_urls: row.get(5)?,
            estimated_total_urls: row.get(6)?,
            coverage_percent: row.get(7)?,
            reached_limit: row.get(8)?,
            stop_reason: row.get(9)?,
            started_at: row.get(10)?,
            ended_at: row.get(11)?,
            pages_crawled: row.get(12)?,
            discovered_urls: row.get(13)?,
            enterprise_reason: row.get(14)?,
            enterprise_estimated_pages: row.get(15)?,
            enterprise_detected_at_urls: row.get(16)?,
            enterprise_detected_after_ms: row.get(17)?,
        })
    }

    fn into_stored(self) -> StorageResult<StoredSummary> {
        let id = self.id;
        let corrupt = move |message: String| StorageError::CorruptRecord { id, message };
        let count = move |column: &str, value: i64| {
            u64::try_from(value).map_err(|_| corrupt(format!("negative {}: {}", column, value)))
        };

        let profile = ScanProfile::from_db_string(&self.profile)
            .ok_or_else(|| corrupt(format!("unknown profile '{}'", self.profile)))?;
        let stop_reason = StopReason::from_db_string(&self.stop_reason)
            .ok_or_else(|| corrupt(format!("unknown stop reason '{}'", self.stop_reason)))?;
        let coverage_percent = u8::try_from(self.coverage_percent)
            .ok()
            .filter(|p| *p <= 100)
            .ok_or_else(|| corrupt(format!("coverage out of range: {}", self.coverage_percent)))?;

        let enterprise_detection = match self.enterprise_reason {
            Some(reason) => {
                let reason = DetectionReason::from_db_string(&reason)
                    .ok_or_else(|| corrupt(format!("unknown detection reason '{}'", reason)))?;
                Some(EnterpriseDetection {
                    result: DetectionResult::enterprise(reason),
                    estimated_pages: self
                        .enterprise_estimated_pages
                        .map(|v| count("enterprise_estimated_pages", v))
                        .transpose()?,
                    detected_at_urls: count(
                        "enterprise_detected_at_urls",
                        self.enterprise_detected_at_urls.unwrap_or(0),
                    )?,
                    detected_after: Duration::from_millis(count(
                        "enterprise_detected_after_ms",
                        self.enterprise_detected_after_ms.unwrap_or(0),
                    )?),
                })
            }
            None => None,
        };

        let summary = CoverageSummary {
            profile,
            scanned_urls: count("scanned_urls", self.scanned_urls)?,
            estimated_total_urls: self
                .estimated_total_urls
                .map(|v| count("estimated_total_urls", v))
                .transpose()?,
            coverage_percent,
            reached_limit: self.reached_limit,
            stop_reason,
            enterprise_detection,
            started_at: parse_timestamp(&self.started_at).map_err(corrupt)?,
            ended_at: parse_timestamp(&self.ended_at).map_err(corrupt)?,
            pages_crawled: count("pages_crawled", self.pages_crawled)?,
            discovered_urls: count("discovered_urls", self.discovered_urls)?,
        };

        Ok(StoredSummary {
            id,
            site: self.site,
            config_hash: self.config_hash,
            recorded_at: self.recorded_at,
            summary,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("bad timestamp '{}': {}", value, e))
}

fn to_sql_int(column: &str, value: u64) -> StorageResult<i64> {
    i64::try_from(value).map_err(|_| StorageError::OutOfRange(format!("{} = {}", column, value)))
}

impl Storage for SqliteStorage {
    fn save_summary(
        &mut self,
        site: &str,
        summary: &CoverageSummary,
        config_hash: &str,
    ) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        let detection = summary.enterprise_detection.as_ref();

        let estimated_total = summary
            .estimated_total_urls
            .map(|v| to_sql_int("estimated_total_urls", v))
            .transpose()?;
        let enterprise_pages = detection
            .and_then(|d| d.estimated_pages)
            .map(|v| to_sql_int("enterprise_estimated_pages", v))
            .transpose()?;
        let enterprise_urls = detection
            .map(|d| to_sql_int("enterprise_detected_at_urls", d.detected_at_urls))
            .transpose()?;
        let enterprise_after_ms = detection
            .map(|d| {
                let millis = u64::try_from(d.detected_after.as_millis()).unwrap_or(u64::MAX);
                to_sql_int("enterprise_detected_after_ms", millis)
            })
            .transpose()?;

        self.conn.execute(
            "INSERT INTO coverage_summaries (
                site, config_hash, recorded_at, profile, scanned_urls, estimated_total_urls,
                coverage_percent, reached_limit, stop_reason, started_at, ended_at,
                pages_crawled, discovered_urls, enterprise_reason, enterprise_estimated_pages,
                enterprise_detected_at_urls, enterprise_detected_after_ms
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            params![
                site,
                config_hash,
                now,
                summary.profile.to_db_string(),
                to_sql_int("scanned_urls", summary.scanned_urls)?,
                estimated_total,
                i64::from(summary.coverage_percent),
                summary.reached_limit,
                summary.stop_reason.to_db_string(),
                summary.started_at.to_rfc3339(),
                summary.ended_at.to_rfc3339(),
                to_sql_int("pages_crawled", summary.pages_crawled)?,
                to_sql_int("discovered_urls", summary.discovered_urls)?,
                detection
                    .and_then(|d| d.result.reason())
                    .map(|r| r.to_db_string()),
                enterprise_pages,
                enterprise_urls,
                enterprise_after_ms,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        tracing::debug!("Stored coverage summary {} for {}", id, site);
        Ok(id)
    }

    fn get_summary(&self, id: i64) -> StorageResult<StoredSummary> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE id = ?1", SELECT_SUMMARY))?;

        let row = stmt
            .query_row(params![id], SummaryRow::from_row)
            .optional()?
            .ok_or(StorageError::SummaryNotFound(id))?;

        row.into_stored()
    }

    fn latest_summary_for(&self, site: &str) -> StorageResult<Option<StoredSummary>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE site = ?1 ORDER BY id DESC LIMIT 1",
            SELECT_SUMMARY
        ))?;

        stmt.query_row(params![site], SummaryRow::from_row)
            .optional()?
            .map(SummaryRow::into_stored)
            .transpose()
    }

    fn list_summaries(&self, limit: u32) -> StorageResult<Vec<StoredSummary>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY id DESC LIMIT ?1", SELECT_SUMMARY))?;

        let rows = stmt
            .query_map(params![limit], SummaryRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(SummaryRow::into_stored).collect()
    }

    fn count_summaries(&self) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM coverage_summaries", [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }
}
