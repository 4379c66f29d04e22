//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Scan-Budget database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per finished scan
CREATE TABLE IF NOT EXISTS coverage_summaries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    site TEXT NOT NULL,
    config_hash TEXT NOT NULL,
    recorded_at TEXT NOT NULL,
    profile TEXT NOT NULL,
    scanned_urls INTEGER NOT NULL,
    estimated_total_urls INTEGER,
    coverage_percent INTEGER NOT NULL,
    reached_limit INTEGER NOT NULL,
    stop_reason TEXT NOT NULL,
    started_at TEXT NOT NULL,
    ended_at TEXT NOT NULL,
    pages_crawled INTEGER NOT NULL,
    discovered_urls INTEGER NOT NULL,
    enterprise_reason TEXT,
    enterprise_estimated_pages INTEGER,
    enterprise_detected_at_urls INTEGER,
    enterprise_detected_after_ms INTEGER
);

CREATE INDEX IF NOT EXISTS idx_coverage_site ON coverage_summaries(site);
CREATE INDEX IF NOT EXISTS idx_coverage_stop_reason ON coverage_summaries(stop_reason);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        let result = initialize_schema(&conn);
        assert!(result.is_ok());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        // Initialize twice
        initialize_schema(&conn).unwrap();
        let result = initialize_schema(&conn);

        assert!(result.is_ok());
    }

    #[test]
    fn test_table_exists_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='coverage_summaries'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
