//! Integration tests for Scan-Budget
//!
//! - `tracker_tests`: profile selection through coverage, driven tick by tick
//! - `fetch_tests`: page fetch outcomes against a mock HTTP server
//! - `sitemap_tests`: sitemap counting against a mock HTTP server
//! - `scan_tests`: full scans against a mock HTTP server, persisted to SQLite

mod fetch_tests;
mod scan_tests;
mod sitemap_tests;
mod tracker_tests;
