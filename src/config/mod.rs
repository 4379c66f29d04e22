//! Configuration module for Scan-Budget
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use scan_budget::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scan.toml")).unwrap();
//! println!("Scanning {} on the {} tier", config.scan.site, config.scan.tier);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, DetectionConfig, OutputConfig, ScanConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
