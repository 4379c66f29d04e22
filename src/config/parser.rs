use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use scan_budget::config::load_config;
///
/// let config = load_config(Path::new("scan.toml")).unwrap();
/// println!("Scanning {}", config.scan.site);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Stored alongside each coverage summary so results can be matched to the
/// settings that produced them.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok((Config, String))` - Successfully loaded configuration and its hash
/// * `Err(ConfigError)` - Failed to load or parse the configuration
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ScanProfile, UserTier};
    use crate::state::EstimatorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[scan]
site = "https://example.com/"
tier = "pro"

[user-agent]
crawler-name = "TestScanner"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
database-path = "./test.db"
summary-path = "./coverage.md"
"#;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_minimal_config_uses_defaults() {
        let file = create_temp_config(MINIMAL);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.scan.tier, UserTier::Pro);
        assert_eq!(config.scan.profile, None);
        assert!(config.scan.fetch_sitemap);
        assert!(config.detection.enabled);
        assert_eq!(config.detection.url_threshold, 150);
        assert_eq!(config.detection.time_threshold_minutes, 5.0);
        assert_eq!(config.detection.estimator, EstimatorKind::Sitemap);
        assert_eq!(config.crawler.minimum_time_on_page, 250);
        assert_eq!(config.crawler.request_timeout, 30);
        assert_eq!(config.user_agent.crawler_name, "TestScanner");
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
[scan]
site = "https://shop.example.com/"
tier = "enterprise"
profile = "DEEP"
sitemap-url-count = 420
fetch-sitemap = false

[detection]
enabled = false
url-threshold = 300
time-threshold-minutes = 2.5
estimator = "linear"

[crawler]
minimum-time-on-page = 50
request-timeout = 10

[user-agent]
crawler-name = "TestScanner"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
database-path = "./test.db"
summary-path = "./coverage.md"
"#;
        let config = parse_config(content).unwrap();

        assert_eq!(config.scan.profile, Some(ScanProfile::Deep));
        assert_eq!(config.scan.sitemap_url_count, Some(420));
        assert!(!config.scan.fetch_sitemap);
        assert!(!config.detection.enabled);
        assert_eq!(config.detection.url_threshold, 300);
        assert_eq!(config.detection.estimator, EstimatorKind::Linear);
        assert_eq!(config.crawler.minimum_time_on_page, 50);

        let tracker = config.tracker_config(Some(420));
        assert!(!tracker.enterprise_detection);
        assert_eq!(tracker.detector.url_threshold, 300);
        assert_eq!(tracker.sitemap_url_count, Some(420));
    }

    #[test]
    fn test_deep_override_accepted_at_load_time() {
        let content = MINIMAL.replace("tier = \"pro\"", "tier = \"free\"\nprofile = \"DEEP\"");
        let config = parse_config(&content).unwrap();
        assert_eq!(config.scan.profile, Some(ScanProfile::Deep));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_tier_rejected() {
        let content = MINIMAL.replace("tier = \"pro\"", "tier = \"platinum\"");
        assert!(matches!(parse_config(&content), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let content = MINIMAL.replace("https://example.com/\"\ntier", "ftp://example.com/\"\ntier");
        let result = parse_config(&content);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
