use crate::config::types::{
    Config, CrawlerConfig, DetectionConfig, OutputConfig, ScanConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scan_config(&config.scan)?;
    validate_detection_config(&config.detection)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the scanned site
///
/// A DEEP override on a lower tier is accepted here; profile selection
/// reports it as a tier error.
fn validate_scan_config(config: &ScanConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.site)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site '{}': {}", config.site, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Site '{}' must use http or https",
            config.site
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Site '{}' has no host",
            config.site
        )));
    }

    Ok(())
}

/// Validates enterprise detection thresholds
fn validate_detection_config(config: &DetectionConfig) -> Result<(), ConfigError> {
    if config.url_threshold == 0 {
        return Err(ConfigError::Validation(
            "url_threshold must be > 0".to_string(),
        ));
    }

    if !config.time_threshold_minutes.is_finite() || config.time_threshold_minutes <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "time_threshold_minutes must be a positive number, got {}",
            config.time_threshold_minutes
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.minimum_time_on_page < 10 {
        return Err(ConfigError::Validation(format!(
            "minimum_time_on_page must be >= 10ms, got {}ms",
            config.minimum_time_on_page
        )));
    }

    if config.request_timeout < 1 || config.request_timeout > 300 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be between 1 and 300 seconds, got {}",
            config.request_timeout
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        ))),
    }
}
