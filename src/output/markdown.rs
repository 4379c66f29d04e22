//! Markdown coverage report generation
//!
//! This module generates a human-readable markdown report for one scan,
//! including the budget used, coverage figures and enterprise detection.

use crate::output::coverage::CoverageSummary;
use crate::output::OutputResult;
use crate::profile::budget_for;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown coverage report to disk
///
/// # Arguments
///
/// * `site` - The scanned site
/// * `summary` - The coverage summary
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn write_markdown_report(
    site: &str,
    summary: &CoverageSummary,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_report(site, summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a coverage summary as markdown
pub fn format_markdown_report(site: &str, summary: &CoverageSummary) -> String {
    let mut md = String::new();
    let budget = budget_for(summary.profile);

    md.push_str("# Scan Coverage Report\n\n");

    if let Some(banner) = summary.banner() {
        md.push_str(&format!("> **Partial scan:** {}\n\n", banner));
    }

    // Run metadata
    md.push_str("## Scan Information\n\n");
    md.push_str(&format!("- **Site**: {}\n", site));
    md.push_str(&format!("- **Profile**: {}\n", summary.profile));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.ended_at.to_rfc3339()));
    let duration = summary.duration_seconds();
    md.push_str(&format!(
        "- **Duration**: {} seconds ({:.2} minutes)\n",
        duration,
        duration as f64 / 60.0
    ));
    md.push_str(&format!("- **Stop Reason**: {}\n\n", summary.stop_reason));

    // Coverage
    md.push_str("## Coverage\n\n");
    md.push_str(&format!("- **Pages Scanned**: {}\n", summary.scanned_urls));
    md.push_str(&format!("- **URLs Discovered**: {}\n", summary.discovered_urls));
    match summary.estimated_total_urls {
        Some(total) => md.push_str(&format!("- **Estimated Total Pages**: {}\n", total)),
        None => md.push_str("- **Estimated Total Pages**: unknown\n"),
    }
    md.push_str(&format!("- **Coverage**: {}%\n", summary.coverage_percent));
    md.push_str(&format!(
        "- **Reached Limit**: {}\n\n",
        if summary.reached_limit { "yes" } else { "no" }
    ));

    // Budget
    md.push_str("## Budget\n\n");
    md.push_str("| Setting | Value |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Max URLs | {} |\n", budget.max_urls));
    md.push_str(&format!(
        "| Max Duration | {} minutes |\n",
        budget.max_duration.as_secs() / 60
    ));
    md.push_str(&format!("| Strategy | {} |\n", budget.strategy));
    md.push_str(&format!(
        "| Sitemap First | {} |\n",
        if budget.sitemap_first { "yes" } else { "no" }
    ));
    let order = budget
        .priority_order
        .iter()
        .map(|p| p.to_db_string())
        .collect::<Vec<_>>()
        .join(" > ");
    md.push_str(&format!("| Priority Order | {} |\n\n", order));

    if let Some(detection) = &summary.enterprise_detection {
        md.push_str("## Enterprise Detection\n\n");
        if let Some(reason) = detection.result.reason() {
            md.push_str(&format!("- **Trigger**: {}\n", reason));
        }
        md.push_str(&format!(
            "- **Detected At**: {} discovered URLs after {} seconds\n",
            detection.detected_at_urls,
            detection.detected_after.as_secs()
        ));
        match detection.estimated_pages {
            Some(pages) => md.push_str(&format!("- **Estimated Pages**: {}\n", pages)),
            None => md.push_str("- **Estimated Pages**: unknown\n"),
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{DetectionReason, DetectionResult};
    use crate::profile::ScanProfile;
    use crate::state::{EnterpriseDetection, StopReason};
    use chrono::Utc;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn summary(reason: StopReason) -> CoverageSummary {
        let started = Utc::now();
        CoverageSummary {
            profile: ScanProfile::Smart,
            scanned_urls: 40,
            estimated_total_urls: Some(400),
            coverage_percent: 10,
            reached_limit: reason.is_limit(),
            stop_reason: reason,
            enterprise_detection: None,
            started_at: started,
            ended_at: started + chrono::Duration::seconds(120),
            pages_crawled: 40,
            discovered_urls: 400,
        }
    }

    #[test]
    fn test_full_scan_has_no_banner() {
        let md = format_markdown_report("https://example.com/", &summary(StopReason::Complete));
        assert!(md.starts_with("# Scan Coverage Report"));
        assert!(!md.contains("Partial scan"));
        assert!(md.contains("- **Profile**: SMART"));
        assert!(md.contains("- **Coverage**: 10%"));
        assert!(md.contains("homepage > product > navigation > content > utility"));
    }

    #[test]
    fn test_partial_scan_has_banner() {
        let md = format_markdown_report("https://example.com/", &summary(StopReason::UrlLimit));
        assert!(md.contains("> **Partial scan:**"));
        assert!(md.contains("- **Reached Limit**: yes"));
    }

    #[test]
    fn test_enterprise_section() {
        let mut s = summary(StopReason::EnterpriseDetected);
        s.enterprise_detection = Some(EnterpriseDetection {
            result: DetectionResult::enterprise(DetectionReason::TimeFrontier),
            estimated_pages: None,
            detected_at_urls: 90,
            detected_after: Duration::from_secs(360),
        });

        let md = format_markdown_report("https://example.com/", &s);
        assert!(md.contains("## Enterprise Detection"));
        assert!(md.contains("- **Trigger**: time_frontier"));
        assert!(md.contains("90 discovered URLs after 360 seconds"));
        assert!(md.contains("- **Estimated Pages**: unknown"));
    }

    #[test]
    fn test_write_markdown_report() {
        let file = NamedTempFile::new().unwrap();
        write_markdown_report("https://example.com/", &summary(StopReason::Complete), file.path())
            .unwrap();
        let written = std::fs::read_to_string(file.path()).unwrap();
        assert!(written.contains("https://example.com/"));
    }
}
