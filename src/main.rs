//! Scan-Budget main entry point
//!
//! This is the command-line interface for budgeted accessibility-scan crawls.

use anyhow::{bail, Context};
use clap::Parser;
use scan_budget::config::{load_config_with_hash, Config};
use scan_budget::crawler::{build_http_client, fetch_sitemap_urls, HttpPageSource, ScanCoordinator};
use scan_budget::output::{
    load_statistics, print_statistics, print_summary, summarize, write_markdown_report,
};
use scan_budget::profile::{budget_for, select_profile, ScanProfile};
use scan_budget::state::StopReason;
use scan_budget::storage::{open_storage, Storage};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Recent scans shown by --stats
const STATS_LIMIT: u32 = 20;

/// Scan-Budget: budgeted site crawls with enterprise-site detection
///
/// Picks a scan profile for the site, crawls it within that profile's page
/// and time budget, and reports how much of the site was covered.
#[derive(Parser, Debug)]
#[command(name = "scan-budget")]
#[command(version = "1.0.0")]
#[command(about = "Budgeted site crawls with coverage reporting", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the configured scan profile (QUICK, SMART or DEEP)
    #[arg(long, value_name = "PROFILE")]
    profile: Option<ScanProfile>,

    /// Select the profile and show its budget without crawling
    #[arg(long, conflicts_with_all = ["stats", "export_summary"])]
    dry_run: bool,

    /// Show statistics from stored scans and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary"])]
    stats: bool,

    /// Rewrite the markdown report from the latest stored scan and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export_summary: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let profile_override = cli.profile.or(config.scan.profile);

    if cli.dry_run {
        handle_dry_run(&config, profile_override)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_summary {
        handle_export_summary(&config)?;
    } else {
        handle_scan(&config, &config_hash, profile_override).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("scan_budget=info,warn"),
            1 => EnvFilter::new("scan_budget=debug,info"),
            2 => EnvFilter::new("scan_budget=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: selects the profile offline and prints its budget
fn handle_dry_run(config: &Config, profile_override: Option<ScanProfile>) -> anyhow::Result<()> {
    println!("=== Scan-Budget Dry Run ===\n");

    println!("Scan:");
    println!("  Site: {}", config.scan.site);
    println!("  Tier: {}", config.scan.tier);
    match config.scan.sitemap_url_count {
        Some(count) => println!("  Sitemap URLs (configured): {}", count),
        None if config.scan.fetch_sitemap => println!("  Sitemap URLs: fetched at scan time"),
        None => println!("  Sitemap URLs: unknown"),
    }

    let profile = select_profile(config.scan.tier, config.scan.sitemap_url_count, profile_override)?;
    let budget = budget_for(profile);

    println!("\nProfile: {}", profile);
    println!("  Max pages: {}", budget.max_urls);
    println!("  Max duration: {} minutes", budget.max_duration.as_secs() / 60);
    println!("  Strategy: {}", budget.strategy);
    println!("  Sitemap first: {}", budget.sitemap_first);
    println!(
        "  Priority order: {}",
        budget
            .priority_order
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(" > ")
    );
    if let Some(interval) = budget.checkpoint_interval {
        println!("  Checkpoint every: {} pages", interval);
    }

    println!("\nEnterprise Detection:");
    if budget.detects_enterprise() && config.detection.enabled {
        println!("  URL threshold: {}", config.detection.url_threshold);
        println!(
            "  Time threshold: {} minutes with a growing frontier",
            config.detection.time_threshold_minutes
        );
    } else {
        println!("  Off for this scan");
    }

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Report: {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))?;
    let total = storage.count_summaries()?;
    let (stats, recent) = load_statistics(&storage, STATS_LIMIT)?;

    if total > recent.len() as u64 {
        println!("Showing the {} most recent of {} scans\n", recent.len(), total);
    }
    print_statistics(&stats, &recent);

    Ok(())
}

/// Handles the --export-summary mode: rewrites the markdown report
fn handle_export_summary(config: &Config) -> anyhow::Result<()> {
    println!("=== Exporting Coverage Report ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", config.output.summary_path);
    println!();

    let storage = open_storage(Path::new(&config.output.database_path))?;

    let Some(stored) = storage.latest_summary_for(&config.scan.site)? else {
        bail!("No stored scan for {}", config.scan.site);
    };

    write_markdown_report(
        &stored.site,
        &stored.summary,
        Path::new(&config.output.summary_path),
    )?;

    println!(
        "✓ Report for scan {} ({}) exported to: {}",
        stored.id, stored.recorded_at, config.output.summary_path
    );

    Ok(())
}

/// Handles the main scan operation
async fn handle_scan(
    config: &Config,
    config_hash: &str,
    profile_override: Option<ScanProfile>,
) -> anyhow::Result<()> {
    let site = Url::parse(&config.scan.site)?;
    let client = build_http_client(&config.user_agent, config.crawler.timeout())?;

    let sitemap_urls = if config.scan.sitemap_url_count.is_none() && config.scan.fetch_sitemap {
        match fetch_sitemap_urls(&client, &site).await {
            Ok(urls) => urls,
            Err(e) => {
                tracing::warn!("Could not fetch sitemap for {}: {}", site, e);
                None
            }
        }
    } else {
        None
    };

    let sitemap_count = config
        .scan
        .sitemap_url_count
        .or_else(|| sitemap_urls.as_ref().map(|urls| urls.len() as u64));

    let profile = select_profile(config.scan.tier, sitemap_count, profile_override)?;
    tracing::info!(
        "Selected {} profile (tier: {}, sitemap urls: {:?})",
        profile,
        config.scan.tier,
        sitemap_count
    );

    let mut coordinator = ScanCoordinator::new(
        &config.scan.site,
        profile,
        config.tracker_config(sitemap_count),
        HttpPageSource::new(client),
    )?
    .with_request_delay(config.crawler.request_delay())
    .with_sitemap_seeds(sitemap_urls.unwrap_or_default());

    let finished = tokio::select! {
        result = coordinator.run() => Some(result?),
        _ = tokio::signal::ctrl_c() => None,
    };

    let state = match finished {
        Some(state) => state,
        None => {
            tracing::warn!("Interrupted, stopping scan early");
            coordinator.stop(StopReason::Budget);
            coordinator.tracker().state().clone()
        }
    };

    let summary = summarize(&state)?;

    let mut storage = open_storage(Path::new(&config.output.database_path))?;
    let id = storage.save_summary(&config.scan.site, &summary, config_hash)?;
    tracing::info!("Stored coverage summary {}", id);

    write_markdown_report(
        &config.scan.site,
        &summary,
        Path::new(&config.output.summary_path),
    )?;
    tracing::info!("Report written to {}", config.output.summary_path);

    print_summary(&config.scan.site, &summary);

    Ok(())
}
