//! Full scans against a mock HTTP server
//!
//! These tests use wiremock to serve a small site and run the coordinator
//! over live HTTP, then persist and report the result.

use scan_budget::config::parse_config;
use scan_budget::crawler::{
    build_http_client, fetch_sitemap_urls, HttpPageSource, ScanCoordinator,
};
use scan_budget::output::{format_markdown_report, summarize, write_markdown_report};
use scan_budget::profile::{select_profile, ScanProfile, UserTier};
use scan_budget::state::{StopReason, TrackerConfig};
use scan_budget::storage::{open_storage, Storage};
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Page</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn test_config(site: &str, dir: &TempDir) -> String {
    format!(
        r#"
[scan]
site = "{site}"
tier = "free"
fetch-sitemap = true

[crawler]
minimum-time-on-page = 10
request-timeout = 5

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"

[output]
database-path = "{db}"
summary-path = "{md}"
"#,
        site = site,
        db = dir.path().join("scans.db").display(),
        md = dir.path().join("coverage.md").display(),
    )
}

#[tokio::test]
async fn test_full_scan_persists_and_reports() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        &format!(
            r#"<a href="/about">About</a>
               <a href="{}/products/mug">Mug</a>
               <a href="/privacy">Privacy</a>
               <a href="https://elsewhere.example/">Elsewhere</a>"#,
            base
        ),
    )
    .await;
    mount_page(&server, "/about", r#"<a href="/">Home</a>"#).await;
    mount_page(&server, "/products/mug", r#"<a href="/about/">About</a>"#).await;
    mount_page(&server, "/privacy", "").await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = parse_config(&test_config(&base, &dir)).unwrap();
    let client = build_http_client(&config.user_agent, config.crawler.timeout()).unwrap();

    let site = Url::parse(&config.scan.site).unwrap();
    let sitemap = fetch_sitemap_urls(&client, &site).await.unwrap();
    assert_eq!(sitemap, None);

    let profile = select_profile(config.scan.tier, None, config.scan.profile).unwrap();
    assert_eq!(profile, ScanProfile::Quick);

    let mut coordinator = ScanCoordinator::new(
        &config.scan.site,
        profile,
        config.tracker_config(None),
        HttpPageSource::new(client),
    )
    .unwrap()
    .with_request_delay(config.crawler.request_delay());

    let state = coordinator.run().await.unwrap();
    assert_eq!(state.stop_reason(), Some(StopReason::Complete));
    assert_eq!(state.urls_crawled, 4);
    assert_eq!(state.urls_discovered, 4);

    let summary = summarize(&state).unwrap();
    assert_eq!(summary.coverage_percent, 100);
    assert!(!summary.reached_limit);

    let mut storage = open_storage(&dir.path().join("scans.db")).unwrap();
    let id = storage
        .save_summary(&config.scan.site, &summary, "hash")
        .unwrap();
    let stored = storage.latest_summary_for(&config.scan.site).unwrap().unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(stored.summary, summary);

    let report_path = dir.path().join("coverage.md");
    write_markdown_report(&config.scan.site, &summary, &report_path).unwrap();
    let report = std::fs::read_to_string(&report_path).unwrap();
    assert_eq!(report, format_markdown_report(&config.scan.site, &summary));
    assert!(report.contains("# Scan Coverage Report"));
    assert!(report.contains(&config.scan.site));
}

#[tokio::test]
async fn test_sitemap_seeds_reach_unlinked_pages() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", "No links here").await;
    mount_page(&server, "/hidden", "").await;
    mount_page(&server, "/docs", "").await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!(
                "<urlset><url><loc>{base}/hidden</loc></url><url><loc>{base}/docs</loc></url></urlset>",
                base = base
            ),
            "application/xml",
        ))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let site = Url::parse(&base).unwrap();
    let seeds = fetch_sitemap_urls(&client, &site).await.unwrap().unwrap();
    let sitemap_count = Some(seeds.len() as u64);

    let profile = select_profile(UserTier::Pro, sitemap_count, None).unwrap();
    assert_eq!(profile, ScanProfile::Quick);

    let mut coordinator = ScanCoordinator::new(
        &base,
        profile,
        TrackerConfig::default().with_sitemap_url_count(sitemap_count),
        HttpPageSource::new(client),
    )
    .unwrap()
    .with_sitemap_seeds(seeds);

    let state = coordinator.run().await.unwrap();

    assert_eq!(state.stop_reason(), Some(StopReason::Complete));
    assert_eq!(state.urls_crawled, 3);
}

#[tokio::test]
async fn test_non_html_and_errors_count_as_crawled() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/brochure.pdf">PDF</a><a href="/gone">Gone</a>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/brochure.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.4", "application/pdf"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut coordinator = ScanCoordinator::new(
        &base,
        ScanProfile::Quick,
        TrackerConfig::default(),
        HttpPageSource::new(reqwest::Client::new()),
    )
    .unwrap()
    .with_request_delay(Duration::from_millis(10));

    let state = coordinator.run().await.unwrap();

    assert_eq!(state.stop_reason(), Some(StopReason::Complete));
    assert_eq!(state.urls_crawled, 3);
}
