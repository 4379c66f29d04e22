//! Sitemap counting against a mock HTTP server

use scan_budget::config::UserAgentConfig;
use scan_budget::crawler::{build_http_client, count_sitemap_urls, fetch_sitemap_urls};
use scan_budget::profile::{select_profile, ScanProfile, UserTier};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> reqwest::Client {
    let user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    };
    build_http_client(&user_agent, Duration::from_secs(5)).expect("client")
}

fn xml(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/xml")
}

fn urlset(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("<url><loc>{}</loc></url>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

fn sitemap_index(children: &[String]) -> String {
    let entries: String = children
        .iter()
        .map(|u| format!("<sitemap><loc>{}</loc></sitemap>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

#[tokio::test]
async fn test_count_urlset() {
    let server = MockServer::start().await;
    let base = server.uri();

    let pages: Vec<String> = ["/", "/about", "/pricing"]
        .iter()
        .map(|p| format!("{}{}", base, p))
        .collect();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(urlset(&pages)))
        .expect(1)
        .mount(&server)
        .await;

    let site = Url::parse(&format!("{}/blog/", base)).unwrap();
    let count = count_sitemap_urls(&client(), &site).await.unwrap();

    assert_eq!(count, Some(3));
}

#[tokio::test]
async fn test_missing_sitemap_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let site = Url::parse(&server.uri()).unwrap();
    assert_eq!(count_sitemap_urls(&client(), &site).await.unwrap(), None);
}

#[tokio::test]
async fn test_index_sums_children_and_skips_failures() {
    let server = MockServer::start().await;
    let base = server.uri();

    let children = vec![
        format!("{}/sitemap-pages.xml", base),
        format!("{}/sitemap-posts.xml", base),
        format!("{}/sitemap-broken.xml", base),
    ];

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(sitemap_index(&children)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap-pages.xml"))
        .respond_with(xml(urlset(&[
            format!("{}/", base),
            format!("{}/about", base),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap-posts.xml"))
        .respond_with(xml(urlset(&[
            format!("{}/blog/a", base),
            format!("{}/blog/b", base),
            format!("{}/blog/c", base),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap-broken.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let site = Url::parse(&base).unwrap();
    let urls = fetch_sitemap_urls(&client(), &site).await.unwrap().unwrap();

    assert_eq!(urls.len(), 5);
    assert!(urls.contains(&format!("{}/blog/c", base)));
}

#[tokio::test]
async fn test_index_children_are_capped() {
    let server = MockServer::start().await;
    let base = server.uri();

    let children: Vec<String> = (0..60)
        .map(|i| format!("{}/child-{}.xml", base, i))
        .collect();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(sitemap_index(&children)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/child-\d+\.xml$"))
        .respond_with(xml(urlset(&[format!("{}/page", base)])))
        .expect(50)
        .mount(&server)
        .await;

    let site = Url::parse(&base).unwrap();
    let count = count_sitemap_urls(&client(), &site).await.unwrap();

    assert_eq!(count, Some(50));
}

#[tokio::test]
async fn test_html_served_for_sitemap_gives_no_hint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<!DOCTYPE html><html><head><title>Shop</title></head><body><h1>Page not found</h1></body></html>",
            "text/html",
        ))
        .mount(&server)
        .await;

    let site = Url::parse(&server.uri()).unwrap();
    let count = count_sitemap_urls(&client(), &site).await.unwrap();

    assert_eq!(count, None);
    assert_eq!(
        select_profile(UserTier::Pro, count, None).unwrap(),
        ScanProfile::Smart
    );
}
