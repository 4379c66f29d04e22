//! Page fetch outcomes against a mock HTTP server

use scan_budget::config::UserAgentConfig;
use scan_budget::crawler::{build_http_client, fetch_page, FetchResult};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> reqwest::Client {
    let user_agent = UserAgentConfig {
        crawler_name: "ScanBudget".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://scanner.example/bot".to_string(),
        contact_email: "bot@scanner.example".to_string(),
    };
    build_http_client(&user_agent, Duration::from_secs(5)).expect("client")
}

fn page_url(server: &MockServer, page: &str) -> Url {
    Url::parse(&server.uri()).unwrap().join(page).unwrap()
}

#[tokio::test]
async fn test_redirect_reports_final_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old-pricing"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", format!("{}/pricing", server.uri())),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pricing"))
        .and(header(
            "user-agent",
            "ScanBudget/1.0.0 (+https://scanner.example/bot; bot@scanner.example)",
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<a href=\"/plans\">Plans</a>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    match fetch_page(&client(), &page_url(&server, "/old-pricing")).await {
        FetchResult::Html { final_url, body } => {
            assert_eq!(final_url, page_url(&server, "/pricing"));
            assert!(body.contains("/plans"));
        }
        other => panic!("expected an HTML page, got {:?}", other),
    }
}

#[tokio::test]
async fn test_xhtml_is_a_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/legacy"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html xmlns=\"http://www.w3.org/1999/xhtml\"><body/></html>",
            "application/xhtml+xml",
        ))
        .mount(&server)
        .await;

    let result = fetch_page(&client(), &page_url(&server, "/legacy")).await;
    assert!(matches!(result, FetchResult::Html { .. }));
}

#[tokio::test]
async fn test_pdf_is_not_html() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.7", "application/pdf"))
        .mount(&server)
        .await;

    let result = fetch_page(&client(), &page_url(&server, "/catalog.pdf")).await;
    assert_eq!(
        result,
        FetchResult::NotHtml {
            media_type: "application/pdf".to_string()
        }
    );
    assert!(!result.is_failure());
}

#[tokio::test]
async fn test_server_error_is_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/checkout"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = fetch_page(&client(), &page_url(&server, "/checkout")).await;
    assert_eq!(result, FetchResult::HttpError { status_code: 503 });
    assert!(result.is_failure());
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    // Nothing listens on port 1
    let url = Url::parse("http://127.0.0.1:1/").unwrap();

    let result = fetch_page(&client(), &url).await;
    assert!(matches!(result, FetchResult::NetworkError { .. }));
}
