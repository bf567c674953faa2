//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, from input lists to the CSV report.

use keyword_scout::config::{Config, CrawlerConfig, UserAgentConfig};
use keyword_scout::crawler::{run_crawl, Fetcher, HttpFetcher};
use keyword_scout::state::PageState;
use keyword_scout::FetchError;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves an HTML page at the given path, expecting exactly `hits` requests
async fn mount_html(server: &MockServer, at: &str, body: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .expect(hits)
        .mount(server)
        .await;
}

/// Creates a test configuration whose inputs and outputs live in `dir`
fn create_test_config(dir: &Path, websites: &[String], keywords: &[&str]) -> Config {
    let websites_path = dir.join("websites.txt");
    let keywords_path = dir.join("keywords.txt");
    std::fs::write(&websites_path, websites.join("\n")).unwrap();
    std::fs::write(&keywords_path, keywords.join("\n")).unwrap();

    let mut config = Config::default();
    config.crawler = CrawlerConfig {
        max_concurrent_pages_open: 1,
        fetch_timeout_secs: 5,
        ..CrawlerConfig::default()
    };
    config.user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: Some("https://example.com/contact".to_string()),
    };
    config.input.websites_path = websites_path;
    config.input.keywords_path = keywords_path;
    config.output.report_path = dir.join("out").join("results.csv");
    config.output.log_path = dir.join("out").join("log.txt");
    config
}

fn read_report(config: &Config) -> String {
    std::fs::read_to_string(&config.output.report_path).expect("report should exist")
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        r#"<html><head><title>Home</title></head><body>
        <h1>Welcome</h1>
        <a href="/about">About</a>
        <a href="/catalog/">Catalog</a>
        <a href="//share.example/?u=/about">Share</a>
        <a href="http://other.invalid/widget">Elsewhere</a>
        <a href="mailto:sales@ex.com">Mail</a>
        <a href="/brochure.pdf">Brochure</a>
        <a href="/missing">Missing</a>
        </body></html>"#,
        1,
    )
    .await;

    mount_html(
        &server,
        "/about",
        r#"<html><body><p>About our Widgets</p><a href="/">Home</a><a href="/about#team">Team</a></body></html>"#,
        1,
    )
    .await;

    mount_html(
        &server,
        "/catalog",
        r#"<html><body><p>Gadget category</p><script>var cat = "widget";</script></body></html>"#,
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/brochure.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("widget widget", "application/pdf"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), &[base.clone()], &["widget", "gadget", "cat"]);

    let summary = run_crawl(config.clone()).await.expect("crawl should succeed");

    assert_eq!(
        read_report(&config),
        format!(
            "Keyword, URL\nwidget, {base}/about\ngadget, {base}/catalog\n",
            base = base
        )
    );

    let stats = &summary.statistics;
    assert_eq!(stats.sites_crawled, 1);
    assert_eq!(stats.total_pages, 5);
    assert_eq!(stats.pages_in(PageState::VisitedHtml), 3);
    assert_eq!(stats.pages_in(PageState::VisitedNonHtml), 1);
    assert_eq!(stats.pages_in(PageState::Failed), 1);
    assert_eq!(stats.total_hits, 2);
}

#[tokio::test]
async fn test_keywords_found_on_multiple_pages() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        r#"<p>widget central</p><a href="/a">A</a><a href="/b">B</a>"#,
        1,
    )
    .await;
    mount_html(&server, "/a", "<p>WIDGET and gadgets</p>", 1).await;
    mount_html(&server, "/b", "<p>nothing to see</p>", 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path(), &[base.clone()], &["widget", "gadget"]);

    run_crawl(config.clone()).await.unwrap();

    let expected = format!(
        "Keyword, URL\nwidget, {base}/\nwidget, {base}/a\ngadget, {base}/a\n",
        base = base
    );
    assert_eq!(read_report(&config), expected);
}

#[tokio::test]
async fn test_sites_reported_in_list_order() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    // The first site is slower, so it finishes last
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<p>first widget</p>", "text/html")
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&first)
        .await;
    mount_html(&second, "/", "<p>second widget</p>", 1).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path(), &[first.uri(), second.uri()], &["widget"]);
    config.crawler.max_concurrent_sites = 2;

    run_crawl(config.clone()).await.unwrap();

    let expected = format!(
        "Keyword, URL\nwidget, {}/\nwidget, {}/\n",
        first.uri(),
        second.uri()
    );
    assert_eq!(read_report(&config), expected);
}

#[tokio::test]
async fn test_unreachable_and_invalid_sites_do_not_abort_run() {
    let server = MockServer::start().await;
    mount_html(&server, "/", "<p>still a widget</p>", 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(
        dir.path(),
        &[
            "http://127.0.0.1:1/".to_string(),
            "definitely not a url".to_string(),
            server.uri(),
        ],
        &["widget"],
    );

    let summary = run_crawl(config.clone()).await.unwrap();

    assert_eq!(summary.statistics.sites_crawled, 2);
    assert_eq!(summary.statistics.sites_skipped, 1);
    assert_eq!(
        read_report(&config),
        format!("Keyword, URL\nwidget, {}/\n", server.uri())
    );
}

#[tokio::test]
async fn test_report_in_unwritable_location_is_fatal() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path(), &[], &["widget"]);

    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "a file, not a directory").unwrap();
    config.output.report_path = blocker.join("results.csv");

    assert!(run_crawl(config).await.is_err());
}

#[tokio::test]
async fn test_http_fetcher_follows_redirects() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new/"))
        .mount(&server)
        .await;
    mount_html(&server, "/new/", r#"<a href="page">Page</a>"#, 1).await;

    let fetcher =
        HttpFetcher::from_config(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
    let url = Url::parse(&format!("{}/old", server.uri())).unwrap();

    let page = fetcher.fetch(&url).await.unwrap();
    assert_eq!(page.status, 200);
    assert_eq!(page.final_url.path(), "/new/");
    assert!(page.body.contains("page"));
}

#[tokio::test]
async fn test_http_fetcher_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher =
        HttpFetcher::from_config(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
    let url = Url::parse(&format!("{}/broken", server.uri())).unwrap();

    let result = fetcher.fetch(&url).await;
    assert!(matches!(result, Err(FetchError::Status { status: 500 })));
}

#[tokio::test]
async fn test_http_fetcher_skips_non_html_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"widget":1}"#, "application/json"))
        .mount(&server)
        .await;

    let fetcher =
        HttpFetcher::from_config(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
    let url = Url::parse(&format!("{}/data.json", server.uri())).unwrap();

    let page = fetcher.fetch(&url).await.unwrap();
    assert!(page.content_type.starts_with("application/json"));
    assert!(page.body.is_empty());
}

#[tokio::test]
async fn test_http_fetcher_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<p>late</p>", "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let crawler = CrawlerConfig {
        fetch_timeout_secs: 1,
        ..CrawlerConfig::default()
    };
    let fetcher = HttpFetcher::from_config(&UserAgentConfig::default(), &crawler).unwrap();
    let url = Url::parse(&format!("{}/slow", server.uri())).unwrap();

    let result = fetcher.fetch(&url).await;
    assert!(matches!(result, Err(FetchError::Timeout { .. })));
}
