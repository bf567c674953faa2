//! Run transcript written through the installed global subscriber
//!
//! Kept in its own test binary: `logging::init` installs a process-wide
//! subscriber and may only run once.

use keyword_scout::config::Config;
use keyword_scout::crawler::run_crawl;
use keyword_scout::logging;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_log_file_records_run() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<p>widget</p><a href="/doc.pdf">doc</a><a href="/gone">gone</a>"#,
            "text/html",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/doc.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF", "application/pdf"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let websites = dir.path().join("websites.txt");
    let keywords = dir.path().join("keywords.txt");
    std::fs::write(&websites, format!("{base}\nnot a url\n")).unwrap();
    std::fs::write(&keywords, "widget\n").unwrap();

    let mut config = Config::default();
    config.input.websites_path = websites;
    config.input.keywords_path = keywords;
    config.output.report_path = dir.path().join("out").join("results.csv");
    config.output.log_path = dir.path().join("out").join("log.txt");

    logging::init(0, true, Some(&config.output.log_path));
    run_crawl(config.clone()).await.unwrap();

    let transcript = std::fs::read_to_string(&config.output.log_path).unwrap();
    for line in [
        format!("Crawling:\t\t{base}/\n"),
        format!("Scraping:\t\t{base}/\n"),
        format!("Error is type [application/pdf]:\t\t{base}/doc.pdf"),
        format!("Error crawling:\t{base}/gone"),
        "Error opening:\tnot a url".to_string(),
        "Keywords being used (1):".to_string(),
        "Run time - ".to_string(),
    ] {
        assert!(transcript.contains(&line), "missing {line:?} in:\n{transcript}");
    }
    assert!(!transcript.contains('\u{1b}'));
}
