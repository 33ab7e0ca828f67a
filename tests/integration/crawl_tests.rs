//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use website_markdown::crawler::{ConversionError, HtmlConverter};
use website_markdown::output::{write_output, OutputFormat};
use website_markdown::{scrape_website, Coordinator, CrawlConfig, CrawlError, PageError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Creates a fast test configuration with the given depth bound
fn create_test_config(max_depth: u32) -> CrawlConfig {
    CrawlConfig {
        max_depth,
        request_timeout: Duration::from_secs(5),
        inter_request_delay: Duration::ZERO,
        user_agent: "TestBot/1.0".to_string(),
        ..CrawlConfig::default()
    }
}

/// A page with enough prose to pass the quality filter
fn article(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<li><a href="{}">{}</a></li>"#, href, href))
        .collect();

    format!(
        "<html><head><title>{}</title></head><body>\
         <h1>{}</h1>\
         <p>This opening paragraph describes what the page is about in plain words.</p>\
         <p>A second paragraph adds detail so that the content reads like an article.</p>\
         <p>The closing paragraph finishes the thought and gives the page real substance.</p>\
         <ul>{}</ul>\
         </body></html>",
        title, title, anchors
    )
}

/// A page whose body is only 50 characters long
fn thin_page(title: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body><p>{}</p></body></html>",
        title,
        "x".repeat(50)
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body, "text/html; charset=utf-8"),
        )
        .expect(expected_hits)
        .mount(server)
        .await;
}

fn page_url(server: &MockServer, route: &str) -> String {
    format!("{}{}", server.uri(), route)
}

#[tokio::test]
async fn test_three_page_site_keeps_substantive_pages() {
    let server = MockServer::start().await;

    mount_page(&server, "/", article("Page A", &["/b", "/c"]), 1).await;
    mount_page(&server, "/b", thin_page("Page B"), 1).await;
    mount_page(&server, "/c", article("Page C", &["/"]), 1).await;

    let result = scrape_website(&page_url(&server, "/"), create_test_config(1))
        .await
        .unwrap();

    let kept: Vec<(&str, u32)> = result
        .pages
        .iter()
        .map(|p| (p.title.as_str(), p.depth))
        .collect();

    assert_eq!(kept, vec![("Page A", 0), ("Page C", 1)]);
    assert_eq!(result.pages[0].url, page_url(&server, "/"));
    assert_eq!(result.pages[1].url, page_url(&server, "/c"));
    assert!(result.pages[1].markdown.contains("closing paragraph"));
    assert_eq!(result.error_count(), 0);
    assert!(!result.cancelled);
}

#[tokio::test]
async fn test_backlink_to_seed_is_counted_not_refetched() {
    let server = MockServer::start().await;

    mount_page(&server, "/", article("Page A", &["/b", "/c"]), 1).await;
    mount_page(&server, "/b", thin_page("Page B"), 1).await;
    mount_page(&server, "/c", article("Page C", &["/"]), 1).await;

    let result = scrape_website(&page_url(&server, "/"), create_test_config(2))
        .await
        .unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.duplicates, 1);
}

#[tokio::test]
async fn test_minimal_page_stays_claimed() {
    let server = MockServer::start().await;

    mount_page(&server, "/", article("Page A", &["/b", "/c"]), 1).await;
    mount_page(&server, "/b", thin_page("Page B"), 1).await;
    mount_page(&server, "/c", article("Page C", &["/b"]), 1).await;

    let result = scrape_website(&page_url(&server, "/"), create_test_config(2))
        .await
        .unwrap();

    let titles: Vec<&str> = result.pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Page A", "Page C"]);
    // C -> B hits the claim B kept after being dropped
    assert_eq!(result.duplicates, 1);
}

#[tokio::test]
async fn test_trailing_slash_variants_fetch_once() {
    let server = MockServer::start().await;

    mount_page(&server, "/", article("Home", &["/b", "/b/"]), 1).await;
    mount_page(&server, "/b", article("Page B", &[]), 1).await;

    let result = scrape_website(&page_url(&server, "/"), create_test_config(1))
        .await
        .unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.duplicates, 1);
}

#[tokio::test]
async fn test_depth_zero_fetches_only_seed() {
    let server = MockServer::start().await;

    mount_page(&server, "/", article("Home", &["/next"]), 1).await;
    mount_page(&server, "/next", article("Next", &[]), 0).await;

    let result = scrape_website(&page_url(&server, "/"), create_test_config(0))
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.pages[0].depth, 0);
    assert_eq!(result.duplicates, 0);
}

#[tokio::test]
async fn test_external_links_not_followed() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;

    let external = page_url(&other, "/page");
    mount_page(&server, "/", article("Home", &[&external]), 1).await;
    mount_page(&other, "/page", article("Elsewhere", &[]), 0).await;

    let result = scrape_website(&page_url(&server, "/"), create_test_config(2))
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
}

#[tokio::test]
async fn test_external_links_followed_when_enabled() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;

    let external = page_url(&other, "/page");
    mount_page(&server, "/", article("Home", &[&external]), 1).await;
    mount_page(&other, "/page", article("Elsewhere", &[]), 1).await;

    let config = CrawlConfig {
        follow_external_links: true,
        ..create_test_config(1)
    };
    let result = scrape_website(&page_url(&server, "/"), config)
        .await
        .unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.pages[1].url, external);
}

#[tokio::test]
async fn test_file_links_never_fetched() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        article("Home", &["/manual.pdf", "/logo.png", "/guide"]),
        1,
    )
    .await;
    mount_page(&server, "/manual.pdf", article("PDF", &[]), 0).await;
    mount_page(&server, "/logo.png", article("PNG", &[]), 0).await;
    mount_page(&server, "/guide", article("Guide", &[]), 1).await;

    let result = scrape_website(&page_url(&server, "/"), create_test_config(1))
        .await
        .unwrap();

    assert_eq!(result.len(), 2);
}

#[tokio::test]
async fn test_results_grouped_by_level() {
    let server = MockServer::start().await;

    mount_page(&server, "/", article("A", &["/b", "/c"]), 1).await;
    mount_page(&server, "/b", article("B", &["/d"]), 1).await;
    mount_page(&server, "/c", article("C", &["/e", "/b"]), 1).await;
    mount_page(&server, "/d", article("D", &[]), 1).await;
    mount_page(&server, "/e", article("E", &[]), 1).await;

    let result = scrape_website(&page_url(&server, "/"), create_test_config(2))
        .await
        .unwrap();

    let depths: Vec<u32> = result.pages.iter().map(|p| p.depth).collect();
    assert!(depths.windows(2).all(|w| w[0] <= w[1]));

    let titles_at = |depth: u32| -> HashSet<&str> {
        result
            .pages
            .iter()
            .filter(|p| p.depth == depth)
            .map(|p| p.title.as_str())
            .collect()
    };

    assert_eq!(titles_at(0), HashSet::from(["A"]));
    assert_eq!(titles_at(1), HashSet::from(["B", "C"]));
    assert_eq!(titles_at(2), HashSet::from(["D", "E"]));
    assert_eq!(result.duplicates, 1);
}

#[tokio::test]
async fn test_failed_pages_recorded_with_error_kind() {
    let server = MockServer::start().await;

    mount_page(&server, "/", article("Home", &["/missing", "/data"]), 1).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("{}", "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = scrape_website(&page_url(&server, "/"), create_test_config(1))
        .await
        .unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result.success_count(), 1);
    assert_eq!(result.error_count(), 2);

    let missing = result
        .pages
        .iter()
        .find(|p| p.url.ends_with("/missing"))
        .unwrap();
    assert_eq!(missing.error, Some(PageError::HttpStatus { status: 404 }));
    assert_eq!(missing.title, missing.url);
    assert!(missing.markdown.is_empty());
    assert_eq!(missing.depth, 1);

    let data = result
        .pages
        .iter()
        .find(|p| p.url.ends_with("/data"))
        .unwrap();
    assert!(matches!(
        data.error,
        Some(PageError::UnsupportedContentType { .. })
    ));
}

#[tokio::test]
async fn test_invalid_seed_aborts_crawl() {
    let result = scrape_website("definitely not a url", create_test_config(1)).await;
    assert!(matches!(result, Err(CrawlError::InvalidUrl(_))));

    let result = scrape_website("mailto:someone@example.com", create_test_config(1)).await;
    assert!(matches!(result, Err(CrawlError::InvalidUrl(_))));
}

#[tokio::test]
async fn test_cancelled_crawl_fetches_nothing() {
    let server = MockServer::start().await;
    mount_page(&server, "/", article("Home", &[]), 0).await;

    let cancel = CancellationToken::new();
    let coordinator = Coordinator::new(create_test_config(2))
        .unwrap()
        .with_cancellation(cancel.clone());

    cancel.cancel();
    let result = coordinator.run(&page_url(&server, "/")).await.unwrap();

    assert!(result.cancelled);
    assert!(result.is_empty());
}

/// Serves a page and cancels the crawl while that page is in flight
struct CancellingResponder {
    cancel: CancellationToken,
    body: String,
}

impl Respond for CancellingResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.cancel.cancel();
        ResponseTemplate::new(200)
            .set_body_raw(self.body.clone(), "text/html")
    }
}

#[tokio::test]
async fn test_cancel_during_level_keeps_finished_level() {
    let server = MockServer::start().await;
    let cancel = CancellationToken::new();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(CancellingResponder {
            cancel: cancel.clone(),
            body: article("Home", &["/next"]),
        })
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/next", article("Next", &[]), 0).await;

    let coordinator = Coordinator::new(create_test_config(2))
        .unwrap()
        .with_cancellation(cancel);
    let result = coordinator.run(&page_url(&server, "/")).await.unwrap();

    assert!(result.cancelled);
    assert_eq!(result.len(), 1);
    assert_eq!(result.pages[0].title, "Home");
}

struct RejectingConverter;

impl HtmlConverter for RejectingConverter {
    fn convert(&self, _html: &str) -> Result<String, ConversionError> {
        Err(ConversionError("markup not supported".to_string()))
    }
}

#[tokio::test]
async fn test_custom_converter_failures_are_recorded() {
    let server = MockServer::start().await;
    mount_page(&server, "/", article("Home", &["/next"]), 1).await;
    mount_page(&server, "/next", article("Next", &[]), 0).await;

    let coordinator = Coordinator::new(create_test_config(2))
        .unwrap()
        .with_converter(Arc::new(RejectingConverter));
    let result = coordinator.run(&page_url(&server, "/")).await.unwrap();

    // A failed page contributes no links
    assert_eq!(result.len(), 1);
    assert_eq!(result.error_count(), 1);
    assert_eq!(result.pages[0].title, "Home");
    assert_eq!(
        result.pages[0].error,
        Some(PageError::Conversion {
            message: "markup not supported".to_string()
        })
    );
}

#[tokio::test]
async fn test_concurrency_cap_serializes_fetches() {
    let server = MockServer::start().await;

    mount_page(&server, "/", article("Home", &["/1", "/2", "/3", "/4"]), 1).await;
    for route in ["/1", "/2", "/3", "/4"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(article(route, &[]), "text/html")
                    .set_delay(Duration::from_millis(100)),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let config = CrawlConfig {
        max_concurrency: Some(1),
        ..create_test_config(1)
    };

    let start = Instant::now();
    let result = scrape_website(&page_url(&server, "/"), config)
        .await
        .unwrap();

    assert_eq!(result.len(), 5);
    assert!(start.elapsed() >= Duration::from_millis(400));
}

#[tokio::test]
async fn test_inter_request_delay_spaces_requests() {
    let server = MockServer::start().await;

    mount_page(&server, "/", article("Home", &["/1", "/2"]), 1).await;
    mount_page(&server, "/1", article("One", &[]), 1).await;
    mount_page(&server, "/2", article("Two", &[]), 1).await;

    let config = CrawlConfig {
        inter_request_delay: Duration::from_millis(100),
        ..create_test_config(1)
    };

    let start = Instant::now();
    let result = scrape_website(&page_url(&server, "/"), config)
        .await
        .unwrap();

    assert_eq!(result.len(), 3);
    assert!(start.elapsed() >= Duration::from_millis(190));
}

#[tokio::test]
async fn test_crawl_then_write_files() {
    let server = MockServer::start().await;

    mount_page(&server, "/", article("Home", &["/about"]), 1).await;
    mount_page(&server, "/about", article("About Us", &[]), 1).await;

    let result = scrape_website(&page_url(&server, "/"), create_test_config(1))
        .await
        .unwrap();

    let temp_dir = TempDir::new().unwrap();
    let report = write_output(
        &result.pages,
        &server.uri(),
        OutputFormat::Files,
        temp_dir.path(),
    )
    .unwrap();

    assert_eq!(report.written, 2);
    let about = std::fs::read_to_string(temp_dir.path().join("page-002-About Us.md")).unwrap();
    assert!(about.starts_with("# About Us"));
    assert!(about.contains("**Depth:** 1"));
}
