use crate::common::{hits, html, listing_page, row, test_config, test_user_agent, LISTING_PATH};
use guidance_crawler::crawler::{build_http_client, DetailCrawler, Fetcher, RateLimiter};
use guidance_crawler::extract::Parsers;
use guidance_crawler::{run_crawl, ListingEntry, SearchCriteria};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn detail_crawler(chapter_attempts: u32) -> DetailCrawler {
    let client = build_http_client(&test_user_agent(), Duration::from_secs(5)).unwrap();
    let fetcher = Arc::new(Fetcher::new(client, 2, Arc::new(RateLimiter::disabled())));
    DetailCrawler::new(
        fetcher,
        Arc::new(Parsers::new().unwrap()),
        chapter_attempts,
        Duration::ZERO,
    )
}

fn entry(server: &MockServer, slug: &str) -> ListingEntry {
    ListingEntry {
        url: format!("{}/guidance/{}", server.uri(), slug),
        title: slug.to_uppercase(),
        reference: slug.to_uppercase(),
        published_date: "2020-01-15".to_string(),
        last_updated: "2021-03-01".to_string(),
        document_type: "Guidance".to_string(),
        programme: None,
    }
}

/// A detail page whose stacked navigation lists the given (href, title) chapters
fn stacked_nav_page(chapters: &[(&str, &str)]) -> String {
    let items: String = chapters
        .iter()
        .map(|(href, title)| {
            format!(
                r#"<li class="stacked-nav__list-item"><a href="{href}">
                    <span class="stacked-nav__content-wrapper">{title}</span></a></li>"#
            )
        })
        .collect();

    format!(
        r#"<html><body>
            <nav class="stacked-nav" aria-label="Chapters">
              <ul class="stacked-nav__list">{items}</ul>
            </nav>
        </body></html>"#
    )
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_extraction_cascade_per_chapter() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/guidance/ng1",
        &stacked_nav_page(&[
            ("/guidance/ng1/chapter/overview", "Overview"),
            ("/guidance/ng1/chapter/recommendations", "1 Recommendations"),
            ("/guidance/ng1/chapter/summary", "Summary"),
            ("/guidance/ng1/chapter/empty", "Empty"),
        ]),
    )
    .await;
    mount_page(
        &server,
        "/guidance/ng1/chapter/overview",
        r#"<html><body><article>
            <h2>Overview</h2>
            <p>This guideline covers
               care for adults.</p>
        </article></body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/guidance/ng1/chapter/recommendations",
        r#"<html><body><div class="js-in-page-nav-target"><div class="chapter">
            <h3>1.1 Education</h3>
            <ul><li>Offer a structured programme.</li></ul>
        </div></div></body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/guidance/ng1/chapter/summary",
        r#"<html><body><div class="section-summary web-viewer-content">
            Short   summary
            text.
        </div></body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/guidance/ng1/chapter/empty",
        "<html><body><div>nothing recognisable</div></body></html>",
    )
    .await;

    let record = detail_crawler(3).crawl(entry(&server, "ng1")).await;
    let contents = record.contents.expect("detail page was reachable");

    assert_eq!(contents.titles(), vec!["Overview", "1 Recommendations", "Summary"]);
    assert_eq!(
        contents.get("Overview"),
        Some("### Overview ### This guideline covers care for adults.")
    );
    assert_eq!(
        contents.get("1 Recommendations"),
        Some("### 1.1 Education ### Offer a structured programme.")
    );
    assert_eq!(contents.get("Summary"), Some("Short summary text."));
    assert_eq!(contents.get("Empty"), None);
}

#[tokio::test]
async fn test_guidance_menu_navigation() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/guidance/ta1",
        r##"<html><body>
            <div id="overview-menu"><a href="/guidance/ta1">Overview</a></div>
            <div id="guidance-menu">
              <ul class="nav nav-list" id="Guidance-Menu">
                <li><a href="/guidance/ta1/chapter/1-guidance">1 Guidance</a></li>
              </ul>
            </div>
            <article><p>Overview text.</p></article>
        </body></html>"##,
    )
    .await;
    mount_page(
        &server,
        "/guidance/ta1/chapter/1-guidance",
        "<html><body><article><p>Recommended as an option.</p></article></body></html>",
    )
    .await;

    let record = detail_crawler(3).crawl(entry(&server, "ta1")).await;
    let contents = record.contents.unwrap();

    assert_eq!(contents.titles(), vec!["Overview", "1 Guidance"]);
    assert_eq!(contents.get("Overview"), Some("Overview text."));
    assert_eq!(contents.get("1 Guidance"), Some("Recommended as an option."));
}

#[tokio::test]
async fn test_no_navigation_gives_empty_contents() {
    let server = MockServer::start().await;
    mount_page(&server, "/guidance/qs1", "<html><body><p>Plain page</p></body></html>").await;

    let record = detail_crawler(3).crawl(entry(&server, "qs1")).await;
    let contents = record.contents.expect("empty contents, not absent");
    assert!(contents.is_empty());
}

#[tokio::test]
async fn test_unreachable_detail_page_gives_no_contents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/guidance/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let record = detail_crawler(3).crawl(entry(&server, "gone")).await;
    assert!(record.contents.is_none());
    assert_eq!(record.entry.reference, "GONE");
}

#[tokio::test]
async fn test_transient_chapter_failure_is_retried() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/guidance/ng5",
        &stacked_nav_page(&[
            ("/guidance/ng5/chapter/flaky", "Flaky"),
            ("/guidance/ng5/chapter/missing", "Missing"),
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/guidance/ng5/chapter/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/guidance/ng5/chapter/flaky"))
        .respond_with(html("<html><body><article><p>Recovered.</p></article></body></html>"))
        .with_priority(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/guidance/ng5/chapter/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let record = detail_crawler(3).crawl(entry(&server, "ng5")).await;
    let contents = record.contents.unwrap();

    assert_eq!(contents.titles(), vec!["Flaky"]);
    assert_eq!(contents.get("Flaky"), Some("Recovered."));
    assert_eq!(hits(&server, "/guidance/ng5/chapter/flaky").await, 2);
    // client errors are not retried
    assert_eq!(hits(&server, "/guidance/ng5/chapter/missing").await, 1);
}

#[tokio::test]
async fn test_chapter_retries_are_bounded() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/guidance/ng6",
        &stacked_nav_page(&[("/guidance/ng6/chapter/down", "Down")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/guidance/ng6/chapter/down"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let record = detail_crawler(3).crawl(entry(&server, "ng6")).await;

    assert!(record.contents.unwrap().is_empty());
    assert_eq!(hits(&server, "/guidance/ng6/chapter/down").await, 3);
}

#[tokio::test]
async fn test_full_run_with_contents() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        LISTING_PATH,
        &listing_page(
            1,
            &format!(
                "{}{}",
                row("First", "/guidance/ng1", "NG1"),
                row("Second", "/guidance/ng2", "NG2")
            ),
        ),
    )
    .await;
    mount_page(
        &server,
        "/guidance/ng1",
        &stacked_nav_page(&[("/guidance/ng1/chapter/a", "A")]),
    )
    .await;
    mount_page(
        &server,
        "/guidance/ng1/chapter/a",
        "<html><body><article><p>Chapter A.</p></article></body></html>",
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/guidance/ng2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), vec![SearchCriteria::default()]);
    let outcome = run_crawl(&config).await.unwrap();

    assert_eq!(outcome.records.len(), 2);
    let first = &outcome.records[0];
    assert_eq!(first.reference, "NG1");
    assert_eq!(
        first.contents.as_ref().and_then(|c| c.get("A")),
        Some("Chapter A.")
    );

    let second = &outcome.records[1];
    assert_eq!(second.reference, "NG2");
    assert!(second.contents.is_none());
}
