use crate::common::{hits, html, listing_page, row, test_config, LISTING_PATH};
use guidance_crawler::{run_crawl, CrawlError, Crawler, SearchCriteria};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn guidance_criteria() -> SearchCriteria {
    SearchCriteria {
        document_type: Some("Guidance".to_string()),
        guidance_programme: Some("NICE guidelines".to_string()),
        page_size: Some(2),
        ..Default::default()
    }
}

/// Serves a two-page listing: two valid rows, then one valid and one malformed
async fn mount_two_page_listing(server: &MockServer) {
    let first = listing_page(
        2,
        &format!(
            "{}{}",
            row("Alpha guideline", "/guidance/ng1", "NG1"),
            row("Beta guideline", "/guidance/ng2", "NG2")
        ),
    );
    let second = listing_page(
        2,
        &format!(
            "{}{}",
            row("Gamma guideline", "/guidance/ng3", "NG3"),
            r#"<tr><td><a href="/guidance/broken">Broken</a></td><td>X1</td><td>2020</td></tr>"#
        ),
    );

    // discovery and page 1
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(html(first))
        .with_priority(10)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("pa", "2"))
        .respond_with(html(second))
        .with_priority(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_two_page_listing_aggregates_in_page_order() {
    let server = MockServer::start().await;
    mount_two_page_listing(&server).await;

    let config = test_config(&server.uri(), vec![guidance_criteria()]);
    let crawler = Crawler::new(&config).unwrap();
    let entries = crawler.crawl_listing(&guidance_criteria()).await.unwrap();

    let references: Vec<&str> = entries.iter().map(|e| e.reference.as_str()).collect();
    assert_eq!(references, vec!["NG1", "NG2", "NG3"]);

    let first = &entries[0];
    assert_eq!(first.url, format!("{}/guidance/ng1", server.uri()));
    assert_eq!(first.title, "Alpha guideline");
    assert_eq!(first.published_date, "2020-01-15");
    assert_eq!(first.last_updated, "2021-03-01");
    assert_eq!(first.document_type, "Guidance");
    assert_eq!(first.programme.as_deref(), Some("NICE guidelines"));

    // discovery + page 1 + page 2
    assert_eq!(hits(&server, LISTING_PATH).await, 3);
}

#[tokio::test]
async fn test_listing_only_run() {
    let server = MockServer::start().await;
    mount_two_page_listing(&server).await;

    let mut config = test_config(&server.uri(), vec![guidance_criteria()]);
    config.crawler.fetch_contents = false;

    let outcome = run_crawl(&config).await.unwrap();

    assert!(outcome.failed.is_empty());
    assert_eq!(outcome.raw_count, 3);
    assert_eq!(outcome.records.len(), 3);
    assert!(outcome.records.iter().all(|r| r.contents.is_none()));
    assert_eq!(hits(&server, "/guidance/ng1").await, 0);
}

#[tokio::test]
async fn test_pinned_page_crawls_only_that_page() {
    let server = MockServer::start().await;
    mount_two_page_listing(&server).await;

    let criteria = SearchCriteria {
        page: Some(2),
        ..guidance_criteria()
    };
    let config = test_config(&server.uri(), vec![criteria.clone()]);
    let crawler = Crawler::new(&config).unwrap();
    let entries = crawler.crawl_listing(&criteria).await.unwrap();

    let references: Vec<&str> = entries.iter().map(|e| e.reference.as_str()).collect();
    assert_eq!(references, vec!["NG3"]);
    assert_eq!(hits(&server, LISTING_PATH).await, 2);
}

#[tokio::test]
async fn test_failed_listing_page_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(html(listing_page(
            2,
            &row("Alpha guideline", "/guidance/ng1", "NG1"),
        )))
        .with_priority(10)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("pa", "2"))
        .respond_with(ResponseTemplate::new(502))
        .with_priority(1)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), vec![guidance_criteria()]);
    let crawler = Crawler::new(&config).unwrap();
    let entries = crawler.crawl_listing(&guidance_criteria()).await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].reference, "NG1");
}

#[tokio::test]
async fn test_missing_pagination_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(html(
            "<html><body><table><tbody></tbody></table></body></html>",
        ))
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), vec![guidance_criteria()]);
    let crawler = Crawler::new(&config).unwrap();
    let result = crawler.crawl(&guidance_criteria()).await;
    assert!(matches!(result, Err(CrawlError::Parse { .. })));

    let outcome = run_crawl(&config).await.unwrap();
    assert!(outcome.records.is_empty());
    assert_eq!(outcome.failed.len(), 1);
    assert!(outcome.all_failed(config.search.len()));
}

#[tokio::test]
async fn test_unreachable_discovery_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), vec![guidance_criteria()]);
    let crawler = Crawler::new(&config).unwrap();

    match crawler.crawl(&guidance_criteria()).await {
        Err(CrawlError::Fetch(error)) => assert_eq!(error.attempts, 2),
        other => panic!("expected fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_duplicates_across_searches_are_merged() {
    let server = MockServer::start().await;
    let shared = listing_page(1, &row("Shared document", "/guidance/ng9", "NG9"));

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("ndt", "Guidance"))
        .respond_with(html(shared.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("ndt", "NICE advice"))
        .respond_with(html(shared))
        .mount(&server)
        .await;

    let advice = SearchCriteria {
        document_type: Some("NICE advice".to_string()),
        advice_programme: Some("Evidence summaries".to_string()),
        ..Default::default()
    };
    let mut config = test_config(&server.uri(), vec![guidance_criteria(), advice]);
    config.crawler.fetch_contents = false;

    let outcome = run_crawl(&config).await.unwrap();

    assert_eq!(outcome.raw_count, 2);
    assert_eq!(outcome.records.len(), 1);
    let record = &outcome.records[0];
    assert_eq!(record.reference, "NG9");
    assert_eq!(
        record.document_types,
        Some(vec!["Guidance".to_string(), "NICE advice".to_string()])
    );
    assert_eq!(
        record.programmes,
        Some(vec![
            "NICE guidelines".to_string(),
            "Evidence summaries".to_string()
        ])
    );
}

#[tokio::test]
async fn test_one_failed_search_does_not_stop_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("ndt", "Guidance"))
        .respond_with(html(listing_page(1, &row("Kept", "/guidance/ng1", "NG1"))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("ndt", "Broken"))
        .respond_with(html("<html><body>no pagination</body></html>"))
        .mount(&server)
        .await;

    let broken = SearchCriteria {
        document_type: Some("Broken".to_string()),
        ..Default::default()
    };
    let mut config = test_config(&server.uri(), vec![broken, guidance_criteria()]);
    config.crawler.fetch_contents = false;

    let outcome = run_crawl(&config).await.unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].0.document_type.as_deref(), Some("Broken"));
    assert!(!outcome.all_failed(config.search.len()));
}
