use crate::common::{hits, html, test_user_agent};
use guidance_crawler::crawler::{build_http_client, FetchErrorKind, Fetcher, RateLimiter};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(max_attempts: u32) -> Fetcher {
    let client = build_http_client(&test_user_agent(), Duration::from_secs(5)).unwrap();
    Fetcher::new(client, max_attempts, Arc::new(RateLimiter::disabled()))
}

/// Mounts `failures` 500 responses followed by a success at `route`
async fn flaky(server: &MockServer, route: &str, failures: u64) {
    if failures > 0 {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(failures)
            .with_priority(1)
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html("<html><body>ok</body></html>"))
        .with_priority(2)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_succeeds_when_failures_fit_the_budget() {
    let server = MockServer::start().await;
    flaky(&server, "/flaky", 2).await;

    let fetcher = fetcher(3);
    let url = Url::parse(&format!("{}/flaky", server.uri())).unwrap();
    let page = fetcher.fetch(&url).await.unwrap();

    assert_eq!(page.status, 200);
    assert!(page.body.contains("ok"));
    assert_eq!(hits(&server, "/flaky").await, 3);
    // one pause before each retry, one after the success
    assert_eq!(fetcher.rate_limiter().pauses(), 3);
}

#[tokio::test]
async fn test_fetch_gives_up_after_budget() {
    let server = MockServer::start().await;
    flaky(&server, "/flaky", 3).await;

    let fetcher = fetcher(3);
    let url = Url::parse(&format!("{}/flaky", server.uri())).unwrap();
    let error = fetcher.fetch(&url).await.unwrap_err();

    assert_eq!(error.attempts, 3);
    assert_eq!(error.kind, FetchErrorKind::HttpStatus(500));
    assert_eq!(hits(&server, "/flaky").await, 3);
}

#[tokio::test]
async fn test_first_try_success_issues_one_request() {
    let server = MockServer::start().await;
    flaky(&server, "/steady", 0).await;

    let fetcher = fetcher(3);
    let url = Url::parse(&format!("{}/steady", server.uri())).unwrap();
    fetcher.fetch(&url).await.unwrap();

    assert_eq!(hits(&server, "/steady").await, 1);
    assert_eq!(fetcher.rate_limiter().pauses(), 1);
}

#[tokio::test]
async fn test_client_error_is_retried_on_listing_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = fetcher(2);
    let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
    let error = fetcher.fetch(&url).await.unwrap_err();

    assert_eq!(error.kind, FetchErrorKind::HttpStatus(404));
    assert_eq!(error.attempts, 2);
    assert_eq!(hits(&server, "/missing").await, 2);
}

#[tokio::test]
async fn test_user_agent_header_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(html("<html></html>"))
        .mount(&server)
        .await;

    let fetcher = fetcher(1);
    let url = Url::parse(&format!("{}/ua", server.uri())).unwrap();
    assert!(fetcher.fetch(&url).await.is_ok());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("<html></html>").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let client = build_http_client(&test_user_agent(), Duration::from_millis(200)).unwrap();
    let fetcher = Fetcher::new(client, 1, Arc::new(RateLimiter::disabled()));
    let url = Url::parse(&format!("{}/slow", server.uri())).unwrap();
    let error = fetcher.fetch(&url).await.unwrap_err();

    assert_eq!(error.kind, FetchErrorKind::Timeout);
    assert_eq!(error.attempts, 1);
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    // bind and drop a listener so the port is closed
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let fetcher = fetcher(1);
    let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();
    let error = fetcher.fetch(&url).await.unwrap_err();

    assert_eq!(error.kind, FetchErrorKind::Network);
    assert!(error.kind.is_transient());
}
