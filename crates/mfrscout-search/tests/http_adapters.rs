//! Integration tests for the HTTP-backed search provider and page fetcher.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made.

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mfrscout_search::{
    DuckDuckGoSearch, FetchError, HttpFetcher, PageFetcher, SearchError, SearchProvider,
};

fn test_search(server: &MockServer) -> DuckDuckGoSearch {
    DuckDuckGoSearch::new(&format!("{}/html/", server.uri()), 5, "mfrscout-test/0.1", 0, 0)
        .expect("failed to build test DuckDuckGoSearch")
}

fn results_page(entries: &[(&str, &str, &str)]) -> String {
    let mut html = String::from("<html><body>");
    for (title, url, snippet) in entries {
        html.push_str(&format!(
            r#"<div class="result web-result"><h2 class="result__title"><a rel="nofollow" class="result__a" href="{url}">{title}</a></h2><a class="result__snippet" href="{url}">{snippet}</a></div>"#
        ));
    }
    html.push_str("</body></html>");
    html
}

// ---------------------------------------------------------------------------
// Search provider
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_sends_query_and_parses_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", "\"CL10C330JB8NNNC\""))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&[
            (
                "CL10C330JB8NNNC | Samsung Electro-Mechanics",
                "https://www.samsungsem.com/product/CL10C330JB8NNNC",
                "Multilayer ceramic capacitor",
            ),
            ("Datasheet", "https://datasheets.example.com/cl10", "PDF 33pF"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let results = test_search(&server)
        .search("\"CL10C330JB8NNNC\"", 8)
        .await
        .expect("search succeeds");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "CL10C330JB8NNNC | Samsung Electro-Mechanics");
    assert_eq!(
        results[0].url.as_deref(),
        Some("https://www.samsungsem.com/product/CL10C330JB8NNNC")
    );
    assert_eq!(results[1].snippet, "PDF 33pF");
}

#[tokio::test]
async fn search_with_no_hits_is_empty_not_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<div class="no-results">No results.</div>"#),
        )
        .mount(&server)
        .await;

    let results = test_search(&server).search("\"ZZZ-NOPE\"", 8).await;
    assert!(results.is_ok(), "expected Ok, got: {results:?}");
    assert!(results.unwrap().is_empty());
}

#[tokio::test]
async fn search_server_error_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = test_search(&server).search("anything", 5).await;
    assert!(
        matches!(result, Err(SearchError::Unavailable(_))),
        "expected Unavailable, got: {result:?}"
    );
}

#[tokio::test]
async fn search_bot_check_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(
            ResponseTemplate::new(202)
                .set_body_string(r#"<div class="anomaly-modal__title">Unfortunately, bots use DuckDuckGo too.</div>"#),
        )
        .mount(&server)
        .await;

    let result = test_search(&server).search("anything", 5).await;
    assert!(
        matches!(result, Err(SearchError::Unavailable(_))),
        "expected Unavailable, got: {result:?}"
    );
}

#[tokio::test]
async fn search_rate_limit_is_retried_then_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;

    let search = DuckDuckGoSearch::new(&format!("{}/html/", server.uri()), 5, "t/0.1", 1, 0)
        .expect("client builds");
    let result = search.search("anything", 5).await;
    assert!(
        matches!(result, Err(SearchError::RateLimited { .. })),
        "expected RateLimited, got: {result:?}"
    );
}

#[tokio::test]
async fn search_unreachable_host_is_http_error() {
    let search = DuckDuckGoSearch::new("http://127.0.0.1:9/html/", 1, "t/0.1", 0, 0)
        .expect("client builds");
    let result = search.search("anything", 5).await;
    assert!(
        matches!(result, Err(SearchError::Http(_))),
        "expected Http, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Page fetcher
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetcher_returns_html_body_with_configured_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/product"))
        .and(header("user-agent", "agent-one/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(5, &["agent-one/1.0".to_string()]).expect("fetcher builds");
    let body = fetcher
        .fetch(&format!("{}/product", server.uri()))
        .await
        .expect("fetch succeeds");
    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn fetcher_tries_next_agent_after_block() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/product"))
        .and(header("user-agent", "blocked/1.0"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/product"))
        .and(header("user-agent", "allowed/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>hello</html>"))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(5, &["blocked/1.0".to_string(), "allowed/1.0".to_string()])
        .expect("fetcher builds");
    let body = fetcher
        .fetch(&format!("{}/product", server.uri()))
        .await
        .expect("second agent should succeed");
    assert_eq!(body, "<html>hello</html>");
}

#[tokio::test]
async fn fetcher_reports_status_when_every_agent_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(5, &["a/1".to_string()]).expect("fetcher builds");
    let result = fetcher.fetch(&format!("{}/gone", server.uri())).await;
    assert!(
        matches!(result, Err(FetchError::UnexpectedStatus { status: 404, .. })),
        "expected UnexpectedStatus(404), got: {result:?}"
    );
}

#[tokio::test]
async fn fetcher_rejects_challenge_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/guarded"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<title>Attention Required! | Cloudflare</title>",
        ))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(5, &["a/1".to_string()]).expect("fetcher builds");
    let result = fetcher.fetch(&format!("{}/guarded", server.uri())).await;
    assert!(
        matches!(result, Err(FetchError::Unusable { .. })),
        "expected Unusable, got: {result:?}"
    );
}
