//! Integration tests for page download + extraction and result merging.
//!
//! HTTP is served by a local mock server; no live network access.

use credence_search::http::{build_client, fetch_html, MAX_PAGE_BYTES};
use credence_search::orchestrator::search::merge_engine_results;
use credence_search::{fetch_page_content, SearchConfig, SearchEngine, SearchError, SearchResult};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> SearchConfig {
    SearchConfig {
        timeout_seconds: 2,
        request_delay_ms: (0, 0),
        user_agent: Some("CredenceTest/1.0".into()),
        ..Default::default()
    }
}

fn hit(url: &str, engine: SearchEngine) -> SearchResult {
    SearchResult {
        title: url.to_string(),
        url: url.to_string(),
        snippet: String::new(),
        engine: engine.name().to_string(),
        score: 0.0,
    }
}

#[tokio::test]
async fn fetch_page_content_extracts_served_article() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/research/soil"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>Soil carbon review</title></head>\
             <body><nav>Menu</nav><article><p>Soil carbon stocks rose.</p></article></body></html>",
        ))
        .mount(&server)
        .await;

    let url = format!("{}/research/soil", server.uri());
    let page = fetch_page_content(&url, &test_config()).await.expect("page");
    assert_eq!(page.title.as_deref(), Some("Soil carbon review"));
    assert_eq!(page.text, "Soil carbon stocks rose.");
    assert_eq!(page.url, url);
}

#[tokio::test]
async fn fetch_page_content_reports_empty_pages_as_parse_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;

    let err = fetch_page_content(&format!("{}/blank", server.uri()), &test_config())
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Parse(_)));
}

#[tokio::test]
async fn fetch_page_content_times_out_on_slow_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>late</body></html>")
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = SearchConfig {
        timeout_seconds: 1,
        ..test_config()
    };
    let err = fetch_page_content(&format!("{}/slow", server.uri()), &config)
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Timeout(_)), "got {err}");
}

#[tokio::test]
async fn oversized_page_is_cut_at_byte_limit() {
    let server = MockServer::start().await;
    let oversized = format!("<html><body>{}</body></html>", "a".repeat(MAX_PAGE_BYTES * 2));
    Mock::given(method("GET"))
        .and(path("/huge"))
        .respond_with(ResponseTemplate::new(200).set_body_string(oversized))
        .mount(&server)
        .await;

    let client = build_client(&test_config()).expect("client");
    let body = fetch_html(&client, &format!("{}/huge", server.uri()))
        .await
        .expect("fetch");
    assert_eq!(body.len(), MAX_PAGE_BYTES);
    assert!(body.starts_with("<html><body>"));
}

#[test]
fn merged_results_are_sorted_and_unique() {
    let outcomes = vec![
        (
            SearchEngine::DuckDuckGo,
            Ok(vec![
                hit("https://a.edu/x", SearchEngine::DuckDuckGo),
                hit("https://b.org/y", SearchEngine::DuckDuckGo),
                hit("https://c.com/z", SearchEngine::DuckDuckGo),
            ]),
        ),
        (
            SearchEngine::Bing,
            Ok(vec![
                hit("https://c.com/z/", SearchEngine::Bing),
                hit("https://d.net/w", SearchEngine::Bing),
            ]),
        ),
    ];

    let merged = merge_engine_results(outcomes, 10).expect("merge");
    assert_eq!(merged.len(), 4);
    assert!(merged.windows(2).all(|w| w[0].score >= w[1].score));
}
