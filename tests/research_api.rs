//! End-to-end API tests: real pipeline components against mocked upstreams

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use common::*;
use research_agent::config::Settings;
use research_agent::content::ContentFetcher;
use research_agent::engines::EngineLoader;
use research_agent::history::{HistoryStore, SqliteHistoryStore};
use research_agent::network::HttpClient;
use research_agent::research::{ResearchOptions, Researcher};
use research_agent::search::EngineSearchClient;
use research_agent::summarize::GeminiSummarizer;
use research_agent::web::{create_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestApp {
    router: Router,
    store: Arc<SqliteHistoryStore>,
}

async fn build_app(settings: Settings) -> TestApp {
    let client = HttpClient::with_settings(&settings.outgoing).unwrap();
    let engine = EngineLoader::load(&settings.search).unwrap();
    let search = EngineSearchClient::new(client.clone(), engine)
        .with_timeout(Duration::from_secs_f64(settings.search.timeout_secs));
    let extractor = ContentFetcher::new(client.clone(), &settings.extractor);
    let summarizer = GeminiSummarizer::new(client, &settings.summarizer).unwrap();
    let store = Arc::new(SqliteHistoryStore::connect(&settings.database).await.unwrap());

    let researcher = Researcher::new(
        Arc::new(search),
        Arc::new(extractor),
        Arc::new(summarizer),
        store.clone(),
        ResearchOptions::from_settings(&settings),
    );
    let history: Arc<dyn HistoryStore> = store.clone();
    let router = create_router(AppState::new(settings, researcher, history));

    TestApp { router, store }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_research(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/research")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_research_then_history() {
    let server = MockServer::start().await;
    mount_search(&server, 5).await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(gemini_reply("- Paris is the capital of France."))
        .expect(1)
        .mount(&server)
        .await;
    let app = build_app(settings_for(&server)).await;

    let (status, run) = send(
        &app.router,
        post_research(json!({ "text": "capital of France", "num_results": 3 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(run["query"], "capital of France");
    assert_eq!(run["summary"], "- Paris is the capital of France.");
    let results = run["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result["title"], format!("Result {}", i + 1));
    }
    let id = run["id"].as_i64().unwrap();

    // The corpus lists pages in ranking order
    let requests = server.received_requests().await.unwrap();
    let gemini = requests
        .iter()
        .find(|r| r.url.path() == GEMINI_PATH)
        .unwrap();
    let body: Value = serde_json::from_slice(&gemini.body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    let first = prompt.find("Article body number 1.").unwrap();
    let third = prompt.find("Article body number 3.").unwrap();
    assert!(first < third);
    assert!(!prompt.contains("Article body number 4."));

    let (status, history) = send(&app.router, get("/history")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history[0], run);

    let (status, item) = send(&app.router, get(&format!("/history/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item, run);
}

#[tokio::test]
async fn test_research_uses_default_result_count() {
    let server = MockServer::start().await;
    mount_search(&server, 8).await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(gemini_reply("- summary"))
        .mount(&server)
        .await;
    let app = build_app(settings_for(&server)).await;

    let (status, run) = send(&app.router, post_research(json!({ "text": "rust" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(run["results"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_research_without_results_skips_summarizer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(html_response("<html><body></body></html>".to_string()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(gemini_reply("- unused"))
        .expect(0)
        .mount(&server)
        .await;
    let app = build_app(settings_for(&server)).await;

    let (status, run) = send(&app.router, post_research(json!({ "text": "zzzxqv" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(run["results"].as_array().unwrap().is_empty());
    assert_eq!(run["summary"], research_agent::research::NO_RESULTS_SUMMARY);
    assert!(run["id"].is_i64());
}

#[tokio::test]
async fn test_research_rejects_bad_input() {
    let server = MockServer::start().await;
    let app = build_app(settings_for(&server)).await;

    for body in [
        json!({ "text": "" }),
        json!({ "text": "   " }),
        json!({ "text": "q", "num_results": 0 }),
        json!({ "text": "q", "num_results": 11 }),
        json!({ "num_results": 3 }),
    ] {
        let (status, error) = send(&app.router, post_research(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error["message"].is_string());
    }

    let malformed = Request::builder()
        .method(Method::POST)
        .uri("/research")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app.router, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing reached the upstreams and nothing was stored
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(app.store.list_recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_research_search_failure_is_500() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let app = build_app(settings_for(&server)).await;

    let (status, error) = send(&app.router, post_research(json!({ "text": "q" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error["message"].as_str().unwrap().starts_with("Search failed"));
    assert!(app.store.list_recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_research_summarizer_failure_is_500() {
    let server = MockServer::start().await;
    mount_search(&server, 2).await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    let app = build_app(settings_for(&server)).await;

    let (status, error) = send(&app.router, post_research(json!({ "text": "q" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error["message"].as_str().unwrap().contains("quota"));
    assert!(app.store.list_recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_research_timeout_is_504_and_not_stored() {
    let server = MockServer::start().await;
    mount_search(&server, 2).await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(gemini_reply("- late").set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let mut settings = settings_for(&server);
    settings.research.timeout_secs = 0.5;
    let app = build_app(settings).await;

    let (status, error) = send(&app.router, post_research(json!({ "text": "q" }))).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(error["message"].is_string());
    assert!(app.store.list_recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_slow_page_does_not_abort_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(html_response(results_page(&server, 2)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html_response(article(1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html_response(article(2)).set_delay(Duration::from_secs(4)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(gemini_reply("- partial"))
        .mount(&server)
        .await;

    // The page timeout alone would outlast the run
    let mut settings = settings_for(&server);
    settings.research.timeout_secs = 2.0;
    settings.extractor.timeout_secs = 15.0;
    let app = build_app(settings).await;

    let (status, run) = send(
        &app.router,
        post_research(json!({ "text": "q", "num_results": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(run["results"].as_array().unwrap().len(), 2);

    let requests = server.received_requests().await.unwrap();
    let gemini = requests
        .iter()
        .find(|r| r.url.path() == GEMINI_PATH)
        .unwrap();
    let body: Value = serde_json::from_slice(&gemini.body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("Article body number 1."));
    assert!(prompt.contains("Snippet for result 2"));
    assert!(!prompt.contains("Article body number 2."));
}

#[tokio::test]
async fn test_unreadable_pages_fall_back_to_snippets() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(html_response(results_page(&server, 2)))
        .mount(&server)
        .await;
    // No page mocks: every fetch gets a 404
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(gemini_reply("- from snippets"))
        .mount(&server)
        .await;
    let app = build_app(settings_for(&server)).await;

    let (status, run) = send(&app.router, post_research(json!({ "text": "q" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(run["results"].as_array().unwrap().len(), 2);

    let requests = server.received_requests().await.unwrap();
    let gemini = requests
        .iter()
        .find(|r| r.url.path() == GEMINI_PATH)
        .unwrap();
    let body: Value = serde_json::from_slice(&gemini.body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("Snippet for result 1"));
    assert!(prompt.contains("Snippet for result 2"));
}

#[tokio::test]
async fn test_history_listing_and_lookup() {
    let server = MockServer::start().await;
    let app = build_app(settings_for(&server)).await;

    let (status, history) = send(&app.router, get("/history")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history, json!([]));

    for i in 0..3 {
        let run = research_agent::ResearchRun::new(format!("query {}", i), vec![], "- s");
        app.store.append(&run).await.unwrap();
    }

    let (_, history) = send(&app.router, get("/history?limit=2")).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["query"], "query 2");
    assert_eq!(history[1]["query"], "query 1");

    let (status, error) = send(&app.router, get("/history/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["message"], "Not found");
}

#[tokio::test]
async fn test_history_bad_parameters_get_json_errors() {
    let server = MockServer::start().await;
    let app = build_app(settings_for(&server)).await;

    for uri in ["/history?limit=x", "/history?limit=-1", "/history/abc"] {
        let (status, error) = send(&app.router, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(error["message"].is_string(), "{}", uri);
    }
}

#[tokio::test]
async fn test_root_health_and_cors() {
    let server = MockServer::start().await;
    let app = build_app(settings_for(&server)).await;

    let (status, body) = send(&app.router, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "API is live" }));

    let (status, body) = send(&app.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/research")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(preflight).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
}
