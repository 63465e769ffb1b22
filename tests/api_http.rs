// tests/api_http.rs
//
// HTTP-level tests for the public Router without opening sockets; the
// router is exercised directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - GET /api/trends (single-source and search query params)
// - GET /api/health

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use trendscope::aggregator::Aggregator;
use trendscope::api::{self, AppState};
use trendscope::config::SourcesConfig;
use trendscope::fallback::FallbackProvider;
use trendscope::sources::SourceRegistry;
use trendscope::testing::{topics, MockAdapter};

const BODY_LIMIT: usize = 1024 * 1024;

/// Router over a registry of mocks: reddit healthy, youtube unconfigured.
fn test_router() -> Router {
    let mut reg = SourceRegistry::new(SourcesConfig::default_seed());
    reg.register(Arc::new(MockAdapter::ok("reddit", topics("reddit", 5, 60.0))));
    reg.register(Arc::new(MockAdapter::unavailable("youtube")));
    let registry = Arc::new(reg);
    let aggregator = Arc::new(Aggregator::new(
        registry.clone(),
        FallbackProvider::embedded(),
    ));
    api::create_router(AppState::new(aggregator, registry))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).expect("parse json");
    (status, v)
}

#[tokio::test]
async fn health_returns_200() {
    let app = test_router();
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");
    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn trends_single_source_returns_sorted_topics() {
    let (status, v) = get_json(test_router(), "/api/trends?platform=reddit").await;
    assert_eq!(status, StatusCode::OK);

    let arr = v.as_array().expect("array body");
    assert_eq!(arr.len(), 5);
    for t in arr {
        assert_eq!(t["platform"], "reddit");
        assert!(t.get("title").is_some(), "missing 'title'");
        assert!(t.get("score").is_some(), "missing 'score'");
        assert!(t.get("fetchedAt").is_some(), "missing 'fetchedAt'");
    }
}

#[tokio::test]
async fn trends_for_unconfigured_source_serves_fallback_not_error() {
    let (status, v) = get_json(test_router(), "/api/trends?platform=youtube").await;
    assert_eq!(status, StatusCode::OK);

    let arr = v.as_array().expect("array body");
    assert!(!arr.is_empty());
    assert!(arr[0]["id"].as_str().unwrap().starts_with("youtube-fallback"));
}

#[tokio::test]
async fn trends_search_uses_the_search_strategy() {
    // Hold on to the reddit mock so the strategy choice is observable.
    let mut reg = SourceRegistry::new(SourcesConfig::default_seed());
    let reddit = Arc::new(MockAdapter::ok("reddit", topics("reddit", 5, 60.0)));
    reg.register(reddit.clone());
    let registry = Arc::new(reg);
    let aggregator = Arc::new(Aggregator::new(
        registry.clone(),
        FallbackProvider::embedded(),
    ));
    let app = api::create_router(AppState::new(aggregator, registry));

    let (status, v) = get_json(app, "/api/trends?search=rust").await;
    assert_eq!(status, StatusCode::OK);

    let arr = v.as_array().expect("array body");
    assert_eq!(arr.len(), 5, "reddit's search results must come through");
    assert!(arr.iter().all(|t| t["platform"] == "reddit"));
    assert_eq!(reddit.search_calls(), 1, "must hit the search path");
    assert_eq!(reddit.fetch_calls(), 0, "must not fall back to a broad scan");
}

#[tokio::test]
async fn api_health_reports_every_source() {
    let (status, v) = get_json(test_router(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);

    // One entry per configured descriptor, adapter or not.
    let arr = v.as_array().expect("array body");
    assert_eq!(arr.len(), 8);

    let by_name = |name: &str| {
        arr.iter()
            .find(|e| e["name"] == name)
            .unwrap_or_else(|| panic!("missing {name}"))
            .clone()
    };
    assert_eq!(by_name("reddit")["status"], "available");
    assert_eq!(by_name("youtube")["status"], "unavailable");
    assert!(by_name("youtube")["message"]
        .as_str()
        .unwrap()
        .contains("not configured"));
    assert_eq!(by_name("hackernews")["status"], "error");
}
