// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET / and GET /health (artifact presence flags)
// - POST /score error mapping: 400, 422, 502

mod common;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use common::{StubSource, BASELINE_TEXT, BODY_LIMIT};
use credibility_scorer::api;

const SHORT_URL: &str = "https://news.example.com/short";
const OK_URL: &str = "https://news.example.com/ok";

fn test_router(dir: &std::path::Path) -> Router {
    let source = StubSource::default()
        .with_page(SHORT_URL, "Too short to score.", Some("Short"))
        .with_page(OK_URL, BASELINE_TEXT, None);
    api::router(common::state_with(source, dir.to_path_buf()))
}

async fn read_json(resp: axum::response::Response) -> Json {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn post_score(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/score")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build POST /score")
}

#[tokio::test]
async fn health_reports_artifact_presence() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    for uri in ["/", "/health"] {
        let req = Request::get(uri).body(Body::empty()).unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let v = read_json(resp).await;
        assert_eq!(v["status"], "ok");
        assert_eq!(v["bow"], false);
        assert_eq!(v["rf"], false);
    }

    std::fs::write(dir.path().join("bow_vectorizer.json"), "{}").unwrap();
    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let v = read_json(resp).await;
    assert_eq!(v["bow"], true);
    assert_eq!(v["rf"], false);
}

#[tokio::test]
async fn invalid_urls_are_rejected_with_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    for body in [
        r#"{"url":"ftp://example.com/a"}"#,
        r#"{"url":"not a url"}"#,
        r#"{"url":""}"#,
        r#"{}"#,
        r#"{"url": 42"#,
    ] {
        let resp = app.clone().oneshot(post_score(body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
        let v = read_json(resp).await;
        assert!(v["error"].as_str().is_some_and(|e| !e.is_empty()));
    }
}

#[tokio::test]
async fn unreachable_article_maps_to_502() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let resp = app
        .oneshot(post_score(r#"{"url":"https://news.example.com/missing"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let v = read_json(resp).await;
    assert!(v["error"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn short_article_maps_to_422() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let resp = app
        .oneshot(post_score(&format!(r#"{{"url":"{SHORT_URL}"}}"#)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let v = read_json(resp).await;
    assert!(v["error"].as_str().unwrap().contains("too short"));
}

#[tokio::test]
async fn score_without_title_omits_nothing_required() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let resp = app
        .oneshot(post_score(&format!(r#"{{"url":"{OK_URL}"}}"#)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v = read_json(resp).await;
    for key in ["url", "categories", "total", "rfProb", "classification", "classificationLabel", "modelVersion"] {
        assert!(v.get(key).is_some(), "missing '{key}'");
    }
    assert!(v["title"].is_null());
}
