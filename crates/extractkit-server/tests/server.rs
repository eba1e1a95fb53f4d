//! Router-level tests using tower's oneshot and a wiremock sidecar

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use extractkit::ExtractorConfig;
use extractkit_server::{build_app, AppState};

fn test_config(api_key: Option<&str>, crawler_url: &str) -> ExtractorConfig {
    ExtractorConfig {
        google_ai_api_key: api_key.map(str::to_string),
        crawler_url: crawler_url.to_string(),
        ..Default::default()
    }
}

async fn body_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_extract(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/extract")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_reports_configuration() {
    let state = AppState::from_config(test_config(None, "http://127.0.0.1:8001")).unwrap();
    let app = build_app(state);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["completion_configured"], false);
}

#[tokio::test]
async fn test_extract_without_api_key_is_500() {
    let state = AppState::from_config(test_config(None, "http://127.0.0.1:8001")).unwrap();
    let app = build_app(state);

    let response = app
        .oneshot(post_extract(json!({
            "url": "https://example.com",
            "strategy": "llm",
            "prompt": "list all product prices"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response.into_body()).await;
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("configuration error"));
}

#[tokio::test]
async fn test_extract_validation_failure_is_400() {
    let state = AppState::from_config(test_config(Some("key"), "http://127.0.0.1:8001")).unwrap();
    let app = build_app(state);

    let response = app
        .oneshot(post_extract(json!({
            "url": "https://example.com",
            "strategy": "llm",
            "prompt": "short"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response.into_body()).await;
    assert!(body["detail"].as_str().unwrap().contains("Prompt too short"));
}

#[tokio::test]
async fn test_extract_happy_path_returns_normalized_body() {
    let sidecar = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "extracted_content": [{"name": "Widget", "price": 9.99}]
        })))
        .mount(&sidecar)
        .await;

    let state = AppState::from_config(test_config(Some("key"), &sidecar.uri())).unwrap();
    let app = build_app(state);

    let response = app
        .oneshot(post_extract(json!({
            "url": "https://example.com",
            "strategy": "llm",
            "prompt": "list all product prices"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"][0]["name"], "Widget");
}

#[tokio::test]
async fn test_extract_crawl_failure_is_200_normalized() {
    let sidecar = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "navigation timeout"
        })))
        .mount(&sidecar)
        .await;

    let state = AppState::from_config(test_config(Some("key"), &sidecar.uri())).unwrap();
    let app = build_app(state);

    let response = app
        .oneshot(post_extract(json!({
            "url": "https://example.com",
            "strategy": "css_schema",
            "schema": {"price": "div.price"}
        })))
        .await
        .unwrap();

    // Crawl failures are normalized, not transport errors
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "navigation timeout");
}

#[tokio::test]
async fn test_extract_sidecar_down_is_500() {
    // Unroutable port: connection refused is an infrastructure fault
    let state =
        AppState::from_config(test_config(Some("key"), "http://127.0.0.1:1")).unwrap();
    let app = build_app(state);

    let response = app
        .oneshot(post_extract(json!({
            "url": "https://example.com",
            "strategy": "llm",
            "prompt": "list all product prices"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
