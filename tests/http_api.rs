use std::sync::Arc;

use autoaid_gateway::{backend::mock::MockBackend, build_app, state::AppState};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::util::ServiceExt;

fn app_with(backend: &MockBackend) -> Router {
    build_app(AppState::new(Arc::new(backend.clone())))
}

async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_owned()))
                .expect("request build"),
        )
        .await
        .expect("request execution");
    read_json(response).await
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .expect("request build"),
        )
        .await
        .expect("request execution");
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body should be readable");
    let body = serde_json::from_slice(&bytes).expect("response body should be JSON");
    (status, body)
}

#[tokio::test]
async fn code_is_uppercased_and_reply_sanitized() {
    let backend = MockBackend::replying("**Значение кода:** низкая эффективность катализатора");
    let (status, body) = post_json(app_with(&backend), "/code", r#"{"code":"p0420"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["result"],
        "Значение кода: низкая эффективность катализатора"
    );
    assert_eq!(backend.generate_calls(), 1);
    let prompts = backend.prompts().await;
    assert!(prompts[0].contains("P0420"));
    assert!(!prompts[0].contains("p0420"));
}

#[tokio::test]
async fn invalid_code_is_rejected_without_backend_call() {
    let backend = MockBackend::default();
    let (status, body) = post_json(app_with(&backend), "/code", r#"{"code":"X9999"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Неверный формат кода");
    assert_eq!(backend.generate_calls(), 0);
}

#[tokio::test]
async fn missing_code_is_distinct_from_bad_format() {
    let backend = MockBackend::default();
    let (status, body) = post_json(app_with(&backend), "/code", "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Необходим код ошибки");
    assert_eq!(backend.generate_calls(), 0);
}

#[tokio::test]
async fn diagnose_requires_problem() {
    let backend = MockBackend::default();
    let (status, body) =
        post_json(app_with(&backend), "/diagnose", r#"{"problem":"   "}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Необходимо описание проблемы");
    assert_eq!(backend.generate_calls(), 0);
}

#[tokio::test]
async fn part_search_requires_both_fields() {
    let backend = MockBackend::default();
    let (status, _) =
        post_json(app_with(&backend), "/part-search", r#"{"partName":"фильтр"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(
        app_with(&backend),
        "/part-search",
        r#"{"partName":"фильтр","carModel":"Toyota Camry 2020"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["result"].is_string());
    assert_eq!(backend.generate_calls(), 1);
}

#[tokio::test]
async fn backend_failure_maps_to_generic_500() {
    let backend = MockBackend::failing();
    let (status, body) = post_json(
        app_with(&backend),
        "/car-info",
        r#"{"carModel":"BMW X5 E70"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Ошибка при получении информации");
    assert!(!body["error"]
        .as_str()
        .unwrap_or_default()
        .contains("mock backend"));
    assert_eq!(backend.generate_calls(), 1);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let backend = MockBackend::default();
    let (status, body) = post_json(app_with(&backend), "/diagnose", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(backend.generate_calls(), 0);
}

#[tokio::test]
async fn status_reports_ok_and_offline() {
    let (status, body) = get_json(app_with(&MockBackend::default()), "/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let offline = MockBackend::default().with_health(false);
    let (status, body) = get_json(app_with(&offline), "/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "offline");
}

#[tokio::test]
async fn api_prefix_serves_same_routes() {
    let backend = MockBackend::replying("ответ");
    let (status, body) = post_json(
        app_with(&backend),
        "/api/diagnose",
        r#"{"problem":"машина троит"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "ответ");
}
