//! # Integration Tests for formwork-api
//!
//! Health probes, validated list queries, validated JSON bodies, structured
//! 422 responses, and the configured CORS policy.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use formwork_api::config::ApiConfig;
use formwork_api::state::AppState;
use formwork_config::{load, EnvSource};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_state(vars: &[(&str, &str)]) -> AppState {
    let mut env = vec![("DATABASE_URL".to_string(), "postgres://test@localhost/formwork".to_string())];
    env.extend(vars.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    let config = load::<ApiConfig>(&EnvSource::from_vars(env)).unwrap();
    AppState::new(config)
}

/// Helper: build the test app with default configuration.
fn test_app() -> axum::Router {
    formwork_api::app(test_state(&[]))
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let response = test_app().oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let response = test_app().oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Listing ------------------------------------------------------------------

#[tokio::test]
async fn test_list_defaults_to_first_page_of_twenty() {
    let response = test_app().oneshot(get("/v1/entries")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["pageIndex"], 0);
    assert_eq!(body["pageSize"], 20);
    assert_eq!(body["total"], 0);
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn test_list_reports_every_invalid_parameter() {
    let response = test_app()
        .oneshot(get("/v1/entries?pageSize=abc&from=nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["error"]["details"],
        json!([
            { "path": "pageSize", "reason": "TYPE_MISMATCH", "detail": "abc" },
            { "path": "from", "reason": "TYPE_MISMATCH", "detail": "nope" },
        ])
    );
}

#[tokio::test]
async fn test_list_rejects_fractional_page_size() {
    let response = test_app().oneshot(get("/v1/entries?pageSize=2.5")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["details"][0]["reason"], "CONSTRAINT_VIOLATION");
    assert_eq!(body["error"]["details"][0]["detail"], "int");
}

#[tokio::test]
async fn test_list_paginates_and_filters_by_date() {
    let app = test_app();
    for (title, day) in [
        ("a", "2026-01-01"),
        ("b", "2026-01-02"),
        ("c", "2026-01-03"),
        ("d", "2026-02-01"),
    ] {
        let response = app
            .clone()
            .oneshot(post_json("/v1/entries", json!({ "title": title, "recordedAt": day })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get("/v1/entries?from=2026-01-01&to=2026-01-31&pageSize=2&pageIndex=1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["pageIndex"], 1);
    let titles: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["c"]);
}

// -- Creation -----------------------------------------------------------------

#[tokio::test]
async fn test_create_and_fetch_entry() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/entries",
            json!({ "title": "deploy", "recordedAt": "2026-03-01T09:30:00Z" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["recordedAt"], "2026-03-01T09:30:00Z");

    let id = created["id"].as_str().unwrap();
    let response = app.oneshot(get(&format!("/v1/entries/{id}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "deploy");
}

#[tokio::test]
async fn test_create_rejects_invalid_body_fields() {
    let response = test_app()
        .oneshot(post_json("/v1/entries", json!({ "title": "", "recordedAt": "soon" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    let paths: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["title", "recordedAt"]);
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/entries")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_unknown_entry_is_not_found() {
    let uri = format!("/v1/entries/{}", uuid::Uuid::nil());
    let response = test_app().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- CORS ---------------------------------------------------------------------

#[tokio::test]
async fn test_no_cross_origin_access_by_default() {
    let request = Request::builder()
        .uri("/v1/entries")
        .header(header::ORIGIN, "https://app.example")
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_configured_origin_is_allowed() {
    let app = formwork_api::app(test_state(&[(
        "ALLOWED_ORIGINS",
        "https://app.example,https://admin.example",
    )]));
    let request = Request::builder()
        .uri("/v1/entries")
        .header(header::ORIGIN, "https://app.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://app.example"
    );
}
