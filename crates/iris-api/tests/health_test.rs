//! Health, docs and middleware integration tests.
//!
//! Run with: `cargo test -p iris-api --test health_test`

mod helpers;

use axum::http::StatusCode;
use helpers::setup_test_app;
use iris_services::test_helpers::MockVision;
use serde_json::Value;

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app(MockVision::new());

    let response = app.client().get("/api/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "healthy");
    assert_eq!(body["metadata"], "healthy");
    assert_eq!(body["aws"]["region"], "eu-north-1");
    assert_eq!(body["aws"]["s3Bucket"], "iris-test-bucket");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let app = setup_test_app(MockVision::new());

    let response = app.client().get("/api/health").await;

    let request_id = response.header("X-Request-ID");
    assert!(!request_id.is_empty());
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = setup_test_app(MockVision::new());

    let response = app
        .client()
        .get("/api/images")
        .add_header("X-Request-ID", "req-1234")
        .await;

    assert_eq!(response.header("X-Request-ID"), "req-1234");
}

#[tokio::test]
async fn test_request_id_on_errors() {
    let app = setup_test_app(MockVision::new());

    let response = app
        .client()
        .get("/api/images/missing")
        .add_header("X-Request-ID", "req-404")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.header("X-Request-ID"), "req-404");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app(MockVision::new());

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let spec: Value = response.json();
    assert_eq!(spec["info"]["title"], "IRIS API");
    assert!(spec["paths"]["/api/analysis/{id}/analyze"].is_object());
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin_by_default() {
    let app = setup_test_app(MockVision::new());

    let response = app
        .client()
        .method(axum::http::Method::OPTIONS, "/api/images")
        .add_header("Origin", "http://localhost:3000")
        .add_header("Access-Control-Request-Method", "GET")
        .await;

    assert_eq!(response.header("access-control-allow-origin"), "*");
}

#[tokio::test]
async fn test_lambda_routes_are_mounted_at_root() {
    let app = helpers::setup_lambda_app(MockVision::cat());
    let client = app.client();

    client.get("/health").await.assert_status(StatusCode::OK);

    let uploaded: Value = client
        .post("/images/upload")
        .multipart(helpers::fixtures::image_form(
            "cat.png",
            "image/png",
            helpers::fixtures::png_of_size(500),
        ))
        .await
        .json();
    let id = uploaded["image"]["id"].as_str().unwrap();

    client
        .post(&format!("/analysis/{}/analyze", id))
        .await
        .assert_status(StatusCode::OK);
    let stats: Value = client.get("/stats").await.json();
    assert_eq!(stats["stats"]["analyzed"], 1);

    client.get("/api/health").await.assert_status(StatusCode::NOT_FOUND);
}
