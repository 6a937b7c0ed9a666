//! Image API integration tests.
//!
//! Run with: `cargo test -p iris-api --test images_test`

mod helpers;

use axum::http::StatusCode;
use helpers::fixtures::{create_minimal_png, image_form, png_of_size};
use helpers::{setup_local_app, setup_test_app, setup_test_app_with, test_config};
use iris_core::{Config, IrisConfig};
use iris_services::test_helpers::{MockStorage, MockVision};
use serde_json::{json, Value};

#[tokio::test]
async fn test_upload_image() {
    let app = setup_test_app(MockVision::new());
    let client = app.client();

    let response = client
        .post("/api/images/upload")
        .multipart(image_form("cat.png", "image/png", png_of_size(500)))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Image uploaded successfully");
    assert_eq!(body["image"]["name"], "cat.png");
    assert_eq!(body["image"]["size"], 500);
    assert_eq!(body["image"]["mimeType"], "image/png");
    assert_eq!(body["image"]["analyzed"], false);
    assert_eq!(body["image"]["aiTags"], json!([]));
    assert_eq!(body["image"]["bucket"], "iris-test-bucket");

    let key = body["image"]["s3Key"].as_str().unwrap();
    assert!(key.starts_with("images/") && key.ends_with("-cat.png"));
    assert!(app.storage.has_file(key));
}

#[tokio::test]
async fn test_upload_then_list() {
    let app = setup_test_app(MockVision::new());
    let client = app.client();

    client
        .post("/api/images/upload")
        .multipart(image_form("cat.png", "image/png", create_minimal_png()))
        .await
        .assert_status(StatusCode::CREATED);

    let response = client.get("/api/images").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["images"][0]["name"], "cat.png");
    assert_eq!(body["images"][0]["analyzed"], false);
}

#[tokio::test]
async fn test_list_empty() {
    let app = setup_test_app(MockVision::new());

    let body: Value = app.client().get("/api/images").await.json();
    assert_eq!(body, json!({ "success": true, "count": 0, "images": [] }));
}

#[tokio::test]
async fn test_upload_without_file_is_rejected() {
    let app = setup_test_app(MockVision::new());

    let form = axum_test::multipart::MultipartForm::new().add_text("caption", "no image here");
    let response = app.client().post("/api/images/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({ "success": false, "error": "No file uploaded", "code": "INVALID_INPUT" })
    );
    assert_eq!(app.storage.file_count(), 0);
}

#[tokio::test]
async fn test_upload_too_large() {
    let config = Config(Box::new(IrisConfig {
        max_file_size_bytes: 1024,
        ..(*test_config().0).clone()
    }));
    let app = setup_test_app_with(config, MockStorage::new(), MockVision::new());

    let response = app
        .client()
        .post("/api/images/upload")
        .multipart(image_form("big.png", "image/png", png_of_size(4096)))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(app.storage.file_count(), 0);
}

#[tokio::test]
async fn test_upload_storage_failure() {
    let app = setup_test_app_with(
        test_config(),
        MockStorage::failing_uploads(),
        MockVision::new(),
    );

    let response = app
        .client()
        .post("/api/images/upload")
        .multipart(image_form("cat.png", "image/png", create_minimal_png()))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "STORAGE_ERROR");

    let list: Value = app.client().get("/api/images").await.json();
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn test_get_image() {
    let app = setup_test_app(MockVision::new());
    let client = app.client();

    let uploaded: Value = client
        .post("/api/images/upload")
        .multipart(image_form("dog.jpg", "image/jpeg", create_minimal_png()))
        .await
        .json();
    let id = uploaded["image"]["id"].as_str().unwrap();

    let response = client.get(&format!("/api/images/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["image"], uploaded["image"]);
}

#[tokio::test]
async fn test_get_unknown_image_is_not_found() {
    let app = setup_test_app(MockVision::new());

    let response = app.client().get("/api/images/does-not-exist").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({ "success": false, "error": "Image not found", "code": "NOT_FOUND" })
    );
}

#[tokio::test]
async fn test_delete_image() {
    let app = setup_test_app(MockVision::new());
    let client = app.client();

    let uploaded: Value = client
        .post("/api/images/upload")
        .multipart(image_form("cat.png", "image/png", create_minimal_png()))
        .await
        .json();
    let id = uploaded["image"]["id"].as_str().unwrap();
    let key = uploaded["image"]["s3Key"].as_str().unwrap();

    let response = client.delete(&format!("/api/images/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({ "success": true, "message": "Image deleted successfully", "id": id })
    );
    assert!(!app.storage.has_file(key));

    client
        .get(&format!("/api/images/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    let list: Value = client.get("/api/images").await.json();
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn test_delete_survives_storage_failure() {
    let app = setup_test_app_with(
        test_config(),
        MockStorage::failing_deletes(),
        MockVision::new(),
    );
    let client = app.client();

    let uploaded: Value = client
        .post("/api/images/upload")
        .multipart(image_form("cat.png", "image/png", create_minimal_png()))
        .await
        .json();
    let id = uploaded["image"]["id"].as_str().unwrap();

    client
        .delete(&format!("/api/images/{}", id))
        .await
        .assert_status(StatusCode::OK);
    client
        .get(&format!("/api/images/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_image_is_not_found() {
    let app = setup_test_app(MockVision::new());

    app.client()
        .delete("/api/images/missing")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_presign_defaults() {
    let app = setup_test_app(MockVision::new());

    let response = app.client().post("/api/images/presign").json(&json!({})).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert!(body["uploadUrl"]
        .as_str()
        .unwrap()
        .contains("X-Amz-Expires=300"));
    assert_eq!(body["contentType"], "image/jpeg");
    assert_eq!(body["image"]["name"], "upload.jpg");
    assert_eq!(body["image"]["mimeType"], "image/jpeg");
    assert_eq!(body["image"]["analyzed"], false);
    assert!(body["image"].get("size").is_none() || body["image"]["size"].is_null());
}

#[tokio::test]
async fn test_presign_creates_record() {
    let app = setup_test_app(MockVision::new());
    let client = app.client();

    let body: Value = client
        .post("/api/images/presign")
        .json(&json!({ "filename": "beach.png", "contentType": "image/png" }))
        .await
        .json();
    assert_eq!(body["contentType"], "image/png");
    assert_eq!(body["image"]["name"], "beach.png");
    assert_eq!(body["image"]["mimeType"], "image/png");
    assert!(body["image"]["s3Key"]
        .as_str()
        .unwrap()
        .ends_with("-beach.png"));

    let list: Value = client.get("/api/images").await.json();
    assert_eq!(list["count"], 1);
    assert_eq!(list["images"][0]["id"], body["image"]["id"]);
}

#[tokio::test]
async fn test_presign_invalid_body() {
    let app = setup_test_app(MockVision::new());

    let response = app
        .client()
        .post("/api/images/presign")
        .json(&json!({ "filename": 42 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_presign_requires_s3_backend() {
    let app = setup_local_app(MockVision::new()).await;

    let response = app
        .server
        .post("/api/images/presign")
        .json(&json!({ "filename": "cat.png" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(
        body["error"],
        "Presigned uploads are only available with the S3 storage backend"
    );
}

#[tokio::test]
async fn test_local_backend_upload() {
    let app = setup_local_app(MockVision::new()).await;

    let response = app
        .server
        .post("/api/images/upload")
        .multipart(image_form("cat.png", "image/png", create_minimal_png()))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["image"]["bucket"], "local");
    assert!(body["image"]["s3Url"]
        .as_str()
        .unwrap()
        .starts_with("http://localhost:5000/files/images/"));
}
