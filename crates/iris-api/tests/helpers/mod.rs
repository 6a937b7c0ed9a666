//! Test helpers: build AppState and router for integration tests.
//!
//! No AWS account is needed. Metadata lives in a `MemoryStore`, vision is a
//! `MockVision`, and storage is either `MockStorage` or a `LocalStorage` in a
//! temp directory.
//!
//! Run from workspace root: `cargo test -p iris-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use iris_api::setup::routes;
use iris_api::state::AppState;
use iris_core::{Config, IrisConfig, MetadataBackend, StorageBackend};
use iris_services::test_helpers::{
    create_test_workflow_with_storage, test_settings, MockStorage, MockVision,
};
use iris_services::{ImageWorkflow, LocalStorage, MemoryStore};
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server plus handles onto the fakes behind it.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<MockStorage>,
    pub metadata: Arc<MemoryStore>,
    pub vision: Arc<MockVision>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config() -> Config {
    Config(Box::new(IrisConfig {
        s3_bucket: Some("iris-test-bucket".to_string()),
        metadata_backend: MetadataBackend::Memory,
        ..IrisConfig::default()
    }))
}

fn test_server(config: Config, workflow: ImageWorkflow) -> TestServer {
    let state = Arc::new(AppState::new(config.clone(), workflow));
    let router = routes::setup_routes(&config, state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to start test server")
}

/// Setup test app with mocked storage and vision.
pub fn setup_test_app(vision: MockVision) -> TestApp {
    setup_test_app_with(test_config(), MockStorage::new(), vision)
}

pub fn setup_test_app_with(config: Config, storage: MockStorage, vision: MockVision) -> TestApp {
    let test = create_test_workflow_with_storage(storage, vision);
    TestApp {
        server: test_server(config, test.workflow),
        storage: test.storage,
        metadata: test.metadata,
        vision: test.vision,
    }
}

/// Router as the Lambda entry point serves it: no `/api` prefix.
pub fn setup_lambda_app(vision: MockVision) -> TestApp {
    let config = test_config();
    let test = create_test_workflow_with_storage(MockStorage::new(), vision);
    let state = Arc::new(AppState::new(config.clone(), test.workflow));
    let router = routes::lambda_routes(&config, state);
    TestApp {
        server: TestServer::new(router).expect("Failed to start test server"),
        storage: test.storage,
        metadata: test.metadata,
        vision: test.vision,
    }
}

/// Test application backed by the filesystem store.
pub struct LocalTestApp {
    pub server: TestServer,
    pub _temp_dir: TempDir,
}

pub async fn setup_local_app(vision: MockVision) -> LocalTestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let base_url = "http://localhost:5000/files".to_string();
    let storage = LocalStorage::new(temp_dir.path(), base_url.clone())
        .await
        .expect("Failed to create local storage");

    let config = Config(Box::new(IrisConfig {
        storage_backend: StorageBackend::Local,
        local_storage_path: Some(temp_dir.path().to_string_lossy().to_string()),
        local_storage_base_url: Some(base_url),
        metadata_backend: MetadataBackend::Memory,
        ..IrisConfig::default()
    }));

    let workflow = ImageWorkflow::new(
        Arc::new(storage),
        Arc::new(MemoryStore::new()),
        Arc::new(vision),
        test_settings(),
    );

    LocalTestApp {
        server: test_server(config, workflow),
        _temp_dir: temp_dir,
    }
}
