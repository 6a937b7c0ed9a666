//! Mock Storage implementation for testing

use async_trait::async_trait;
use bytes::Bytes;
use iris_storage::keys::generate_image_key;
use iris_storage::{
    PresignedObject, Storage, StorageBackend, StorageError, StorageResult, StoredObject,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const MOCK_BUCKET: &str = "iris-test-bucket";

/// Mock storage implementation that keeps objects in memory
pub struct MockStorage {
    files: Arc<Mutex<HashMap<String, Bytes>>>,
    fail_deletes: AtomicBool,
    fail_uploads: AtomicBool,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            fail_deletes: AtomicBool::new(false),
            fail_uploads: AtomicBool::new(false),
        }
    }

    /// Make every delete fail with a backend error
    pub fn failing_deletes() -> Self {
        let storage = Self::new();
        storage.fail_deletes.store(true, Ordering::SeqCst);
        storage
    }

    /// Make every upload fail with a backend error
    pub fn failing_uploads() -> Self {
        let storage = Self::new();
        storage.fail_uploads.store(true, Ordering::SeqCst);
        storage
    }

    /// Check if a file exists in the mock storage
    pub fn has_file(&self, key: &str) -> bool {
        self.files.lock().unwrap().contains_key(key)
    }

    /// Get file data (for test assertions)
    pub fn get_file(&self, key: &str) -> Option<Bytes> {
        self.files.lock().unwrap().get(key).cloned()
    }

    /// Simulate a client PUT to a presigned URL
    pub fn set_file(&self, key: &str, data: Bytes) {
        self.files.lock().unwrap().insert(key.to_string(), data);
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    fn stored(key: String) -> StoredObject {
        StoredObject {
            url: format!("https://{}.s3.test.amazonaws.com/{}", MOCK_BUCKET, key),
            bucket: MOCK_BUCKET.to_string(),
            key,
        }
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn upload(
        &self,
        filename: &str,
        _content_type: &str,
        data: Bytes,
    ) -> StorageResult<StoredObject> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("mock upload failure".to_string()));
        }
        let key = generate_image_key(filename);
        self.files.lock().unwrap().insert(key.clone(), data);
        Ok(Self::stored(key))
    }

    async fn presigned_upload(
        &self,
        filename: &str,
        _content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<PresignedObject> {
        let object = Self::stored(generate_image_key(filename));
        Ok(PresignedObject {
            upload_url: format!(
                "{}?X-Amz-Expires={}&X-Amz-Signature=mock",
                object.url,
                expires_in.as_secs()
            ),
            object,
        })
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Bytes> {
        self.files
            .lock()
            .unwrap()
            .get(storage_key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed("mock delete failure".to_string()));
        }
        self.files.lock().unwrap().remove(storage_key);
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.has_file(storage_key))
    }

    fn bucket(&self) -> &str {
        MOCK_BUCKET
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
