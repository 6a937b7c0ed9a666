//! Storage abstraction trait
//!
//! This module defines the Storage trait that all image store backends implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    Unsupported(String),
}

impl From<StorageError> for iris_core::AppError {
    fn from(err: StorageError) -> Self {
        use iris_core::AppError;
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("Object not found: {}", key)),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::Unsupported(msg) => AppError::BadRequest(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Location of an object written by the image store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    /// Public URL derived from bucket, region and key
    pub url: String,
    pub bucket: String,
}

/// A time-boxed URL the client can PUT bytes to, plus where they will land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedObject {
    pub upload_url: String,
    pub object: StoredObject,
}

/// Storage abstraction trait
///
/// All image store backends (S3, local filesystem) implement this trait so the
/// workflow never couples to a specific client.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload image bytes under a freshly generated key
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<StoredObject>;

    /// Issue a presigned PUT URL for a freshly generated key
    async fn presigned_upload(
        &self,
        filename: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<PresignedObject>;

    /// Read a whole object into memory
    async fn download(&self, storage_key: &str) -> StorageResult<Bytes>;

    /// Delete an object. Deleting a missing object succeeds.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Bucket name recorded on image records
    fn bucket(&self) -> &str;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;
    use iris_core::{AppError, ErrorMetadata};

    #[test]
    fn test_storage_errors_map_to_app_errors() {
        let err: AppError = StorageError::UploadFailed("AccessDenied".to_string()).into();
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert!(err.detail().contains("AccessDenied"));

        let err: AppError = StorageError::Unsupported("no presign".to_string()).into();
        assert_eq!(err.http_status_code(), 400);

        let err: AppError = StorageError::NotFound("images/x".to_string()).into();
        assert_eq!(err.http_status_code(), 404);
    }
}
