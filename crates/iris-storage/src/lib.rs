//! IRIS Storage Library
//!
//! Image store abstraction with S3 and local filesystem backends.
//!
//! # Storage key format
//!
//! Every backend writes objects under `images/{epoch_ms}-{filename}`, where
//! `filename` is the final path component of the client-supplied name. Key
//! generation lives in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use iris_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{PresignedObject, Storage, StorageError, StorageResult, StoredObject};
