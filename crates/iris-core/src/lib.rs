//! IRIS Core Library
//!
//! This crate provides the domain models, error types and configuration
//! shared across all IRIS components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, IrisConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::{MetadataBackend, StorageBackend};
