//! IRIS Services Layer
//!
//! The image workflow (upload, presign, analyze, list, get, delete, stats) is
//! implemented once here and shared by the HTTP server, the Lambda entry
//! point and the CLI. Adapters are injected as trait objects; keep HTTP
//! concerns in iris-api.

pub mod factory;
pub mod workflow;

pub use factory::build_workflow;
pub use iris_db::{
    create_metadata_store, AnalysisRepository, ImageRepository, MemoryStore, MetadataStore,
};
pub use iris_storage::{create_storage, LocalStorage, Storage, StorageBackend, StorageError};
pub use iris_vision::{ImageAnalyzer, VisionService};
pub use workflow::{ImageWorkflow, PresignedImage, UploadedFile, WorkflowSettings};

// Test helpers (tests, or dependents enabling `test-helpers`)
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
