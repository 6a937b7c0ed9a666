use iris_core::AppError;
use iris_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Failed to fetch image bytes: {0}")]
    Fetch(#[from] StorageError),

    #[error("Image is {size} bytes, exceeding the {limit} byte analysis limit")]
    ImageTooLarge { size: usize, limit: usize },

    #[error("Image lives in bucket {bucket}, but this service reads from {configured}")]
    ForeignBucket { bucket: String, configured: String },

    #[error("{operation} failed: {message}")]
    Detection {
        operation: &'static str,
        message: String,
    },
}

pub type VisionResult<T> = Result<T, VisionError>;

impl From<VisionError> for AppError {
    fn from(err: VisionError) -> Self {
        match err {
            VisionError::Fetch(storage) => storage.into(),
            err @ VisionError::ImageTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            err @ VisionError::ForeignBucket { .. } => AppError::BadRequest(err.to_string()),
            err @ VisionError::Detection { .. } => AppError::Vision(err.to_string()),
        }
    }
}
