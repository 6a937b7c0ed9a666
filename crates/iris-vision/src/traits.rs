use crate::error::VisionResult;
use async_trait::async_trait;
use bytes::Bytes;
use iris_core::models::{Face, Label, TextDetection};

/// Hosted computer-vision provider
///
/// Each call receives the raw image bytes; the three detections are
/// independent and may run concurrently.
#[async_trait]
pub trait VisionService: Send + Sync {
    async fn detect_labels(&self, image: Bytes) -> VisionResult<Vec<Label>>;

    async fn detect_faces(&self, image: Bytes) -> VisionResult<Vec<Face>>;

    async fn detect_text(&self, image: Bytes) -> VisionResult<Vec<TextDetection>>;

    /// Provider name for logs and health output
    fn provider(&self) -> &'static str;
}
