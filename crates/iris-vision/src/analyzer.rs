use crate::error::{VisionError, VisionResult};
use crate::traits::VisionService;
use iris_core::models::Detections;
use iris_storage::Storage;
use std::sync::Arc;

/// Runs every detection against one stored image.
///
/// The object is read once and the same buffer is handed to all three
/// detections, which run concurrently. Any failure fails the whole analysis.
#[derive(Clone)]
pub struct ImageAnalyzer {
    storage: Arc<dyn Storage>,
    vision: Arc<dyn VisionService>,
    max_image_bytes: usize,
}

impl ImageAnalyzer {
    pub fn new(
        storage: Arc<dyn Storage>,
        vision: Arc<dyn VisionService>,
        max_image_bytes: usize,
    ) -> Self {
        Self {
            storage,
            vision,
            max_image_bytes,
        }
    }

    #[tracing::instrument(skip(self), fields(provider = self.vision.provider()))]
    pub async fn analyze(&self, bucket: &str, key: &str) -> VisionResult<Detections> {
        if bucket != self.storage.bucket() {
            return Err(VisionError::ForeignBucket {
                bucket: bucket.to_string(),
                configured: self.storage.bucket().to_string(),
            });
        }

        let start = std::time::Instant::now();
        let image = self.storage.download(key).await?;

        if image.len() > self.max_image_bytes {
            return Err(VisionError::ImageTooLarge {
                size: image.len(),
                limit: self.max_image_bytes,
            });
        }

        let (labels, faces, text_detections) = tokio::try_join!(
            self.vision.detect_labels(image.clone()),
            self.vision.detect_faces(image.clone()),
            self.vision.detect_text(image),
        )?;

        tracing::info!(
            labels = labels.len(),
            faces = faces.len(),
            text_detections = text_detections.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image analysis completed"
        );

        Ok(Detections {
            labels,
            faces,
            text_detections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use iris_core::models::{Face, Label, TextDetection};
    use iris_storage::LocalStorage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingVision {
        calls: AtomicUsize,
        fail_faces: bool,
    }

    #[async_trait]
    impl VisionService for RecordingVision {
        async fn detect_labels(&self, image: Bytes) -> VisionResult<Vec<Label>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Label {
                name: format!("{} bytes", image.len()),
                confidence: 90.0,
            }])
        }

        async fn detect_faces(&self, _image: Bytes) -> VisionResult<Vec<Face>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_faces {
                return Err(VisionError::Detection {
                    operation: "DetectFaces",
                    message: "ThrottlingException".to_string(),
                });
            }
            Ok(Vec::new())
        }

        async fn detect_text(&self, _image: Bytes) -> VisionResult<Vec<TextDetection>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        fn provider(&self) -> &'static str {
            "recording"
        }
    }

    async fn stored_image(dir: &TempDir, data: &'static [u8]) -> (Arc<dyn Storage>, String) {
        let storage = LocalStorage::new(dir.path(), "http://localhost/files".to_string())
            .await
            .unwrap();
        let stored = storage
            .upload("cat.png", "image/png", Bytes::from_static(data))
            .await
            .unwrap();
        (Arc::new(storage), stored.key)
    }

    #[tokio::test]
    async fn test_analyze_runs_all_detections_on_fetched_bytes() {
        let dir = TempDir::new().unwrap();
        let (storage, key) = stored_image(&dir, b"12345").await;
        let vision = Arc::new(RecordingVision::default());
        let analyzer = ImageAnalyzer::new(storage, vision.clone(), 1024);

        let detections = analyzer.analyze("local", &key).await.unwrap();

        assert_eq!(detections.labels[0].name, "5 bytes");
        assert_eq!(vision.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_one_failed_detection_fails_analysis() {
        let dir = TempDir::new().unwrap();
        let (storage, key) = stored_image(&dir, b"12345").await;
        let vision = Arc::new(RecordingVision {
            fail_faces: true,
            ..RecordingVision::default()
        });
        let analyzer = ImageAnalyzer::new(storage, vision, 1024);

        let result = analyzer.analyze("local", &key).await;
        assert!(matches!(
            result,
            Err(VisionError::Detection {
                operation: "DetectFaces",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_oversized_image_is_rejected_before_detection() {
        let dir = TempDir::new().unwrap();
        let (storage, key) = stored_image(&dir, b"0123456789").await;
        let vision = Arc::new(RecordingVision::default());
        let analyzer = ImageAnalyzer::new(storage, vision.clone(), 4);

        let result = analyzer.analyze("local", &key).await;
        assert!(matches!(
            result,
            Err(VisionError::ImageTooLarge { size: 10, limit: 4 })
        ));
        assert_eq!(vision.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_object_and_foreign_bucket() {
        let dir = TempDir::new().unwrap();
        let (storage, _) = stored_image(&dir, b"1").await;
        let analyzer = ImageAnalyzer::new(storage, Arc::new(RecordingVision::default()), 1024);

        assert!(matches!(
            analyzer.analyze("local", "images/0-gone.png").await,
            Err(VisionError::Fetch(_))
        ));
        assert!(matches!(
            analyzer.analyze("other-bucket", "images/0-gone.png").await,
            Err(VisionError::ForeignBucket { .. })
        ));
    }
}
