//! Image workflow
//!
//! Each operation composes the image store, the metadata repositories and the
//! analyzer. Multi-step writes are not transactional: a failure part way
//! through leaves the earlier steps in place, and the logs carry the
//! `image_id` and `storage_key` needed to reconcile by hand.

use bytes::Bytes;
use chrono::Utc;
use iris_core::constants::{DEFAULT_PRESIGN_CONTENT_TYPE, DEFAULT_PRESIGN_FILENAME};
use iris_core::models::{AnalysisRecord, ImageRecord, ImageStats, NewImage};
use iris_core::{AppError, Config};
use iris_db::{AnalysisRepository, ImageRepository, MetadataStore};
use iris_storage::Storage;
use iris_vision::{ImageAnalyzer, VisionService};
use std::sync::Arc;
use std::time::Duration;

/// Per-deployment workflow settings
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    /// Owner recorded on every image (single-user deployment)
    pub default_user_id: String,
    pub presign_expiry: Duration,
    pub max_analyze_bytes: usize,
}

impl WorkflowSettings {
    pub fn from_config(config: &Config) -> Self {
        WorkflowSettings {
            default_user_id: config.default_user_id().to_string(),
            presign_expiry: config.presign_expiry(),
            max_analyze_bytes: config.max_analyze_size_bytes(),
        }
    }
}

/// A file received from a client
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Result of a presign request: where to PUT, and the record already created
#[derive(Debug, Clone)]
pub struct PresignedImage {
    pub upload_url: String,
    pub image: ImageRecord,
}

#[derive(Clone)]
pub struct ImageWorkflow {
    storage: Arc<dyn Storage>,
    images: ImageRepository,
    analyses: AnalysisRepository,
    analyzer: ImageAnalyzer,
    settings: WorkflowSettings,
}

const HEALTH_PROBE_KEY: &str = "images/.health-check";
const HEALTH_PROBE_ID: &str = "health-check";

fn image_not_found() -> AppError {
    AppError::NotFound("Image not found".to_string())
}

impl ImageWorkflow {
    pub fn new(
        storage: Arc<dyn Storage>,
        metadata: Arc<dyn MetadataStore>,
        vision: Arc<dyn VisionService>,
        settings: WorkflowSettings,
    ) -> Self {
        let analyzer = ImageAnalyzer::new(storage.clone(), vision, settings.max_analyze_bytes);
        Self {
            images: ImageRepository::new(metadata.clone()),
            analyses: AnalysisRepository::new(metadata),
            storage,
            analyzer,
            settings,
        }
    }

    pub fn bucket(&self) -> &str {
        self.storage.bucket()
    }

    /// Round trip to the image store (a HEAD on a key that need not exist)
    pub async fn check_storage(&self) -> Result<(), AppError> {
        self.storage.exists(HEALTH_PROBE_KEY).await?;
        Ok(())
    }

    /// Round trip to the metadata store (a point read on the images table)
    pub async fn check_metadata(&self) -> Result<(), AppError> {
        self.images.get(HEALTH_PROBE_ID).await?;
        Ok(())
    }

    /// Store uploaded bytes and create the image record.
    ///
    /// If the record cannot be written the stored object is left behind.
    #[tracing::instrument(skip(self, file), fields(filename = %file.filename, size = file.data.len()))]
    pub async fn upload(&self, file: UploadedFile) -> Result<ImageRecord, AppError> {
        if file.filename.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Uploaded file has no filename".to_string(),
            ));
        }

        let size = file.data.len() as u64;
        let stored = self
            .storage
            .upload(&file.filename, &file.content_type, file.data)
            .await?;

        let image = self
            .images
            .create(NewImage {
                user_id: self.settings.default_user_id.clone(),
                name: file.filename,
                s3_key: stored.key.clone(),
                s3_url: stored.url,
                bucket: stored.bucket,
                size: Some(size),
                mime_type: Some(file.content_type),
                analyzed: false,
                ai_tags: Vec::new(),
            })
            .await
            .map_err(|e| {
                tracing::warn!(
                    storage_key = %stored.key,
                    error = %e,
                    "Image stored but metadata write failed; object left orphaned"
                );
                e
            })?;

        tracing::info!(image_id = %image.id, storage_key = %image.s3_key, "Image uploaded");
        Ok(image)
    }

    /// Issue a presigned PUT URL and create the image record up front.
    ///
    /// The record exists before the client has uploaded anything, so it may
    /// point at an object that never arrives.
    #[tracing::instrument(skip(self))]
    pub async fn presign(
        &self,
        filename: Option<String>,
        content_type: Option<String>,
    ) -> Result<PresignedImage, AppError> {
        let filename = filename
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PRESIGN_FILENAME.to_string());
        let content_type = content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PRESIGN_CONTENT_TYPE.to_string());

        let presigned = self
            .storage
            .presigned_upload(&filename, &content_type, self.settings.presign_expiry)
            .await?;

        let image = self
            .images
            .create(NewImage {
                user_id: self.settings.default_user_id.clone(),
                name: filename,
                s3_key: presigned.object.key,
                s3_url: presigned.object.url,
                bucket: presigned.object.bucket,
                size: None,
                mime_type: Some(content_type),
                analyzed: false,
                ai_tags: Vec::new(),
            })
            .await?;

        tracing::info!(image_id = %image.id, storage_key = %image.s3_key, "Presigned upload issued");
        Ok(PresignedImage {
            upload_url: presigned.upload_url,
            image,
        })
    }

    /// All images, newest first
    pub async fn list_images(&self) -> Result<Vec<ImageRecord>, AppError> {
        Ok(self.images.list().await?)
    }

    pub async fn get_image(&self, id: &str) -> Result<ImageRecord, AppError> {
        self.images.get(id).await?.ok_or_else(image_not_found)
    }

    /// Run every detection on a stored image, persist the analysis and flag
    /// the image as analyzed.
    ///
    /// Repeat calls overwrite the previous analysis. The analysis write and
    /// the image update are separate; if the second fails the analysis stays.
    #[tracing::instrument(skip(self))]
    pub async fn analyze(&self, id: &str) -> Result<AnalysisRecord, AppError> {
        let image = self.get_image(id).await?;

        let detections = self.analyzer.analyze(&image.bucket, &image.s3_key).await?;
        let analysis = AnalysisRecord::new(&image.id, detections, Utc::now());

        self.analyses.save(&analysis).await?;

        self.images
            .mark_analyzed(&image.id, analysis.top_tags())
            .await
            .map_err(|e| {
                tracing::warn!(
                    image_id = %image.id,
                    error = %e,
                    "Analysis saved but image record was not marked analyzed"
                );
                e
            })?;

        tracing::info!(
            image_id = %image.id,
            labels = analysis.labels.len(),
            faces = analysis.faces.len(),
            text_detections = analysis.text_detections.len(),
            "Image analyzed"
        );
        Ok(analysis)
    }

    pub async fn get_analysis(&self, id: &str) -> Result<AnalysisRecord, AppError> {
        self.analyses
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Analysis not found".to_string()))
    }

    /// Delete an image record. Removing the stored object and the analysis
    /// record is best-effort: their failures are logged, not returned.
    ///
    /// Keys are `images/{epoch_ms}-{name}`, so two same-named uploads in one
    /// millisecond share an object and deleting either record removes it.
    #[tracing::instrument(skip(self))]
    pub async fn delete_image(&self, id: &str) -> Result<(), AppError> {
        let image = self.get_image(id).await?;

        if let Err(e) = self.storage.delete(&image.s3_key).await {
            tracing::warn!(
                image_id = %image.id,
                storage_key = %image.s3_key,
                error = %e,
                "Failed to delete stored object; continuing"
            );
        }

        self.images.delete(&image.id).await?;

        if let Err(e) = self.analyses.delete(&image.id).await {
            tracing::warn!(
                image_id = %image.id,
                error = %e,
                "Failed to delete analysis record; continuing"
            );
        }

        tracing::info!(image_id = %image.id, "Image deleted");
        Ok(())
    }

    /// Counters over a full scan of both tables
    pub async fn stats(&self) -> Result<ImageStats, AppError> {
        let (images, analyses) = tokio::try_join!(self.images.list(), self.analyses.list())?;
        Ok(ImageStats::from_records(&images, &analyses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{
        create_test_workflow, create_test_workflow_with_storage, MockStorage, MockVision,
    };
    use iris_db::Table;

    fn cat_png() -> UploadedFile {
        UploadedFile {
            filename: "cat.png".to_string(),
            content_type: "image/png".to_string(),
            data: Bytes::from(vec![7u8; 500]),
        }
    }

    #[tokio::test]
    async fn test_upload_creates_unanalyzed_record() {
        let t = create_test_workflow(MockVision::cat());

        let image = t.workflow.upload(cat_png()).await.unwrap();

        assert_eq!(image.name, "cat.png");
        assert_eq!(image.size, Some(500));
        assert_eq!(image.mime_type.as_deref(), Some("image/png"));
        assert_eq!(image.user_id, "demo-user");
        assert!(!image.analyzed);
        assert!(image.s3_key.starts_with("images/"));
        assert!(t.storage.has_file(&image.s3_key));

        let listed = t.workflow.list_images().await.unwrap();
        assert_eq!(listed, vec![image]);
    }

    #[tokio::test]
    async fn test_upload_without_filename_is_rejected() {
        let t = create_test_workflow(MockVision::cat());
        let file = UploadedFile {
            filename: " ".to_string(),
            ..cat_png()
        };

        let err = t.workflow.upload(file).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(t.storage.file_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_storage_failure_writes_no_record() {
        let t = create_test_workflow_with_storage(MockStorage::failing_uploads(), MockVision::cat());

        let err = t.workflow.upload(cat_png()).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(t.metadata.len(Table::Images).await, 0);
    }

    #[tokio::test]
    async fn test_presign_defaults_and_creates_record() {
        let t = create_test_workflow(MockVision::cat());

        let presigned = t.workflow.presign(None, None).await.unwrap();

        assert!(presigned.upload_url.contains("X-Amz-Expires=300"));
        assert_eq!(presigned.image.name, "upload.jpg");
        assert_eq!(presigned.image.mime_type.as_deref(), Some("image/jpeg"));
        assert_eq!(presigned.image.size, None);
        assert!(!presigned.image.analyzed);
        assert_eq!(
            t.workflow.get_image(&presigned.image.id).await.unwrap(),
            presigned.image
        );
    }

    #[tokio::test]
    async fn test_cat_scenario() {
        let t = create_test_workflow(MockVision::cat());

        let image = t.workflow.upload(cat_png()).await.unwrap();
        let analysis = t.workflow.analyze(&image.id).await.unwrap();

        assert_eq!(analysis.id, image.id);
        assert_eq!(analysis.labels.len(), 2);
        assert_eq!(analysis.faces.len(), 1);
        assert!(analysis.text_detections.is_empty());

        let image = t.workflow.get_image(&image.id).await.unwrap();
        assert!(image.analyzed);
        assert_eq!(image.ai_tags, vec!["Cat", "Pet"]);

        let stats = t.workflow.stats().await.unwrap();
        assert_eq!(
            stats,
            ImageStats {
                total_images: 1,
                analyzed: 1,
                objects_detected: 2,
                faces_found: 1,
            }
        );

        // one fetch, shared by the three detections
        assert_eq!(t.vision.received(), vec![500, 500, 500]);
    }

    #[tokio::test]
    async fn test_analyze_unknown_image_writes_nothing() {
        let t = create_test_workflow(MockVision::cat());

        let err = t.workflow.analyze("missing").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Image not found"));
        assert_eq!(t.metadata.len(Table::Analysis).await, 0);
        assert!(t.vision.received().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_twice_overwrites() {
        let t = create_test_workflow(MockVision::cat());
        let image = t.workflow.upload(cat_png()).await.unwrap();

        let first = t.workflow.analyze(&image.id).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = t.workflow.analyze(&image.id).await.unwrap();

        assert!(second.analyzed_at > first.analyzed_at);
        assert_eq!(t.metadata.len(Table::Analysis).await, 1);
        assert_eq!(
            t.workflow.get_analysis(&image.id).await.unwrap().analyzed_at,
            second.analyzed_at
        );
    }

    #[tokio::test]
    async fn test_failed_detection_persists_nothing() {
        let t = create_test_workflow(MockVision::failing());
        let image = t.workflow.upload(cat_png()).await.unwrap();

        let err = t.workflow.analyze(&image.id).await.unwrap_err();

        assert!(matches!(err, AppError::Vision(_)));
        assert_eq!(t.metadata.len(Table::Analysis).await, 0);
        assert!(!t.workflow.get_image(&image.id).await.unwrap().analyzed);
    }

    #[tokio::test]
    async fn test_analyze_presigned_image_before_upload_fails() {
        let t = create_test_workflow(MockVision::cat());
        let presigned = t.workflow.presign(Some("dog.jpg".to_string()), None).await.unwrap();

        let err = t.workflow.analyze(&presigned.image.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        t.storage
            .set_file(&presigned.image.s3_key, Bytes::from_static(b"jpeg"));
        let analysis = t.workflow.analyze(&presigned.image.id).await.unwrap();
        assert_eq!(analysis.labels.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_removes_image_and_analysis() {
        let t = create_test_workflow(MockVision::cat());
        let image = t.workflow.upload(cat_png()).await.unwrap();
        t.workflow.analyze(&image.id).await.unwrap();

        t.workflow.delete_image(&image.id).await.unwrap();

        assert!(t.workflow.list_images().await.unwrap().is_empty());
        assert!(matches!(
            t.workflow.get_image(&image.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            t.workflow.get_analysis(&image.id).await,
            Err(AppError::NotFound(ref msg)) if msg == "Analysis not found"
        ));
        assert!(!t.storage.has_file(&image.s3_key));
    }

    #[tokio::test]
    async fn test_delete_without_analysis_succeeds() {
        let t = create_test_workflow(MockVision::cat());
        let image = t.workflow.upload(cat_png()).await.unwrap();

        t.workflow.delete_image(&image.id).await.unwrap();
        assert_eq!(t.metadata.len(Table::Images).await, 0);
    }

    #[tokio::test]
    async fn test_delete_tolerates_storage_failure() {
        let t = create_test_workflow_with_storage(MockStorage::failing_deletes(), MockVision::cat());
        let image = t.workflow.upload(cat_png()).await.unwrap();

        t.workflow.delete_image(&image.id).await.unwrap();

        assert!(t.workflow.list_images().await.unwrap().is_empty());
        assert!(t.storage.has_file(&image.s3_key));
    }

    #[tokio::test]
    async fn test_delete_unknown_image_is_not_found() {
        let t = create_test_workflow(MockVision::cat());
        assert!(matches!(
            t.workflow.delete_image("missing").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_stats_over_mixed_records() {
        let t = create_test_workflow(
            MockVision::new()
                .with_labels(&[("Dog", 99.0), ("Ball", 91.0), ("Grass", 80.0)])
                .with_faces(2)
                .with_text(&["GOOD BOY"]),
        );

        let a = t.workflow.upload(cat_png()).await.unwrap();
        let b = t.workflow.upload(cat_png()).await.unwrap();
        t.workflow.upload(cat_png()).await.unwrap();
        t.workflow.analyze(&a.id).await.unwrap();
        t.workflow.analyze(&b.id).await.unwrap();

        let stats = t.workflow.stats().await.unwrap();
        assert_eq!(stats.total_images, 3);
        assert_eq!(stats.analyzed, 2);
        assert_eq!(stats.objects_detected, 6);
        assert_eq!(stats.faces_found, 4);
    }

    #[tokio::test]
    async fn test_empty_stats() {
        let t = create_test_workflow(MockVision::cat());
        assert_eq!(t.workflow.stats().await.unwrap(), ImageStats::default());
    }

    #[tokio::test]
    async fn test_list_and_stats_survive_partial_rows() {
        let t = create_test_workflow(MockVision::cat());
        t.workflow.upload(cat_png()).await.unwrap();

        let mut partial = iris_db::Item::new();
        for (field, value) in [
            ("name", "old.png"),
            ("s3Key", "images/1-old.png"),
            ("bucket", "iris-test-bucket"),
            ("userId", "demo-user"),
        ] {
            partial.insert(field.to_string(), value.into());
        }
        t.metadata.put(Table::Images, partial).await.unwrap();

        assert_eq!(t.workflow.list_images().await.unwrap().len(), 2);
        let stats = t.workflow.stats().await.unwrap();
        assert_eq!(stats.total_images, 2);
        assert_eq!(stats.analyzed, 0);
    }

    #[tokio::test]
    async fn test_store_probes_write_nothing() {
        let t = create_test_workflow(MockVision::new());
        t.workflow.check_storage().await.unwrap();
        t.workflow.check_metadata().await.unwrap();
        assert_eq!(t.storage.file_count(), 0);
        assert_eq!(t.metadata.len(Table::Images).await, 0);
    }
}
