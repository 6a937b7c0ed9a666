use crate::workflow::{ImageWorkflow, WorkflowSettings};
use anyhow::Context;
use iris_core::Config;
use iris_db::create_metadata_store;
use iris_storage::create_storage;
use iris_vision::{RekognitionOptions, RekognitionVision};
use std::sync::Arc;

/// Construct the workflow and every adapter it needs from configuration
pub async fn build_workflow(config: &Config) -> anyhow::Result<ImageWorkflow> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize image store")?;
    let metadata = create_metadata_store(config)
        .await
        .context("Failed to initialize metadata store")?;
    let vision = RekognitionVision::new(RekognitionOptions::from_config(config)).await;

    tracing::info!(
        storage_backend = %storage.backend_type(),
        bucket = %storage.bucket(),
        metadata_backend = %metadata.backend_type(),
        vision_region = %config.rekognition_region(),
        "Image workflow initialized"
    );

    Ok(ImageWorkflow::new(
        storage,
        metadata,
        Arc::new(vision),
        WorkflowSettings::from_config(config),
    ))
}
