//! OpenAPI documentation.
//! Handler annotations use the server paths (under `/api`); the Lambda entry
//! point serves the same operations at the root.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use iris_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "IRIS API",
        version = "0.1.0",
        description = "Image analysis service: upload images to S3, run Amazon Rekognition label, face and text detection, and browse results stored in DynamoDB."
    ),
    paths(
        // Images
        handlers::images::upload_image,
        handlers::images::presign_upload,
        handlers::images::list_images,
        handlers::images::get_image,
        handlers::images::delete_image,
        handlers::images::image_stats,
        // Analysis
        handlers::analysis::analyze_image,
        handlers::analysis::get_analysis,
        // Health
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::ImageRecord,
            models::AnalysisRecord,
            models::Label,
            models::Face,
            models::AgeRange,
            models::Emotion,
            models::TextDetection,
            models::ImageStats,
            handlers::images::PresignRequest,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "images", description = "Image upload, listing, deletion and statistics"),
        (name = "analysis", description = "Rekognition analysis of stored images"),
        (name = "health", description = "Service liveness and configuration")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
