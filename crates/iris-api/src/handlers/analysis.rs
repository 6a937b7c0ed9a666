use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use iris_core::models::AnalysisRecord;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub message: String,
    pub analysis: AnalysisRecord,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalysisResponse {
    pub success: bool,
    pub analysis: AnalysisRecord,
}

/// Analyze a stored image
///
/// Runs label, face and text detection on the stored bytes, replaces any
/// earlier analysis and tags the image with its top labels.
#[utoipa::path(
    post,
    path = "/api/analysis/{id}/analyze",
    tag = "analysis",
    params(
        ("id" = String, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Analysis completed", body = AnalyzeResponse),
        (status = 400, description = "Image lives in a bucket this deployment does not serve", body = ErrorResponse),
        (status = 404, description = "Image or stored object not found", body = ErrorResponse),
        (status = 413, description = "Stored image too large to analyze", body = ErrorResponse),
        (status = 500, description = "Vision, storage or database failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(image_id = %id, operation = "analyze_image"))]
pub async fn analyze_image(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let analysis = state.workflow.analyze(&id).await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        message: "Image analyzed successfully".to_string(),
        analysis,
    }))
}

#[utoipa::path(
    get,
    path = "/api/analysis/{id}",
    tag = "analysis",
    params(
        ("id" = String, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Stored analysis", body = AnalysisResponse),
        (status = 404, description = "Analysis not found", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(image_id = %id, operation = "get_analysis"))]
pub async fn get_analysis(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let analysis = state.workflow.get_analysis(&id).await?;

    Ok(Json(AnalysisResponse {
        success: true,
        analysis,
    }))
}
