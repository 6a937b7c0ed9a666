//! Health check handler and response types.

use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use iris_core::AppError;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

const CHECK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AwsInfo {
    pub region: String,
    /// Bucket images are written to (`local` for the filesystem backend)
    pub s3_bucket: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when a store check failed
    pub status: String,
    pub message: String,
    pub timestamp: String,
    pub aws: AwsInfo,
    /// Image store check: `healthy`, `timeout` or `error: ...`
    pub storage: String,
    /// Metadata store check: `healthy`, `timeout` or `error: ...`
    pub metadata: String,
}

/// Run an async check with timeout; returns "healthy", "timeout", or "error: {error}".
async fn run_check<F>(timeout: Duration, f: F) -> String
where
    F: Future<Output = Result<(), AppError>>,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("error: {}", e.detail()),
        Err(_) => "timeout".to_string(),
    }
}

/// Service liveness with the configuration it is running against.
///
/// Always answers 200 while the process is up; store problems show up in
/// `status`, `storage` and `metadata`.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (storage, metadata) = tokio::join!(
        run_check(CHECK_TIMEOUT, state.workflow.check_storage()),
        run_check(CHECK_TIMEOUT, state.workflow.check_metadata()),
    );

    let status = if storage == "healthy" && metadata == "healthy" {
        "healthy"
    } else {
        tracing::warn!(storage = %storage, metadata = %metadata, "Health check degraded");
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        message: "IRIS backend is running".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        aws: AwsInfo {
            region: state.config.aws_region().to_string(),
            s3_bucket: state.workflow.bucket().to_string(),
        },
        storage,
        metadata,
    })
}
