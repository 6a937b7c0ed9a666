use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::upload::extract_image_field;
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use iris_core::constants::DEFAULT_PRESIGN_CONTENT_TYPE;
use iris_core::models::{ImageRecord, ImageStats};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub image: ImageRecord,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresignRequest {
    /// Defaults to `upload.jpg`
    #[serde(default)]
    pub filename: Option<String>,
    /// Defaults to `image/jpeg`
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresignResponse {
    pub success: bool,
    /// Presigned PUT URL; the client uploads the bytes there directly
    pub upload_url: String,
    /// `Content-Type` the client must send with the PUT. The signature does
    /// not cover it, so the stored object takes whatever type the PUT carries.
    pub content_type: String,
    pub image: ImageRecord,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImageListResponse {
    pub success: bool,
    pub count: usize,
    pub images: Vec<ImageRecord>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImageResponse {
    pub success: bool,
    pub image: ImageRecord,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
    pub id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: ImageStats,
}

/// Upload an image through the API
///
/// The file is read from the multipart field `image`, stored, and recorded
/// with `analyzed = false`.
#[utoipa::path(
    post,
    path = "/api/images/upload",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image uploaded", body = UploadResponse),
        (status = 400, description = "No file uploaded", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Storage or database failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = extract_image_field(multipart, state.config.max_file_size_bytes()).await?;
    let image = state.workflow.upload(file).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            success: true,
            message: "Image uploaded successfully".to_string(),
            image,
        }),
    ))
}

/// Issue a presigned upload URL
///
/// The image record is created immediately; the object only exists once the
/// client has PUT the bytes to `uploadUrl`. The URL does not pin the content
/// type, so the client should send the returned `contentType` header.
#[utoipa::path(
    post,
    path = "/api/images/presign",
    tag = "images",
    request_body = PresignRequest,
    responses(
        (status = 200, description = "Presigned URL issued", body = PresignResponse),
        (status = 400, description = "Invalid body or presigning unsupported by the storage backend", body = ErrorResponse),
        (status = 500, description = "Storage or database failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "presign_upload"))]
pub async fn presign_upload(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<PresignRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let presigned = state
        .workflow
        .presign(request.filename, request.content_type)
        .await?;

    let content_type = presigned
        .image
        .mime_type
        .clone()
        .unwrap_or_else(|| DEFAULT_PRESIGN_CONTENT_TYPE.to_string());

    Ok(Json(PresignResponse {
        success: true,
        upload_url: presigned.upload_url,
        content_type,
        image: presigned.image,
    }))
}

#[utoipa::path(
    get,
    path = "/api/images",
    tag = "images",
    responses(
        (status = 200, description = "All images, newest first", body = ImageListResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_images"))]
pub async fn list_images(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let images = state.workflow.list_images().await?;

    Ok(Json(ImageListResponse {
        success: true,
        count: images.len(),
        images,
    }))
}

#[utoipa::path(
    get,
    path = "/api/images/{id}",
    tag = "images",
    params(
        ("id" = String, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image found", body = ImageResponse),
        (status = 404, description = "Image not found", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(image_id = %id, operation = "get_image"))]
pub async fn get_image(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let image = state.workflow.get_image(&id).await?;

    Ok(Json(ImageResponse {
        success: true,
        image,
    }))
}

/// Delete an image
///
/// The stored object and the analysis record are removed on a best-effort
/// basis; only a failure to delete the image record itself is reported.
#[utoipa::path(
    delete,
    path = "/api/images/{id}",
    tag = "images",
    params(
        ("id" = String, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image deleted", body = DeleteResponse),
        (status = 404, description = "Image not found", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(image_id = %id, operation = "delete_image"))]
pub async fn delete_image(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.workflow.delete_image(&id).await?;

    Ok(Json(DeleteResponse {
        success: true,
        message: "Image deleted successfully".to_string(),
        id,
    }))
}

#[utoipa::path(
    get,
    path = "/api/images/stats",
    tag = "images",
    responses(
        (status = 200, description = "Aggregate counters", body = StatsResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "image_stats"))]
pub async fn image_stats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let stats = state.workflow.stats().await?;

    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}
