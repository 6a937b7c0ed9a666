//! Multipart extraction for image uploads

use axum::extract::Multipart;
use bytes::Bytes;
use iris_core::constants::UPLOAD_FIELD_NAME;
use iris_core::AppError;
use iris_services::UploadedFile;

use crate::error::HttpAppError;

const FALLBACK_FILENAME: &str = "unknown";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Pull the single `image` field out of a multipart form.
///
/// Other fields are ignored. A second `image` field is rejected.
pub async fn extract_image_field(
    mut multipart: Multipart,
    max_size: usize,
) -> Result<UploadedFile, HttpAppError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD_NAME) {
            continue;
        }
        if file.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Multiple '{}' fields are not allowed",
                UPLOAD_FIELD_NAME
            ))
            .into());
        }

        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_FILENAME)
            .to_string();
        let content_type = field
            .content_type()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let data: Bytes = field.bytes().await?;

        validate_file_size(data.len(), max_size)?;

        file = Some(UploadedFile {
            filename,
            content_type,
            data,
        });
    }

    file.ok_or_else(|| AppError::InvalidInput("No file uploaded".to_string()).into())
}

pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}
