use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Metadata row describing one stored image.
///
/// Rows are not schema-checked by the store, so everything except the key
/// falls back to a default when absent. A missing timestamp reads as the
/// Unix epoch and sorts last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    /// Original filename supplied by the client
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub s3_key: String,
    #[serde(default)]
    pub s3_url: String,
    #[serde(default)]
    pub bucket: String,
    /// Byte count; absent for presigned uploads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub analyzed: bool,
    /// Top label names from the latest analysis, at most five
    #[serde(default)]
    pub ai_tags: Vec<String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when an image record is first written. The metadata store
/// assigns `id`, `createdAt` and `updatedAt`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewImage {
    pub user_id: String,
    pub name: String,
    pub s3_key: String,
    pub s3_url: String,
    pub bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub analyzed: bool,
    pub ai_tags: Vec<String>,
}
