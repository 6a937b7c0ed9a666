use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::MAX_AI_TAGS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Label {
    pub name: String,
    pub confidence: f32,
}

/// Estimated age bracket. Field names keep the vision provider's casing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AgeRange {
    #[serde(rename = "Low", default, skip_serializing_if = "Option::is_none")]
    pub low: Option<i32>,
    #[serde(rename = "High", default, skip_serializing_if = "Option::is_none")]
    pub high: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Emotion {
    #[serde(rename = "Type")]
    pub emotion_type: String,
    #[serde(rename = "Confidence")]
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Face {
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_range: Option<AgeRange>,
    #[serde(default)]
    pub emotions: Vec<Emotion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TextDetection {
    pub text: String,
    pub confidence: f32,
    /// `LINE` or `WORD`
    #[serde(rename = "type")]
    pub detection_type: String,
}

/// Output of the three detection calls for one image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detections {
    pub labels: Vec<Label>,
    pub faces: Vec<Face>,
    pub text_detections: Vec<TextDetection>,
}

/// Stored result of analyzing an image. Keyed by the image id, so a repeat
/// analysis overwrites the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: String,
    #[serde(default)]
    pub image_id: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub faces: Vec<Face>,
    #[serde(default)]
    pub text_detections: Vec<TextDetection>,
    #[serde(default)]
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(image_id: &str, detections: Detections, analyzed_at: DateTime<Utc>) -> Self {
        AnalysisRecord {
            id: image_id.to_string(),
            image_id: image_id.to_string(),
            labels: detections.labels,
            faces: detections.faces,
            text_detections: detections.text_detections,
            analyzed_at,
        }
    }

    /// Names of the leading labels, in detection order.
    pub fn top_tags(&self) -> Vec<String> {
        self.labels
            .iter()
            .take(MAX_AI_TAGS)
            .map(|label| label.name.clone())
            .collect()
    }
}
