use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AnalysisRecord, ImageRecord};

/// Aggregate counters over every stored image and analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageStats {
    pub total_images: usize,
    pub analyzed: usize,
    pub objects_detected: usize,
    pub faces_found: usize,
}

impl ImageStats {
    pub fn from_records(images: &[ImageRecord], analyses: &[AnalysisRecord]) -> Self {
        ImageStats {
            total_images: images.len(),
            analyzed: images.iter().filter(|image| image.analyzed).count(),
            objects_detected: analyses.iter().map(|a| a.labels.len()).sum(),
            faces_found: analyses.iter().map(|a| a.faces.len()).sum(),
        }
    }
}
