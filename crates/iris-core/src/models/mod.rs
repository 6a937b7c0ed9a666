pub mod analysis;
pub mod image;
pub mod stats;

pub use analysis::{AgeRange, AnalysisRecord, Detections, Emotion, Face, Label, TextDetection};
pub use image::{ImageRecord, NewImage};
pub use stats::ImageStats;
