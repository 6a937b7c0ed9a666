//! Mock vision provider with canned detections

use async_trait::async_trait;
use bytes::Bytes;
use iris_core::models::{AgeRange, Emotion, Face, Label, TextDetection};
use iris_vision::{VisionError, VisionResult, VisionService};
use std::sync::Mutex;

#[derive(Default)]
pub struct MockVision {
    labels: Vec<Label>,
    faces: Vec<Face>,
    text: Vec<TextDetection>,
    fail_labels: bool,
    /// Length of every buffer received, in call order
    received: Mutex<Vec<usize>>,
}

impl MockVision {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two labels (Cat, Pet), one face, no text
    pub fn cat() -> Self {
        Self::new()
            .with_labels(&[("Cat", 98.2), ("Pet", 95.1)])
            .with_faces(1)
    }

    pub fn with_labels(mut self, labels: &[(&str, f32)]) -> Self {
        self.labels = labels
            .iter()
            .map(|(name, confidence)| Label {
                name: name.to_string(),
                confidence: *confidence,
            })
            .collect();
        self
    }

    pub fn with_faces(mut self, count: usize) -> Self {
        self.faces = (0..count)
            .map(|_| Face {
                confidence: 99.0,
                age_range: Some(AgeRange {
                    low: Some(20),
                    high: Some(30),
                }),
                emotions: vec![Emotion {
                    emotion_type: "CALM".to_string(),
                    confidence: 88.0,
                }],
            })
            .collect();
        self
    }

    pub fn with_text(mut self, lines: &[&str]) -> Self {
        self.text = lines
            .iter()
            .map(|line| TextDetection {
                text: line.to_string(),
                confidence: 96.0,
                detection_type: "LINE".to_string(),
            })
            .collect();
        self
    }

    /// Make label detection fail
    pub fn failing() -> Self {
        Self {
            fail_labels: true,
            ..Self::default()
        }
    }

    pub fn received(&self) -> Vec<usize> {
        self.received.lock().unwrap().clone()
    }

    fn record(&self, image: &Bytes) {
        self.received.lock().unwrap().push(image.len());
    }
}

#[async_trait]
impl VisionService for MockVision {
    async fn detect_labels(&self, image: Bytes) -> VisionResult<Vec<Label>> {
        self.record(&image);
        if self.fail_labels {
            return Err(VisionError::Detection {
                operation: "DetectLabels",
                message: "InvalidImageFormatException: unsupported image".to_string(),
            });
        }
        Ok(self.labels.clone())
    }

    async fn detect_faces(&self, image: Bytes) -> VisionResult<Vec<Face>> {
        self.record(&image);
        Ok(self.faces.clone())
    }

    async fn detect_text(&self, image: Bytes) -> VisionResult<Vec<TextDetection>> {
        self.record(&image);
        Ok(self.text.clone())
    }

    fn provider(&self) -> &'static str {
        "mock"
    }
}
