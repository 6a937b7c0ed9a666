//! Amazon Rekognition vision provider

use crate::error::{VisionError, VisionResult};
use crate::traits::VisionService;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{Attribute, Image};
use aws_sdk_rekognition::Client as RekognitionClient;
use bytes::Bytes;
use iris_core::models::{AgeRange, Emotion, Face, Label, TextDetection};
use iris_core::Config;
use std::fmt::{Debug, Formatter, Result as FmtResult};

/// Detection settings
#[derive(Debug, Clone, PartialEq)]
pub struct RekognitionOptions {
    /// AWS region (Rekognition is not offered in every region)
    pub region: String,
    /// Maximum number of labels returned by label detection
    pub max_labels: i32,
    /// Minimum label confidence (0-100)
    pub min_confidence: f32,
}

impl RekognitionOptions {
    pub fn from_config(config: &Config) -> Self {
        RekognitionOptions {
            region: config.rekognition_region().to_string(),
            max_labels: config.rekognition_max_labels(),
            min_confidence: config.rekognition_min_confidence(),
        }
    }
}

pub struct RekognitionVision {
    client: RekognitionClient,
    options: RekognitionOptions,
}

impl Debug for RekognitionVision {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RekognitionVision")
            .field("options", &self.options)
            .finish()
    }
}

impl RekognitionVision {
    pub async fn new(options: RekognitionOptions) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(options.region.clone()))
            .load()
            .await;

        tracing::info!(
            region = %options.region,
            max_labels = options.max_labels,
            min_confidence = options.min_confidence,
            "Rekognition client initialized"
        );

        Self::from_client(RekognitionClient::new(&config), options)
    }

    pub fn from_client(client: RekognitionClient, options: RekognitionOptions) -> Self {
        Self { client, options }
    }

    fn image(data: Bytes) -> Image {
        Image::builder().bytes(Blob::new(data.to_vec())).build()
    }

    fn detection_error<E>(operation: &'static str, err: E) -> VisionError
    where
        E: std::error::Error,
    {
        let message = DisplayErrorContext(&err).to_string();
        tracing::error!(operation = %operation, error = %message, "Rekognition request failed");
        VisionError::Detection { operation, message }
    }
}

fn project_label(label: &aws_sdk_rekognition::types::Label) -> Option<Label> {
    Some(Label {
        name: label.name()?.to_string(),
        confidence: label.confidence().unwrap_or(0.0),
    })
}

fn project_face(face: &aws_sdk_rekognition::types::FaceDetail) -> Face {
    Face {
        confidence: face.confidence().unwrap_or(0.0),
        age_range: face.age_range().map(|range| AgeRange {
            low: range.low(),
            high: range.high(),
        }),
        emotions: face
            .emotions()
            .iter()
            .filter_map(|emotion| {
                Some(Emotion {
                    emotion_type: emotion.r#type()?.as_str().to_string(),
                    confidence: emotion.confidence().unwrap_or(0.0),
                })
            })
            .collect(),
    }
}

fn project_text(detection: &aws_sdk_rekognition::types::TextDetection) -> Option<TextDetection> {
    Some(TextDetection {
        text: detection.detected_text()?.to_string(),
        confidence: detection.confidence().unwrap_or(0.0),
        detection_type: detection
            .r#type()
            .map(|t| t.as_str().to_string())
            .unwrap_or_default(),
    })
}

#[async_trait]
impl VisionService for RekognitionVision {
    async fn detect_labels(&self, image: Bytes) -> VisionResult<Vec<Label>> {
        let response = self
            .client
            .detect_labels()
            .image(Self::image(image))
            .max_labels(self.options.max_labels)
            .min_confidence(self.options.min_confidence)
            .send()
            .await
            .map_err(|e| Self::detection_error("DetectLabels", e))?;

        Ok(response.labels().iter().filter_map(project_label).collect())
    }

    async fn detect_faces(&self, image: Bytes) -> VisionResult<Vec<Face>> {
        let response = self
            .client
            .detect_faces()
            .image(Self::image(image))
            .attributes(Attribute::All)
            .send()
            .await
            .map_err(|e| Self::detection_error("DetectFaces", e))?;

        Ok(response.face_details().iter().map(project_face).collect())
    }

    async fn detect_text(&self, image: Bytes) -> VisionResult<Vec<TextDetection>> {
        let response = self
            .client
            .detect_text()
            .image(Self::image(image))
            .send()
            .await
            .map_err(|e| Self::detection_error("DetectText", e))?;

        Ok(response
            .text_detections()
            .iter()
            .filter_map(project_text)
            .collect())
    }

    fn provider(&self) -> &'static str {
        "rekognition"
    }
}
