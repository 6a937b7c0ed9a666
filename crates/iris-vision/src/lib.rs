//! IRIS Vision Library
//!
//! Label, face and text detection behind the [`VisionService`] trait, and the
//! [`ImageAnalyzer`] that feeds stored images to it.

pub mod analyzer;
pub mod error;
#[cfg(feature = "rekognition")]
pub mod rekognition;
pub mod traits;

pub use analyzer::ImageAnalyzer;
pub use error::{VisionError, VisionResult};
#[cfg(feature = "rekognition")]
pub use rekognition::{RekognitionOptions, RekognitionVision};
pub use traits::VisionService;
