//! # Processing Module
//!
//! This module contains the image normalization pipeline.

pub mod normalizer;

// Re-export commonly used types for convenience
pub use normalizer::{ImageNormalizer, JPEG_MIME, NormalizedImage, estimate_size_bytes};
