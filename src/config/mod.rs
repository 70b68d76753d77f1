//! # Configuration Module
//!
//! This module provides the named parameters of the normalizer, the photo slot
//! set and the product API.

pub mod config;

pub use config::{
    ApiConfig, MAX_FILE_BYTES, MAX_HEIGHT, MAX_SIZE_KB, MAX_SLOTS, MAX_WIDTH, NormalizerConfig,
    QUALITY_FLOOR, QUALITY_START, QUALITY_STEP, SlotConfig,
};
