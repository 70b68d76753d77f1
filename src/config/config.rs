//! # Pipeline Configuration
//!
//! Named parameters for the normalizer, the slot manager and the product API.
//! The defaults are the values the seller form has always used; they are
//! exposed so tests and the CLI can tighten or loosen them.
//!
//! | Parameter | Default | Description |
//! |-----------|---------|-------------|
//! | `max_file_bytes` | 5 MiB | Largest accepted selection |
//! | `max_width` / `max_height` | 1200 | Output bounding box |
//! | `max_size_kb` | 500 | Target encoded size |
//! | `quality_start` | 0.9 | First JPEG quality tried |
//! | `quality_step` | 0.1 | Decrement per retry |
//! | `quality_floor` | 0.5 | Lowest quality tried |
//! | `max_slots` | 3 | Primary plus two extra photos |
//!
//! ## Examples
//!
//! ```rust
//! use storefront_photos::config::NormalizerConfig;
//!
//! let config = NormalizerConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.quality_percents(), vec![90, 80, 70, 60, 50]);
//! ```

use std::time::Duration;

use crate::error::{PhotoError, PhotoResult};

/// Largest accepted selection: 5 MiB.
pub const MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// Output bounding box width.
pub const MAX_WIDTH: u32 = 1200;

/// Output bounding box height.
pub const MAX_HEIGHT: u32 = 1200;

/// Target encoded size in KiB.
pub const MAX_SIZE_KB: u64 = 500;

pub const QUALITY_START: f32 = 0.9;
pub const QUALITY_STEP: f32 = 0.1;
pub const QUALITY_FLOOR: f32 = 0.5;

/// Primary photo plus two extras.
pub const MAX_SLOTS: usize = 3;

/// Parameters of a single normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizerConfig {
    /// Selections whose declared size exceeds this are rejected.
    pub max_file_bytes: u64,

    /// Bound applied to landscape images.
    pub max_width: u32,

    /// Bound applied to portrait and square images.
    pub max_height: u32,

    /// Encoded-size target in KiB. Best effort: the floor quality wins.
    pub max_size_kb: u64,

    /// Qualities are in `(0, 1]`, matching the JPEG quality slider of the
    /// upload form. The encoder receives them as whole percents.
    pub quality_start: f32,
    pub quality_step: f32,
    pub quality_floor: f32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: MAX_FILE_BYTES,
            max_width: MAX_WIDTH,
            max_height: MAX_HEIGHT,
            max_size_kb: MAX_SIZE_KB,
            quality_start: QUALITY_START,
            quality_step: QUALITY_STEP,
            quality_floor: QUALITY_FLOOR,
        }
    }
}

impl NormalizerConfig {
    /// Creates a configuration with the given bounds and the default quality ladder.
    pub fn new(max_file_bytes: u64, max_width: u32, max_height: u32, max_size_kb: u64) -> Self {
        Self {
            max_file_bytes,
            max_width,
            max_height,
            max_size_kb,
            ..Self::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> PhotoResult<()> {
        if self.max_file_bytes == 0 {
            return Err(PhotoError::config(
                "max_file_bytes",
                "0",
                "must be greater than 0",
            ));
        }
        if self.max_width == 0 {
            return Err(PhotoError::config("max_width", "0", "must be greater than 0"));
        }
        if self.max_height == 0 {
            return Err(PhotoError::config("max_height", "0", "must be greater than 0"));
        }
        if self.max_size_kb == 0 {
            return Err(PhotoError::config("max_size_kb", "0", "must be greater than 0"));
        }
        if self.max_size_kb.checked_mul(1024).is_none() {
            return Err(PhotoError::config(
                "max_size_kb",
                self.max_size_kb.to_string(),
                "does not fit in a byte count",
            ));
        }
        for (field, value) in [
            ("quality_start", self.quality_start),
            ("quality_floor", self.quality_floor),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(PhotoError::config(
                    field,
                    value.to_string(),
                    "must be within (0, 1]",
                ));
            }
        }
        if !(self.quality_step > 0.0) || to_percent(self.quality_step) == 0 {
            return Err(PhotoError::config(
                "quality_step",
                self.quality_step.to_string(),
                "must be at least 0.01",
            ));
        }
        if self.quality_floor > self.quality_start {
            return Err(PhotoError::config(
                "quality_floor",
                self.quality_floor.to_string(),
                "must not exceed quality_start",
            ));
        }
        Ok(())
    }

    /// Encoded-size target in bytes.
    pub fn target_bytes(&self) -> u64 {
        self.max_size_kb.saturating_mul(1024)
    }

    /// The qualities the search may visit, in order, as whole percents.
    ///
    /// Working in integer percents keeps the ladder exact: repeated float
    /// subtraction of 0.1 from 0.9 does not land on 0.5.
    pub fn quality_percents(&self) -> Vec<u8> {
        let start = to_percent(self.quality_start);
        let step = to_percent(self.quality_step).max(1);
        let floor = to_percent(self.quality_floor).min(start);

        let mut ladder = vec![start];
        let mut q = start;
        while q > floor {
            q = q.saturating_sub(step).max(floor);
            ladder.push(q);
        }
        ladder
    }
}

fn to_percent(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Slot-set capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotConfig {
    pub max_slots: usize,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            max_slots: MAX_SLOTS,
        }
    }
}

impl SlotConfig {
    pub fn validate(&self) -> PhotoResult<()> {
        if self.max_slots == 0 {
            return Err(PhotoError::config("max_slots", "0", "must be at least 1"));
        }
        Ok(())
    }
}

/// Product-creation endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without trailing slash, e.g. `https://shop.example/api`.
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> PhotoResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(PhotoError::config(
                "base_url",
                self.base_url.clone(),
                "must start with http:// or https://",
            ));
        }
        if self.timeout.is_zero() {
            return Err(PhotoError::config("timeout", "0s", "must be greater than 0"));
        }
        Ok(())
    }

    /// Full URL of an endpoint below the base.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
