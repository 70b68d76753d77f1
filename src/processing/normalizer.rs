//! # Image Normalizer
//!
//! Turns one [`RawSelection`] into a bounded JPEG:
//!
//! 1. **Validate**: MIME type must start with `image/`, declared size must not
//!    exceed `max_file_bytes`. Nothing is decoded when either check fails.
//! 2. **Decode** through the [`ImageCodec`].
//! 3. **Plan**: downscale-only, aspect preserving fit into `max_width` x `max_height`.
//! 4. **Composite** onto white at the planned size.
//! 5. **Quality search**: encode at `quality_start`, and while the estimate is
//!    over `max_size_kb` step down by `quality_step` until `quality_floor`.
//!
//! The search is a fixed-step linear walk (at most five encodes with the
//! default ladder) so identical input always yields identical output. When the
//! floor is reached the last encoding is accepted even if it is still over the
//! target.

use log::{debug, warn};
use photo_scale::plan::{Bounds, build_plan};

use crate::api::data_uri;
use crate::codec::{ImageCodec, PixelBuffer, RasterCodec};
use crate::config::NormalizerConfig;
use crate::error::{PhotoError, PhotoResult};
use crate::selection::RawSelection;

/// MIME type of every normalized image.
pub const JPEG_MIME: &str = "image/jpeg";

/// Size estimate for an encoded payload.
///
/// The upload form measured a base64 data URI and multiplied its length by
/// 0.75 to approximate the underlying bytes; the encoder here hands back those
/// bytes directly, so the estimate is their length.
pub fn estimate_size_bytes(encoded_len: usize) -> u64 {
    encoded_len as u64
}

/// A size- and dimension-bounded JPEG. Immutable once produced.
#[derive(Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    encoded: Vec<u8>,
    width: u32,
    height: u32,
    approx_size_bytes: u64,
    quality_percent: u8,
}

impl NormalizedImage {
    pub fn encoded_bytes(&self) -> &[u8] {
        &self.encoded
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.encoded
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn approx_size_bytes(&self) -> u64 {
        self.approx_size_bytes
    }

    /// Quality in `(0, 1]`, e.g. `0.8`.
    pub fn quality_used(&self) -> f32 {
        self.quality_percent as f32 / 100.0
    }

    pub fn quality_percent(&self) -> u8 {
        self.quality_percent
    }

    pub fn mime_type(&self) -> &'static str {
        JPEG_MIME
    }

    /// `data:image/jpeg;base64,...` form used by the product API.
    pub fn to_data_uri(&self) -> String {
        data_uri(JPEG_MIME, &self.encoded)
    }
}

impl std::fmt::Debug for NormalizedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalizedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("approx_size_bytes", &self.approx_size_bytes)
            .field("quality_used", &self.quality_used())
            .finish()
    }
}

/// Validates, resizes and re-encodes selections. Holds no per-call state, so
/// one normalizer serves any number of calls.
#[derive(Debug, Clone)]
pub struct ImageNormalizer<C = RasterCodec> {
    codec: C,
    config: NormalizerConfig,
}

impl Default for ImageNormalizer<RasterCodec> {
    fn default() -> Self {
        Self {
            codec: RasterCodec,
            config: NormalizerConfig::default(),
        }
    }
}

impl ImageNormalizer<RasterCodec> {
    /// Normalizer on the production codec.
    pub fn new(config: NormalizerConfig) -> PhotoResult<Self> {
        Self::with_codec(RasterCodec, config)
    }
}

impl<C: ImageCodec> ImageNormalizer<C> {
    /// Normalizer on a caller-provided codec.
    pub fn with_codec(codec: C, config: NormalizerConfig) -> PhotoResult<Self> {
        config.validate()?;
        Ok(Self { codec, config })
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Run the whole pipeline on one selection.
    pub fn normalize(&self, selection: &RawSelection) -> PhotoResult<NormalizedImage> {
        self.check_selection(selection)?;

        let pixels = self.codec.decode_image(&selection.bytes)?;
        if pixels.size().area() == 0 {
            return Err(PhotoError::decode("image has no pixels"));
        }

        let plan = build_plan(
            pixels.size(),
            Bounds::new(self.config.max_width, self.config.max_height),
        );
        debug!(
            "normalize: {}x{} -> {}x{}",
            plan.input.w, plan.input.h, plan.out.w, plan.out.h
        );

        let canvas = self
            .codec
            .composite_over_white(&pixels, plan.out.w, plan.out.h)?;
        drop(pixels);

        let (encoded, approx_size_bytes, quality_percent) = self.search_quality(&canvas)?;
        Ok(NormalizedImage {
            encoded,
            width: canvas.width(),
            height: canvas.height(),
            approx_size_bytes,
            quality_percent,
        })
    }

    /// Cheap pre-decode checks. MIME type is checked first.
    pub fn check_selection(&self, selection: &RawSelection) -> PhotoResult<()> {
        if !selection.is_image() {
            return Err(PhotoError::invalid_file_type(selection.mime_type.clone()));
        }
        if selection.size_bytes > self.config.max_file_bytes {
            return Err(PhotoError::file_too_large(
                selection.size_bytes,
                self.config.max_file_bytes,
            ));
        }
        Ok(())
    }

    fn search_quality(&self, canvas: &PixelBuffer) -> PhotoResult<(Vec<u8>, u64, u8)> {
        let target = self.config.target_bytes();
        let mut ladder = self.config.quality_percents().into_iter().peekable();

        while let Some(quality) = ladder.next() {
            let encoded = self.codec.encode_jpeg(canvas, quality)?;
            let estimate = estimate_size_bytes(encoded.len());
            debug!(
                "encode pass: quality {}% -> ~{} bytes (target {})",
                quality, estimate, target
            );

            if estimate <= target {
                return Ok((encoded, estimate, quality));
            }
            if ladder.peek().is_none() {
                warn!(
                    "quality floor {}% reached at ~{} bytes, over the {} byte target",
                    quality, estimate, target
                );
                return Ok((encoded, estimate, quality));
            }
        }

        Err(PhotoError::encode("quality ladder is empty"))
    }
}
