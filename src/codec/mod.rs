//! # Image Codec Capability
//!
//! The normalizer never talks to a decoder or encoder directly. It goes through
//! [`ImageCodec`], which exposes the three primitives the pipeline needs:
//!
//! 1. **decode_image**: file bytes → straight-alpha RGBA8 [`PixelBuffer`]
//! 2. **composite_over_white**: resample to the target size, then flatten onto
//!    an opaque white canvas
//! 3. **encode_jpeg**: opaque canvas → JPEG bytes at a given quality
//!
//! [`RasterCodec`] is the production backend: `image` for the codecs and
//! `photo-scale` (fast_image_resize) for resampling. Tests substitute their own
//! implementation to count calls and dictate encoded sizes.

use fast_image_resize::Resizer;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use photo_scale::cpu::{flatten_rgba_onto, rgba_len, scale_rgba_cpu};
use photo_scale::plan::{ScalePlan, Size};

use crate::error::{PhotoError, PhotoResult};

/// Background JPEG output is flattened onto.
pub const WHITE: [u8; 3] = [255, 255, 255];

/// Tightly packed RGBA8 pixels with straight (non-premultiplied) alpha.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps `data`, which must be exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> PhotoResult<Self> {
        let expected = rgba_len(Size { w: width, h: height });
        if data.len() != expected {
            return Err(PhotoError::decode(format!(
                "pixel buffer holds {} bytes, {}x{} RGBA needs {}",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            width,
            height,
            data: rgba.repeat(rgba_len(Size { w: width, h: height }) / 4),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size {
            w: self.width,
            h: self.height,
        }
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }

    /// True when no pixel carries transparency.
    pub fn is_opaque(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 255)
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PixelBuffer({}x{})", self.width, self.height)
    }
}

/// Decode / composite / encode primitives used by the normalizer.
pub trait ImageCodec {
    /// Decode an encoded image into RGBA8 pixels.
    fn decode_image(&self, bytes: &[u8]) -> PhotoResult<PixelBuffer>;

    /// Draw `pixels` scaled to `width`x`height` over a white rectangle of the same size.
    fn composite_over_white(
        &self,
        pixels: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> PhotoResult<PixelBuffer>;

    /// Encode an opaque canvas as JPEG. `quality` is a percent in `1..=100`.
    fn encode_jpeg(&self, pixels: &PixelBuffer, quality: u8) -> PhotoResult<Vec<u8>>;
}

/// Production codec on `image` + `photo-scale`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterCodec;

impl ImageCodec for RasterCodec {
    fn decode_image(&self, bytes: &[u8]) -> PhotoResult<PixelBuffer> {
        let decoded = image::load_from_memory(bytes).map_err(|e| PhotoError::decode(e.to_string()))?;
        let rgba = decoded.into_rgba8();
        let (width, height) = rgba.dimensions();
        PixelBuffer::from_rgba(width, height, rgba.into_raw())
    }

    fn composite_over_white(
        &self,
        pixels: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> PhotoResult<PixelBuffer> {
        let plan = ScalePlan::exact(pixels.size(), Size { w: width, h: height });
        let mut canvas = vec![0u8; rgba_len(plan.out)];
        scale_rgba_cpu(&mut Resizer::new(), pixels.as_rgba(), &plan, &mut canvas)?;
        flatten_rgba_onto(&mut canvas, WHITE);
        PixelBuffer::from_rgba(width, height, canvas)
    }

    fn encode_jpeg(&self, pixels: &PixelBuffer, quality: u8) -> PhotoResult<Vec<u8>> {
        // JPEG has no alpha channel; the canvas is already opaque.
        let rgb: Vec<u8> = pixels
            .as_rgba()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();

        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
            .write_image(&rgb, pixels.width(), pixels.height(), ExtendedColorType::Rgb8)
            .map_err(|e| PhotoError::encode(e.to_string()))?;
        Ok(out)
    }
}
