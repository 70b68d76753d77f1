// SPDX-License-Identifier: MIT
// CPU scaler built on fast_image_resize (SIMD-accelerated).
// RGBA8 in → RGBA8 out, direct write into caller-provided dst buffer.

use fast_image_resize as fir;
use fir::images::{TypedImage, TypedImageRef};
use fir::pixels::U8x4;
use fir::{ResizeOptions, Resizer};

use crate::plan::{ScalePlan, Size};

#[derive(Debug)]
pub enum ScaleError {
    ZeroSized(Size),
    SourceTooSmall { expected: usize, actual: usize },
    BufferTooSmall { expected: usize, actual: usize },
    Fir(fir::ResizeError),
    ImageBuf(fir::ImageBufferError),
}

impl From<fir::ResizeError> for ScaleError { fn from(e: fir::ResizeError) -> Self { Self::Fir(e) } }
impl From<fir::ImageBufferError> for ScaleError { fn from(e: fir::ImageBufferError) -> Self { Self::ImageBuf(e) } }

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::ZeroSized(s) => write!(f, "Image has zero size: {}x{}", s.w, s.h),
            ScaleError::SourceTooSmall { expected, actual } => {
                write!(f, "Source buffer too small: {} bytes (need {})", actual, expected)
            }
            ScaleError::BufferTooSmall { expected, actual } => {
                write!(f, "Output buffer too small: {} bytes (need {})", actual, expected)
            }
            ScaleError::Fir(e) => write!(f, "Fast image resize error: {}", e),
            ScaleError::ImageBuf(e) => write!(f, "Image buffer error: {}", e),
        }
    }
}

impl std::error::Error for ScaleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScaleError::Fir(e) => Some(e),
            ScaleError::ImageBuf(e) => Some(e),
            _ => None,
        }
    }
}

/// Bytes needed for a tightly packed RGBA8 image of `size`.
#[inline]
pub fn rgba_len(size: Size) -> usize {
    (size.w as usize) * (size.h as usize) * 4
}

/// Main scaling entry point.
/// `src_rgba` must be tightly packed `plan.input` RGBA8; `dst` must hold at least
/// `plan.out.w * plan.out.h * 4` bytes. Alpha is premultiplied during
/// resampling so transparent edges do not bleed dark fringes.
pub fn scale_rgba_cpu(
    resizer: &mut Resizer,
    src_rgba: &[u8],
    plan: &ScalePlan,
    dst: &mut [u8],
) -> Result<(), ScaleError> {
    if plan.input.area() == 0 {
        return Err(ScaleError::ZeroSized(plan.input));
    }
    if plan.out.area() == 0 {
        return Err(ScaleError::ZeroSized(plan.out));
    }

    let src_len = rgba_len(plan.input);
    if src_rgba.len() < src_len {
        return Err(ScaleError::SourceTooSmall { expected: src_len, actual: src_rgba.len() });
    }
    let dst_len = rgba_len(plan.out);
    if dst.len() < dst_len {
        return Err(ScaleError::BufferTooSmall { expected: dst_len, actual: dst.len() });
    }

    // Nothing to resample: plain copy.
    if !plan.needs_resize() {
        dst[..dst_len].copy_from_slice(&src_rgba[..src_len]);
        return Ok(());
    }

    let src_view = TypedImageRef::<U8x4>::from_buffer(plan.input.w, plan.input.h, &src_rgba[..src_len])?;
    let mut dst_image = TypedImage::<U8x4>::from_buffer(plan.out.w, plan.out.h, &mut dst[..dst_len])?;

    let opts = ResizeOptions::new()
        .resize_alg(fir::ResizeAlg::Convolution(fir::FilterType::Lanczos3))
        .use_alpha(true);
    resizer.resize_typed::<U8x4>(&src_view, &mut dst_image, &opts)?;

    Ok(())
}

/// Composite straight-alpha RGBA8 pixels over an opaque `bg` colour in place.
/// Every pixel leaves with alpha 255.
pub fn flatten_rgba_onto(rgba: &mut [u8], bg: [u8; 3]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 255 {
            continue;
        }
        for c in 0..3 {
            px[c] = blend(px[c], bg[c], a);
        }
        px[3] = 255;
    }
}

#[inline]
fn blend(fg: u8, bg: u8, alpha: u32) -> u8 {
    ((fg as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8
}
