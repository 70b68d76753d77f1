// SPDX-License-Identifier: MIT
//! # Scale Plan Computation
//!
//! Computes the output dimensions for a photo that has to fit inside a
//! bounding box. Images are never upscaled.
//!
//! The bounding rule follows the orientation of the source:
//! - **Landscape** (`w > h`): only the width is checked against `max_w`
//! - **Portrait or square**: only the height is checked against `max_h`
//!
//! When the governing side exceeds its bound it is clamped to the bound and the
//! other side becomes `round(other * bound / governing)`, rounding halves up.

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    /// Number of pixels covered by this size.
    pub fn area(self) -> u64 {
        self.w as u64 * self.h as u64
    }
}

/// Maximum output dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub max_w: u32,
    pub max_h: u32,
}

impl Bounds {
    pub fn new(max_w: u32, max_h: u32) -> Self {
        Self { max_w, max_h }
    }

    /// Same bound on both axes.
    pub fn square(side: u32) -> Self {
        Self::new(side, side)
    }
}

/// Computed scaling plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScalePlan {
    /// Original input dimensions
    pub input: Size,
    /// Bounds used for planning
    pub bounds: Bounds,
    /// Final computed output dimensions
    pub out: Size,
}

impl ScalePlan {
    /// Plan that resamples `input` to exactly `out`, bypassing the bounding rule.
    pub fn exact(input: Size, out: Size) -> Self {
        Self {
            input,
            bounds: Bounds::new(out.w, out.h),
            out,
        }
    }

    /// Whether the output differs from the input and resampling is required.
    pub fn needs_resize(&self) -> bool {
        self.out != self.input
    }
}

/// Compute the output size for `input` constrained by `bounds`.
///
/// Zero-sized inputs are passed through unchanged; the resizer rejects them
/// later with a buffer error.
pub fn build_plan(input: Size, bounds: Bounds) -> ScalePlan {
    let out = fit_bounds(input, bounds);
    ScalePlan { input, bounds, out }
}

fn fit_bounds(input: Size, bounds: Bounds) -> Size {
    if input.w == 0 || input.h == 0 {
        return input;
    }
    if input.w > input.h {
        if input.w > bounds.max_w {
            return Size {
                w: bounds.max_w,
                h: scale_side(input.h, bounds.max_w, input.w),
            };
        }
    } else if input.h > bounds.max_h {
        return Size {
            w: scale_side(input.w, bounds.max_h, input.h),
            h: bounds.max_h,
        };
    }
    input
}

/// `round(side * bound / governing)` in integer arithmetic, never below 1px.
fn scale_side(side: u32, bound: u32, governing: u32) -> u32 {
    let num = side as u64 * bound as u64;
    let den = governing as u64;
    (((2 * num + den) / (2 * den)) as u32).max(1)
}
