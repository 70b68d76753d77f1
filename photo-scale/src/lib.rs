// SPDX-License-Identifier: MIT
//! # photo-scale: Bounded Photo Downscaling
//!
//! Dimension planning and CPU resampling for product photos that must fit a
//! bounding box before they are re-encoded.
//!
//! ## Key Components
//!
//! - [`plan`]: Output-size computation (downscale only, aspect preserving)
//! - [`cpu`]: RGBA8 resampling on fast_image_resize and flattening onto an opaque background
//!
//! ## Usage Example
//!
//! ```rust
//! use photo_scale::plan::{build_plan, Bounds, Size};
//!
//! let plan = build_plan(Size { w: 4000, h: 2000 }, Bounds::square(1200));
//! assert_eq!((plan.out.w, plan.out.h), (1200, 600));
//! assert!(plan.needs_resize());
//! ```

pub mod cpu;
pub mod plan;
