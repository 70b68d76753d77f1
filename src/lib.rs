//! # Storefront Photos Library
//!
//! Product-photo handling for the seller dashboard: every photo a seller picks
//! is validated, downscaled into a bounding box, flattened onto white and
//! re-encoded as a JPEG under a size budget before it is attached to a product.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//! - `processing`: The [`ImageNormalizer`] pipeline and its quality search
//! - `slots`: The [`PhotoSlotManager`] (primary photo plus extras, filled in order)
//! - `codec`: Decode / composite / encode capability and its `image` backend
//! - `config`: Named limits with validation
//! - `api`: Product-submission boundary (data URIs, request body, HTTP client)
//! - `selection`: File-picker output
//!
//! ## Example
//!
//! ```rust,no_run
//! use storefront_photos::{PhotoSlotManager, RawSelection};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut photos = PhotoSlotManager::new();
//! photos.assign(0, &RawSelection::from_path("front.png")?)?;
//! photos.assign(1, &RawSelection::from_path("back.jpg")?)?;
//!
//! let payload = photos.to_payload();
//! assert!(payload.primary.is_some());
//! assert_eq!(payload.extras.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod codec;
pub mod config;
pub mod error;
pub mod processing;
pub mod selection;
pub mod slots;

/// Re-export error types for convenience
pub use error::{ErrorKind, HasRecoverySuggestion, PhotoError, PhotoResult, Retryable};

pub use codec::{ImageCodec, PixelBuffer, RasterCodec};
pub use config::{NormalizerConfig, SlotConfig};
pub use processing::{ImageNormalizer, NormalizedImage};
pub use selection::RawSelection;
pub use slots::{PhotoSlotManager, ProductImages};
