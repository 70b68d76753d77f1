//! File-picker output handed to the normalizer.

use std::path::Path;

use image::ImageFormat;

use crate::error::{PhotoError, PhotoResult};

/// MIME type used when the extension is not a known image format.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// One user-selected file: payload, declared MIME type and declared size.
///
/// `size_bytes` is what the picker reported; the normalizer checks it before
/// touching `bytes`.
#[derive(Clone, PartialEq, Eq)]
pub struct RawSelection {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl RawSelection {
    /// Selection whose declared size is the payload length.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        let size_bytes = bytes.len() as u64;
        Self {
            bytes,
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    /// Reads a file and derives its MIME type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> PhotoResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| PhotoError::io("read selection", e).with_path(path.display().to_string()))?;
        Ok(Self::new(bytes, mime_from_path(path)))
    }

    /// Whether the declared type is an image type.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

impl std::fmt::Debug for RawSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawSelection")
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.size_bytes)
            .field("bytes", &format_args!("[{} bytes]", self.bytes.len()))
            .finish()
    }
}

/// MIME type for a path's extension, [`UNKNOWN_MIME`] otherwise.
pub fn mime_from_path(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(UNKNOWN_MIME)
}
