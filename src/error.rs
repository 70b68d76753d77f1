//! # Error Handling
//!
//! One error type for the whole photo pipeline, with a fieldless [`ErrorKind`]
//! so callers can branch on what went wrong without matching on messages.
//!
//! ## Error Classes
//!
//! - **Selection errors** (`InvalidFileType`, `FileTooLarge`): rejected before
//!   any decoding work
//! - **Codec errors** (`Decode`, `Encode`): the file could not be turned into a JPEG
//! - **Slot errors** (`SlotOrderViolation`, `SlotOutOfRange`): raised by the
//!   slot manager, never seen by the normalizer
//! - **Collaborator errors** (`Config`, `Io`, `Api`, `MissingPrimary`, `Worker`)
//!
//! No error is fatal and none is retried automatically. A failed operation
//! leaves the normalizer and the slot set exactly as they were.
//!
//! ## Usage
//!
//! ```rust
//! use storefront_photos::error::{ErrorKind, HasRecoverySuggestion, PhotoError};
//!
//! let error = PhotoError::invalid_file_type("application/pdf");
//! assert_eq!(error.kind(), ErrorKind::InvalidFileType);
//! assert!(error.recovery_suggestion().is_some());
//! ```

use std::{error::Error as StdError, fmt};

/// Discriminant of [`PhotoError`] for branching at the UI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidFileType,
    FileTooLarge,
    Decode,
    Encode,
    SlotOrderViolation,
    SlotOutOfRange,
    MissingPrimary,
    Config,
    Io,
    Api,
    Worker,
}

/// Base error type for the photo pipeline
#[derive(Debug)]
pub enum PhotoError {
    /// Declared MIME type is not an image
    InvalidFileType { mime_type: String },
    /// Declared byte size is over the accepted maximum
    FileTooLarge { size_bytes: u64, max_bytes: u64 },
    /// Bytes could not be decoded into pixels
    Decode { reason: String },
    /// The canvas could not be encoded or resampled
    Encode { reason: String },
    /// Target slot's predecessor is empty
    SlotOrderViolation { slot: usize, missing: usize },
    /// Slot index past the configured capacity
    SlotOutOfRange { slot: usize, capacity: usize },
    /// Submission attempted without a primary photo
    MissingPrimary,
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
    },
    /// I/O errors
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
    },
    /// Product-submission failures
    Api {
        operation: String,
        status: Option<u16>,
        reason: String,
    },
    /// Background normalization task did not finish
    Worker { reason: String },
}

impl PhotoError {
    /// Create an invalid file type error
    pub fn invalid_file_type(mime_type: impl Into<String>) -> Self {
        Self::InvalidFileType {
            mime_type: mime_type.into(),
        }
    }

    /// Create a file too large error
    pub fn file_too_large(size_bytes: u64, max_bytes: u64) -> Self {
        Self::FileTooLarge {
            size_bytes,
            max_bytes,
        }
    }

    /// Create a decode error
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    /// Create an encode error
    pub fn encode(reason: impl Into<String>) -> Self {
        Self::Encode {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: None,
            source,
        }
    }

    /// Create an API error
    pub fn api(operation: impl Into<String>, status: Option<u16>, reason: impl Into<String>) -> Self {
        Self::Api {
            operation: operation.into(),
            status,
            reason: reason.into(),
        }
    }

    /// Attach a path to an I/O error; other variants are returned unchanged
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        if let Self::Io { path: slot, .. } = &mut self {
            *slot = Some(path.into());
        }
        self
    }

    /// Kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFileType { .. } => ErrorKind::InvalidFileType,
            Self::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Encode { .. } => ErrorKind::Encode,
            Self::SlotOrderViolation { .. } => ErrorKind::SlotOrderViolation,
            Self::SlotOutOfRange { .. } => ErrorKind::SlotOutOfRange,
            Self::MissingPrimary => ErrorKind::MissingPrimary,
            Self::Config { .. } => ErrorKind::Config,
            Self::Io { .. } => ErrorKind::Io,
            Self::Api { .. } => ErrorKind::Api,
            Self::Worker { .. } => ErrorKind::Worker,
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidFileType { .. } | Self::FileTooLarge { .. } => "selection",
            Self::Decode { .. } | Self::Encode { .. } => "codec",
            Self::SlotOrderViolation { .. } | Self::SlotOutOfRange { .. } => "slots",
            Self::MissingPrimary | Self::Api { .. } => "submission",
            Self::Config { .. } => "config",
            Self::Io { .. } => "io",
            Self::Worker { .. } => "worker",
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::InvalidFileType { mime_type } => {
                write!(f, "Unsupported file type '{}': expected an image", mime_type)
            }
            PhotoError::FileTooLarge {
                size_bytes,
                max_bytes,
            } => {
                write!(
                    f,
                    "File is {} bytes, larger than the {} byte limit",
                    size_bytes, max_bytes
                )
            }
            PhotoError::Decode { reason } => write!(f, "Could not decode image: {}", reason),
            PhotoError::Encode { reason } => write!(f, "Could not encode image: {}", reason),
            PhotoError::SlotOrderViolation { slot, missing } => {
                write!(
                    f,
                    "Cannot fill photo slot {} while slot {} is empty",
                    slot, missing
                )
            }
            PhotoError::SlotOutOfRange { slot, capacity } => {
                write!(f, "Photo slot {} out of range (capacity {})", slot, capacity)
            }
            PhotoError::MissingPrimary => write!(f, "A primary photo is required"),
            PhotoError::Config {
                field,
                value,
                reason,
            } => {
                write!(
                    f,
                    "Configuration error in '{}': {} (value: {})",
                    field, reason, value
                )
            }
            PhotoError::Io {
                operation,
                path,
                source,
            } => {
                if let Some(path) = path {
                    write!(
                        f,
                        "I/O error during {} on '{}': {}",
                        operation, path, source
                    )
                } else {
                    write!(f, "I/O error during {}: {}", operation, source)
                }
            }
            PhotoError::Api {
                operation,
                status,
                reason,
            } => {
                if let Some(status) = status {
                    write!(f, "API error during {} (HTTP {}): {}", operation, status, reason)
                } else {
                    write!(f, "API error during {}: {}", operation, reason)
                }
            }
            PhotoError::Worker { reason } => write!(f, "Normalization task failed: {}", reason),
        }
    }
}

impl StdError for PhotoError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias using our custom error type
pub type PhotoResult<T> = Result<T, PhotoError>;

/// Trait for errors that can be retried
pub trait Retryable {
    /// Check if this error can be retried
    fn is_retryable(&self) -> bool;
}

impl Retryable for PhotoError {
    /// Only transport failures and server-side API errors; everything else
    /// needs a different input from the user.
    fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status: None, .. } => true,
            Self::Api {
                status: Some(code), ..
            } => *code >= 500,
            _ => false,
        }
    }
}

/// Trait for errors that provide recovery suggestions
pub trait HasRecoverySuggestion {
    /// Get recovery suggestion for this error
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for PhotoError {
    fn recovery_suggestion(&self) -> Option<&str> {
        match self {
            Self::InvalidFileType { .. } => Some("Please select an image file"),
            Self::FileTooLarge { .. } => Some("Image size must be less than 5MB"),
            Self::Decode { .. } => Some("The image could not be read, try a different file"),
            Self::Encode { .. } => Some("The image could not be processed, try a different file"),
            Self::SlotOrderViolation { .. } => Some("Please fill the previous photo slot first"),
            Self::MissingPrimary => Some("Please add a main product photo"),
            Self::Api { .. } if self.is_retryable() => {
                Some("Submitting the product failed, please try again")
            }
            Self::Api { .. } => Some("The store rejected the product, check its details"),
            Self::SlotOutOfRange { .. }
            | Self::Config { .. }
            | Self::Io { .. }
            | Self::Worker { .. } => None,
        }
    }
}

/// Error conversion implementations
impl From<std::io::Error> for PhotoError {
    fn from(error: std::io::Error) -> Self {
        Self::io("unknown", error)
    }
}

impl From<photo_scale::cpu::ScaleError> for PhotoError {
    fn from(error: photo_scale::cpu::ScaleError) -> Self {
        Self::encode(error.to_string())
    }
}

impl From<reqwest::Error> for PhotoError {
    fn from(error: reqwest::Error) -> Self {
        let status = error.status().map(|s| s.as_u16());
        Self::api("request", status, error.to_string())
    }
}

impl From<tokio::task::JoinError> for PhotoError {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::Worker {
            reason: error.to_string(),
        }
    }
}
