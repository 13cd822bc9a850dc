//! Image compression error types
//!
//! Structured errors with HTTP status mapping, following the same shape as
//! the storage and document error types.

use std::fmt;

/// Errors that can occur while re-encoding an uploaded image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// Payload is not a raster image the decoder understands
    DecodeFailed { message: String },
    /// Encoding to the output format failed
    EncodeFailed { format: String, message: String },
    /// Quality fraction outside (0, 1]
    InvalidQuality { quality: String },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::DecodeFailed { message } => {
                write!(f, "Failed to decode image: {}", message)
            }
            ImageError::EncodeFailed { format, message } => {
                write!(f, "Failed to encode to {}: {}", format, message)
            }
            ImageError::InvalidQuality { quality } => {
                write!(f, "Invalid quality {}: must be in (0, 1]", quality)
            }
        }
    }
}

impl std::error::Error for ImageError {}

impl ImageError {
    /// Maps image errors to HTTP status codes
    ///
    /// - DecodeFailed, InvalidQuality → 400 (Bad Request)
    /// - EncodeFailed → 500 (Internal Server Error)
    pub fn to_http_status(&self) -> u16 {
        match self {
            ImageError::DecodeFailed { .. } | ImageError::InvalidQuality { .. } => 400,
            ImageError::EncodeFailed { .. } => 500,
        }
    }

    pub fn decode_failed(message: impl Into<String>) -> Self {
        ImageError::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        ImageError::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn invalid_quality(quality: f32) -> Self {
        ImageError::InvalidQuality {
            quality: quality.to_string(),
        }
    }
}
