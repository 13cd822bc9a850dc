//! Image compression for oversized uploads
//!
//! Uploads above the compression trigger are decoded and re-encoded as
//! JPEG at the configured quality. Everything stored by this crate is
//! served as `image/jpeg`.

pub mod compress;
pub mod encoder;
pub mod error;

pub use compress::{CompressionOutcome, ImageCompressor, JpegCompressor};
pub use encoder::{EncodedImage, EncoderQuality, JpegEncoder, JPEG_CONTENT_TYPE};
pub use error::ImageError;
