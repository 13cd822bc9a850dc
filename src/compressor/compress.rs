//! Lossy re-encoding of uploaded images
//!
//! decode → flatten to RGB → encode as JPEG at the configured quality.
//! The compressor never checks sizes and never retries; the caller decides
//! whether the result is acceptable.

use image::DynamicImage;

use super::encoder::{EncoderQuality, JpegEncoder};
use super::error::ImageError;

/// Result of a single compression pass
#[derive(Debug, Clone)]
pub struct CompressionOutcome {
    /// Re-encoded image bytes
    pub data: Vec<u8>,
    /// Size of the input payload in bytes
    pub original_size: usize,
    /// Pixel dimensions (width, height), identical for input and output
    pub dimensions: (u32, u32),
}

impl CompressionOutcome {
    pub fn compressed_size(&self) -> usize {
        self.data.len()
    }

    /// True when re-encoding produced more bytes than it was given
    pub fn grew(&self) -> bool {
        self.data.len() > self.original_size
    }
}

/// Compresses raw image bytes at a quality fraction in (0, 1]
///
/// Implementations must fail on input that does not decode as a raster
/// image instead of passing it through.
pub trait ImageCompressor: Send + Sync {
    fn compress(&self, raw: &[u8], quality: f32) -> Result<CompressionOutcome, ImageError>;
}

/// Default compressor: re-encodes any decodable raster image as JPEG
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegCompressor {
    encoder: JpegEncoder,
}

impl JpegCompressor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageCompressor for JpegCompressor {
    fn compress(&self, raw: &[u8], quality: f32) -> Result<CompressionOutcome, ImageError> {
        let quality = EncoderQuality::from_fraction(quality)?;
        let img = decode_image(raw)?;

        // JPEG has no alpha channel
        let rgb = img.to_rgb8();
        let encoded = self.encoder.encode(&rgb, quality)?;

        Ok(CompressionOutcome {
            data: encoded.data,
            original_size: raw.len(),
            dimensions: encoded.dimensions,
        })
    }
}

/// Decode image data into a DynamicImage, guessing the format from content
pub(crate) fn decode_image(data: &[u8]) -> Result<DynamicImage, ImageError> {
    image::load_from_memory(data).map_err(|e| ImageError::decode_failed(e.to_string()))
}
