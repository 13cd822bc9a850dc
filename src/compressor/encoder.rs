//! JPEG encoder wrapper
//!
//! Maps the configured quality fraction onto the encoder's 1-100 scale and
//! encodes RGB pixel buffers as baseline JPEG.

use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
use image::ImageEncoder as _;
use std::io::Cursor;

use super::error::ImageError;

/// MIME type of every document produced by this crate
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Quality settings for JPEG encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderQuality {
    /// Quality value (1-100, where 100 is best quality)
    pub quality: u8,
}

impl Default for EncoderQuality {
    fn default() -> Self {
        Self { quality: 80 }
    }
}

impl EncoderQuality {
    /// Create quality settings with specified quality level
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    /// Convert a fraction in (0, 1] into encoder quality
    ///
    /// Values are rounded to the nearest percent, so 0.99 becomes 99 and
    /// anything below 0.005 still encodes at quality 1.
    pub fn from_fraction(fraction: f32) -> Result<Self, ImageError> {
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(ImageError::invalid_quality(fraction));
        }
        Ok(Self::with_quality((fraction * 100.0).round() as u8))
    }
}

/// Result of encoding an image
#[derive(Debug)]
pub struct EncodedImage {
    /// The encoded image data
    pub data: Vec<u8>,
    /// Pixel dimensions (width, height)
    pub dimensions: (u32, u32),
}

/// JPEG encoder using the image crate
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegEncoder;

impl JpegEncoder {
    /// Encode an RGB image (3 bytes per pixel) at the given quality
    pub fn encode(
        &self,
        rgb: &image::RgbImage,
        quality: EncoderQuality,
    ) -> Result<EncodedImage, ImageError> {
        let (width, height) = rgb.dimensions();
        let mut output = Cursor::new(Vec::new());
        let encoder = ImageJpegEncoder::new_with_quality(&mut output, quality.quality);

        encoder
            .write_image(rgb.as_raw(), width, height, image::ColorType::Rgb8)
            .map_err(|e| ImageError::encode_failed("jpeg", e.to_string()))?;

        Ok(EncodedImage {
            data: output.into_inner(),
            dimensions: (width, height),
        })
    }
}
