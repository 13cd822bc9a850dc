// Upload size policy
// Pure predicates over the thresholds loaded at startup

use crate::config::FilesConfig;

/// Size thresholds applied to every upload, in bytes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizePolicy {
    max_accepted_size_bytes: u64,
    compression_trigger_size_bytes: u64,
    compression_quality: f32,
}

impl SizePolicy {
    pub fn new(
        max_accepted_size_bytes: u64,
        compression_trigger_size_bytes: u64,
        compression_quality: f32,
    ) -> Self {
        Self {
            max_accepted_size_bytes,
            compression_trigger_size_bytes,
            compression_quality,
        }
    }

    pub fn from_config(files: &FilesConfig) -> Self {
        Self::new(
            files.max_size_bytes(),
            files.compression_border_size_bytes(),
            files.compressed_image_quality,
        )
    }

    /// True iff `size_bytes` is strictly above the compression trigger
    pub fn needs_compression(&self, size_bytes: u64) -> bool {
        size_bytes > self.compression_trigger_size_bytes
    }

    /// True iff `size_bytes` is strictly above the hard cap
    pub fn exceeds_hard_cap(&self, size_bytes: u64) -> bool {
        size_bytes > self.max_accepted_size_bytes
    }

    /// False when any payload big enough to trigger compression is already
    /// over the cap, so the compressor can never run.
    pub fn compression_enabled(&self) -> bool {
        self.compression_trigger_size_bytes < self.max_accepted_size_bytes
    }

    pub fn max_accepted_size_bytes(&self) -> u64 {
        self.max_accepted_size_bytes
    }

    pub fn compression_trigger_size_bytes(&self) -> u64 {
        self.compression_trigger_size_bytes
    }

    pub fn compression_quality(&self) -> f32 {
        self.compression_quality
    }
}
