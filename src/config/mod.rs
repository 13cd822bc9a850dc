// Configuration module
// YAML file with ${VAR} environment substitution, loaded once at startup

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::policy::SizePolicy;

/// Bytes per configured kilobyte. Thresholds are written in KB and
/// converted exactly once, here.
pub const BYTES_PER_KB: u64 = 1024;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub boundary: BoundaryConfig,
}

/// Upload size and compression thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Hard cap on stored document size, in KB
    #[serde(default = "default_max_size_kbytes", alias = "maxSizeKBytes")]
    pub max_size_kbytes: u64,

    /// Uploads larger than this (in KB) are re-encoded before acceptance
    #[serde(
        default = "default_compression_border_size_kbytes",
        alias = "compressionBorderSizeKBytes"
    )]
    pub compression_border_size_kbytes: u64,

    /// Lossy quality fraction in (0, 1]
    #[serde(
        default = "default_compressed_image_quality",
        alias = "compressedImageQuality"
    )]
    pub compressed_image_quality: f32,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            max_size_kbytes: default_max_size_kbytes(),
            compression_border_size_kbytes: default_compression_border_size_kbytes(),
            compressed_image_quality: default_compressed_image_quality(),
        }
    }
}

impl FilesConfig {
    /// Convert max_size_kbytes to bytes
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_kbytes.saturating_mul(BYTES_PER_KB)
    }

    /// Convert compression_border_size_kbytes to bytes
    pub fn compression_border_size_bytes(&self) -> u64 {
        self.compression_border_size_kbytes
            .saturating_mul(BYTES_PER_KB)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_size_kbytes == 0 {
            return Err("files.max_size_kbytes must be greater than 0".to_string());
        }

        let quality = self.compressed_image_quality;
        if !quality.is_finite() || quality <= 0.0 || quality > 1.0 {
            return Err(format!(
                "files.compressed_image_quality must be in (0, 1], got {}",
                quality
            ));
        }

        Ok(())
    }
}

fn default_max_size_kbytes() -> u64 {
    400
}

fn default_compression_border_size_kbytes() -> u64 {
    100
}

fn default_compressed_image_quality() -> f32 {
    0.5
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-local maps, lost on exit
    #[default]
    Memory,
    /// JSON member records and document blobs under `root_dir`
    Disk,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            root_dir: default_root_dir(),
        }
    }
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("./data")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; RUST_LOG takes precedence when set
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// How an oversized upload is reported to HTTP clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TooLargeStatus {
    /// 413 Payload Too Large
    #[default]
    Distinct,
    /// 404 Not Found, for clients built against the legacy contract
    NotFound,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoundaryConfig {
    #[serde(default)]
    pub too_large_status: TooLargeStatus,
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        let mut missing = None;
        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            })
        });

        if let Some(var_name) = missing {
            return Err(format!(
                "Environment variable '{}' is referenced but not set",
                var_name
            ));
        }

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.files.validate()?;

        if self.storage.backend == StorageBackend::Disk
            && self.storage.root_dir.as_os_str().is_empty()
        {
            return Err("storage.root_dir is required for the disk backend".to_string());
        }

        if !SizePolicy::from_config(&self.files).compression_enabled() {
            tracing::warn!(
                max_size_kbytes = self.files.max_size_kbytes,
                compression_border_size_kbytes = self.files.compression_border_size_kbytes,
                "Compression trigger is not below the size cap; compression is effectively disabled"
            );
        }

        Ok(())
    }
}
