// Error types module

use thiserror::Error;

use crate::compressor::ImageError;
use crate::config::TooLargeStatus;
use crate::store::StorageError;

/// Outcome of a rejected document operation
///
/// Every variant is terminal: nothing is retried and a rejected upload
/// leaves the member's previous document untouched.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Member '{member_id}' not found")]
    MemberNotFound { member_id: String },

    #[error("Member '{member_id}' has no document")]
    DocumentNotFound { member_id: String },

    #[error("Payload of {size} bytes exceeds maximum {max_size} bytes")]
    PayloadTooLarge { size: u64, max_size: u64 },

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl DocumentError {
    pub fn member_not_found(member_id: impl Into<String>) -> Self {
        DocumentError::MemberNotFound {
            member_id: member_id.into(),
        }
    }

    pub fn document_not_found(member_id: impl Into<String>) -> Self {
        DocumentError::DocumentNotFound {
            member_id: member_id.into(),
        }
    }

    /// True for both absent members and absent documents
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DocumentError::MemberNotFound { .. } | DocumentError::DocumentNotFound { .. }
        )
    }

    /// Maps document errors to HTTP status codes
    ///
    /// - MemberNotFound, DocumentNotFound → 404
    /// - PayloadTooLarge → 413, or 404 under `TooLargeStatus::NotFound`
    /// - Image → 400 for undecodable input, 500 for encoder failures
    /// - Storage → 500
    pub fn to_http_status(&self, too_large: TooLargeStatus) -> u16 {
        match self {
            DocumentError::MemberNotFound { .. } | DocumentError::DocumentNotFound { .. } => 404,
            DocumentError::PayloadTooLarge { .. } => match too_large {
                TooLargeStatus::Distinct => 413,
                TooLargeStatus::NotFound => 404,
            },
            DocumentError::Image(e) => e.to_http_status(),
            DocumentError::Storage(_) => 500,
        }
    }

    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentError::MemberNotFound { .. } => "member_not_found",
            DocumentError::DocumentNotFound { .. } => "document_not_found",
            DocumentError::PayloadTooLarge { .. } => "payload_too_large",
            DocumentError::Image(_) => "image_error",
            DocumentError::Storage(_) => "storage_error",
        }
    }
}
