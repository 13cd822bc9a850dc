//! Member document orchestration
//!
//! Upload flow:
//! 1. Reject anything over the hard cap outright
//! 2. Compress once if above the compression trigger, then re-check the cap
//! 3. Store under the fixed per-member name
//!
//! A rejected call never touches storage.

use bytes::Bytes;
use std::sync::Arc;
use std::time::Instant;

use crate::compressor::{ImageCompressor, JpegCompressor};
use crate::error::DocumentError;
use crate::metrics::DocumentMetrics;
use crate::policy::SizePolicy;
use crate::store::{DocumentStore, MemberDocument, MemberRepository};

/// Name under which every member's document is stored
pub fn document_name_for(member_id: &str) -> String {
    format!("member_{}_document.jpg", member_id)
}

/// Summary of an accepted upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub document_name: String,
    pub original_size: usize,
    pub stored_size: usize,
    pub compressed: bool,
}

pub struct MemberDocumentService {
    store: DocumentStore<dyn MemberRepository>,
    policy: SizePolicy,
    compressor: Arc<dyn ImageCompressor>,
}

impl MemberDocumentService {
    /// Service using the default JPEG compressor
    pub fn new(repository: Arc<dyn MemberRepository>, policy: SizePolicy) -> Self {
        Self::with_compressor(repository, policy, Arc::new(JpegCompressor::new()))
    }

    pub fn with_compressor(
        repository: Arc<dyn MemberRepository>,
        policy: SizePolicy,
        compressor: Arc<dyn ImageCompressor>,
    ) -> Self {
        Self {
            store: DocumentStore::new(repository),
            policy,
            compressor,
        }
    }

    pub fn repository(&self) -> &Arc<dyn MemberRepository> {
        self.store.repository()
    }

    /// Current document of a member
    pub async fn fetch(&self, member_id: &str) -> Result<MemberDocument, DocumentError> {
        let result = self.fetch_inner(member_id).await;
        record_outcome("fetch", &result);
        result
    }

    async fn fetch_inner(&self, member_id: &str) -> Result<MemberDocument, DocumentError> {
        if let Some(document) = self.store.get(member_id).await? {
            return Ok(document);
        }

        // The store does not say which part was missing
        match self.repository().find_member_by_id(member_id).await? {
            Some(_) => Err(DocumentError::document_not_found(member_id)),
            None => Err(DocumentError::member_not_found(member_id)),
        }
    }

    /// Create or replace a member's document
    pub async fn upload(
        &self,
        member_id: &str,
        raw: Bytes,
    ) -> Result<UploadReceipt, DocumentError> {
        let result = self.upload_inner(member_id, raw).await;
        record_outcome("upload", &result);

        match &result {
            Ok(receipt) => {
                DocumentMetrics::global()
                    .stored_size_bytes
                    .observe(receipt.stored_size as f64);
                tracing::info!(
                    member_id = %member_id,
                    document_name = %receipt.document_name,
                    original_size = receipt.original_size,
                    stored_size = receipt.stored_size,
                    compressed = receipt.compressed,
                    "Member document stored"
                );
            }
            Err(e) => {
                tracing::info!(
                    member_id = %member_id,
                    reason = e.kind(),
                    error = %e,
                    "Member document upload rejected"
                );
            }
        }

        result
    }

    async fn upload_inner(
        &self,
        member_id: &str,
        raw: Bytes,
    ) -> Result<UploadReceipt, DocumentError> {
        let original_size = raw.len();
        self.check_cap(original_size)?;

        let (content, compressed) = if self.policy.needs_compression(original_size as u64) {
            let bytes = self.compress(member_id, &raw)?;
            self.check_cap(bytes.len())?;
            (bytes, true)
        } else {
            (raw, false)
        };

        let document_name = document_name_for(member_id);
        let stored_size = content.len();
        self.store
            .put(member_id, &document_name, content)
            .await?
            .ok_or_else(|| DocumentError::member_not_found(member_id))?;

        Ok(UploadReceipt {
            document_name,
            original_size,
            stored_size,
            compressed,
        })
    }

    /// Detach a member's document
    pub async fn remove(&self, member_id: &str) -> Result<(), DocumentError> {
        let result = self.remove_inner(member_id).await;
        record_outcome("remove", &result);
        result
    }

    async fn remove_inner(&self, member_id: &str) -> Result<(), DocumentError> {
        if !self.store.delete(member_id).await? {
            return Err(DocumentError::document_not_found(member_id));
        }
        tracing::info!(member_id = %member_id, "Member document removed");
        Ok(())
    }

    fn check_cap(&self, size: usize) -> Result<(), DocumentError> {
        if self.policy.exceeds_hard_cap(size as u64) {
            return Err(DocumentError::PayloadTooLarge {
                size: size as u64,
                max_size: self.policy.max_accepted_size_bytes(),
            });
        }
        Ok(())
    }

    fn compress(&self, member_id: &str, raw: &[u8]) -> Result<Bytes, DocumentError> {
        let metrics = DocumentMetrics::global();
        let started = Instant::now();

        let outcome = self
            .compressor
            .compress(raw, self.policy.compression_quality())?;

        metrics.compressions.inc();
        metrics
            .compression_duration
            .observe(started.elapsed().as_secs_f64());

        tracing::debug!(
            member_id = %member_id,
            original_size = outcome.original_size,
            compressed_size = outcome.compressed_size(),
            width = outcome.dimensions.0,
            height = outcome.dimensions.1,
            grew = outcome.grew(),
            "Compressed member document"
        );

        Ok(Bytes::from(outcome.data))
    }
}

fn record_outcome<T>(operation: &str, result: &Result<T, DocumentError>) {
    let outcome = match result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    };
    DocumentMetrics::global().record(operation, outcome);
}
