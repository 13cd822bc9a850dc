//! One-document-per-member store
//!
//! Every operation is keyed by member id. `put` is always a replace:
//! the new document is written first, then the member is atomically
//! repointed at it, and only then is the superseded document reclaimed.
//! A failure before the member is repointed leaves the previous document
//! attached.

use std::sync::Arc;

use super::error::StorageError;
use super::model::{DocumentId, MemberDocument, NewDocument};
use super::traits::{DocumentSwap, MemberRepository};

pub struct DocumentStore<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> Clone for DocumentStore<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: MemberRepository + ?Sized> DocumentStore<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Current document of a member
    ///
    /// `None` both when the member is unknown and when it has no document.
    pub async fn get(&self, member_id: &str) -> Result<Option<MemberDocument>, StorageError> {
        let Some(member) = self.repository.find_member_by_id(member_id).await? else {
            return Ok(None);
        };
        let Some(document_id) = member.document_id else {
            return Ok(None);
        };

        let document = self.repository.find_document_by_id(&document_id).await?;
        if document.is_none() {
            tracing::warn!(
                member_id = %member_id,
                document_id = %document_id,
                "Member refers to a document that no longer exists"
            );
        }
        Ok(document)
    }

    /// Attach a new document to a member, superseding any previous one
    ///
    /// Returns `None` without writing anything when the member is unknown.
    /// Concurrent puts for one member each reclaim exactly the document they
    /// displaced, so only the last writer's document survives.
    pub async fn put(
        &self,
        member_id: &str,
        name: &str,
        content: impl Into<bytes::Bytes>,
    ) -> Result<Option<MemberDocument>, StorageError> {
        if self.repository.find_member_by_id(member_id).await?.is_none() {
            return Ok(None);
        }

        let document = self
            .repository
            .save_document(NewDocument::new(name, content))
            .await?;

        let previous = match self
            .repository
            .replace_document(member_id, Some(document.id))
            .await
        {
            Ok(DocumentSwap::Swapped { previous }) => previous,
            Ok(DocumentSwap::MemberNotFound) => {
                // Member vanished between the lookup and the swap
                self.discard(&document.id).await;
                return Ok(None);
            }
            Err(e) => {
                // Member still points at the previous document
                self.discard(&document.id).await;
                return Err(e);
            }
        };

        if let Some(previous) = previous {
            self.reclaim(member_id, &previous).await;
        }

        Ok(Some(document))
    }

    /// Detach and reclaim a member's document
    ///
    /// Returns false when there was nothing to delete, whether or not the
    /// member exists.
    pub async fn delete(&self, member_id: &str) -> Result<bool, StorageError> {
        let previous = match self.repository.replace_document(member_id, None).await? {
            DocumentSwap::Swapped { previous } => previous,
            DocumentSwap::MemberNotFound => None,
        };
        let Some(document_id) = previous else {
            return Ok(false);
        };

        self.reclaim(member_id, &document_id).await;
        Ok(true)
    }

    async fn discard(&self, document_id: &DocumentId) {
        if let Err(e) = self.repository.delete_document(document_id).await {
            tracing::warn!(
                document_id = %document_id,
                error = %e,
                "Failed to reclaim unattached document"
            );
        }
    }

    async fn reclaim(&self, member_id: &str, document_id: &DocumentId) {
        // Best effort: the member no longer refers to it either way
        if let Err(e) = self.repository.delete_document(document_id).await {
            tracing::warn!(
                member_id = %member_id,
                document_id = %document_id,
                error = %e,
                "Failed to reclaim superseded document"
            );
        }
    }
}
