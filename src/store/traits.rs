//! Persistence collaborator contract
//!
//! Anything that can look up members and store documents can back a
//! `DocumentStore`: the in-memory maps, the disk layout, or a database
//! adapter living outside this crate.

use async_trait::async_trait;

use super::error::StorageError;
use super::model::{DocumentId, Member, MemberDocument, NewDocument};

/// Result of repointing a member's document reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSwap {
    /// No member with that id; nothing was written
    MemberNotFound,
    /// Pointer updated; `previous` is what it referred to before
    Swapped { previous: Option<DocumentId> },
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Look up a member by its opaque identifier
    async fn find_member_by_id(&self, member_id: &str) -> Result<Option<Member>, StorageError>;

    /// Insert or overwrite a member record
    async fn save_member(&self, member: Member) -> Result<Member, StorageError>;

    /// Atomically point a member at `document_id` (or at nothing)
    ///
    /// The read of the old pointer and the write of the new one happen as a
    /// single step, so concurrent callers each get back the document they
    /// actually superseded.
    async fn replace_document(
        &self,
        member_id: &str,
        document_id: Option<DocumentId>,
    ) -> Result<DocumentSwap, StorageError>;

    /// Persist new content and assign it an identity
    async fn save_document(&self, document: NewDocument) -> Result<MemberDocument, StorageError>;

    /// Load a document by identity
    async fn find_document_by_id(
        &self,
        id: &DocumentId,
    ) -> Result<Option<MemberDocument>, StorageError>;

    /// Reclaim storage held by a document nothing refers to any more
    /// Returns true if the document existed
    async fn delete_document(&self, id: &DocumentId) -> Result<bool, StorageError>;
}
