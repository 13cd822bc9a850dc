//! In-memory repository
//!
//! Members and documents live in two maps behind `parking_lot` locks.
//! Nothing survives a restart; used by tests and the `memory` backend.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::error::StorageError;
use super::model::{DocumentId, Member, MemberDocument, NewDocument};
use super::traits::{DocumentSwap, MemberRepository};

#[derive(Default)]
pub struct InMemoryRepository {
    members: RwLock<HashMap<String, Member>>,
    documents: RwLock<HashMap<DocumentId, MemberDocument>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents, attached or not
    pub fn document_count(&self) -> usize {
        self.documents.read().len()
    }
}

#[async_trait]
impl MemberRepository for InMemoryRepository {
    async fn find_member_by_id(&self, member_id: &str) -> Result<Option<Member>, StorageError> {
        Ok(self.members.read().get(member_id).cloned())
    }

    async fn save_member(&self, member: Member) -> Result<Member, StorageError> {
        self.members
            .write()
            .insert(member.member_id.clone(), member.clone());
        Ok(member)
    }

    async fn replace_document(
        &self,
        member_id: &str,
        document_id: Option<DocumentId>,
    ) -> Result<DocumentSwap, StorageError> {
        let mut members = self.members.write();
        match members.get_mut(member_id) {
            Some(member) => Ok(DocumentSwap::Swapped {
                previous: std::mem::replace(&mut member.document_id, document_id),
            }),
            None => Ok(DocumentSwap::MemberNotFound),
        }
    }

    async fn save_document(&self, document: NewDocument) -> Result<MemberDocument, StorageError> {
        let document = MemberDocument::from_new(document);
        self.documents.write().insert(document.id, document.clone());
        Ok(document)
    }

    async fn find_document_by_id(
        &self,
        id: &DocumentId,
    ) -> Result<Option<MemberDocument>, StorageError> {
        Ok(self.documents.read().get(id).cloned())
    }

    async fn delete_document(&self, id: &DocumentId) -> Result<bool, StorageError> {
        Ok(self.documents.write().remove(id).is_some())
    }
}
