//! Filesystem repository
//!
//! Layout under the root directory:
//!
//! ```text
//! members/<sha256(member_id)>.json   member record
//! documents/<uuid>.json              document metadata
//! documents/<uuid>.bin               document content
//! ```
//!
//! Member ids are opaque strings of any length, so file names use the
//! hex SHA-256 of the id. Every write goes to its own temp file first and
//! is renamed into place. Member record read-modify-write cycles hold a
//! per-member lock.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use super::error::StorageError;
use super::model::{DocumentId, Member, MemberDocument, NewDocument};
use super::traits::{DocumentSwap, MemberRepository};

const MEMBERS_DIR: &str = "members";
const DOCUMENTS_DIR: &str = "documents";

/// On-disk metadata for a document; content lives next to it
#[derive(Debug, Serialize, Deserialize)]
struct DocumentMeta {
    id: DocumentId,
    name: String,
    content_length: u64,
    uploaded_at: DateTime<Utc>,
}

pub struct DiskRepository {
    root: PathBuf,
    member_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl DiskRepository {
    /// Open (and create if needed) a repository rooted at `root`
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(root.join(MEMBERS_DIR)).await?;
        tokio::fs::create_dir_all(root.join(DOCUMENTS_DIR)).await?;
        Ok(Self {
            root,
            member_locks: Mutex::new(HashMap::new()),
        })
    }

    fn member_path(&self, member_id: &str) -> PathBuf {
        let digest = Sha256::digest(member_id.as_bytes());
        self.root
            .join(MEMBERS_DIR)
            .join(format!("{}.json", hex::encode(digest)))
    }

    fn member_lock(&self, member_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.member_locks.lock();
        Arc::clone(locks.entry(member_id.to_string()).or_default())
    }

    async fn read_member(&self, member_id: &str) -> Result<Option<Member>, StorageError> {
        match read_optional(&self.member_path(member_id)).await? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    async fn write_member(&self, member: &Member) -> Result<(), StorageError> {
        let data = serde_json::to_vec_pretty(member)?;
        write_file_atomic(&self.member_path(&member.member_id), &data).await
    }

    fn meta_path(&self, id: &DocumentId) -> PathBuf {
        self.root.join(DOCUMENTS_DIR).join(format!("{}.json", id))
    }

    fn content_path(&self, id: &DocumentId) -> PathBuf {
        self.root.join(DOCUMENTS_DIR).join(format!("{}.bin", id))
    }
}

/// Read a file, mapping "does not exist" to `None`
async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StorageError> {
    match tokio::fs::read(path).await {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_file_atomic(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // Unique per write so concurrent writers never share a temp file
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!("{}.{}.tmp", file_name, Uuid::new_v4()));
    tokio::fs::write(&temp_path, data).await?;
    tokio::fs::rename(&temp_path, path).await?;

    Ok(())
}

/// Remove a file, returning whether it existed
async fn remove_optional(path: &Path) -> Result<bool, StorageError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl MemberRepository for DiskRepository {
    async fn find_member_by_id(&self, member_id: &str) -> Result<Option<Member>, StorageError> {
        self.read_member(member_id).await
    }

    async fn save_member(&self, member: Member) -> Result<Member, StorageError> {
        let lock = self.member_lock(&member.member_id);
        let _guard = lock.lock().await;
        self.write_member(&member).await?;
        Ok(member)
    }

    async fn replace_document(
        &self,
        member_id: &str,
        document_id: Option<DocumentId>,
    ) -> Result<DocumentSwap, StorageError> {
        let lock = self.member_lock(member_id);
        let _guard = lock.lock().await;

        let Some(mut member) = self.read_member(member_id).await? else {
            return Ok(DocumentSwap::MemberNotFound);
        };
        let previous = std::mem::replace(&mut member.document_id, document_id);
        self.write_member(&member).await?;

        Ok(DocumentSwap::Swapped { previous })
    }

    async fn save_document(&self, document: NewDocument) -> Result<MemberDocument, StorageError> {
        let document = MemberDocument::from_new(document);
        let meta = DocumentMeta {
            id: document.id,
            name: document.name.clone(),
            content_length: document.content_length() as u64,
            uploaded_at: document.uploaded_at,
        };

        // Content first: metadata without content reads as corruption
        write_file_atomic(&self.content_path(&document.id), &document.content).await?;
        write_file_atomic(&self.meta_path(&document.id), &serde_json::to_vec(&meta)?).await?;

        Ok(document)
    }

    async fn find_document_by_id(
        &self,
        id: &DocumentId,
    ) -> Result<Option<MemberDocument>, StorageError> {
        let meta: DocumentMeta = match read_optional(&self.meta_path(id)).await? {
            Some(data) => serde_json::from_slice(&data)?,
            None => return Ok(None),
        };

        let content = read_optional(&self.content_path(id))
            .await?
            .ok_or_else(|| StorageError::corrupted(format!("document {} has no content", id)))?;

        if content.len() as u64 != meta.content_length {
            return Err(StorageError::corrupted(format!(
                "document {} is {} bytes, metadata says {}",
                id,
                content.len(),
                meta.content_length
            )));
        }

        Ok(Some(MemberDocument {
            id: meta.id,
            name: meta.name,
            content: Bytes::from(content),
            uploaded_at: meta.uploaded_at,
        }))
    }

    async fn delete_document(&self, id: &DocumentId) -> Result<bool, StorageError> {
        let existed = remove_optional(&self.meta_path(id)).await?;
        remove_optional(&self.content_path(id)).await?;
        Ok(existed)
    }
}
