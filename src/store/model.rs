//! Member and document records
//!
//! A member refers to its document by identifier only. Replacing a document
//! repoints that identifier; the old record is never mutated in place.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::compressor::JPEG_CONTENT_TYPE;

/// Identity assigned to a document when it is first persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A house member, as far as document ownership is concerned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: String,
    pub name: String,
    /// At most one document; `None` when nothing has been uploaded
    #[serde(default)]
    pub document_id: Option<DocumentId>,
}

impl Member {
    pub fn new(member_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            name: name.into(),
            document_id: None,
        }
    }
}

/// Document content that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub name: String,
    pub content: Bytes,
}

impl NewDocument {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// A persisted document owned by exactly one member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDocument {
    pub id: DocumentId,
    pub name: String,
    pub content: Bytes,
    pub uploaded_at: DateTime<Utc>,
}

impl MemberDocument {
    /// Assign identity and timestamp to new content
    pub fn from_new(document: NewDocument) -> Self {
        Self {
            id: DocumentId::new(),
            name: document.name,
            content: document.content,
            uploaded_at: Utc::now(),
        }
    }

    pub fn content_length(&self) -> usize {
        self.content.len()
    }

    pub fn content_type(&self) -> &'static str {
        JPEG_CONTENT_TYPE
    }
}
