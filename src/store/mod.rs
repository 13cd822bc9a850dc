//! Member document storage
//!
//! `DocumentStore` enforces "at most one document per member" on top of any
//! `MemberRepository`. Two repositories ship with the crate:
//! - `InMemoryRepository`: process-local maps
//! - `DiskRepository`: JSON records and blobs on the local filesystem

pub mod disk;
pub mod document_store;
pub mod error;
pub mod memory;
pub mod model;
pub mod traits;

pub use disk::DiskRepository;
pub use document_store::DocumentStore;
pub use error::StorageError;
pub use memory::InMemoryRepository;
pub use model::{DocumentId, Member, MemberDocument, NewDocument};
pub use traits::{DocumentSwap, MemberRepository};

use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};

/// Open the repository selected by configuration
pub async fn open_repository(
    config: &StorageConfig,
) -> Result<Arc<dyn MemberRepository>, StorageError> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryRepository::new())),
        StorageBackend::Disk => Ok(Arc::new(DiskRepository::open(&config.root_dir).await?)),
    }
}
