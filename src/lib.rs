// Member document store library
// One document per house member, size-gated and compressed on upload

pub mod boundary;
pub mod compressor;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod policy;
pub mod service;
pub mod store;

pub use boundary::{DocumentBoundary, UploadPayload};
pub use config::Config;
pub use error::DocumentError;
pub use policy::SizePolicy;
pub use service::{document_name_for, MemberDocumentService, UploadReceipt};
