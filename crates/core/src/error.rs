use crate::types::DocumentId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures reported by a document store.
///
/// The tagging layer never raises errors of its own; whatever the store
/// returns is passed through as is.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unsupported store schema_version {found} (expected {expected})")]
    SchemaVersion { found: u32, expected: u32 },

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
