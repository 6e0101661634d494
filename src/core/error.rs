use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Namespace '{0}' already exists")]
    NamespaceExists(String),

    #[error("Namespace '{0}' not found")]
    NamespaceNotFound(String),

    #[error("Duplicate key '{key}' in namespace '{namespace}'")]
    DuplicateKey { namespace: String, key: String },

    #[error("Field '{0}' is immutable")]
    ImmutableField(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Bulk write failed after {applied} operation(s), {failed} failed: {first_error}")]
    BulkWrite {
        applied: usize,
        failed: usize,
        first_error: String,
    },

    #[error("Store client is closed")]
    Closed,

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
