use thiserror::Error;

/// Errors that can occur while loading documents or scoring vectors
#[derive(Debug, Error)]
pub enum VectorStoreError {
    /// A document cannot be indexed (missing or malformed fields)
    #[error("Invalid document at position {index}: {reason}")]
    InvalidDocument { index: usize, reason: String },

    /// Query vector does not match the corpus dimensionality
    #[error("Dimension mismatch: index has {expected} dimensions, query has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Document file does not have a recognized layout
    #[error("Unrecognized document file layout: {0}")]
    UnrecognizedLayout(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VectorStoreError>;
