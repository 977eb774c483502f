use rag_utils_cache::CacheError;
use rag_utils_tokenizer::TokenizerError;
use rag_vector_store::VectorStoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Vector store error: {0}")]
    VectorStore(#[from] VectorStoreError),

    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid search request: {0}")]
    InvalidRequest(String),

    /// Prebuilt indices do not cover the same documents
    #[error(
        "Index sizes disagree: {documents} documents, {lexical} lexical entries, {vectors} vectors"
    )]
    MismatchedIndices {
        documents: usize,
        lexical: usize,
        vectors: usize,
    },

    #[error("Failed to read configuration {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl RetrievalError {
    /// The query vector does not match the indexed dimensionality. The
    /// engine is unaffected; the caller should reject the query.
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(
            self,
            RetrievalError::VectorStore(VectorStoreError::DimensionMismatch { .. })
        )
    }

    /// The corpus could not be indexed.
    pub fn is_invalid_document(&self) -> bool {
        matches!(
            self,
            RetrievalError::VectorStore(VectorStoreError::InvalidDocument { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, RetrievalError>;
