use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache capacity must be greater than zero")]
    InvalidCapacity,

    /// Persisted cache could not be read or decoded
    #[error("Failed to load cache from {path}: {reason}")]
    Load { path: String, reason: String },

    /// Cache could not be written to durable storage
    #[error("Failed to persist cache to {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode cache: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CacheError>;
