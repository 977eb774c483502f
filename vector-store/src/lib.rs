//! # Vector Store
//!
//! Document model and dense-vector similarity for hybrid retrieval.
//! Embeddings are computed elsewhere and arrive attached to each document;
//! this crate validates them, packs them into one contiguous matrix with
//! precomputed norms, and scores a query vector against the whole corpus in
//! a single pass.
//!
//! ## Example
//!
//! ```
//! use rag_vector_store::{Document, DocumentSet, VectorIndex};
//!
//! # fn main() -> Result<(), rag_vector_store::VectorStoreError> {
//! let documents = DocumentSet::new(vec![
//!     Document::new("1", "apple fruit", vec![1.0, 0.0]),
//!     Document::new("2", "banana fruit", vec![0.0, 1.0]),
//! ])?;
//!
//! let index = VectorIndex::build(documents.as_slice())?;
//! let scores = index.similarities(&[1.0, 0.0])?;
//! assert!(scores[0] > scores[1]);
//! # Ok(())
//! # }
//! ```

mod document;
mod error;
mod index;
mod loader;

pub use document::{Document, DocumentSchema, DocumentSet, RawDocument};
pub use error::{Result, VectorStoreError};
pub use index::{NORM_EPSILON, VectorIndex, cosine_similarity};
pub use loader::{load_documents, parse_documents};
