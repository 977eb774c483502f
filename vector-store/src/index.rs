use crate::document::Document;
use crate::error::{Result, VectorStoreError};
use log::{debug, info};

/// Added to the norm product so degenerate vectors score 0 instead of NaN.
/// Results are additionally clamped to `[-1, 1]` to absorb f32 rounding.
pub const NORM_EPSILON: f32 = 1e-6;

/// Dense embedding matrix with precomputed row norms
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    /// Row-major, `len * dimension` values
    matrix: Vec<f32>,
    norms: Vec<f32>,
    dimension: usize,
}

impl VectorIndex {
    /// Copy every embedding into one contiguous matrix.
    ///
    /// All embeddings must share the first document's dimensionality;
    /// [`crate::DocumentSet`] guarantees this.
    pub fn build(documents: &[Document]) -> Result<Self> {
        let dimension = documents.first().map_or(0, |doc| doc.embedding.len());
        if dimension == 0 && !documents.is_empty() {
            return Err(VectorStoreError::InvalidDocument {
                index: 0,
                reason: "embedding is empty".to_string(),
            });
        }
        let mut matrix = Vec::with_capacity(documents.len() * dimension);
        let mut norms = Vec::with_capacity(documents.len());

        for (index, doc) in documents.iter().enumerate() {
            if doc.embedding.len() != dimension {
                return Err(VectorStoreError::InvalidDocument {
                    index,
                    reason: format!(
                        "embedding has {} dimensions, corpus has {dimension}",
                        doc.embedding.len()
                    ),
                });
            }
            matrix.extend_from_slice(&doc.embedding);
            norms.push(l2_norm(&doc.embedding));
        }

        info!(
            "Built vector index: {} documents, {} dimensions",
            norms.len(),
            dimension
        );

        Ok(Self {
            matrix,
            norms,
            dimension,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.norms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.norms.is_empty()
    }

    /// Precomputed L2 norm of one document's embedding
    pub fn norm(&self, doc_index: usize) -> Option<f32> {
        self.norms.get(doc_index).copied()
    }

    /// Cosine similarity of `query` against every document, in corpus order.
    ///
    /// An empty index returns an empty vector for any query.
    pub fn similarities(&self, query: &[f32]) -> Result<Vec<f32>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(VectorStoreError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let query_norm = l2_norm(query);
        debug!(
            "Scoring {} documents against query (norm {query_norm:.4})",
            self.len()
        );

        let scores = self
            .matrix
            .chunks_exact(self.dimension)
            .zip(&self.norms)
            .map(|(row, doc_norm)| {
                (dot(row, query) / (doc_norm * query_norm + NORM_EPSILON)).clamp(-1.0, 1.0)
            })
            .collect();

        Ok(scores)
    }
}

/// Cosine similarity of a single pair, with the same epsilon as
/// [`VectorIndex::similarities`].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(VectorStoreError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok((dot(a, b) / (l2_norm(a) * l2_norm(b) + NORM_EPSILON)).clamp(-1.0, 1.0))
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn documents() -> Vec<Document> {
        vec![
            Document::new("1", "apple fruit", vec![1.0, 0.0]),
            Document::new("2", "banana fruit", vec![0.0, 1.0]),
            Document::new("3", "apple banana", vec![0.7, 0.7]),
        ]
    }

    #[test]
    fn test_norms_precomputed() {
        let index = VectorIndex::build(&documents()).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.dimension(), 2);
        assert_eq!(index.norm(0), Some(1.0));
        assert!((index.norm(2).unwrap() - 0.98995).abs() < 1e-4);
        assert_eq!(index.norm(3), None);
    }

    #[test]
    fn test_similarities() {
        let index = VectorIndex::build(&documents()).unwrap();
        let scores = index.similarities(&[1.0, 0.0]).unwrap();

        assert_eq!(scores.len(), 3);
        assert!((scores[0] - 1.0).abs() < 1e-4);
        assert!(scores[1].abs() < 1e-6);
        assert!((scores[2] - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-4);
    }

    #[test]
    fn test_self_similarity_and_range() {
        let docs = vec![
            Document::new("a", "", vec![0.3, -2.0, 5.5]),
            Document::new("b", "", vec![-0.3, 2.0, -5.5]),
            Document::new("c", "", vec![10.0, 0.1, 0.0]),
        ];
        let index = VectorIndex::build(&docs).unwrap();

        for doc in &docs {
            let scores = index.similarities(&doc.embedding).unwrap();
            for score in &scores {
                assert!((-1.0..=1.0).contains(score));
            }
        }

        let scores = index.similarities(&docs[0].embedding).unwrap();
        assert!((scores[0] - 1.0).abs() < 1e-4);
        assert!((scores[1] + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_vectors_score_zero() {
        let docs = vec![Document::new("z", "", vec![0.0, 0.0])];
        let index = VectorIndex::build(&docs).unwrap();
        assert_eq!(index.similarities(&[1.0, 1.0]).unwrap(), vec![0.0]);
        assert_eq!(index.similarities(&[0.0, 0.0]).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let index = VectorIndex::build(&documents()).unwrap();
        let err = index.similarities(&[1.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            VectorStoreError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_build_rejects_ragged_rows() {
        let docs = vec![
            Document::new("a", "", vec![1.0, 0.0]),
            Document::new("b", "", vec![1.0]),
        ];
        assert!(VectorIndex::build(&docs).is_err());
    }

    #[test]
    fn test_empty_index() {
        let index = VectorIndex::build(&[]).unwrap();
        assert!(index.is_empty());
        assert!(index.similarities(&[1.0, 2.0]).unwrap().is_empty());
    }

    #[test]
    fn test_cosine_similarity_pair() {
        let a = [1.0, 2.0, 3.0];
        let c = [-1.0, -2.0, -3.0];
        assert!((cosine_similarity(&a, &a).unwrap() - 1.0).abs() < 1e-4);
        assert!((cosine_similarity(&a, &c).unwrap() + 1.0).abs() < 1e-4);
        assert!(cosine_similarity(&a, &[1.0]).is_err());
    }
}
