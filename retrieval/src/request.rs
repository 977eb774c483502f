use crate::config::RetrievalConfig;
use crate::error::{Result, RetrievalError};
use serde::{Deserialize, Serialize};

/// One hybrid search: the query in both representations plus the knobs
/// that shape its ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query_text: String,

    /// Dense query embedding from the external embedding provider
    pub query_vector: Vec<f32>,

    pub top_k: usize,
    pub text_weight: f32,
    pub vector_weight: f32,

    /// Candidates need `text_score >= text_threshold`
    pub text_threshold: f32,

    /// Candidates need `vector_score >= vector_threshold`
    pub vector_threshold: f32,
}

impl SearchRequest {
    /// Request with the default top-k, weights and thresholds
    pub fn new(query_text: impl Into<String>, query_vector: Vec<f32>) -> Self {
        RetrievalConfig::default().request(query_text, query_vector)
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_weights(mut self, text_weight: f32, vector_weight: f32) -> Self {
        self.text_weight = text_weight;
        self.vector_weight = vector_weight;
        self
    }

    pub fn with_thresholds(mut self, text_threshold: f32, vector_threshold: f32) -> Self {
        self.text_threshold = text_threshold;
        self.vector_threshold = vector_threshold;
        self
    }

    /// Whether the lexical channel contributes anything to this request.
    ///
    /// With a zero text weight and a threshold every score clears, lexical
    /// scores change neither membership nor order, so scoring them is skipped.
    pub fn needs_lexical(&self) -> bool {
        self.text_weight != 0.0 || self.text_threshold > 0.0
    }

    pub fn validate(&self) -> Result<()> {
        for (name, weight) in [
            ("text_weight", self.text_weight),
            ("vector_weight", self.vector_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(RetrievalError::InvalidRequest(format!(
                    "{name} must be a non-negative number, got {weight}"
                )));
            }
        }

        for (name, threshold) in [
            ("text_threshold", self.text_threshold),
            ("vector_threshold", self.vector_threshold),
        ] {
            if threshold.is_nan() {
                return Err(RetrievalError::InvalidRequest(format!(
                    "{name} must be a number"
                )));
            }
        }

        if let Some(position) = self.query_vector.iter().position(|v| !v.is_finite()) {
            return Err(RetrievalError::InvalidRequest(format!(
                "query_vector[{position}] is not finite"
            )));
        }

        Ok(())
    }
}
