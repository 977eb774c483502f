use crate::cache_key::corpus_fingerprint;
use crate::error::{Result, RetrievalError};
use crate::request::SearchRequest;
use crate::result::{CachedResults, SearchResult, SearchStats};
use log::debug;
use rag_lexical_index::LexicalIndex;
use rag_utils_tokenizer::Tokenizer;
use rag_vector_store::{DocumentSet, VectorIndex};
use std::cmp::Ordering;
use std::time::Instant;

/// Combines lexical and vector similarity over one immutable corpus.
///
/// Both indices are built once at construction and only read afterwards, so
/// a scorer can be shared across concurrent searches without locking.
#[derive(Debug)]
pub struct HybridScorer {
    documents: DocumentSet,
    lexical: LexicalIndex,
    vectors: VectorIndex,
    fingerprint: String,
}

struct Candidate {
    doc_index: usize,
    text_score: f32,
    vector_score: f32,
    score: f32,
}

impl HybridScorer {
    /// Index `documents` with the given tokenizer and fuzzy threshold.
    pub fn new(documents: DocumentSet, tokenizer: Tokenizer, fuzzy_threshold: f32) -> Result<Self> {
        let lexical = LexicalIndex::build_with_threshold(
            tokenizer,
            documents.iter().map(|doc| doc.content.as_str()),
            fuzzy_threshold,
        );
        let vectors = VectorIndex::build(documents.as_slice())?;
        Self::from_parts(documents, lexical, vectors)
    }

    /// Assemble a scorer from prebuilt indices. Both must have been built
    /// from `documents`, in order; differing lengths are rejected.
    pub fn from_parts(
        documents: DocumentSet,
        lexical: LexicalIndex,
        vectors: VectorIndex,
    ) -> Result<Self> {
        if lexical.len() != documents.len() || vectors.len() != documents.len() {
            return Err(RetrievalError::MismatchedIndices {
                documents: documents.len(),
                lexical: lexical.len(),
                vectors: vectors.len(),
            });
        }

        let fingerprint = corpus_fingerprint(&documents, &lexical);
        debug!("Corpus fingerprint {fingerprint}");

        Ok(Self {
            documents,
            lexical,
            vectors,
            fingerprint,
        })
    }

    pub fn documents(&self) -> &DocumentSet {
        &self.documents
    }

    pub fn lexical(&self) -> &LexicalIndex {
        &self.lexical
    }

    pub fn vectors(&self) -> &VectorIndex {
        &self.vectors
    }

    /// Identifies the indexed corpus and index settings; part of every
    /// cache key.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Rank the corpus for `request`.
    ///
    /// Vector similarities are computed for every document in one pass;
    /// lexical similarity only for documents clearing `vector_threshold`.
    /// A document must clear both thresholds to be ranked. Ties keep corpus
    /// order. Timings and candidate counts are written to `stats`.
    pub fn score(&self, request: &SearchRequest, stats: &mut SearchStats) -> Result<CachedResults> {
        request.validate()?;

        let vector_start = Instant::now();
        let vector_scores = self.vectors.similarities(&request.query_vector)?;
        let survivors: Vec<(usize, f32)> = vector_scores
            .into_iter()
            .enumerate()
            .filter(|&(_, score)| score >= request.vector_threshold)
            .collect();
        stats.vector_time_ms = vector_start.elapsed().as_millis() as u64;
        stats.vector_candidates = survivors.len();

        let lexical_start = Instant::now();
        let mut candidates: Vec<Candidate> = if request.needs_lexical() {
            let query = self.lexical.query_weights(&request.query_text);
            if query.is_empty() {
                debug!("Query '{}' has no indexed terms", request.query_text);
            }
            survivors
                .into_iter()
                .filter_map(|(doc_index, vector_score)| {
                    let text_score = self.lexical.score(&query, doc_index);
                    (text_score >= request.text_threshold)
                        .then(|| Candidate::new(doc_index, text_score, vector_score, request))
                })
                .collect()
        } else {
            debug!("Skipping lexical scoring (zero text weight, no text threshold)");
            survivors
                .into_iter()
                .map(|(doc_index, vector_score)| Candidate::new(doc_index, 0.0, vector_score, request))
                .collect()
        };
        stats.lexical_time_ms = lexical_start.elapsed().as_millis() as u64;

        let total_candidates = candidates.len();
        candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        candidates.truncate(request.top_k);

        let results = candidates
            .into_iter()
            .enumerate()
            .map(|(rank, candidate)| SearchResult {
                doc_index: candidate.doc_index,
                doc_id: self.documents[candidate.doc_index].id.clone(),
                score: candidate.score,
                text_score: candidate.text_score,
                vector_score: candidate.vector_score,
                rank,
            })
            .collect::<Vec<_>>();

        debug!(
            "Ranked {} of {total_candidates} candidates ({} passed the vector threshold)",
            results.len(),
            stats.vector_candidates
        );

        Ok(CachedResults {
            results,
            total_candidates,
        })
    }
}

impl Candidate {
    fn new(doc_index: usize, text_score: f32, vector_score: f32, request: &SearchRequest) -> Self {
        Self {
            doc_index,
            text_score,
            vector_score,
            score: text_score * request.text_weight + vector_score * request.vector_weight,
        }
    }
}
