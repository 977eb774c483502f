use crate::fuzzy::{DEFAULT_FUZZY_THRESHOLD, best_match};
use log::{debug, info};
use rag_utils_tokenizer::Tokenizer;
use std::collections::HashMap;

/// TF-IDF index over an immutable corpus
#[derive(Debug)]
pub struct LexicalIndex {
    tokenizer: Tokenizer,
    /// Raw term counts per document
    term_counts: Vec<HashMap<String, u32>>,
    /// L2 norm of each document's term-count vector
    count_norms: Vec<f32>,
    idf: HashMap<String, f32>,
    /// Indexed terms in sorted order, scanned by fuzzy resolution
    vocabulary: Vec<String>,
    fuzzy_threshold: f32,
}

/// IDF-weighted query terms, resolved once per query and reused for every
/// document scored against it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryWeights {
    weights: HashMap<String, f32>,
    norm: f32,
}

impl QueryWeights {
    fn new(weights: HashMap<String, f32>) -> Self {
        let norm = weights.values().map(|w| w * w).sum::<f32>().sqrt();
        Self { weights, norm }
    }

    /// Weight assigned to an indexed term, if the query resolved to it.
    pub fn weight(&self, term: &str) -> Option<f32> {
        self.weights.get(term).copied()
    }

    pub fn norm(&self) -> f32 {
        self.norm
    }

    /// True when no query term carries weight; every document scores 0.
    pub fn is_empty(&self) -> bool {
        self.norm == 0.0
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }
}

impl LexicalIndex {
    /// Build the index with the default fuzzy threshold.
    pub fn build<I, S>(tokenizer: Tokenizer, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build_with_threshold(tokenizer, texts, DEFAULT_FUZZY_THRESHOLD)
    }

    /// Build the index over `texts`, one entry per document in order.
    pub fn build_with_threshold<I, S>(tokenizer: Tokenizer, texts: I, fuzzy_threshold: f32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let term_counts: Vec<HashMap<String, u32>> = texts
            .into_iter()
            .map(|text| {
                let mut counts = HashMap::new();
                for term in tokenizer.tokenize(text.as_ref()) {
                    *counts.entry(term).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        for counts in &term_counts {
            for term in counts.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let corpus_size = term_counts.len() as f64;
        let idf: HashMap<String, f32> = document_frequency
            .iter()
            .map(|(term, df)| ((*term).to_string(), (corpus_size / *df as f64).ln() as f32))
            .collect();

        let mut vocabulary: Vec<String> = idf.keys().cloned().collect();
        vocabulary.sort();

        let count_norms = term_counts
            .iter()
            .map(|counts| {
                counts
                    .values()
                    .map(|&c| (c as f32) * (c as f32))
                    .sum::<f32>()
                    .sqrt()
            })
            .collect();

        info!(
            "Built lexical index: {} documents, {} terms",
            term_counts.len(),
            vocabulary.len()
        );

        Self {
            tokenizer,
            term_counts,
            count_norms,
            idf,
            vocabulary,
            fuzzy_threshold,
        }
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.term_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.term_counts.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn fuzzy_threshold(&self) -> f32 {
        self.fuzzy_threshold
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// IDF of an indexed term; `None` for terms absent from the corpus.
    pub fn idf(&self, term: &str) -> Option<f32> {
        self.idf.get(term).copied()
    }

    /// Raw term counts for one document
    pub fn term_counts(&self, doc_index: usize) -> Option<&HashMap<String, u32>> {
        self.term_counts.get(doc_index)
    }

    /// Map a query term onto the vocabulary: itself when indexed, otherwise
    /// the closest indexed term above the fuzzy threshold.
    pub fn resolve_term<'a>(&'a self, term: &'a str) -> Option<&'a str> {
        if self.idf.contains_key(term) {
            return Some(term);
        }
        let (matched, ratio) = best_match(term, &self.vocabulary, self.fuzzy_threshold)?;
        debug!("Fuzzy matched query term '{term}' to '{matched}' (ratio {ratio:.3})");
        Some(matched)
    }

    /// Tokenize `query` and weight each resolved term by its IDF.
    pub fn query_weights(&self, query: &str) -> QueryWeights {
        let mut weights = HashMap::new();
        for term in self.tokenizer.tokenize(query) {
            let Some(resolved) = self.resolve_term(&term) else {
                continue;
            };
            if let Some(idf) = self.idf(resolved) {
                weights.insert(resolved.to_string(), idf);
            }
        }
        QueryWeights::new(weights)
    }

    /// Cosine between the query weights and the document's term counts.
    ///
    /// Returns 0 when either vector has zero norm or `doc_index` is out of
    /// range.
    pub fn score(&self, query: &QueryWeights, doc_index: usize) -> f32 {
        let (Some(counts), Some(&doc_norm)) = (
            self.term_counts.get(doc_index),
            self.count_norms.get(doc_index),
        ) else {
            return 0.0;
        };
        if query.is_empty() || doc_norm == 0.0 {
            return 0.0;
        }

        let dot: f32 = query
            .weights
            .iter()
            .filter_map(|(term, weight)| counts.get(term).map(|&c| weight * c as f32))
            .sum();

        dot / (query.norm * doc_norm)
    }

    /// One-shot similarity of a raw query string against one document.
    pub fn similarity(&self, query: &str, doc_index: usize) -> f32 {
        self.score(&self.query_weights(query), doc_index)
    }
}
