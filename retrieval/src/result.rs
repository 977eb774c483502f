use serde::{Deserialize, Serialize};

/// A single ranked document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Position of the document in the indexed collection
    pub doc_index: usize,

    /// Identifier of the document
    pub doc_id: String,

    /// Combined score, `text_score * text_weight + vector_score * vector_weight`
    pub score: f32,

    /// Lexical (TF-IDF cosine) score
    pub text_score: f32,

    /// Vector (embedding cosine) score
    pub vector_score: f32,

    /// Rank in the result list (0 = best)
    pub rank: usize,
}

/// Collection of search results with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// Query that produced these results
    pub query: String,

    /// Search results
    pub results: Vec<SearchResult>,

    /// Number of documents that cleared both thresholds before truncation
    pub total_candidates: usize,

    /// Search statistics
    pub stats: SearchStats,
}

/// Search performance statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Total search time in milliseconds
    pub total_time_ms: u64,

    /// Vector similarity time in milliseconds
    pub vector_time_ms: u64,

    /// Lexical scoring time in milliseconds
    pub lexical_time_ms: u64,

    /// Number of documents clearing the vector threshold
    pub vector_candidates: usize,

    /// Cache hit
    pub cache_hit: bool,
}

/// Ranked output stored in the query cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResults {
    pub results: Vec<SearchResult>,
    pub total_candidates: usize,
}

impl SearchResults {
    /// Create new search results
    pub fn new(query: String) -> Self {
        Self {
            query,
            results: Vec::new(),
            total_candidates: 0,
            stats: SearchStats::default(),
        }
    }

    pub fn with_results(mut self, results: Vec<SearchResult>) -> Self {
        self.results = results;
        self
    }

    pub fn with_total_candidates(mut self, count: usize) -> Self {
        self.total_candidates = count;
        self
    }

    pub fn with_stats(mut self, stats: SearchStats) -> Self {
        self.stats = stats;
        self
    }

    /// Get top N results
    pub fn top(&self, n: usize) -> &[SearchResult] {
        &self.results[..n.min(self.results.len())]
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Document indices in rank order
    pub fn doc_indices(&self) -> Vec<usize> {
        self.results.iter().map(|r| r.doc_index).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(doc_index: usize, score: f32, rank: usize) -> SearchResult {
        SearchResult {
            doc_index,
            doc_id: format!("doc-{doc_index}"),
            score,
            text_score: 0.0,
            vector_score: score,
            rank,
        }
    }

    #[test]
    fn test_search_results_collection() {
        let mut results = SearchResults::new("test query".to_string());
        assert!(results.is_empty());
        assert_eq!(results.len(), 0);

        results = results.with_results(vec![result(3, 0.9, 0)]);
        assert!(!results.is_empty());
        assert_eq!(results.len(), 1);
        assert_eq!(results.doc_indices(), vec![3]);
    }

    #[test]
    fn test_search_results_top() {
        let results = SearchResults::new("query".to_string()).with_results(vec![
            result(0, 0.9, 0),
            result(2, 0.8, 1),
            result(1, 0.7, 2),
        ]);

        assert_eq!(results.top(2).len(), 2);
        assert_eq!(results.top(5).len(), 3); // Clamps to available
        assert_eq!(results.top(2)[1].doc_index, 2);
    }

    #[test]
    fn test_cached_results_json_shape() {
        let cached = CachedResults {
            results: vec![result(1, 0.5, 0)],
            total_candidates: 4,
        };
        let json = serde_json::to_value(&cached).unwrap();
        assert_eq!(json["total_candidates"], 4);
        assert_eq!(json["results"][0]["doc_id"], "doc-1");

        let back: CachedResults = serde_json::from_value(json).unwrap();
        assert_eq!(back, cached);
    }
}
