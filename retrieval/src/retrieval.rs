use crate::cache_key::cache_key;
use crate::config::RetrievalConfig;
use crate::error::{Result, RetrievalError};
use crate::request::SearchRequest;
use crate::result::{CachedResults, SearchResults, SearchStats};
use crate::scorer::HybridScorer;
use log::{debug, info, warn};
use rag_utils_cache::PersistentFifoCache;
use rag_utils_tokenizer::{StopWords, Tokenizer};
use rag_vector_store::{Document, DocumentSet};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

type QueryCache = PersistentFifoCache<CachedResults>;

/// Hybrid retrieval engine combining lexical and vector similarity behind a
/// persistent query cache
pub struct HybridRetrieval {
    config: RetrievalConfig,
    scorer: Arc<HybridScorer>,
    cache: Option<Mutex<QueryCache>>,
}

impl HybridRetrieval {
    /// Index `documents` and open the query cache.
    pub fn new(config: RetrievalConfig, documents: DocumentSet) -> Result<Self> {
        config.validate().map_err(RetrievalError::InvalidConfig)?;

        info!(
            "Initializing hybrid retrieval engine over {} documents",
            documents.len()
        );

        let stopwords = match &config.stopwords_path {
            Some(path) => StopWords::load(path)?,
            None => StopWords::english(),
        };
        let tokenizer = Tokenizer::new(stopwords).with_min_token_len(config.min_token_len);
        let scorer = HybridScorer::new(documents, tokenizer, config.fuzzy_threshold)?;

        Self::from_parts(config, Arc::new(scorer))
    }

    /// Wrap an already built scorer, e.g. one shared between engines with
    /// different cache settings.
    pub fn from_parts(config: RetrievalConfig, scorer: Arc<HybridScorer>) -> Result<Self> {
        config.validate().map_err(RetrievalError::InvalidConfig)?;

        let cache = if config.enable_cache {
            let cache = QueryCache::open(config.cache_path.clone(), config.cache_size)?;
            info!(
                "Query cache at {} holds {} entries",
                config.cache_path.display(),
                cache.len()
            );
            Some(Mutex::new(cache))
        } else {
            None
        };

        Ok(Self {
            config,
            scorer,
            cache,
        })
    }

    /// Search with this engine's default top-k, weights and thresholds
    pub async fn search_text(
        &self,
        query_text: &str,
        query_vector: Vec<f32>,
    ) -> Result<SearchResults> {
        let request = self.config.request(query_text, query_vector);
        self.search(&request).await
    }

    /// Rank the corpus for `request`, serving repeats from the cache.
    ///
    /// Cache keys include the corpus fingerprint, so entries persisted by an
    /// engine over other documents or index settings are never served.
    /// The cache lock is held from lookup through insertion, so concurrent
    /// identical misses score once and the second is served from cache.
    /// Failing to persist a new entry is logged and does not fail the search.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResults> {
        let start = Instant::now();
        request.validate()?;

        debug!(
            "Hybrid search for: '{}' (top_k {})",
            request.query_text, request.top_k
        );

        let mut stats = SearchStats::default();

        let output = match &self.cache {
            Some(cache) => {
                let key = cache_key(
                    request,
                    self.config.fingerprint_prefix_len,
                    self.scorer.fingerprint(),
                );
                let mut cache = cache.lock().await;

                if let Some(cached) = cache.get(&key) {
                    info!("Cache hit for query: '{}'", request.query_text);
                    stats.cache_hit = true;
                    cached.clone()
                } else {
                    let output = self.scorer.score(request, &mut stats)?;
                    if let Err(err) = cache.put(key, output.clone()) {
                        warn!("Query cache is running in memory only: {err}");
                    }
                    output
                }
            }
            None => self.scorer.score(request, &mut stats)?,
        };

        stats.total_time_ms = start.elapsed().as_millis() as u64;

        let results = SearchResults::new(request.query_text.clone())
            .with_results(output.results)
            .with_total_candidates(output.total_candidates)
            .with_stats(stats);

        info!(
            "Search completed in {}ms, returned {} results",
            results.stats.total_time_ms,
            results.len()
        );

        Ok(results)
    }

    /// Clear search cache, including its persisted file
    pub async fn clear_cache(&self) -> Result<()> {
        if let Some(cache) = &self.cache {
            cache.lock().await.clear()?;
            info!("Search cache cleared");
        }
        Ok(())
    }

    /// Get cache statistics
    pub async fn cache_stats(&self) -> CacheStats {
        match &self.cache {
            Some(cache) => {
                let cache = cache.lock().await;
                CacheStats {
                    size: cache.len(),
                    capacity: cache.capacity(),
                }
            }
            None => CacheStats::default(),
        }
    }

    /// Document behind a result's `doc_index`
    pub fn document(&self, doc_index: usize) -> Option<&Document> {
        self.scorer.documents().get(doc_index)
    }

    pub fn documents(&self) -> &DocumentSet {
        self.scorer.documents()
    }

    pub fn scorer(&self) -> &Arc<HybridScorer> {
        &self.scorer
    }

    /// Get configuration
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
}
