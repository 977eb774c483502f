/*!
# Retrieval

Hybrid retrieval over a fixed document collection, combining:
- **Lexical scoring** via TF-IDF cosine with fuzzy resolution of
  out-of-vocabulary query terms
- **Vector scoring** via cosine similarity against externally computed
  embeddings
- **Weighted combination** with conjunctive per-channel thresholds
- **Persistent FIFO cache** of ranked results, rewritten atomically on every
  insertion

## Architecture

```text
SearchRequest
  └─> Cache lookup (SHA-1 of corpus fingerprint, query, vector prefix, parameters)
        ├─> hit: cached ranking
        └─> miss:
              ├─> Vector similarity (all documents, one pass)
              │     └─> vector_threshold filter
              ├─> Lexical similarity (survivors only)
              │     └─> text_threshold filter
              └─> Combine, stable sort, top-k
                    └─> Cache insert + persist
```

## Example

```rust,no_run
use rag_retrieval::{HybridRetrieval, RetrievalConfig, SearchRequest};
use rag_vector_store::{DocumentSchema, load_documents};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = RetrievalConfig::load(Path::new("retrieval.toml"))?;
    let documents = load_documents(Path::new("corpus.json"), &DocumentSchema::default())?;
    let retrieval = HybridRetrieval::new(config, documents)?;

    let query_vector = vec![0.0; 1024]; // From the embedding provider
    let request = SearchRequest::new("refund policy", query_vector).with_top_k(3);
    let results = retrieval.search(&request).await?;

    for result in results.top(3) {
        println!("{} (score: {:.2})", result.doc_id, result.score);
    }

    Ok(())
}
```

## Consistency

The indices are immutable after construction, so a cached ranking stays
valid for the life of the engine. Weights, thresholds and top-k are part of
the cache key: requests that could rank differently never share an entry.
So is a fingerprint of the corpus and index settings, so a cache file
reopened over different documents never serves their rankings.
*/

mod cache_key;
mod config;
mod error;
mod request;
mod result;
mod retrieval;
mod scorer;

pub use cache_key::{cache_key, corpus_fingerprint};
pub use config::RetrievalConfig;
pub use error::{Result, RetrievalError};
pub use request::SearchRequest;
pub use result::{CachedResults, SearchResult, SearchResults, SearchStats};
pub use retrieval::{CacheStats, HybridRetrieval};
pub use scorer::HybridScorer;
