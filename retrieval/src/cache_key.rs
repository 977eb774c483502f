use crate::request::SearchRequest;
use rag_lexical_index::LexicalIndex;
use rag_vector_store::DocumentSet;
use sha1::{Digest, Sha1};

/// Fingerprint of an indexed corpus: every document's id, content and
/// embedding bits, plus the tokenizer and fuzzy settings the lexical index
/// was built with. Any change to what a search could rank changes it.
pub fn corpus_fingerprint(documents: &DocumentSet, lexical: &LexicalIndex) -> String {
    let mut hasher = Sha1::new();

    hasher.update((documents.len() as u64).to_le_bytes());
    for doc in documents {
        update_str(&mut hasher, &doc.id);
        update_str(&mut hasher, &doc.content);
        hasher.update((doc.embedding.len() as u64).to_le_bytes());
        for component in &doc.embedding {
            hasher.update(component.to_bits().to_le_bytes());
        }
    }

    let tokenizer = lexical.tokenizer();
    hasher.update((tokenizer.min_token_len() as u64).to_le_bytes());
    let stopwords = tokenizer.stopwords().sorted();
    hasher.update((stopwords.len() as u64).to_le_bytes());
    for word in stopwords {
        update_str(&mut hasher, word);
    }
    hasher.update(lexical.fuzzy_threshold().to_bits().to_le_bytes());

    format!("{:x}", hasher.finalize())
}

/// Fingerprint of a request against one corpus: the corpus fingerprint, the
/// query text, the query vector's length and its first `prefix_len`
/// components, plus every parameter that shapes the ranked output (top-k,
/// weights, thresholds). Two requests that could rank differently never
/// share a key, and neither do engines over different corpora.
///
/// Floats are hashed by bit pattern, so `0.0` and `-0.0` are distinct keys.
pub fn cache_key(request: &SearchRequest, prefix_len: usize, corpus: &str) -> String {
    let mut hasher = Sha1::new();

    update_str(&mut hasher, corpus);
    update_str(&mut hasher, &request.query_text);

    hasher.update((request.query_vector.len() as u64).to_le_bytes());
    for component in request.query_vector.iter().take(prefix_len) {
        hasher.update(component.to_bits().to_le_bytes());
    }

    hasher.update((request.top_k as u64).to_le_bytes());
    for param in [
        request.text_weight,
        request.vector_weight,
        request.text_threshold,
        request.vector_threshold,
    ] {
        hasher.update(param.to_bits().to_le_bytes());
    }

    format!("{:x}", hasher.finalize())
}

fn update_str(hasher: &mut Sha1, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}
