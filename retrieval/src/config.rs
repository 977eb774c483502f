use crate::error::{Result, RetrievalError};
use crate::request::SearchRequest;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for hybrid retrieval
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    /// Number of results returned when a request does not override it
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Weight of the lexical (TF-IDF) score
    #[serde(default = "default_text_weight")]
    pub text_weight: f32,

    /// Weight of the vector (cosine) score
    #[serde(default = "default_vector_weight")]
    pub vector_weight: f32,

    /// Minimum lexical score a candidate needs
    #[serde(default)]
    pub text_threshold: f32,

    /// Minimum vector score a candidate needs
    #[serde(default)]
    pub vector_threshold: f32,

    /// Fuzzy match threshold for out-of-vocabulary query terms (exclusive)
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f32,

    /// Shortest term kept by the tokenizer, in characters
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,

    /// Line-delimited stopword file; the built-in English list when unset
    #[serde(default)]
    pub stopwords_path: Option<PathBuf>,

    /// Enable the persistent query cache
    #[serde(default = "default_true")]
    pub enable_cache: bool,

    /// File the query cache is persisted to
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Maximum number of cached queries
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,

    /// Number of leading query-vector components hashed into the cache key
    #[serde(default = "default_fingerprint_prefix_len")]
    pub fingerprint_prefix_len: usize,
}

fn default_top_k() -> usize {
    5
}

fn default_text_weight() -> f32 {
    0.3
}

fn default_vector_weight() -> f32 {
    0.7
}

fn default_fuzzy_threshold() -> f32 {
    rag_lexical_index::DEFAULT_FUZZY_THRESHOLD
}

fn default_min_token_len() -> usize {
    rag_utils_tokenizer::DEFAULT_MIN_TOKEN_LEN
}

fn default_true() -> bool {
    true
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(".rag-cache").join("query_cache.json")
}

fn default_cache_size() -> usize {
    1000
}

fn default_fingerprint_prefix_len() -> usize {
    16
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
            text_weight: default_text_weight(),
            vector_weight: default_vector_weight(),
            text_threshold: 0.0,
            vector_threshold: 0.0,
            fuzzy_threshold: default_fuzzy_threshold(),
            min_token_len: default_min_token_len(),
            stopwords_path: None,
            enable_cache: true,
            cache_path: default_cache_path(),
            cache_size: default_cache_size(),
            fingerprint_prefix_len: default_fingerprint_prefix_len(),
        }
    }
}

impl RetrievalConfig {
    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        for (name, weight) in [
            ("text_weight", self.text_weight),
            ("vector_weight", self.vector_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!("{name} must be a non-negative number, got {weight}"));
            }
        }

        for (name, threshold) in [
            ("text_threshold", self.text_threshold),
            ("vector_threshold", self.vector_threshold),
        ] {
            if !threshold.is_finite() {
                return Err(format!("{name} must be finite, got {threshold}"));
            }
        }

        if !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            return Err(format!(
                "fuzzy_threshold must be in [0.0, 1.0], got {}",
                self.fuzzy_threshold
            ));
        }

        if self.enable_cache && self.cache_size == 0 {
            return Err("cache_size must be > 0 when the cache is enabled".to_string());
        }

        if self.fingerprint_prefix_len == 0 {
            return Err("fingerprint_prefix_len must be > 0".to_string());
        }

        Ok(())
    }

    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate().map_err(RetrievalError::InvalidConfig)?;
        Ok(config)
    }

    /// Load a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RetrievalError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Request for `query_text` using this configuration's top-k, weights
    /// and thresholds.
    pub fn request(&self, query_text: impl Into<String>, query_vector: Vec<f32>) -> SearchRequest {
        SearchRequest {
            query_text: query_text.into(),
            query_vector,
            top_k: self.default_top_k,
            text_weight: self.text_weight,
            vector_weight: self.vector_weight,
            text_threshold: self.text_threshold,
            vector_threshold: self.vector_threshold,
        }
    }

    /// Lexical evidence dominates
    pub fn lexical_heavy() -> Self {
        Self {
            text_weight: 0.7,
            vector_weight: 0.3,
            ..Default::default()
        }
    }

    /// Pure vector ranking; the lexical channel is skipped entirely
    pub fn vector_only() -> Self {
        Self {
            text_weight: 0.0,
            vector_weight: 1.0,
            ..Default::default()
        }
    }

    /// Nothing is read from or written to disk
    pub fn no_cache() -> Self {
        Self {
            enable_cache: false,
            ..Default::default()
        }
    }
}
