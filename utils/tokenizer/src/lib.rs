//! # Tokenizer
//!
//! Turns free text into index terms for lexical scoring. Text is lowercased,
//! split on every character that is not alphanumeric or `_`, and filtered
//! against a stopword set and a minimum term length.
//!
//! ## Example
//!
//! ```
//! use rag_utils_tokenizer::Tokenizer;
//!
//! let tokenizer = Tokenizer::default();
//! let terms = tokenizer.tokenize("The Apple and the apple-tree");
//! assert_eq!(terms, vec!["apple", "apple", "tree"]);
//! ```

mod error;
mod stopwords;

pub use error::{Result, TokenizerError};
pub use stopwords::StopWords;

/// Terms shorter than this many characters are dropped.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;

/// Stateless text normalizer shared by the index build and query paths.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: StopWords,
    min_token_len: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(StopWords::english())
    }
}

impl Tokenizer {
    /// Create a tokenizer with the given stopword set and the default
    /// minimum term length.
    pub fn new(stopwords: StopWords) -> Self {
        Self {
            stopwords,
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
        }
    }

    /// Override the minimum term length (in characters).
    pub fn with_min_token_len(mut self, min_token_len: usize) -> Self {
        self.min_token_len = min_token_len;
        self
    }

    pub fn min_token_len(&self) -> usize {
        self.min_token_len
    }

    pub fn stopwords(&self) -> &StopWords {
        &self.stopwords
    }

    /// Split `text` into normalized terms.
    ///
    /// Order is preserved and repeated terms are kept; callers that need
    /// counts build them from the returned sequence.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        lowered
            .split(|c: char| !is_word_char(c))
            .filter(|term| self.keep(term))
            .map(str::to_string)
            .collect()
    }

    fn keep(&self, term: &str) -> bool {
        !term.is_empty()
            && term.chars().count() >= self.min_token_len
            && !self.stopwords.contains(term)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
