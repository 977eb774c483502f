/*!
# Lexical Index

TF-IDF index over a fixed document collection.

- **Bag of terms** per document, built once from the tokenizer output
- **IDF** weights `ln(N / df)` computed once over the whole corpus
- **Fuzzy resolution** of out-of-vocabulary query terms against the
  indexed vocabulary (character-level similarity ratio)
- **Cosine similarity** between the query's IDF weights and a document's raw
  term counts

## Example

```rust
use rag_lexical_index::LexicalIndex;
use rag_utils_tokenizer::Tokenizer;

let index = LexicalIndex::build(
    Tokenizer::default(),
    ["apple fruit", "banana fruit", "apple banana"],
);

let query = index.query_weights("apple");
assert!(index.score(&query, 0) > 0.0);
assert_eq!(index.score(&query, 1), 0.0);
```
*/

mod fuzzy;
mod index;

pub use fuzzy::{DEFAULT_FUZZY_THRESHOLD, similarity_ratio};
pub use index::{LexicalIndex, QueryWeights};
