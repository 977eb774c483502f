use crate::error::{Result, VectorStoreError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::ops::Index;

/// A retrievable document with its precomputed embedding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Opaque identifier
    pub id: String,

    /// Text used for lexical indexing
    pub content: String,

    /// Dense vector used for similarity search
    pub embedding: Vec<f32>,

    /// Additional fields, opaque to the engine
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            embedding,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Names of the source fields a [`RawDocument`] is read from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentSchema {
    #[serde(default = "default_id_field")]
    pub id_field: String,

    #[serde(default = "default_content_field")]
    pub content_field: String,

    #[serde(default = "default_vector_field")]
    pub vector_field: String,
}

fn default_id_field() -> String {
    "docnm_kwd".to_string()
}

fn default_content_field() -> String {
    "content_with_weight".to_string()
}

fn default_vector_field() -> String {
    "q_1024_vec".to_string()
}

impl Default for DocumentSchema {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            content_field: default_content_field(),
            vector_field: default_vector_field(),
        }
    }
}

impl DocumentSchema {
    /// Schema for records already shaped like [`Document`].
    pub fn plain() -> Self {
        Self {
            id_field: "id".to_string(),
            content_field: "content".to_string(),
            vector_field: "embedding".to_string(),
        }
    }
}

/// Loosely typed input record, validated into a [`Document`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RawDocument {
    pub fields: Map<String, Value>,
}

impl From<Map<String, Value>> for RawDocument {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl RawDocument {
    /// Extract the schema fields; everything else becomes metadata.
    ///
    /// A missing id falls back to the record position and missing content to
    /// an empty string. A missing or non-numeric vector is rejected.
    pub fn into_document(mut self, index: usize, schema: &DocumentSchema) -> Result<Document> {
        let invalid = |reason: String| VectorStoreError::InvalidDocument { index, reason };

        let embedding = match self.fields.remove(&schema.vector_field) {
            Some(Value::Array(values)) => values
                .iter()
                .map(|value| value.as_f64().map(|v| v as f32))
                .collect::<Option<Vec<f32>>>()
                .ok_or_else(|| {
                    invalid(format!(
                        "vector field '{}' contains non-numeric values",
                        schema.vector_field
                    ))
                })?,
            Some(Value::Null) | None => {
                return Err(invalid(format!(
                    "missing vector field '{}'",
                    schema.vector_field
                )));
            }
            Some(other) => {
                return Err(invalid(format!(
                    "vector field '{}' is not an array (found {})",
                    schema.vector_field,
                    json_kind(&other)
                )));
            }
        };

        let content = match self.fields.remove(&schema.content_field) {
            Some(Value::String(text)) => text,
            Some(Value::Null) | None => String::new(),
            Some(other) => {
                return Err(invalid(format!(
                    "content field '{}' is not a string (found {})",
                    schema.content_field,
                    json_kind(&other)
                )));
            }
        };

        let id = match self.fields.remove(&schema.id_field) {
            Some(Value::String(id)) => id,
            Some(Value::Number(id)) => id.to_string(),
            _ => index.to_string(),
        };

        Ok(Document {
            id,
            content,
            embedding,
            metadata: self.fields.into_iter().collect(),
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validated, immutable corpus with a uniform embedding dimensionality
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    documents: Vec<Document>,
    dimension: usize,
}

impl DocumentSet {
    /// Validate `documents`: every embedding must be non-empty, finite and
    /// of the same length as the first document's.
    pub fn new(documents: Vec<Document>) -> Result<Self> {
        let dimension = documents.first().map_or(0, |doc| doc.embedding.len());

        for (index, doc) in documents.iter().enumerate() {
            let reason = if doc.embedding.is_empty() {
                Some("embedding is empty".to_string())
            } else if doc.embedding.len() != dimension {
                Some(format!(
                    "embedding has {} dimensions, corpus has {dimension}",
                    doc.embedding.len()
                ))
            } else if doc.embedding.iter().any(|v| !v.is_finite()) {
                Some("embedding contains non-finite values".to_string())
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(VectorStoreError::InvalidDocument { index, reason });
            }
        }

        Ok(Self {
            documents,
            dimension,
        })
    }

    /// Validate raw records against `schema`.
    pub fn from_raw(records: Vec<RawDocument>, schema: &DocumentSchema) -> Result<Self> {
        let documents = records
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.into_document(index, schema))
            .collect::<Result<Vec<_>>>()?;
        Self::new(documents)
    }

    /// Embedding dimensionality (0 for an empty corpus)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn as_slice(&self) -> &[Document] {
        &self.documents
    }
}

impl Index<usize> for DocumentSet {
    type Output = Document;

    fn index(&self, index: usize) -> &Document {
        &self.documents[index]
    }
}

impl<'a> IntoIterator for &'a DocumentSet {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw(value: Value) -> RawDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_raw_document_default_schema() {
        let record = raw(json!({
            "docnm_kwd": "manual.pdf",
            "content_with_weight": "apple fruit",
            "q_1024_vec": [1.0, 0.0],
            "page": 3
        }));

        let doc = record.into_document(0, &DocumentSchema::default()).unwrap();
        assert_eq!(doc.id, "manual.pdf");
        assert_eq!(doc.content, "apple fruit");
        assert_eq!(doc.embedding, vec![1.0, 0.0]);
        assert_eq!(doc.metadata.get("page"), Some(&json!(3)));
        assert!(!doc.metadata.contains_key("q_1024_vec"));
    }

    #[test]
    fn test_raw_document_fallbacks() {
        let record = raw(json!({ "embedding": [0.5] }));
        let doc = record.into_document(7, &DocumentSchema::plain()).unwrap();
        assert_eq!(doc.id, "7");
        assert_eq!(doc.content, "");
    }

    #[test]
    fn test_raw_document_missing_vector() {
        let record = raw(json!({ "content_with_weight": "text" }));
        let err = record
            .into_document(2, &DocumentSchema::default())
            .unwrap_err();
        assert!(matches!(
            err,
            VectorStoreError::InvalidDocument { index: 2, .. }
        ));
    }

    #[test]
    fn test_raw_document_malformed_vector() {
        let schema = DocumentSchema::plain();
        let not_numeric = raw(json!({ "embedding": [1.0, "x"] }));
        assert!(not_numeric.into_document(0, &schema).is_err());

        let not_array = raw(json!({ "embedding": "1,2,3" }));
        assert!(not_array.into_document(0, &schema).is_err());
    }

    #[test]
    fn test_document_set_validation() {
        let ok = DocumentSet::new(vec![
            Document::new("a", "x", vec![1.0, 0.0]),
            Document::new("b", "y", vec![0.0, 1.0]),
        ])
        .unwrap();
        assert_eq!(ok.dimension(), 2);
        assert_eq!(ok.len(), 2);
        assert_eq!(ok[1].id, "b");

        let mismatch = DocumentSet::new(vec![
            Document::new("a", "x", vec![1.0, 0.0]),
            Document::new("b", "y", vec![1.0]),
        ]);
        assert!(matches!(
            mismatch,
            Err(VectorStoreError::InvalidDocument { index: 1, .. })
        ));

        let empty_vec = DocumentSet::new(vec![Document::new("a", "x", vec![])]);
        assert!(empty_vec.is_err());

        let nan = DocumentSet::new(vec![Document::new("a", "x", vec![f32::NAN])]);
        assert!(nan.is_err());
    }

    #[test]
    fn test_empty_document_set() {
        let set = DocumentSet::new(Vec::new()).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.dimension(), 0);
    }
}
