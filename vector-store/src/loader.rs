use crate::document::{DocumentSchema, DocumentSet, RawDocument};
use crate::error::{Result, VectorStoreError};
use log::{debug, info};
use serde_json::{Map, Value};
use std::path::Path;

/// Load and validate a document collection from a JSON file.
///
/// Two layouts are accepted:
/// - a search-engine export, `{"hits": {"hits": [{"_id": ..., "_source": {...}}]}}`
/// - a plain array of records
pub fn load_documents(path: &Path, schema: &DocumentSchema) -> Result<DocumentSet> {
    info!("Loading documents from {}", path.display());
    let content = std::fs::read(path)?;
    let value: Value = serde_json::from_slice(&content)?;
    let set = parse_documents(value, schema)?;
    info!(
        "Loaded {} documents ({} dimensions)",
        set.len(),
        set.dimension()
    );
    Ok(set)
}

/// Validate an already-parsed JSON document collection.
pub fn parse_documents(value: Value, schema: &DocumentSchema) -> Result<DocumentSet> {
    let records = match value {
        Value::Array(records) => {
            debug!("Reading {} plain records", records.len());
            records
                .into_iter()
                .enumerate()
                .map(|(index, record)| into_fields(index, record))
                .collect::<Result<Vec<_>>>()?
        }
        Value::Object(mut root) => {
            let hits = match root.remove("hits") {
                Some(Value::Object(mut outer)) => match outer.remove("hits") {
                    Some(Value::Array(hits)) => hits,
                    _ => {
                        return Err(VectorStoreError::UnrecognizedLayout(
                            "'hits' object has no 'hits' array".to_string(),
                        ));
                    }
                },
                _ => {
                    return Err(VectorStoreError::UnrecognizedLayout(
                        "expected an array or an object with a 'hits' field".to_string(),
                    ));
                }
            };
            debug!("Reading {} search hits", hits.len());
            hits.into_iter()
                .enumerate()
                .map(|(index, hit)| hit_source(index, hit, schema))
                .collect::<Result<Vec<_>>>()?
        }
        _ => {
            return Err(VectorStoreError::UnrecognizedLayout(
                "expected an array or an object with a 'hits' field".to_string(),
            ));
        }
    };

    DocumentSet::from_raw(records, schema)
}

fn into_fields(index: usize, record: Value) -> Result<RawDocument> {
    match record {
        Value::Object(fields) => Ok(RawDocument::from(fields)),
        _ => Err(VectorStoreError::InvalidDocument {
            index,
            reason: "record is not a JSON object".to_string(),
        }),
    }
}

/// Unwrap `_source`, falling back to the hit's `_id` when the record has no
/// id field of its own.
fn hit_source(index: usize, hit: Value, schema: &DocumentSchema) -> Result<RawDocument> {
    let Value::Object(mut hit) = hit else {
        return Err(VectorStoreError::InvalidDocument {
            index,
            reason: "hit is not a JSON object".to_string(),
        });
    };

    let mut source: Map<String, Value> = match hit.remove("_source") {
        Some(Value::Object(source)) => source,
        _ => {
            return Err(VectorStoreError::InvalidDocument {
                index,
                reason: "hit has no '_source' object".to_string(),
            });
        }
    };

    if !source.contains_key(&schema.id_field) {
        if let Some(id) = hit.remove("_id") {
            source.insert(schema.id_field.clone(), id);
        }
    }

    Ok(RawDocument::from(source))
}
