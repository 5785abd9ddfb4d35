//! In-memory [`DocumentStore`] backend.
//!
//! Backs the engine's tests and local development. Documents live in a
//! `BTreeMap` keyed by full path, so child listing is a prefix scan.
//! Batches are applied under a single lock and are therefore atomic; the
//! per-batch operation limit is configurable to exercise chunking.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lattice_core::types::Fields;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::client::{Document, DocumentStore, Filter, WriteBatch};
use crate::error::StoreError;

/// Default per-batch operation limit, matching the hosted store's bound.
pub const DEFAULT_MAX_BATCH_OPS: usize = 500;

/// In-memory document store.
///
/// Cheap to clone; clones share the same underlying map.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

struct Inner {
    docs: Mutex<BTreeMap<String, Fields>>,
    max_batch_ops: usize,
}

impl MemoryStore {
    /// Create an empty store with the default batch limit.
    pub fn new() -> Self {
        Self::with_max_batch_ops(DEFAULT_MAX_BATCH_OPS)
    }

    /// Create an empty store with a custom per-batch operation limit.
    pub fn with_max_batch_ops(max_batch_ops: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                docs: Mutex::new(BTreeMap::new()),
                max_batch_ops,
            }),
        }
    }

    /// Total number of documents currently stored (all collections).
    pub async fn len(&self) -> usize {
        self.inner.docs.lock().await.len()
    }

    /// Returns `true` if the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.inner.docs.lock().await.is_empty()
    }

    /// All document paths, sorted. Handy for test assertions.
    pub async fn paths(&self) -> Vec<String> {
        self.inner.docs.lock().await.keys().cloned().collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Last segment of a slash-separated path.
fn doc_id(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

/// Collect documents directly under `collection` from the map.
fn children_of(docs: &BTreeMap<String, Fields>, collection: &str) -> Vec<Document> {
    let prefix = format!("{collection}/");
    docs.range(prefix.clone()..)
        .take_while(|(path, _)| path.starts_with(&prefix))
        .filter(|(path, _)| !path[prefix.len()..].contains('/'))
        .map(|(path, fields)| Document {
            id: doc_id(path),
            fields: fields.clone(),
        })
        .collect()
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Document>, StoreError> {
        let docs = self.inner.docs.lock().await;
        Ok(docs.get(path).map(|fields| Document {
            id: doc_id(path),
            fields: fields.clone(),
        }))
    }

    async fn set(&self, path: &str, fields: Fields) -> Result<(), StoreError> {
        self.inner.docs.lock().await.insert(path.to_string(), fields);
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.inner.docs.lock().await.remove(path);
        Ok(())
    }

    async fn list_children(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let docs = self.inner.docs.lock().await;
        Ok(children_of(&docs, collection))
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[Filter],
    ) -> Result<Vec<Document>, StoreError> {
        let docs = self.inner.docs.lock().await;
        Ok(children_of(&docs, collection)
            .into_iter()
            .filter(|doc| filters.iter().all(|f| matches(doc, f)))
            .collect())
    }

    fn batch(&self) -> Box<dyn WriteBatch> {
        Box::new(MemoryBatch {
            inner: Arc::clone(&self.inner),
            ops: Vec::new(),
        })
    }

    fn max_batch_ops(&self) -> usize {
        self.inner.max_batch_ops
    }
}

// ---------------------------------------------------------------------------
// Filter evaluation
// ---------------------------------------------------------------------------

/// Evaluate a single filter against a document.
fn matches(doc: &Document, filter: &Filter) -> bool {
    match filter {
        Filter::Eq(field, value) => doc.fields.get(field) == Some(value),
        Filter::Range { field, min, max } => {
            let Some(actual) = doc.fields.get(field) else {
                return false;
            };
            let above_min = min
                .as_ref()
                .map(|m| compare(actual, m).is_some_and(|o| o.is_ge()))
                .unwrap_or(true);
            let below_max = max
                .as_ref()
                .map(|m| compare(actual, m).is_some_and(|o| o.is_le()))
                .unwrap_or(true);
            above_min && below_max
        }
        Filter::ArrayContains(field, value) => doc
            .fields
            .get(field)
            .and_then(Value::as_array)
            .is_some_and(|arr| arr.contains(value)),
    }
}

/// Ordering between two field values, `None` if they are not comparable.
///
/// Strings that both parse as RFC 3339 timestamps compare chronologically
/// (lexicographic order is wrong across differing fractional precision).
fn compare(a: &Value, b: &Value) -> Option<std::cmp::Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => {
            match (parse_timestamp(x), parse_timestamp(y)) {
                (Some(tx), Some(ty)) => Some(tx.cmp(&ty)),
                _ => Some(x.cmp(y)),
            }
        }
        _ => None,
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// ---------------------------------------------------------------------------
// MemoryBatch
// ---------------------------------------------------------------------------

enum Op {
    Set(String, Fields),
    Delete(String),
}

/// Batch of queued operations against a [`MemoryStore`].
struct MemoryBatch {
    inner: Arc<Inner>,
    ops: Vec<Op>,
}

#[async_trait]
impl WriteBatch for MemoryBatch {
    fn set(&mut self, path: &str, fields: Fields) {
        self.ops.push(Op::Set(path.to_string(), fields));
    }

    fn delete(&mut self, path: &str) {
        self.ops.push(Op::Delete(path.to_string()));
    }

    fn len(&self) -> usize {
        self.ops.len()
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        if self.ops.len() > self.inner.max_batch_ops {
            return Err(StoreError::BatchTooLarge {
                ops: self.ops.len(),
                max: self.inner.max_batch_ops,
            });
        }
        // Single lock across all operations keeps the batch atomic.
        let mut docs = self.inner.docs.lock().await;
        for op in self.ops {
            match op {
                Op::Set(path, fields) => {
                    docs.insert(path, fields);
                }
                Op::Delete(path) => {
                    docs.remove(&path);
                }
            }
        }
        Ok(())
    }
}
