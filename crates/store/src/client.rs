//! Document store client traits and wire types.
//!
//! [`DocumentStore`] is the seam the engine is written against; a real
//! deployment implements it as an adapter over the hosting store's SDK,
//! while tests use [`crate::MemoryStore`]. Batches are all-or-nothing and
//! bounded by [`DocumentStore::max_batch_ops`]; callers chunk above that.

use async_trait::async_trait;
use lattice_core::types::{DocId, Fields};
use serde_json::Value;

use crate::error::StoreError;

/// A document read from the store: its id (last path segment) plus fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocId,
    pub fields: Fields,
}

impl Document {
    /// Deserialize the fields into a typed model.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| StoreError::Backend(format!("Malformed document {}: {e}", self.id)))
    }
}

/// Serialize a typed model into document fields.
///
/// Errors if `value` serializes to a non-object; the struct models in
/// `lattice-core` always serialize to objects.
pub fn encode<T: serde::Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Backend(format!(
            "Expected an object document, got {other}"
        ))),
        Err(e) => Err(StoreError::Backend(e.to_string())),
    }
}

/// A query predicate on a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `field == value`
    Eq(String, Value),
    /// `min <= field <= max`, either bound optional (inclusive).
    Range {
        field: String,
        min: Option<Value>,
        max: Option<Value>,
    },
    /// Array field contains `value`.
    ArrayContains(String, Value),
}

impl Filter {
    /// Shorthand for an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    /// Shorthand for an array-membership filter.
    pub fn array_contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::ArrayContains(field.into(), value.into())
    }
}

/// Client for a hierarchical document store.
///
/// Paths are slash-separated, alternating collection and document segments
/// (see [`crate::paths`]). Implementations must be safe to share across
/// tasks (`Arc<dyn DocumentStore>`).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a single document; `None` if it does not exist.
    async fn get(&self, path: &str) -> Result<Option<Document>, StoreError>;

    /// Create or overwrite a single document.
    async fn set(&self, path: &str, fields: Fields) -> Result<(), StoreError>;

    /// Delete a single document. Deleting an absent document is a no-op.
    async fn delete(&self, path: &str) -> Result<(), StoreError>;

    /// List every document directly under `collection` (no pagination).
    async fn list_children(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// List documents under `collection` matching all `filters`.
    async fn query(&self, collection: &str, filters: &[Filter])
        -> Result<Vec<Document>, StoreError>;

    /// Start an atomic write batch.
    fn batch(&self) -> Box<dyn WriteBatch>;

    /// Maximum operations a single batch may carry.
    fn max_batch_ops(&self) -> usize;
}

/// An atomic set of writes and deletes.
///
/// `commit` applies every queued operation or none of them, and fails with
/// [`StoreError::BatchTooLarge`] above the store's per-batch limit.
#[async_trait]
pub trait WriteBatch: Send {
    /// Queue a create-or-overwrite.
    fn set(&mut self, path: &str, fields: Fields);

    /// Queue a delete.
    fn delete(&mut self, path: &str);

    /// Number of queued operations.
    fn len(&self) -> usize;

    /// Returns `true` if no operations are queued.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply all queued operations atomically.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
