// Database Interface - Low-level document operations for the entity store
// Every entity is one JSON document keyed by a store-assigned id and its kind

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::core::{EntityId, EntityKind};
use crate::error::AppResult;

/// Field name -> JSON value, the shape of a stored document body
pub type Document = Map<String, Value>;

/// A stored document plus its bookkeeping columns
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: EntityId,
    pub kind: EntityKind,
    pub schema_version: u32,
    pub data: Document,
    pub created_time: i64,
    pub updated_time: i64,
}

impl StoredDocument {
    /// Document body with the id folded in, ready for typed deserialization
    pub fn into_json(self) -> Value {
        let mut data = self.data;
        data.insert("id".to_string(), Value::from(self.id.value()));
        Value::Object(data)
    }
}

/// Insert request for a new document
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub kind: EntityKind,
    pub schema_version: u32,
    pub data: Document,
    /// Value that must be unique among documents of the same kind
    pub unique_key: Option<String>,
}

/// Database interface for the entity store.
///
/// Each call is a single store write or read; there are no cross-document
/// transactions. Implementations report a violated unique key as
/// `AppError::DuplicateEmail` carrying the offending key.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Insert a document under a fresh id
    async fn insert(&self, document: NewDocument) -> AppResult<StoredDocument>;

    async fn get(&self, kind: EntityKind, id: EntityId) -> AppResult<Option<StoredDocument>>;

    /// Documents of `kind` whose top-level fields equal every criterion.
    /// Empty criteria returns all documents of the kind. Ascending id order.
    async fn find(&self, kind: EntityKind, criteria: &Document) -> AppResult<Vec<StoredDocument>>;

    /// Merge `patch` into the document in one atomic write.
    /// Returns `None` when no such document exists.
    async fn merge(
        &self,
        kind: EntityKind,
        id: EntityId,
        patch: Document,
    ) -> AppResult<Option<StoredDocument>>;

    /// Append `value` to the list stored under `field`, creating the list if needed.
    /// Returns false when no such document exists.
    async fn append(
        &self,
        kind: EntityKind,
        id: EntityId,
        field: &str,
        value: Value,
    ) -> AppResult<bool>;

    /// Remove the document and return what was removed
    async fn delete(&self, kind: EntityKind, id: EntityId) -> AppResult<Option<StoredDocument>>;

    async fn exists(&self, kind: EntityKind, id: EntityId) -> AppResult<bool>;

    /// Connectivity check
    async fn health_check(&self) -> AppResult<()>;
}
