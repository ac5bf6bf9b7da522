//! Remote document store seam.
//!
//! The ledger talks to persistence only through [`DocumentStore`]. Each call
//! either fully succeeds or fails with a [`StoreError`]; there is no partial
//! application, retry or timeout at this level.
use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    error::StoreError,
    record::{DocumentId, Fields},
};

type ResultStore<T> = Result<T, StoreError>;

/// A document as listed by the store.
///
/// `id` is kept raw: a store may hand back an unusable (blank) identifier,
/// which the ledger then keeps as a record without identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document of `collection`, in store order.
    async fn fetch_all(&self, collection: &str) -> ResultStore<Vec<Document>>;

    /// Stores a new document and returns its generated identifier.
    async fn create(&self, collection: &str, fields: &Fields) -> ResultStore<DocumentId>;

    /// Replaces all fields of an existing document.
    async fn update(&self, collection: &str, id: &DocumentId, fields: &Fields) -> ResultStore<()>;

    async fn delete(&self, collection: &str, id: &DocumentId) -> ResultStore<()>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    async fn fetch_all(&self, collection: &str) -> ResultStore<Vec<Document>> {
        (**self).fetch_all(collection).await
    }

    async fn create(&self, collection: &str, fields: &Fields) -> ResultStore<DocumentId> {
        (**self).create(collection, fields).await
    }

    async fn update(&self, collection: &str, id: &DocumentId, fields: &Fields) -> ResultStore<()> {
        (**self).update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> ResultStore<()> {
        (**self).delete(collection, id).await
    }
}

/// In-process store keeping collections in insertion order.
///
/// Clones share the same data, so a test can keep a handle and inspect what
/// the ledger wrote.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, Vec<Document>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `documents` to `collection` as they are, identifiers included.
    pub async fn seed(&self, collection: &str, documents: Vec<Document>) {
        let mut guard = self.inner.lock().await;
        guard
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
    }

    /// Snapshot of `collection`.
    pub async fn documents(&self, collection: &str) -> Vec<Document> {
        let guard = self.inner.lock().await;
        guard.get(collection).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch_all(&self, collection: &str) -> ResultStore<Vec<Document>> {
        Ok(self.documents(collection).await)
    }

    async fn create(&self, collection: &str, fields: &Fields) -> ResultStore<DocumentId> {
        let raw = Uuid::new_v4().simple().to_string();
        let id = DocumentId::new(raw.clone())
            .ok_or_else(|| StoreError::Network("generated an empty identifier".to_string()))?;

        let mut guard = self.inner.lock().await;
        guard
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: raw,
                fields: fields.clone(),
            });
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &DocumentId, fields: &Fields) -> ResultStore<()> {
        let mut guard = self.inner.lock().await;
        let document = guard
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id.as_str()))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        document.fields = fields.clone();
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> ResultStore<()> {
        let mut guard = self.inner.lock().await;
        let docs = guard
            .get_mut(collection)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let position = docs
            .iter()
            .position(|doc| doc.id == id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        docs.remove(position);
        Ok(())
    }
}
