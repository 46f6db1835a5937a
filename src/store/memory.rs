use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use super::{DocumentStore, StoreError};

/// Process-local store. Contents are lost on exit.
#[derive(Default)]
pub struct MemoryStore {
    documents: DashMap<(String, String), Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// All keys stored under `collection`.
    pub fn keys(&self, collection: &str) -> Vec<String> {
        self.documents
            .iter()
            .filter(|entry| entry.key().0 == collection)
            .map(|entry| entry.key().1.clone())
            .collect()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn put(&self, collection: &str, key: &str, document: &Value) -> Result<(), StoreError> {
        self.documents
            .insert((collection.to_string(), key.to_string()), document.clone());
        Ok(())
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .documents
            .get(&(collection.to_string(), key.to_string()))
            .map(|doc| doc.value().clone()))
    }
}
