//! In-memory document store.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{Document, DocumentStore, Query, StoreError};

/// Collections held in process memory. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection names currently present.
    pub fn collections(&self) -> Vec<String> {
        let guard = self
            .collections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut names: Vec<String> = guard.keys().cloned().collect();
        names.sort();
        names
    }
}

impl DocumentStore for MemoryStore {
    fn insert(&self, collection: &str, docs: Vec<Document>) -> Result<usize, StoreError> {
        let mut guard = self
            .collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let count = docs.len();
        guard.entry(collection.to_string()).or_default().extend(docs);
        Ok(count)
    }

    fn find(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let guard = self
            .collections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(guard
            .get(collection)
            .map(|docs| docs.iter().filter(|d| query.matches(d)).cloned().collect())
            .unwrap_or_default())
    }

    fn drop_collection(&self, collection: &str) -> Result<(), StoreError> {
        self.collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(collection);
        Ok(())
    }

    fn remove(&self, collection: &str, query: &Query) -> Result<usize, StoreError> {
        let mut guard = self
            .collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let Some(docs) = guard.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|d| !query.matches(d));
        Ok(before - docs.len())
    }

    fn replace(&self, collection: &str, docs: Vec<Document>) -> Result<usize, StoreError> {
        let count = docs.len();
        self.collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(collection.to_string(), docs);
        Ok(count)
    }
}
