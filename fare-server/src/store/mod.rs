//! Generic document collections.
//!
//! The pipeline persists two collections, the raw fares of the last run and
//! the round-trip index built from them, plus a single settings document.
//! Stores only need four operations; replacing a collection is built on top
//! of them and may be overridden by stores that can do it atomically.

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw fares of the last successful run.
pub const FARES: &str = "fares";

/// Round trips built from [`FARES`].
pub const ROUND_TRIPS: &str = "roundtrips";

/// Single-document settings collection.
pub const SETTINGS: &str = "settings";

/// A stored document: a JSON object.
pub type Document = Map<String, Value>;

/// Equality match on top-level fields. An empty query matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    fields: Map<String, Value>,
}

impl Query {
    /// Query matching every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.fields
            .iter()
            .all(|(field, value)| doc.get(field) == Some(value))
    }
}

/// A collection-oriented document store.
pub trait DocumentStore: Send + Sync {
    /// Append documents to a collection, creating it if needed.
    fn insert(&self, collection: &str, docs: Vec<Document>) -> Result<usize, StoreError>;

    /// Documents matching `query`, in insertion order. A missing collection is empty.
    fn find(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Delete a collection. Dropping a missing collection is not an error.
    fn drop_collection(&self, collection: &str) -> Result<(), StoreError>;

    /// Delete matching documents, returning how many were removed.
    fn remove(&self, collection: &str, query: &Query) -> Result<usize, StoreError>;

    /// Replace the whole content of a collection.
    fn replace(&self, collection: &str, docs: Vec<Document>) -> Result<usize, StoreError> {
        self.drop_collection(collection)?;
        self.insert(collection, docs)
    }
}

/// Convert values to documents. Values must serialize to JSON objects.
pub fn to_documents<T: Serialize>(
    collection: &str,
    items: &[T],
) -> Result<Vec<Document>, StoreError> {
    items
        .iter()
        .map(|item| match serde_json::to_value(item)? {
            Value::Object(doc) => Ok(doc),
            other => Err(StoreError::corrupt(
                collection,
                format!("expected an object, got {other}"),
            )),
        })
        .collect()
}

/// Convert documents back to typed values.
pub fn from_documents<T: DeserializeOwned>(docs: Vec<Document>) -> Result<Vec<T>, StoreError> {
    docs.into_iter()
        .map(|doc| serde_json::from_value(Value::Object(doc)).map_err(StoreError::from))
        .collect()
}

/// Load a whole collection as typed values.
pub fn load_all<T: DeserializeOwned>(
    store: &impl DocumentStore,
    collection: &str,
) -> Result<Vec<T>, StoreError> {
    from_documents(store.find(collection, &Query::all())?)
}

/// Replace a whole collection with typed values.
pub fn replace_all<T: Serialize>(
    store: &impl DocumentStore,
    collection: &str,
    items: &[T],
) -> Result<usize, StoreError> {
    store.replace(collection, to_documents(collection, items)?)
}

/// Process-wide settings, stored as the single document of [`SETTINGS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Start time of the last successful collection run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_collected_at: Option<DateTime<Utc>>,
}

impl Settings {
    /// Load settings, falling back to defaults when none are stored.
    pub fn load(store: &impl DocumentStore) -> Result<Self, StoreError> {
        let docs = store.find(SETTINGS, &Query::all())?;
        match docs.into_iter().next() {
            Some(doc) => Ok(serde_json::from_value(Value::Object(doc))?),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, store: &impl DocumentStore) -> Result<(), StoreError> {
        replace_all(store, SETTINGS, std::slice::from_ref(self))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn query_matches_on_every_field() {
        let d = doc(json!({"direction": "mow", "price": 1000, "band": "morning"}));
        assert!(Query::all().matches(&d));
        assert!(Query::all().eq("direction", "mow").matches(&d));
        assert!(
            Query::all()
                .eq("direction", "mow")
                .eq("price", 1000)
                .matches(&d)
        );
        assert!(!Query::all().eq("direction", "spb").matches(&d));
        assert!(!Query::all().eq("missing", 1).matches(&d));
    }

    #[test]
    fn to_documents_rejects_scalars() {
        let err = to_documents("numbers", &[1, 2]).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn settings_default_when_absent() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store).unwrap(), Settings::default());
    }

    #[test]
    fn settings_save_replaces_previous() {
        let store = MemoryStore::new();
        let first = Settings {
            last_collected_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()),
        };
        let second = Settings {
            last_collected_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 20, 0).unwrap()),
        };
        first.save(&store).unwrap();
        second.save(&store).unwrap();

        assert_eq!(store.find(SETTINGS, &Query::all()).unwrap().len(), 1);
        assert_eq!(Settings::load(&store).unwrap(), second);
    }
}
