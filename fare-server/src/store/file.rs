//! File-backed document store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use tracing::debug;

use super::{Document, DocumentStore, Query, StoreError};

/// One JSON array file per collection under a data directory.
///
/// Every write goes through a temporary file that is renamed over the
/// collection file, so a crash mid-write leaves the previous content intact.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    // Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store in `dir`, creating the directory if it doesn't exist.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.json"))
    }

    fn read(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let path = self.path(collection);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let values: Vec<Value> = serde_json::from_str(&contents)
            .map_err(|e| StoreError::corrupt(collection, e.to_string()))?;

        values
            .into_iter()
            .enumerate()
            .map(|(i, value)| match value {
                Value::Object(doc) => Ok(doc),
                _ => Err(StoreError::corrupt(
                    collection,
                    format!("entry {i} is not an object"),
                )),
            })
            .collect()
    }

    fn write(&self, collection: &str, docs: &[Document]) -> Result<(), StoreError> {
        let path = self.path(collection);
        let tmp = path.with_extension("json.tmp");

        let json = serde_json::to_string(docs)?;
        std::fs::write(&tmp, json).map_err(|e| StoreError::io(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| StoreError::io(&path, e))?;

        debug!(collection, docs = docs.len(), "wrote collection");
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DocumentStore for JsonFileStore {
    fn insert(&self, collection: &str, docs: Vec<Document>) -> Result<usize, StoreError> {
        let _guard = self.lock();
        let count = docs.len();
        let mut all = self.read(collection)?;
        all.extend(docs);
        self.write(collection, &all)?;
        Ok(count)
    }

    fn find(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let docs = self.read(collection)?;
        Ok(docs.into_iter().filter(|d| query.matches(d)).collect())
    }

    fn drop_collection(&self, collection: &str) -> Result<(), StoreError> {
        let _guard = self.lock();
        let path = self.path(collection);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn remove(&self, collection: &str, query: &Query) -> Result<usize, StoreError> {
        let _guard = self.lock();
        let mut docs = self.read(collection)?;
        let before = docs.len();
        docs.retain(|d| !query.matches(d));
        let removed = before - docs.len();
        if removed > 0 {
            self.write(collection, &docs)?;
        }
        Ok(removed)
    }

    fn replace(&self, collection: &str, docs: Vec<Document>) -> Result<usize, StoreError> {
        let _guard = self.lock();
        self.write(collection, &docs)?;
        Ok(docs.len())
    }
}
