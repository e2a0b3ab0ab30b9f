//! Error types for the document store.

use std::path::PathBuf;

/// Errors from reading or writing document collections.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem error on a collection file.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be converted to or from a document.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Stored data is not a list of JSON objects, or not of the expected shape.
    #[error("corrupt collection {collection}: {message}")]
    Corrupt { collection: String, message: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(collection: &str, message: impl Into<String>) -> Self {
        StoreError::Corrupt {
            collection: collection.to_string(),
            message: message.into(),
        }
    }
}
