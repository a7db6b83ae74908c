use std::path::PathBuf;

use thiserror::Error;

/// Failure of a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file '{path}' is not a valid key/value document: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors returned by [`crate::ConfigStore`] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Required config field missing or blank.
    #[error("invalid config: {0}")]
    Validation(&'static str),

    #[error("config id '{0}' already exists")]
    DuplicateId(String),

    #[error("config '{0}' not found")]
    NotFound(String),

    #[error("built-in config '{0}' cannot be deleted")]
    BuiltinProtected(String),

    /// Persisted config list could not be parsed. Recovered on load by
    /// reseeding; never returned from public operations.
    #[error("stored config list is malformed: {0}")]
    MalformedStoredConfig(#[source] serde_json::Error),

    #[error("failed to serialize configs: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
