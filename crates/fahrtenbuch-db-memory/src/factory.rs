use std::sync::Arc;

use fahrtenbuch_storage::{DynBlobStore, DynStore};
use serde::{Deserialize, Serialize};

use crate::{InMemoryBlobStore, InMemoryStorage};

/// Supported storage backend types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local tables behind a single read-write lock
    #[default]
    Memory,
}

/// Factory configuration to construct the document and blob stores.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Base URL used for upload and download links.
    pub blob_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            blob_base_url: "memory://blobs".to_string(),
        }
    }
}

/// Create the document store selected by the configuration.
pub fn create_storage(config: &StorageConfig) -> DynStore {
    match config.backend {
        StorageBackend::Memory => Arc::new(InMemoryStorage::new()),
    }
}

/// Create the blob store selected by the configuration.
pub fn create_blob_store(config: &StorageConfig) -> DynBlobStore {
    match config.backend {
        StorageBackend::Memory => Arc::new(InMemoryBlobStore::new(&config.blob_base_url)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_deserializes_lowercase() {
        let backend: StorageBackend = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(backend, StorageBackend::Memory);
    }

    #[test]
    fn test_create_storage_reports_backend() {
        let storage = create_storage(&StorageConfig::default());
        assert_eq!(storage.backend_name(), "memory");
    }
}
