//! In-memory blob store for trip attachments.
//!
//! Every upload URL carries a fresh token; that token doubles as the storage
//! reference the client reports back after uploading.

use std::collections::HashSet;

use async_trait::async_trait;
use fahrtenbuch_storage::{BlobStore, StorageError};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug)]
pub struct InMemoryBlobStore {
    base_url: String,
    issued: RwLock<HashSet<String>>,
}

impl InMemoryBlobStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            issued: RwLock::new(HashSet::new()),
        }
    }

    /// Extracts the storage reference from an upload URL issued by this store.
    pub fn storage_ref_of(&self, upload_url: &str) -> Option<String> {
        let prefix = format!("{}/upload/", self.base_url);
        upload_url
            .strip_prefix(&prefix)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn generate_upload_url(&self) -> Result<String, StorageError> {
        let token = Uuid::new_v4().to_string();
        let url = format!("{}/upload/{}", self.base_url, token);
        self.issued.write().await.insert(token);
        Ok(url)
    }

    async fn resolve_url(&self, storage_ref: &str) -> Result<Option<String>, StorageError> {
        let issued = self.issued.read().await;
        Ok(issued
            .contains(storage_ref)
            .then(|| format!("{}/files/{}", self.base_url, storage_ref)))
    }
}
