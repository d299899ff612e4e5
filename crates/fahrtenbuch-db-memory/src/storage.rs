use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use fahrtenbuch_storage::{
    Collection, DocumentStore, Query, ReadTransaction, SortOrder, StorageError, StoredDocument,
    Transaction, unique_indexes,
};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::transaction::{MemoryReadTransaction, MemoryTransaction};

/// The raw tables guarded by the store lock.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    collections: HashMap<Collection, BTreeMap<String, StoredDocument>>,
    next_sequence: u64,
}

impl Tables {
    pub(crate) fn get(&self, collection: Collection, id: &str) -> Option<&StoredDocument> {
        self.collections.get(&collection)?.get(id)
    }

    pub(crate) fn query(&self, collection: Collection, query: &Query) -> Vec<StoredDocument> {
        let Some(table) = self.collections.get(&collection) else {
            return Vec::new();
        };
        let mut matched: Vec<StoredDocument> = table
            .values()
            .filter(|doc| query.matches(&doc.document))
            .cloned()
            .collect();
        matched.sort_by_key(|doc| doc.sequence);
        if query.order == SortOrder::Descending {
            matched.reverse();
        }
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        matched
    }

    pub(crate) fn next_sequence(&mut self) -> u64 {
        self.next_sequence += 1;
        self.next_sequence
    }

    /// Writes or removes a document, returning the previous value.
    pub(crate) fn put(
        &mut self,
        collection: Collection,
        id: &str,
        document: Option<StoredDocument>,
    ) -> Option<StoredDocument> {
        let table = self.collections.entry(collection).or_default();
        match document {
            Some(doc) => table.insert(id.to_string(), doc),
            None => table.remove(id),
        }
    }

    /// Rejects `document` if another document shares a unique index key.
    pub(crate) fn check_unique(
        &self,
        collection: Collection,
        id: &str,
        document: &Value,
    ) -> Result<(), StorageError> {
        let Some(table) = self.collections.get(&collection) else {
            return Ok(());
        };
        for index in unique_indexes(collection) {
            let Some(key) = index.key(document) else {
                continue;
            };
            let clash = table
                .values()
                .any(|other| other.id != id && index.key(&other.document).as_ref() == Some(&key));
            if clash {
                return Err(StorageError::unique_violation(collection, index.name));
            }
        }
        Ok(())
    }
}

/// In-memory document store.
///
/// Cloning is cheap and yields a handle to the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStorage {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently committed in a collection.
    pub async fn count(&self, collection: Collection) -> usize {
        let guard = self.tables.read().await;
        guard
            .collections
            .get(&collection)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl DocumentStore for InMemoryStorage {
    async fn begin_read(&self) -> Result<Box<dyn ReadTransaction>, StorageError> {
        let guard = Arc::clone(&self.tables).read_owned().await;
        Ok(Box::new(MemoryReadTransaction::new(guard)))
    }

    async fn begin_transaction(&self) -> Result<Box<dyn Transaction>, StorageError> {
        let guard = Arc::clone(&self.tables).write_owned().await;
        Ok(Box::new(MemoryTransaction::new(guard)))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
