//! Transactions over the in-memory tables.
//!
//! A write transaction owns the store's write lock for its whole lifetime and
//! applies writes in place. Before a document is first touched its previous
//! state is captured as a rollback snapshot; rollback (explicit or on drop)
//! restores every snapshot.

use std::collections::HashMap;

use async_trait::async_trait;
use fahrtenbuch_storage::{
    Collection, Query, ReadTransaction, StorageError, StoredDocument, Transaction,
};
use serde_json::Value;
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard};

use crate::storage::Tables;

/// Read-only snapshot of the store.
pub struct MemoryReadTransaction {
    guard: OwnedRwLockReadGuard<Tables>,
}

impl MemoryReadTransaction {
    pub(crate) fn new(guard: OwnedRwLockReadGuard<Tables>) -> Self {
        Self { guard }
    }
}

#[async_trait]
impl ReadTransaction for MemoryReadTransaction {
    async fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<StoredDocument>, StorageError> {
        Ok(self.guard.get(collection, id).cloned())
    }

    async fn query(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<StoredDocument>, StorageError> {
        Ok(self.guard.query(collection, query))
    }
}

type SnapshotKey = (Collection, String);

/// Serializable read-write transaction.
pub struct MemoryTransaction {
    guard: OwnedRwLockWriteGuard<Tables>,
    /// State of each touched document before this transaction wrote it.
    rollback_snapshots: HashMap<SnapshotKey, Option<StoredDocument>>,
    finished: bool,
}

impl MemoryTransaction {
    pub(crate) fn new(guard: OwnedRwLockWriteGuard<Tables>) -> Self {
        Self {
            guard,
            rollback_snapshots: HashMap::new(),
            finished: false,
        }
    }

    fn write(&mut self, collection: Collection, id: &str, document: Option<StoredDocument>) {
        let previous = self.guard.put(collection, id, document);
        self.rollback_snapshots
            .entry((collection, id.to_string()))
            .or_insert(previous);
    }

    fn restore(&mut self) {
        let snapshots = std::mem::take(&mut self.rollback_snapshots);
        let restored = snapshots.len();
        for ((collection, id), previous) in snapshots {
            self.guard.put(collection, &id, previous);
        }
        self.finished = true;
        if restored > 0 {
            tracing::debug!(restored, "in-memory transaction rolled back");
        }
    }
}

fn document_id(document: &Value) -> Result<String, StorageError> {
    match document.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        _ => Err(StorageError::invalid_document(
            "document must carry a non-empty string id",
        )),
    }
}

#[async_trait]
impl ReadTransaction for MemoryTransaction {
    async fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<StoredDocument>, StorageError> {
        Ok(self.guard.get(collection, id).cloned())
    }

    async fn query(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<StoredDocument>, StorageError> {
        Ok(self.guard.query(collection, query))
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn insert(
        &mut self,
        collection: Collection,
        document: Value,
    ) -> Result<StoredDocument, StorageError> {
        if !document.is_object() {
            return Err(StorageError::invalid_document("document must be a JSON object"));
        }
        let id = document_id(&document)?;
        if self.guard.get(collection, &id).is_some() {
            return Err(StorageError::already_exists(collection, id));
        }
        self.guard.check_unique(collection, &id, &document)?;

        let sequence = self.guard.next_sequence();
        let stored = StoredDocument::new(collection, id.clone(), document, sequence);
        self.write(collection, &id, Some(stored.clone()));
        Ok(stored)
    }

    async fn patch(
        &mut self,
        collection: Collection,
        id: &str,
        patch: &Value,
    ) -> Result<StoredDocument, StorageError> {
        let existing = self
            .guard
            .get(collection, id)
            .cloned()
            .ok_or_else(|| StorageError::not_found(collection, id))?;

        if let Some(new_id) = patch.get("id")
            && new_id.as_str() != Some(id)
        {
            return Err(StorageError::invalid_document("the id field cannot be changed"));
        }

        let mut document = existing.document.clone();
        json_patch::merge(&mut document, patch);
        self.guard.check_unique(collection, id, &document)?;

        let updated = existing.with_document(document);
        self.write(collection, id, Some(updated.clone()));
        Ok(updated)
    }

    async fn delete(&mut self, collection: Collection, id: &str) -> Result<(), StorageError> {
        if self.guard.get(collection, id).is_none() {
            return Err(StorageError::not_found(collection, id));
        }
        self.write(collection, id, None);
        Ok(())
    }

    async fn delete_where(
        &mut self,
        collection: Collection,
        query: &Query,
    ) -> Result<usize, StorageError> {
        let ids: Vec<String> = self
            .guard
            .query(collection, query)
            .into_iter()
            .map(|doc| doc.id)
            .collect();
        for id in &ids {
            self.write(collection, id, None);
        }
        Ok(ids.len())
    }

    async fn commit(mut self: Box<Self>) -> Result<(), StorageError> {
        let writes = self.rollback_snapshots.len();
        self.rollback_snapshots.clear();
        self.finished = true;
        tracing::debug!(writes, "in-memory transaction committed");
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<(), StorageError> {
        self.restore();
        Ok(())
    }
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        if !self.finished {
            self.restore();
        }
    }
}

#[cfg(test)]
mod tests {
    use fahrtenbuch_storage::DocumentStore;
    use serde_json::json;

    use super::*;
    use crate::InMemoryStorage;

    #[tokio::test]
    async fn test_insert_requires_string_id() {
        let storage = InMemoryStorage::new();
        let mut tx = storage.begin_transaction().await.unwrap();

        let err = tx
            .insert(Collection::Companies, json!({"name": "Acme"}))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidDocument { .. }));

        let err = tx
            .insert(Collection::Companies, json!({"id": 7}))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidDocument { .. }));
    }

    #[tokio::test]
    async fn test_reads_see_own_writes() {
        let storage = InMemoryStorage::new();
        let mut tx = storage.begin_transaction().await.unwrap();
        tx.insert(Collection::Vehicles, json!({"id": "v1", "companyId": "c1"}))
            .await
            .unwrap();

        let found = tx
            .query(Collection::Vehicles, &Query::by("companyId", "c1"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_patch_merges_and_removes_null_fields() {
        let storage = InMemoryStorage::new();
        let mut tx = storage.begin_transaction().await.unwrap();
        tx.insert(
            Collection::Vehicles,
            json!({"id": "v1", "brand": "VW", "notes": "old"}),
        )
        .await
        .unwrap();

        let patched = tx
            .patch(Collection::Vehicles, "v1", &json!({"brand": "Audi", "notes": null}))
            .await
            .unwrap();
        assert_eq!(patched.document["brand"], "Audi");
        assert!(patched.document.get("notes").is_none());
    }

    #[tokio::test]
    async fn test_patch_cannot_change_id() {
        let storage = InMemoryStorage::new();
        let mut tx = storage.begin_transaction().await.unwrap();
        tx.insert(Collection::Vehicles, json!({"id": "v1"}))
            .await
            .unwrap();

        let err = tx
            .patch(Collection::Vehicles, "v1", &json!({"id": "v2"}))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidDocument { .. }));
    }

    #[tokio::test]
    async fn test_patch_missing_document() {
        let storage = InMemoryStorage::new();
        let mut tx = storage.begin_transaction().await.unwrap();
        let err = tx
            .patch(Collection::Trips, "nope", &json!({"purpose": "x"}))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unique_index_rejects_duplicate_key() {
        let storage = InMemoryStorage::new();
        let mut tx = storage.begin_transaction().await.unwrap();
        tx.insert(
            Collection::VehicleAssignments,
            json!({"id": "a1", "userId": "u1", "vehicleId": "v1"}),
        )
        .await
        .unwrap();

        let err = tx
            .insert(
                Collection::VehicleAssignments,
                json!({"id": "a2", "userId": "u1", "vehicleId": "v1"}),
            )
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());

        tx.insert(
            Collection::VehicleAssignments,
            json!({"id": "a3", "userId": "u1", "vehicleId": "v2"}),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_delete_where_counts_removed() {
        let storage = InMemoryStorage::new();
        let mut tx = storage.begin_transaction().await.unwrap();
        for (id, trip) in [("f1", "t1"), ("f2", "t1"), ("f3", "t2")] {
            tx.insert(Collection::TripAttachments, json!({"id": id, "tripId": trip}))
                .await
                .unwrap();
        }

        let removed = tx
            .delete_where(Collection::TripAttachments, &Query::by("tripId", "t1"))
            .await
            .unwrap();
        assert_eq!(removed, 2);
        tx.commit().await.unwrap();

        assert_eq!(storage.count(Collection::TripAttachments).await, 1);
    }
}
