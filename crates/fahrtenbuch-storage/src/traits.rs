//! Storage traits for the document store abstraction layer.
//!
//! Every exposed operation runs inside exactly one transaction: a
//! [`ReadTransaction`] for queries, a [`Transaction`] for anything that
//! writes. Write transactions are serializable with respect to each other, so
//! a uniqueness check followed by an insert cannot race.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StorageError;
use crate::types::{Collection, Query, StoredDocument};

/// The document store backing the fleet logbook.
///
/// Implementations must be thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use fahrtenbuch_storage::{Collection, DocumentStore, Query};
///
/// async fn vehicles_of(store: &dyn DocumentStore, company: &str) -> StorageResult<usize> {
///     let tx = store.begin_read().await?;
///     let docs = tx.query(Collection::Vehicles, &Query::by("companyId", company)).await?;
///     Ok(docs.len())
/// }
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Opens a read-only view that stays consistent for its whole lifetime.
    async fn begin_read(&self) -> Result<Box<dyn ReadTransaction>, StorageError>;

    /// Begins a read-write transaction.
    ///
    /// The transaction must be committed; dropping it or calling `rollback`
    /// discards every write made through it.
    async fn begin_transaction(&self) -> Result<Box<dyn Transaction>, StorageError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

/// Read access shared by read-only and read-write transactions.
#[async_trait]
pub trait ReadTransaction: Send + Sync {
    /// Point lookup by id. Returns `None` if the document does not exist.
    async fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<StoredDocument>, StorageError>;

    /// Equality/range query over a collection.
    async fn query(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<StoredDocument>, StorageError>;
}

/// A read-write transaction.
///
/// Reads see the transaction's own uncommitted writes.
#[async_trait]
pub trait Transaction: ReadTransaction {
    /// Inserts a new document. The document must carry a string `id` field.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if the id is taken and
    /// `StorageError::UniqueViolation` if a unique index would be violated.
    async fn insert(
        &mut self,
        collection: Collection,
        document: Value,
    ) -> Result<StoredDocument, StorageError>;

    /// Applies a JSON merge patch (RFC 7396) to an existing document.
    ///
    /// `null` members remove the field. The `id` field cannot be changed.
    async fn patch(
        &mut self,
        collection: Collection,
        id: &str,
        patch: &Value,
    ) -> Result<StoredDocument, StorageError>;

    /// Deletes a document by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the document does not exist.
    async fn delete(&mut self, collection: Collection, id: &str) -> Result<(), StorageError>;

    /// Deletes every document matching the query; returns how many were removed.
    async fn delete_where(
        &mut self,
        collection: Collection,
        query: &Query,
    ) -> Result<usize, StorageError>;

    /// Commits all operations in this transaction.
    async fn commit(self: Box<Self>) -> Result<(), StorageError>;

    /// Rolls back all operations in this transaction.
    async fn rollback(self: Box<Self>) -> Result<(), StorageError>;
}

/// Blob storage for trip attachments.
///
/// The core only ever persists and resolves the opaque storage reference.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Issues a short-lived URL the client uploads a file to.
    async fn generate_upload_url(&self) -> Result<String, StorageError>;

    /// Resolves a stored file reference to a download URL.
    ///
    /// Returns `None` if the reference is unknown.
    async fn resolve_url(&self, storage_ref: &str) -> Result<Option<String>, StorageError>;
}
