//! In-memory storage backend for the fleet logbook.
//!
//! This crate provides an in-memory implementation of the `DocumentStore`
//! trait from `fahrtenbuch-storage`, plus an in-memory `BlobStore`.
//!
//! Write transactions hold the store's write lock from `begin_transaction`
//! until commit or rollback, which makes them serializable. Read transactions
//! hold the read lock and therefore see a stable snapshot.
//!
//! # Example
//!
//! ```ignore
//! use fahrtenbuch_db_memory::InMemoryStorage;
//! use fahrtenbuch_storage::{Collection, DocumentStore};
//!
//! let storage = InMemoryStorage::new();
//! let mut tx = storage.begin_transaction().await?;
//! tx.insert(Collection::Companies, serde_json::json!({"id": "c1", "name": "Acme"})).await?;
//! tx.commit().await?;
//! ```

pub mod blob;
pub mod factory;
pub mod storage;
pub mod transaction;

pub use blob::InMemoryBlobStore;
pub use factory::{StorageBackend, StorageConfig, create_blob_store, create_storage};
pub use storage::InMemoryStorage;
pub use transaction::{MemoryReadTransaction, MemoryTransaction};

// Re-export the storage traits for convenience
pub use fahrtenbuch_storage::{DocumentStore, StorageError, StoredDocument};

