//! # fahrtenbuch-storage
//!
//! Storage abstraction layer for the fleet logbook.
//!
//! This crate defines the traits and types that every storage backend must
//! implement. It does not contain any implementations - those are provided by
//! separate crates.
//!
//! ## Overview
//!
//! - [`DocumentStore`] hands out transactions. Reads go through a
//!   [`ReadTransaction`], writes through a [`Transaction`] that commits or
//!   rolls back as one unit.
//! - [`RecordReader`] / [`RecordWriter`] add typed access on top of the JSON
//!   documents for every domain [`Record`].
//! - [`BlobStore`] covers the attachment upload/download URLs.
//!
//! ## Example
//!
//! ```ignore
//! use fahrtenbuch_storage::{DocumentStore, Query, RecordReader, fields};
//! use fahrtenbuch_core::VehicleAssignment;
//!
//! async fn assignment_exists(store: &dyn DocumentStore, user: &str, vehicle: &str) -> bool {
//!     let tx = store.begin_read().await.unwrap();
//!     let query = Query::by(fields::USER_ID, user).equals(fields::VEHICLE_ID, vehicle);
//!     tx.find_first::<VehicleAssignment>(&query).await.unwrap().is_some()
//! }
//! ```

mod error;
mod records;
pub mod schema;
mod traits;
mod types;

pub use error::{ErrorCategory, StorageError};
pub use records::{Record, RecordReader, RecordWriter, decode};
pub use schema::{INDEXES, IndexDefinition, fields, unique_indexes};
pub use traits::{BlobStore, DocumentStore, ReadTransaction, Transaction};
pub use types::{Collection, Filter, Query, SortOrder, StoredDocument};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared document store trait object.
pub type DynStore = std::sync::Arc<dyn DocumentStore>;

/// Type alias for a shared blob store trait object.
pub type DynBlobStore = std::sync::Arc<dyn BlobStore>;
