//! Typed access to domain records on top of the JSON document API.

use async_trait::async_trait;
use fahrtenbuch_core::{
    Company, Invite, Trip, TripAttachment, User, UserProfile, Vehicle, VehicleAssignment,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::StorageResult;
use crate::traits::{ReadTransaction, Transaction};
use crate::types::{Collection, Query, StoredDocument};

/// A domain record that lives in exactly one collection.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The collection holding records of this type.
    const COLLECTION: Collection;

    /// The record's id.
    fn record_id(&self) -> &str;
}

macro_rules! impl_record {
    ($($ty:ty => $collection:ident),* $(,)?) => {
        $(
            impl Record for $ty {
                const COLLECTION: Collection = Collection::$collection;

                fn record_id(&self) -> &str {
                    self.id.as_str()
                }
            }
        )*
    };
}

impl_record! {
    Company => Companies,
    User => Users,
    UserProfile => UserProfiles,
    Vehicle => Vehicles,
    VehicleAssignment => VehicleAssignments,
    Trip => Trips,
    TripAttachment => TripAttachments,
    Invite => Invites,
}

/// Decodes a stored document into its record type.
pub fn decode<R: Record>(stored: StoredDocument) -> StorageResult<R> {
    Ok(serde_json::from_value(stored.document)?)
}

/// Typed reads, available on every transaction.
#[async_trait]
pub trait RecordReader: ReadTransaction {
    /// Loads a record by id.
    async fn fetch<R: Record>(&self, id: &str) -> StorageResult<Option<R>> {
        self.get(R::COLLECTION, id).await?.map(decode).transpose()
    }

    /// Loads every record matching the query.
    async fn find<R: Record>(&self, query: &Query) -> StorageResult<Vec<R>> {
        self.query(R::COLLECTION, query)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Loads the first record matching the query.
    async fn find_first<R: Record>(&self, query: &Query) -> StorageResult<Option<R>> {
        let limited = query.clone().with_limit(1);
        Ok(self.find::<R>(&limited).await?.into_iter().next())
    }
}

impl<T: ReadTransaction + ?Sized> RecordReader for T {}

/// Typed writes, available on read-write transactions.
#[async_trait]
pub trait RecordWriter: Transaction {
    /// Inserts a new record.
    async fn insert_record<R: Record>(&mut self, record: &R) -> StorageResult<()> {
        let document = serde_json::to_value(record)?;
        self.insert(R::COLLECTION, document).await?;
        Ok(())
    }

    /// Applies a merge patch and returns the updated record.
    async fn patch_record<R: Record>(&mut self, id: &str, patch: &Value) -> StorageResult<R> {
        let stored = self.patch(R::COLLECTION, id, patch).await?;
        decode(stored)
    }

    /// Deletes a record by id.
    async fn delete_record<R: Record>(&mut self, id: &str) -> StorageResult<()> {
        self.delete(R::COLLECTION, id).await
    }

    /// Deletes every record of type `R` matching the query.
    async fn delete_records_where<R: Record>(&mut self, query: &Query) -> StorageResult<usize> {
        self.delete_where(R::COLLECTION, query).await
    }
}

impl<T: Transaction + ?Sized> RecordWriter for T {}
