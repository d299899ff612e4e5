//! Transaction semantics of the in-memory document store.

use std::sync::Arc;
use std::time::Duration;

use fahrtenbuch_core::{CompanyDraft, Company, UserId, VehicleAssignment, VehicleId};
use fahrtenbuch_db_memory::InMemoryStorage;
use fahrtenbuch_storage::{
    Collection, DocumentStore, Query, RecordReader, RecordWriter, StorageError,
};
use serde_json::json;

#[tokio::test]
async fn test_commit_makes_writes_visible() {
    let storage = InMemoryStorage::new();
    let company = CompanyDraft::new("Acme Logistik").into_company();

    let mut tx = storage.begin_transaction().await.unwrap();
    tx.insert_record(&company).await.unwrap();
    tx.commit().await.unwrap();

    let read = storage.begin_read().await.unwrap();
    let loaded: Option<Company> = read.fetch(company.id.as_str()).await.unwrap();
    assert_eq!(loaded, Some(company));
}

#[tokio::test]
async fn test_rollback_restores_previous_state() {
    let storage = InMemoryStorage::new();

    let mut tx = storage.begin_transaction().await.unwrap();
    tx.insert(Collection::Vehicles, json!({"id": "v1", "brand": "VW"}))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let mut tx = storage.begin_transaction().await.unwrap();
    tx.patch(Collection::Vehicles, "v1", &json!({"brand": "Audi"}))
        .await
        .unwrap();
    tx.insert(Collection::Vehicles, json!({"id": "v2", "brand": "Opel"}))
        .await
        .unwrap();
    tx.delete(Collection::Vehicles, "v1").await.unwrap();
    tx.rollback().await.unwrap();

    let read = storage.begin_read().await.unwrap();
    let v1 = read.get(Collection::Vehicles, "v1").await.unwrap().unwrap();
    assert_eq!(v1.document["brand"], "VW");
    assert!(read.get(Collection::Vehicles, "v2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_dropped_transaction_discards_writes() {
    let storage = InMemoryStorage::new();
    {
        let mut tx = storage.begin_transaction().await.unwrap();
        tx.insert(Collection::Invites, json!({"id": "i1", "email": "a@b.de"}))
            .await
            .unwrap();
    }
    assert_eq!(storage.count(Collection::Invites).await, 0);
}

#[tokio::test]
async fn test_query_orders_by_creation() {
    let storage = InMemoryStorage::new();
    let mut tx = storage.begin_transaction().await.unwrap();
    for id in ["t-c", "t-a", "t-b"] {
        tx.insert(Collection::Trips, json!({"id": id, "userId": "u1"}))
            .await
            .unwrap();
    }
    tx.commit().await.unwrap();

    let read = storage.begin_read().await.unwrap();
    let ids = |docs: Vec<fahrtenbuch_storage::StoredDocument>| {
        docs.into_iter().map(|d| d.id).collect::<Vec<_>>()
    };

    let ascending = read
        .query(Collection::Trips, &Query::by("userId", "u1"))
        .await
        .unwrap();
    assert_eq!(ids(ascending), vec!["t-c", "t-a", "t-b"]);

    let newest = read
        .query(
            Collection::Trips,
            &Query::by("userId", "u1").descending().with_limit(2),
        )
        .await
        .unwrap();
    assert_eq!(ids(newest), vec!["t-b", "t-a"]);
}

#[tokio::test]
async fn test_concurrent_assignment_inserts_yield_one_row() {
    let storage = Arc::new(InMemoryStorage::new());
    let user = UserId::from("driver-1");
    let vehicle = VehicleId::from("vehicle-1");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let storage = Arc::clone(&storage);
        let user = user.clone();
        let vehicle = vehicle.clone();
        handles.push(tokio::spawn(async move {
            let mut tx = storage.begin_transaction().await?;
            let existing: Option<VehicleAssignment> = tx
                .find_first(
                    &Query::by("userId", user.as_str()).equals("vehicleId", vehicle.as_str()),
                )
                .await?;
            if existing.is_some() {
                tx.rollback().await?;
                return Ok::<bool, StorageError>(false);
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
            let assignment = VehicleAssignment::new(user, vehicle, UserId::from("admin-1"));
            tx.insert_record(&assignment).await?;
            tx.commit().await?;
            Ok(true)
        }));
    }

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() {
            created += 1;
        }
    }
    assert_eq!(created, 1);
    assert_eq!(storage.count(Collection::VehicleAssignments).await, 1);
}

#[tokio::test]
async fn test_read_waits_for_open_write() {
    let storage = Arc::new(InMemoryStorage::new());
    let mut tx = storage.begin_transaction().await.unwrap();
    tx.insert(Collection::Companies, json!({"id": "c1", "name": "Acme"}))
        .await
        .unwrap();

    let reader = {
        let storage = Arc::clone(&storage);
        tokio::spawn(async move {
            let read = storage.begin_read().await.unwrap();
            read.get(Collection::Companies, "c1").await.unwrap().is_some()
        })
    };

    tokio::time::sleep(Duration::from_millis(10)).await;
    tx.commit().await.unwrap();
    assert!(reader.await.unwrap());
}
