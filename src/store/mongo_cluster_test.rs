//! Tests for MongoStore against a live cluster.
//!
//! Run with `--features external-db-tests`, `NOTES_TEST_MONGO_URL` set to a
//! `mongodb+srv://` connection string and, when the cluster needs a private
//! CA, `NOTES_TEST_MONGO_CA` set to the PEM bundle.

use uuid::Uuid;

use super::{Backend, MongoStore, Note, Store, StoreError, Storer};

fn connection() -> (String, Option<String>) {
    let url = std::env::var("NOTES_TEST_MONGO_URL").expect("NOTES_TEST_MONGO_URL must be set");
    (url, std::env::var("NOTES_TEST_MONGO_CA").ok())
}

async fn setup_store() -> MongoStore {
    let (url, ca) = connection();
    MongoStore::connect(&url, ca.as_deref())
        .await
        .expect("Failed to connect to mongodb")
}

#[tokio::test(flavor = "multi_thread")]
async fn create_then_get_round_trips() {
    let store = setup_store().await;
    let uuid = Uuid::new_v4().to_string();

    store
        .create(&Note::new(uuid.clone(), "foobar"))
        .await
        .expect("Create should succeed");

    let found = store.get(&uuid).await.expect("Get should succeed");
    assert_eq!(found.uuid, uuid);
    assert_eq!(found.body, "foobar");
    assert!(found.key.is_some());
    store.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn get_unknown_uuid_returns_not_found() {
    let store = setup_store().await;
    let uuid = Uuid::new_v4().to_string();

    match store.get(&uuid).await.unwrap_err() {
        StoreError::NotFound { uuid: missing } => assert_eq!(missing, uuid),
        other => panic!("expected NotFound, got {:?}", other),
    }
    store.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn store_dispatch_reports_shared_not_found() {
    let (url, ca) = connection();
    let store = Store::connect(&url, ca.as_deref())
        .await
        .expect("Failed to connect to mongodb");
    assert_eq!(store.backend(), Backend::Mongo);

    let err = store.get(&Uuid::new_v4().to_string()).await.unwrap_err();
    assert!(err.is_not_found());
    store.close().await.unwrap();
}
