//! Tests for backend selection and the Store dispatcher.

use super::{Backend, Note, Store, StoreError, Storer};

#[test]
fn detect_dispatches_on_scheme_prefix() {
    let cases = [
        ("postgres://u:p@localhost:5432/notes", Backend::Postgres),
        ("postgresql://u:p@localhost:5432/notes", Backend::Postgres),
        ("mysql://u:p@localhost:3306/notes", Backend::MySql),
        ("mongodb+srv://u:p@cluster.example.com/notes", Backend::Mongo),
        ("sqlite::memory:", Backend::Sqlite),
        ("sqlite:///var/lib/notes.db", Backend::Sqlite),
    ];

    for (connection, expected) in cases {
        assert_eq!(
            Backend::detect(connection).unwrap(),
            expected,
            "connection: {}",
            connection
        );
    }
}

#[test]
fn detect_rejects_unknown_scheme() {
    for connection in ["ftp://example.com/notes", "mongodb://localhost/notes", ""] {
        match Backend::detect(connection) {
            Err(StoreError::Configuration { connection: named }) => {
                assert_eq!(named, connection)
            }
            other => panic!("expected Configuration error, got {:?}", other),
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn connect_with_unknown_scheme_constructs_nothing() {
    let err = Store::connect("ftp://example.com/notes", None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Configuration { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn connect_selects_sqlite_backend() {
    let store = Store::connect("sqlite::memory:", None).await.unwrap();
    assert_eq!(store.backend(), Backend::Sqlite);
    assert!(matches!(store, Store::Sqlite(_)));
    store.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn store_delegates_to_backend() {
    let store = Store::connect("sqlite::memory:", None).await.unwrap();

    store
        .create(&Note::new("11111111-1111-4111-8111-111111111111", "foobar"))
        .await
        .unwrap();
    let note = store
        .get("11111111-1111-4111-8111-111111111111")
        .await
        .unwrap();
    assert_eq!(note.body, "foobar");

    assert!(store.get("does-not-exist").await.unwrap_err().is_not_found());
}

#[tokio::test(flavor = "multi_thread")]
async fn connect_with_bad_relational_url_fails_while_parsing() {
    let err = Store::connect("postgres://[bad", None).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Connection {
            step: "parsing DATABASE_URL",
            ..
        }
    ));
}

#[test]
fn backend_display_names() {
    assert_eq!(Backend::Postgres.to_string(), "postgres");
    assert_eq!(Backend::MySql.to_string(), "mysql");
    assert_eq!(Backend::Mongo.to_string(), "mongodb");
    assert_eq!(Backend::Sqlite.to_string(), "sqlite");
}
