//! The storage contract and the factory that picks a backend.

use std::fmt;
use std::future::Future;

use tracing::info;

use super::{
    ConnectionDescriptor, MongoStore, MySqlStore, Note, PostgresStore, SqliteStore, StoreError,
    StoreResult,
};

/// Capability set every note backend provides.
///
/// Implementations must be safe to share across request handlers; they rely
/// on the driver's pool or client for concurrency and add no locking.
pub trait Storer: Send + Sync {
    /// Look up the non-deleted note whose uuid equals `uuid`.
    ///
    /// Returns [`StoreError::NotFound`] when no such note exists.
    fn get(&self, uuid: &str) -> impl Future<Output = StoreResult<Note>> + Send;

    /// Persist a new note.
    fn create(&self, note: &Note) -> impl Future<Output = StoreResult<()>> + Send;

    /// Release the connection pool or client. Call once, after in-flight
    /// requests have drained.
    fn close(&self) -> impl Future<Output = StoreResult<()>> + Send;
}

/// Database technology selected by a connection string prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    MySql,
    Mongo,
    Sqlite,
}

impl Backend {
    /// Pick the backend for `connection` from its scheme prefix.
    pub fn detect(connection: &str) -> StoreResult<Self> {
        if connection.starts_with("postgres") {
            Ok(Backend::Postgres)
        } else if connection.starts_with("mongodb+srv://") {
            Ok(Backend::Mongo)
        } else if connection.starts_with("mysql") {
            Ok(Backend::MySql)
        } else if connection.starts_with("sqlite:") {
            Ok(Backend::Sqlite)
        } else {
            Err(StoreError::Configuration {
                connection: connection.to_string(),
            })
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::Postgres => "postgres",
            Backend::MySql => "mysql",
            Backend::Mongo => "mongodb",
            Backend::Sqlite => "sqlite",
        })
    }
}

/// A connected store of whichever backend the connection string selected.
#[derive(Debug)]
pub enum Store {
    Postgres(PostgresStore),
    MySql(MySqlStore),
    Mongo(MongoStore),
    Sqlite(SqliteStore),
}

impl Store {
    /// Construct the backend matching `connection`.
    ///
    /// `ca_bundle` is PEM text and only used by the MongoDB backend. Nothing
    /// is constructed when the scheme is unrecognized.
    pub async fn connect(connection: &str, ca_bundle: Option<&str>) -> StoreResult<Self> {
        let backend = Backend::detect(connection)?;

        let store = match backend {
            Backend::Postgres => {
                let descriptor = ConnectionDescriptor::parse(connection)?;
                Store::Postgres(PostgresStore::connect(&descriptor).await?)
            }
            Backend::MySql => {
                let descriptor = ConnectionDescriptor::parse(connection)?;
                Store::MySql(MySqlStore::connect(&descriptor).await?)
            }
            Backend::Mongo => Store::Mongo(MongoStore::connect(connection, ca_bundle).await?),
            Backend::Sqlite => Store::Sqlite(SqliteStore::connect(connection).await?),
        };

        info!(backend = %backend, "connected to note store");
        Ok(store)
    }

    /// Which backend is active.
    pub fn backend(&self) -> Backend {
        match self {
            Store::Postgres(_) => Backend::Postgres,
            Store::MySql(_) => Backend::MySql,
            Store::Mongo(_) => Backend::Mongo,
            Store::Sqlite(_) => Backend::Sqlite,
        }
    }
}

impl Storer for Store {
    async fn get(&self, uuid: &str) -> StoreResult<Note> {
        match self {
            Store::Postgres(s) => s.get(uuid).await,
            Store::MySql(s) => s.get(uuid).await,
            Store::Mongo(s) => s.get(uuid).await,
            Store::Sqlite(s) => s.get(uuid).await,
        }
    }

    async fn create(&self, note: &Note) -> StoreResult<()> {
        match self {
            Store::Postgres(s) => s.create(note).await,
            Store::MySql(s) => s.create(note).await,
            Store::Mongo(s) => s.create(note).await,
            Store::Sqlite(s) => s.create(note).await,
        }
    }

    async fn close(&self) -> StoreResult<()> {
        match self {
            Store::Postgres(s) => s.close().await,
            Store::MySql(s) => s.close().await,
            Store::Mongo(s) => s.close().await,
            Store::Sqlite(s) => s.close().await,
        }
    }
}
