//! Storage abstraction for notes.
//!
//! Callers program against the [`Storer`] contract; [`Store::connect`] picks
//! a concrete backend from the connection string at startup.
//!
//! # Backends
//!
//! - `postgres`: [`PostgresStore`]
//! - `mysql`: [`MySqlStore`]
//! - `mongodb+srv`: [`MongoStore`]
//! - `sqlite`: [`SqliteStore`] (local development, tests)
//!
//! Every backend reports a missing note as [`StoreError::NotFound`].

mod descriptor;
mod error;
mod models;
mod mongo;
mod mysql;
mod postgres;
mod row;
mod sqlite;
mod storer;

#[cfg(all(test, feature = "external-db-tests"))]
mod mongo_cluster_test;
#[cfg(test)]
mod storer_test;

pub use descriptor::ConnectionDescriptor;
pub use error::{BoxError, StoreError, StoreResult};
pub use models::{Note, RecordKey};
pub use mongo::MongoStore;
pub use mysql::MySqlStore;
pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;
pub use storer::{Backend, Store, Storer};
