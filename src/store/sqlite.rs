//! SQLite backend for local development and tests.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, instrument};

use super::descriptor::PARSE_STEP;
use super::row::{BOOTSTRAP_STEP, CONNECT_STEP, CREATE_OPERATION, GET_OPERATION, NoteRow};
use super::{Note, StoreError, StoreResult, Storer};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS notes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at DATETIME,
        updated_at DATETIME,
        deleted_at DATETIME,
        uuid VARCHAR(255) NOT NULL,
        body TEXT NOT NULL
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_notes_uuid ON notes (uuid)",
    "CREATE INDEX IF NOT EXISTS idx_notes_deleted_at ON notes (deleted_at)",
];

/// Note store backed by a SQLite database file or an in-memory database.
#[derive(Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open the database named by a `sqlite:` connection string, creating
    /// the file if needed, and bootstrap the schema.
    #[instrument]
    pub async fn connect(connection: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(connection)
            .map_err(StoreError::connection(PARSE_STEP))?
            .create_if_missing(true);

        // Each connection to `:memory:` is its own database, so an in-memory
        // store must never open a second one or drop its only one.
        let pool_options = if is_memory(connection) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(StoreError::connection(CONNECT_STEP))?;

        let store = Self { pool };
        store.bootstrap().await?;
        Ok(store)
    }

    /// Create an in-memory store.
    pub async fn in_memory() -> StoreResult<Self> {
        Self::connect("sqlite::memory:").await
    }

    /// Create the `notes` table and its indexes if they are missing.
    pub async fn bootstrap(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(StoreError::connection(BOOTSTRAP_STEP))?;
        }
        debug!("notes schema ready");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_memory(connection: &str) -> bool {
    connection.contains(":memory:") || connection.contains("mode=memory")
}

impl Storer for SqliteStore {
    async fn get(&self, uuid: &str) -> StoreResult<Note> {
        let row: Option<NoteRow> = sqlx::query_as(
            r#"
            SELECT id, created_at, updated_at, deleted_at, uuid, body
            FROM notes
            WHERE uuid = ? AND deleted_at IS NULL
            LIMIT 1
            "#,
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::operation(GET_OPERATION))?;

        row.map(Note::from)
            .ok_or_else(|| StoreError::not_found(uuid))
    }

    async fn create(&self, note: &Note) -> StoreResult<()> {
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO notes (created_at, updated_at, uuid, body)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(&note.uuid)
        .bind(&note.body)
        .execute(&self.pool)
        .await
        .map_err(StoreError::operation(CREATE_OPERATION))?;

        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        self.pool.close().await;
        Ok(())
    }
}
