//! PostgreSQL backend.

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use tracing::{debug, instrument};

use super::descriptor::PARSE_STEP;
use super::row::{BOOTSTRAP_STEP, CONNECT_STEP, CREATE_OPERATION, GET_OPERATION, NoteRow};
use super::{ConnectionDescriptor, Note, StoreError, StoreResult, Storer};

const DEFAULT_PORT: u16 = 5432;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS notes (
        id BIGSERIAL PRIMARY KEY,
        created_at TIMESTAMPTZ,
        updated_at TIMESTAMPTZ,
        deleted_at TIMESTAMPTZ,
        uuid VARCHAR(255) NOT NULL,
        body TEXT NOT NULL
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_notes_uuid ON notes (uuid)",
    "CREATE INDEX IF NOT EXISTS idx_notes_deleted_at ON notes (deleted_at)",
];

/// Note store backed by a PostgreSQL connection pool.
#[derive(Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Open a pool for the described database and bootstrap the schema.
    #[instrument(skip_all, fields(host = %descriptor.host, database = %descriptor.database))]
    pub async fn connect(descriptor: &ConnectionDescriptor) -> StoreResult<Self> {
        let options = connect_options(descriptor)?;
        let pool = PgPoolOptions::new()
            .connect_with(options)
            .await
            .map_err(StoreError::connection(CONNECT_STEP))?;

        let store = Self { pool };
        store.bootstrap().await?;
        Ok(store)
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

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Translate a connection descriptor into driver options.
pub(crate) fn connect_options(descriptor: &ConnectionDescriptor) -> StoreResult<PgConnectOptions> {
    let mut options = PgConnectOptions::new()
        .host(&descriptor.host)
        .port(descriptor.port.unwrap_or(DEFAULT_PORT))
        .username(&descriptor.user)
        .database(&descriptor.database);

    if let Some(password) = &descriptor.password {
        options = options.password(password);
    }
    // An absent sslmode means require, not the driver's prefer.
    let mode = match &descriptor.tls_mode {
        Some(mode) => mode
            .parse()
            .map_err(StoreError::connection(PARSE_STEP))?,
        None => PgSslMode::Require,
    };
    options = options.ssl_mode(mode);

    Ok(options)
}

impl Storer for PostgresStore {
    async fn get(&self, uuid: &str) -> StoreResult<Note> {
        let row: Option<NoteRow> = sqlx::query_as(
            r#"
            SELECT id::BIGINT AS id, created_at, updated_at, deleted_at, uuid, body
            FROM notes
            WHERE uuid = $1 AND deleted_at IS NULL
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
            VALUES ($1, $2, $3, $4)
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
