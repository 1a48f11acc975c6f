//! MySQL backend.

use sqlx::MySqlPool;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlSslMode};
use tracing::{debug, instrument};

use super::descriptor::PARSE_STEP;
use super::row::{BOOTSTRAP_STEP, CONNECT_STEP, CREATE_OPERATION, GET_OPERATION, NoteRow};
use super::{ConnectionDescriptor, Note, StoreError, StoreResult, Storer};

const DEFAULT_PORT: u16 = 3306;

// MySQL has no CREATE INDEX IF NOT EXISTS, so indexes live in the table
// definition.
const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS notes (
        id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        created_at DATETIME(6) NULL,
        updated_at DATETIME(6) NULL,
        deleted_at DATETIME(6) NULL,
        uuid VARCHAR(255) NOT NULL,
        body TEXT NOT NULL,
        UNIQUE KEY idx_notes_uuid (uuid),
        KEY idx_notes_deleted_at (deleted_at)
    ) DEFAULT CHARSET = utf8mb4
"#;

/// Note store backed by a MySQL connection pool.
#[derive(Debug)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Open a pool for the described database and bootstrap the schema.
    #[instrument(skip_all, fields(host = %descriptor.host, database = %descriptor.database))]
    pub async fn connect(descriptor: &ConnectionDescriptor) -> StoreResult<Self> {
        let options = connect_options(descriptor)?;
        let pool = MySqlPoolOptions::new()
            .connect_with(options)
            .await
            .map_err(StoreError::connection(CONNECT_STEP))?;

        let store = Self { pool };
        store.bootstrap().await?;
        Ok(store)
    }

    /// Create the `notes` table if it is missing.
    pub async fn bootstrap(&self) -> StoreResult<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(StoreError::connection(BOOTSTRAP_STEP))?;
        debug!("notes schema ready");
        Ok(())
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

/// Translate a connection descriptor into driver options.
pub(crate) fn connect_options(
    descriptor: &ConnectionDescriptor,
) -> StoreResult<MySqlConnectOptions> {
    let mut options = MySqlConnectOptions::new()
        .host(&descriptor.host)
        .port(descriptor.port.unwrap_or(DEFAULT_PORT))
        .username(&descriptor.user)
        .database(&descriptor.database)
        .charset("utf8mb4");

    if let Some(password) = &descriptor.password {
        options = options.password(password);
    }
    if let Some(mode) = &descriptor.tls_mode {
        let mode: MySqlSslMode = mode
            .parse()
            .map_err(StoreError::connection(PARSE_STEP))?;
        options = options.ssl_mode(mode);
    }

    Ok(options)
}

impl Storer for MySqlStore {
    async fn get(&self, uuid: &str) -> StoreResult<Note> {
        let row: Option<NoteRow> = sqlx::query_as(
            r#"
            SELECT CAST(id AS SIGNED) AS id, created_at, updated_at, deleted_at, uuid, body
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
