//! Row mapping shared by the relational backends.

use chrono::{DateTime, Utc};

use super::{Note, RecordKey};

pub(crate) const CONNECT_STEP: &str = "connecting to database";
pub(crate) const BOOTSTRAP_STEP: &str = "migrating notes schema";
pub(crate) const GET_OPERATION: &str = "getting note from db";
pub(crate) const CREATE_OPERATION: &str = "creating note in db";

/// A row of the `notes` table.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct NoteRow {
    pub id: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub uuid: String,
    pub body: String,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Self {
            key: Some(RecordKey::new(row.id.to_string())),
            uuid: row.uuid,
            body: row.body,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}
