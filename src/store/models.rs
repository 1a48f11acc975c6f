//! Domain model shared by every storage backend.

use std::fmt;

use chrono::{DateTime, Utc};

/// Backend-assigned primary key of a stored note.
///
/// Row ids and document ids are both carried as their string form. Only
/// backends can construct one; callers address notes by `uuid`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey(String);

impl RecordKey {
    pub(crate) fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single text note.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Note {
    /// Primary key, `None` until the note has been read back from a store.
    pub key: Option<RecordKey>,
    /// Caller-supplied unique identifier used for lookups.
    pub uuid: String,
    /// Note content.
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Soft-delete marker. A set value hides the note from lookups.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Build a note that has not been persisted yet.
    pub fn new(uuid: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            body: body.into(),
            ..Self::default()
        }
    }
}
