//! Storage error types.
//!
//! Every backend reports failures through [`StoreError`], so callers can
//! branch on the kind of failure without knowing which database answered.
//! It uses miette for diagnostic output and thiserror for derive macros.

use miette::Diagnostic;
use thiserror::Error;

/// Boxed driver error carried as the cause of a store failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Storage operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum StoreError {
    /// No non-deleted note matches the requested uuid.
    #[error("note not found: {uuid}")]
    #[diagnostic(code(notes::store::not_found))]
    NotFound { uuid: String },

    /// Constructing a backend failed.
    #[error("{step}{}", cause_suffix(.source.as_deref()))]
    #[diagnostic(code(notes::store::connection))]
    Connection {
        step: &'static str,
        #[source]
        source: Option<BoxError>,
    },

    /// A `get` or `create` call failed for a reason other than "not found".
    #[error("{operation}: {source}")]
    #[diagnostic(code(notes::store::operation))]
    Operation {
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    /// The connection string matches no known backend scheme.
    #[error("improper connection string format: {connection}")]
    #[diagnostic(
        code(notes::store::configuration),
        help("expected a postgres, mysql, mongodb+srv or sqlite connection string")
    )]
    Configuration { connection: String },
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

fn cause_suffix(source: Option<&(dyn std::error::Error + Send + Sync + 'static)>) -> String {
    source.map(|e| format!(": {e}")).unwrap_or_default()
}

impl StoreError {
    /// Whether this is the shared not-found sentinel.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub(crate) fn not_found(uuid: &str) -> Self {
        StoreError::NotFound {
            uuid: uuid.to_string(),
        }
    }

    /// Wrap a driver error raised while constructing a backend.
    pub(crate) fn connection<E>(step: &'static str) -> impl FnOnce(E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        move |e| StoreError::Connection {
            step,
            source: Some(Box::new(e)),
        }
    }

    /// Wrap a driver error raised by a `get` or `create` call.
    pub(crate) fn operation<E>(operation: &'static str) -> impl FnOnce(E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        move |e| StoreError::Operation {
            operation,
            source: Box::new(e),
        }
    }
}
