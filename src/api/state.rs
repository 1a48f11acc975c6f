//! Application state for the API server.

use std::sync::Arc;

use crate::store::Storer;

/// Shared application state.
///
/// Generic over `S: Storer` so handlers never learn which backend is active.
pub struct AppState<S: Storer> {
    store: Arc<S>,
}

// Manual Clone impl - only the Arc needs cloning, not S
impl<S: Storer> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Storer> AppState<S> {
    /// Create a new AppState owning the given store.
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Get a reference to the note store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
