//! # Reactive stores
//!
//! [`ListStore`] owns the ordered collection of lists; an [`ItemStore`] owns
//! the items of one list. Both mutate in-memory state first, then write
//! through the shared [`Repository`](crate::repo::Repository), then emit on
//! the [`EventChannel`]. A failed write is logged and otherwise ignored: the
//! in-memory state stays authoritative for the UI.
//!
//! UI code observes a store by taking snapshots and polling
//! [`Watcher`]s obtained from the `watch*` methods.

pub mod events;
pub mod item_store;
pub mod list_store;
pub mod observable;
pub mod projection;

pub use events::{EventChannel, EventReceiver, Inserted, Notice, NoticeAction};
pub use item_store::ItemStore;
pub use list_store::ListStore;
pub use observable::{Observable, Watcher};

use crate::repo::RepoError;

/// Error type for opening a store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("list not found: {0}")]
    ListNotFound(String),
    #[error(transparent)]
    Repository(#[from] RepoError),
}

/// Label shown on the action button of a deletion notice
pub const UNDO_LABEL: &str = "Undo";

/// Log a failed repository write. Persistence is best-effort.
pub(crate) fn persisted(op: &'static str, result: Result<(), RepoError>) {
    if let Err(e) = result {
        tracing::warn!(op, error = %e, "persistence failed, keeping in-memory state");
    }
}
