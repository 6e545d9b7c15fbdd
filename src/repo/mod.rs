//! # Persistence port
//!
//! The stores write through a [`Repository`]. Two implementations exist:
//!
//! - [`memory::MemoryRepository`]: process-lifetime storage, optionally seeded
//!   with example lists.
//! - [`file::FileRepository`]: durable plain-text storage under a `lysta/`
//!   directory (a `lysta.toml` index plus one markdown file per list).
//!
//! All methods take `&self`. The stores share one repository through an `Rc`
//! on the UI thread, so implementations use interior mutability or keep their
//! state on disk.
//!
//! Missing list or item ids are not errors: the call is a no-op and returns
//! `Ok`. Moves are no-ops when `from == to` or either index is out of range;
//! restores insert at `min(index, len)`.

use std::path::PathBuf;

use crate::io::lock::LockError;
use crate::model::{Item, List, ListSummary};

pub mod file;
pub mod memory;

pub use file::FileRepository;
pub use memory::MemoryRepository;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse lysta.toml: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("could not edit lysta.toml: {0}")]
    ConfigEdit(#[from] toml_edit::TomlError),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage abstraction consumed by the list and item stores.
pub trait Repository {
    /// Ordered `(id, name)` rows for every list
    fn list_summaries(&self) -> Result<Vec<ListSummary>, RepoError>;

    /// Load a full list with its items
    fn get_list(&self, list_id: &str) -> Result<Option<List>, RepoError>;

    /// Append a list (and its items) at the end of the collection
    fn add_list(&self, list: &List) -> Result<(), RepoError>;

    fn delete_list(&self, list_id: &str) -> Result<(), RepoError>;

    /// Re-insert a previously deleted list at `index`
    fn restore_list(&self, list: &List, index: usize) -> Result<(), RepoError>;

    fn update_list_name(&self, list_id: &str, name: &str) -> Result<(), RepoError>;

    fn update_list_sorted(&self, list_id: &str, sorted: bool) -> Result<(), RepoError>;

    fn update_list_show_checked(&self, list_id: &str, show_checked: bool)
    -> Result<(), RepoError>;

    fn move_list(&self, from: usize, to: usize) -> Result<(), RepoError>;

    /// Append an item to a list
    fn add_item(&self, list_id: &str, item: &Item) -> Result<(), RepoError>;

    fn delete_item(&self, list_id: &str, item_id: &str) -> Result<(), RepoError>;

    /// Re-insert a previously deleted item at raw `index`
    fn restore_item(&self, list_id: &str, item: &Item, index: usize) -> Result<(), RepoError>;

    fn update_item_description(
        &self,
        list_id: &str,
        item_id: &str,
        description: &str,
    ) -> Result<(), RepoError>;

    fn update_item_checked(
        &self,
        list_id: &str,
        item_id: &str,
        checked: bool,
    ) -> Result<(), RepoError>;

    /// Move an item between raw indices. `item_id` must sit at `from`.
    fn move_item(
        &self,
        list_id: &str,
        item_id: &str,
        from: usize,
        to: usize,
    ) -> Result<(), RepoError>;
}

/// Remove the element at `from` and reinsert it at `to`.
/// Returns false (and leaves `v` untouched) when the move is a no-op.
pub(crate) fn move_within<T>(v: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= v.len() || to >= v.len() {
        return false;
    }
    let elem = v.remove(from);
    v.insert(to, elem);
    true
}

/// Insert before the element at `index`, or append when `index` is past the end.
pub(crate) fn insert_clamped<T>(v: &mut Vec<T>, index: usize, elem: T) -> usize {
    let at = index.min(v.len());
    v.insert(at, elem);
    at
}
