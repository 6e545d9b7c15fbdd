use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use toml_edit::DocumentMut;

use super::{RepoError, Repository, insert_clamped, move_within};
use crate::io::config_io::{
    add_list_entry, insert_list_entry, move_list_entry, read_config, remove_list_entry,
    update_list_field, write_config,
};
use crate::io::lock::{DEFAULT_LOCK_TIMEOUT, WriteLock};
use crate::io::recovery::{RecoveryCategory, RecoveryEntry, atomic_write, log_recovery};
use crate::model::{Config, DefaultsConfig, Item, List, ListEntry, ListSummary};
use crate::parse::{ParsedList, parse_list, serialize_list};

/// Durable repository backed by a `lysta/` directory.
///
/// Every write takes the directory lock, re-reads the index from disk, applies
/// the change and writes the touched files atomically. Nothing is cached, so
/// several processes can share one directory.
pub struct FileRepository {
    data_dir: PathBuf,
    lock_timeout: Duration,
}

impl FileRepository {
    /// Open an existing data directory. Fails if `lysta.toml` is unreadable.
    pub fn open(data_dir: &Path) -> Result<Self, RepoError> {
        read_config(data_dir)?;
        Ok(FileRepository {
            data_dir: data_dir.to_path_buf(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        })
    }

    /// How long a write waits for other writers before failing
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    fn lock(&self) -> Result<WriteLock, RepoError> {
        Ok(WriteLock::acquire(&self.data_dir, self.lock_timeout)?)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Defaults for newly created lists from `[defaults]`
    pub fn defaults(&self) -> Result<DefaultsConfig, RepoError> {
        Ok(read_config(&self.data_dir)?.0.defaults)
    }

    fn list_path(&self, entry: &ListEntry) -> PathBuf {
        self.data_dir.join(&entry.file)
    }

    /// Parse a list file. A missing file reads as an empty list.
    fn read_items(&self, entry: &ListEntry) -> Result<ParsedList, RepoError> {
        let path = self.list_path(entry);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(parse_list(&text)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "list file missing, treating as empty");
                Ok(ParsedList::default())
            }
            Err(e) => Err(RepoError::Read { path, source: e }),
        }
    }

    /// Record lines the parser could not place before the file is rewritten
    /// without them.
    fn capture_dropped(&self, entry: &ListEntry, parsed: &ParsedList) {
        if parsed.dropped.is_empty() {
            return;
        }
        log_recovery(
            &self.data_dir,
            RecoveryEntry::now(RecoveryCategory::Parser, "unrecognized lines in list file")
                .field("List", &entry.name)
                .field("File", &entry.file)
                .body(parsed.dropped.join("\n")),
        );
    }

    fn write_list_file(&self, entry: &ListEntry, name: &str, items: &[Item]) -> Result<(), RepoError> {
        let path = self.list_path(entry);
        let content = serialize_list(name, items);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        atomic_write(&path, content.as_bytes()).map_err(|e| {
            log_recovery(
                &self.data_dir,
                RecoveryEntry::now(RecoveryCategory::Write, "list write failed")
                    .field("List", name)
                    .field("Target", &entry.file)
                    .body(content),
            );
            RepoError::Write { path, source: e }
        })
    }

    fn write_index(&self, doc: &DocumentMut) -> Result<(), RepoError> {
        write_config(&self.data_dir, doc).inspect_err(|_| {
            log_recovery(
                &self.data_dir,
                RecoveryEntry::now(RecoveryCategory::Write, "index write failed")
                    .field("Target", crate::io::config_io::CONFIG_FILE)
                    .body(doc.to_string()),
            );
        })
    }

    /// Run an index edit under the lock. `f` returns whether it changed anything.
    fn edit_index<F>(&self, f: F) -> Result<(), RepoError>
    where
        F: FnOnce(&Config, &mut DocumentMut) -> Result<bool, RepoError>,
    {
        let _lock = self.lock()?;
        let (config, mut doc) = read_config(&self.data_dir)?;
        if f(&config, &mut doc)? {
            self.write_index(&doc)?;
        }
        Ok(())
    }

    /// Run an item edit under the lock. Unknown list ids are a no-op.
    fn edit_items<F>(&self, list_id: &str, f: F) -> Result<(), RepoError>
    where
        F: FnOnce(&mut Vec<Item>) -> bool,
    {
        let _lock = self.lock()?;
        let (config, _) = read_config(&self.data_dir)?;
        let Some(entry) = config.lists.iter().find(|e| e.id == list_id) else {
            return Ok(());
        };
        let mut parsed = self.read_items(entry)?;
        let changed = f(&mut parsed.items);
        if changed || parsed.missing_ids > 0 {
            self.capture_dropped(entry, &parsed);
            self.write_list_file(entry, &entry.name, &parsed.items)?;
        }
        Ok(())
    }

    fn edit_item<F>(&self, list_id: &str, item_id: &str, f: F) -> Result<(), RepoError>
    where
        F: FnOnce(&mut Item) -> bool,
    {
        self.edit_items(list_id, |items| {
            items.iter_mut().find(|i| i.id == item_id).is_some_and(f)
        })
    }
}

fn entry_for(list: &List) -> ListEntry {
    ListEntry {
        id: list.id.clone(),
        name: list.name.clone(),
        sorted: list.sorted,
        show_checked: list.show_checked,
        file: format!("lists/{}.md", list.id),
    }
}

impl Repository for FileRepository {
    fn list_summaries(&self) -> Result<Vec<ListSummary>, RepoError> {
        let (config, _) = read_config(&self.data_dir)?;
        Ok(config
            .lists
            .into_iter()
            .map(|e| ListSummary {
                id: e.id,
                name: e.name,
            })
            .collect())
    }

    fn get_list(&self, list_id: &str) -> Result<Option<List>, RepoError> {
        let (config, _) = read_config(&self.data_dir)?;
        let Some(entry) = config.lists.into_iter().find(|e| e.id == list_id) else {
            return Ok(None);
        };
        let mut parsed = self.read_items(&entry)?;

        // Hand-written items got fresh ids. Unless they are stored, the next
        // read generates different ones, so a failed write fails the read.
        if parsed.missing_ids > 0 {
            let _lock = self.lock()?;
            parsed = self.read_items(&entry)?;
            if parsed.missing_ids > 0 {
                self.capture_dropped(&entry, &parsed);
                self.write_list_file(&entry, &entry.name, &parsed.items)?;
                tracing::debug!(list = %entry.id, count = parsed.missing_ids, "stored generated item ids");
            }
        }

        Ok(Some(List {
            id: entry.id,
            name: entry.name,
            sorted: entry.sorted,
            show_checked: entry.show_checked,
            items: parsed.items,
        }))
    }

    fn add_list(&self, list: &List) -> Result<(), RepoError> {
        self.edit_index(|config, doc| {
            if config.lists.iter().any(|e| e.id == list.id) {
                return Ok(false);
            }
            let entry = entry_for(list);
            self.write_list_file(&entry, &list.name, &list.items)?;
            add_list_entry(doc, &entry);
            Ok(true)
        })
    }

    fn delete_list(&self, list_id: &str) -> Result<(), RepoError> {
        let mut removed_file = None;
        self.edit_index(|config, doc| {
            let Some(entry) = config.lists.iter().find(|e| e.id == list_id) else {
                return Ok(false);
            };
            removed_file = Some(entry.clone());
            Ok(remove_list_entry(doc, list_id))
        })?;

        let Some(entry) = removed_file else {
            return Ok(());
        };
        let path = self.list_path(&entry);
        let content = fs::read_to_string(&path).unwrap_or_default();
        log_recovery(
            &self.data_dir,
            RecoveryEntry::now(RecoveryCategory::Delete, "list deleted")
                .field("List", &entry.name)
                .field("Id", &entry.id)
                .body(content),
        );
        if let Err(e) = fs::remove_file(&path)
            && e.kind() != ErrorKind::NotFound
        {
            tracing::warn!(path = %path.display(), error = %e, "could not remove list file");
        }
        Ok(())
    }

    fn restore_list(&self, list: &List, index: usize) -> Result<(), RepoError> {
        self.edit_index(|config, doc| {
            if config.lists.iter().any(|e| e.id == list.id) {
                return Ok(false);
            }
            let entry = entry_for(list);
            self.write_list_file(&entry, &list.name, &list.items)?;
            insert_list_entry(doc, &entry, index);
            Ok(true)
        })
    }

    fn update_list_name(&self, list_id: &str, name: &str) -> Result<(), RepoError> {
        self.edit_index(|config, doc| {
            let Some(entry) = config.lists.iter().find(|e| e.id == list_id) else {
                return Ok(false);
            };
            // The file heading mirrors the index name
            let parsed = self.read_items(entry)?;
            self.capture_dropped(entry, &parsed);
            self.write_list_file(entry, name, &parsed.items)?;
            Ok(update_list_field(doc, list_id, "name", name))
        })
    }

    fn update_list_sorted(&self, list_id: &str, sorted: bool) -> Result<(), RepoError> {
        self.edit_index(|_, doc| Ok(update_list_field(doc, list_id, "sorted", sorted)))
    }

    fn update_list_show_checked(
        &self,
        list_id: &str,
        show_checked: bool,
    ) -> Result<(), RepoError> {
        self.edit_index(|_, doc| {
            Ok(update_list_field(doc, list_id, "show_checked", show_checked))
        })
    }

    fn move_list(&self, from: usize, to: usize) -> Result<(), RepoError> {
        self.edit_index(|_, doc| Ok(move_list_entry(doc, from, to)))
    }

    fn add_item(&self, list_id: &str, item: &Item) -> Result<(), RepoError> {
        self.edit_items(list_id, |items| {
            items.push(item.clone());
            true
        })
    }

    fn delete_item(&self, list_id: &str, item_id: &str) -> Result<(), RepoError> {
        self.edit_items(list_id, |items| {
            let before = items.len();
            items.retain(|i| i.id != item_id);
            items.len() != before
        })
    }

    fn restore_item(&self, list_id: &str, item: &Item, index: usize) -> Result<(), RepoError> {
        self.edit_items(list_id, |items| {
            if items.iter().any(|i| i.id == item.id) {
                return false;
            }
            insert_clamped(items, index, item.clone());
            true
        })
    }

    fn update_item_description(
        &self,
        list_id: &str,
        item_id: &str,
        description: &str,
    ) -> Result<(), RepoError> {
        self.edit_item(list_id, item_id, |item| {
            item.description = description.to_string();
            true
        })
    }

    fn update_item_checked(
        &self,
        list_id: &str,
        item_id: &str,
        checked: bool,
    ) -> Result<(), RepoError> {
        self.edit_item(list_id, item_id, |item| {
            item.checked = checked;
            true
        })
    }

    fn move_item(
        &self,
        list_id: &str,
        item_id: &str,
        from: usize,
        to: usize,
    ) -> Result<(), RepoError> {
        self.edit_items(list_id, |items| {
            items.get(from).is_some_and(|i| i.id == item_id) && move_within(items, from, to)
        })
    }
}
