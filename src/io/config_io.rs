use std::fs;
use std::path::Path;

use toml_edit::{ArrayOfTables, DocumentMut, Item, Table};

use crate::io::recovery::atomic_write;
use crate::model::config::{Config, ListEntry};
use crate::repo::RepoError;

/// File name of the index/config file inside the data directory
pub const CONFIG_FILE: &str = "lysta.toml";

/// Read the config, returning both the parsed config and the raw
/// toml_edit document for format-preserving edits.
pub fn read_config(data_dir: &Path) -> Result<(Config, DocumentMut), RepoError> {
    let config_path = data_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| RepoError::Read {
        path: config_path.clone(),
        source: e,
    })?;
    let config: Config = toml::from_str(&config_text)?;
    let doc: DocumentMut = config_text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(data_dir: &Path, doc: &DocumentMut) -> Result<(), RepoError> {
    let config_path = data_dir.join(CONFIG_FILE);
    atomic_write(&config_path, doc.to_string().as_bytes()).map_err(|e| RepoError::Write {
        path: config_path,
        source: e,
    })
}

fn entry_table(entry: &ListEntry) -> Table {
    let mut table = Table::new();
    table["id"] = toml_edit::value(&entry.id);
    table["name"] = toml_edit::value(&entry.name);
    table["sorted"] = toml_edit::value(entry.sorted);
    table["show_checked"] = toml_edit::value(entry.show_checked);
    table["file"] = toml_edit::value(&entry.file);
    table
}

fn lists_mut(doc: &mut DocumentMut) -> Option<&mut ArrayOfTables> {
    if !doc.contains_key("lists") {
        doc["lists"] = Item::ArrayOfTables(ArrayOfTables::new());
    }
    doc["lists"].as_array_of_tables_mut()
}

/// Replace the `[[lists]]` array with `tables`, renumbering document
/// positions so the new order is the rendered order.
fn replace_lists(doc: &mut DocumentMut, mut tables: Vec<Table>) {
    let base = tables.iter().filter_map(Table::position).min().unwrap_or(1);
    let mut aot = ArrayOfTables::new();
    for (offset, mut table) in tables.drain(..).enumerate() {
        table.set_position(base + offset);
        aot.push(table);
    }
    doc["lists"] = Item::ArrayOfTables(aot);
}

fn list_tables(doc: &mut DocumentMut) -> Vec<Table> {
    lists_mut(doc)
        .map(|aot| aot.iter().cloned().collect())
        .unwrap_or_default()
}

fn entry_position(doc: &mut DocumentMut, list_id: &str) -> Option<usize> {
    lists_mut(doc)?
        .iter()
        .position(|t| t.get("id").and_then(|v| v.as_str()) == Some(list_id))
}

/// Append a list entry to the index
pub fn add_list_entry(doc: &mut DocumentMut, entry: &ListEntry) {
    if let Some(lists) = lists_mut(doc) {
        lists.push(entry_table(entry));
    }
}

/// Insert a list entry before position `index` (appends past the end)
pub fn insert_list_entry(doc: &mut DocumentMut, entry: &ListEntry, index: usize) {
    let mut tables = list_tables(doc);
    let at = index.min(tables.len());
    let mut table = entry_table(entry);
    if let Some(pos) = tables.get(at).and_then(Table::position) {
        table.set_position(pos);
    }
    tables.insert(at, table);
    replace_lists(doc, tables);
}

/// Remove a list entry. Returns false if no entry has that id.
pub fn remove_list_entry(doc: &mut DocumentMut, list_id: &str) -> bool {
    let Some(index) = entry_position(doc, list_id) else {
        return false;
    };
    if let Some(lists) = lists_mut(doc) {
        lists.remove(index);
    }
    true
}

/// Move the entry at `from` to `to`. Returns false on a no-op.
pub fn move_list_entry(doc: &mut DocumentMut, from: usize, to: usize) -> bool {
    let mut tables = list_tables(doc);
    if !crate::repo::move_within(&mut tables, from, to) {
        return false;
    }
    replace_lists(doc, tables);
    true
}

/// Set one field of a list entry. Returns false if no entry has that id.
pub fn update_list_field(
    doc: &mut DocumentMut,
    list_id: &str,
    key: &str,
    value: impl Into<toml_edit::Value>,
) -> bool {
    let Some(lists) = lists_mut(doc) else {
        return false;
    };
    for table in lists.iter_mut() {
        if table.get("id").and_then(|v| v.as_str()) == Some(list_id) {
            table[key] = toml_edit::value(value);
            return true;
        }
    }
    false
}
