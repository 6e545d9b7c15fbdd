use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::io::recovery::RecoveryEntry;
use crate::model::{Item, ListSummary};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ListJson {
    pub position: usize,
    pub id: String,
    pub name: String,
}

#[derive(Serialize)]
pub struct ItemJson {
    pub position: usize,
    pub id: String,
    pub description: String,
    pub checked: bool,
}

#[derive(Serialize)]
pub struct ListDetailJson {
    pub id: String,
    pub name: String,
    pub sorted: bool,
    pub show_checked: bool,
    pub all_checked: bool,
    /// Items as shown, in projected order
    pub items: Vec<ItemJson>,
}

#[derive(Serialize)]
pub struct CreatedJson {
    pub id: String,
    pub position: usize,
}

#[derive(Serialize)]
pub struct CheckedJson {
    pub id: String,
    pub checked: bool,
    pub all_checked: bool,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn lists_to_json(lists: &[ListSummary]) -> Vec<ListJson> {
    lists
        .iter()
        .enumerate()
        .map(|(i, l)| ListJson {
            position: i + 1,
            id: l.id.clone(),
            name: l.name.clone(),
        })
        .collect()
}

pub fn items_to_json(items: &[Item]) -> Vec<ItemJson> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| ItemJson {
            position: i + 1,
            id: item.id.clone(),
            description: item.description.clone(),
            checked: item.checked,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Pad `s` with spaces to `width` terminal cells
pub fn pad_to_width(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    let mut out = s.to_string();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(w)));
    out
}

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

/// One row per list: position, name, id. Names are aligned by display width.
pub fn format_list_rows(lists: &[ListSummary]) -> Vec<String> {
    let name_width = lists
        .iter()
        .map(|l| UnicodeWidthStr::width(l.name.as_str()))
        .max()
        .unwrap_or(0);
    let pos_width = lists.len().to_string().len();
    lists
        .iter()
        .enumerate()
        .map(|(i, l)| {
            format!(
                "{:>pw$}  {}  {}",
                i + 1,
                pad_to_width(&l.name, name_width),
                l.id,
                pw = pos_width
            )
        })
        .collect()
}

pub fn format_list_header(name: &str, sorted: bool, show_checked: bool) -> String {
    let mut flags = Vec::new();
    if sorted {
        flags.push("sorted");
    }
    if !show_checked {
        flags.push("checked hidden");
    }
    if flags.is_empty() {
        name.to_string()
    } else {
        format!("{} ({})", name, flags.join(", "))
    }
}

pub fn format_item_rows(items: &[Item]) -> Vec<String> {
    let pos_width = items.len().to_string().len();
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            format!(
                "{:>pw$}  {} {}",
                i + 1,
                checkbox(item.checked),
                item.description,
                pw = pos_width
            )
        })
        .collect()
}

pub fn format_recovery_entry(entry: &RecoveryEntry) -> Vec<String> {
    let mut lines = vec![format!(
        "{}  {}: {}",
        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
        entry.category,
        entry.description
    )];
    for (key, value) in &entry.fields {
        lines.push(format!("  {}: {}", key, value));
    }
    for line in entry.body.lines() {
        lines.push(format!("  | {}", line));
    }
    lines
}
