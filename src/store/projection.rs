use crate::model::{Item, Suggestion};

/// The items a list renders: checked items dropped unless `show_checked`,
/// then a stable case-insensitive sort by description when `sorted`.
pub fn project(items: &[Item], sorted: bool, show_checked: bool) -> Vec<Item> {
    let mut projected: Vec<Item> = items
        .iter()
        .filter(|i| show_checked || !i.checked)
        .cloned()
        .collect();
    if sorted {
        projected.sort_by_cached_key(|i| i.description.to_lowercase());
    }
    projected
}

/// Items whose description starts with `query`, ignoring case, in raw order.
/// An empty query matches nothing.
pub fn suggestions(items: &[Item], query: &str) -> Vec<Suggestion> {
    if query.is_empty() {
        return Vec::new();
    }
    let query = query.to_lowercase();
    items
        .iter()
        .filter(|i| i.description.to_lowercase().starts_with(&query))
        .map(|i| Suggestion {
            text: i.description.clone(),
            checked: i.checked,
        })
        .collect()
}

/// True when there is at least one item and every item is checked
pub fn all_checked(items: &[Item]) -> bool {
    !items.is_empty() && items.iter().all(|i| i.checked)
}
