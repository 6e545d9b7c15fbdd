use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to lists created without an explicit one
pub const DEFAULT_LIST_NAME: &str = "New list";

/// Generate a fresh opaque id for a list or item
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A single checkable entry in a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Opaque id, unique within the owning list
    pub id: String,
    pub description: String,
    pub checked: bool,
}

impl Item {
    /// Create a new item with a fresh id
    pub fn new(description: impl Into<String>, checked: bool) -> Self {
        Item {
            id: new_id(),
            description: description.into(),
            checked,
        }
    }
}

/// A named, ordered collection of items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    /// Opaque id, never reused
    pub id: String,
    pub name: String,
    /// Render items sorted by description
    pub sorted: bool,
    /// Render checked items (when false they are filtered out)
    pub show_checked: bool,
    /// Items in manual order
    pub items: Vec<Item>,
}

impl List {
    /// Create an empty list with a fresh id and default flags
    pub fn new(name: impl Into<String>) -> Self {
        List {
            id: new_id(),
            name: name.into(),
            sorted: false,
            show_checked: true,
            items: Vec::new(),
        }
    }

    /// Builder-style helper used when seeding lists
    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    pub fn summary(&self) -> ListSummary {
        ListSummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    pub fn item_index(&self, item_id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.id == item_id)
    }
}

/// The row shown for a list in the list collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSummary {
    pub id: String,
    pub name: String,
}

/// An autocomplete match: the item's description and whether it is checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub checked: bool,
}
