use std::cell::{Cell, RefCell};

use super::{RepoError, Repository, insert_clamped, move_within};
use crate::model::{Item, List, ListSummary};

/// In-memory repository.
///
/// Uses `RefCell` for interior mutability since the stores run on a single
/// thread. Contents live as long as the repository.
#[derive(Default)]
pub struct MemoryRepository {
    lists: RefCell<Vec<List>>,
    simulate_write_error: Cell<bool>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository pre-populated with the two example lists.
    pub fn with_examples() -> Self {
        Self::with_lists(example_lists())
    }

    pub fn with_lists(lists: Vec<List>) -> Self {
        MemoryRepository {
            lists: RefCell::new(lists),
            simulate_write_error: Cell::new(false),
        }
    }

    /// Make every write fail, for exercising best-effort persistence.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Snapshot of everything stored, in order.
    pub fn snapshot(&self) -> Vec<List> {
        self.lists.borrow().clone()
    }

    fn check_writable(&self) -> Result<(), RepoError> {
        if self.simulate_write_error.get() {
            return Err(RepoError::Io(std::io::Error::other("simulated write error")));
        }
        Ok(())
    }

    fn with_list<F>(&self, list_id: &str, f: F) -> Result<(), RepoError>
    where
        F: FnOnce(&mut List),
    {
        self.check_writable()?;
        let mut lists = self.lists.borrow_mut();
        if let Some(list) = lists.iter_mut().find(|l| l.id == list_id) {
            f(list);
        }
        Ok(())
    }

    fn with_item<F>(&self, list_id: &str, item_id: &str, f: F) -> Result<(), RepoError>
    where
        F: FnOnce(&mut Item),
    {
        self.with_list(list_id, |list| {
            if let Some(item) = list.items.iter_mut().find(|i| i.id == item_id) {
                f(item);
            }
        })
    }
}

impl Repository for MemoryRepository {
    fn list_summaries(&self) -> Result<Vec<ListSummary>, RepoError> {
        Ok(self.lists.borrow().iter().map(List::summary).collect())
    }

    fn get_list(&self, list_id: &str) -> Result<Option<List>, RepoError> {
        Ok(self.lists.borrow().iter().find(|l| l.id == list_id).cloned())
    }

    fn add_list(&self, list: &List) -> Result<(), RepoError> {
        self.check_writable()?;
        self.lists.borrow_mut().push(list.clone());
        Ok(())
    }

    fn delete_list(&self, list_id: &str) -> Result<(), RepoError> {
        self.check_writable()?;
        self.lists.borrow_mut().retain(|l| l.id != list_id);
        Ok(())
    }

    fn restore_list(&self, list: &List, index: usize) -> Result<(), RepoError> {
        self.check_writable()?;
        let mut lists = self.lists.borrow_mut();
        if lists.iter().any(|l| l.id == list.id) {
            return Ok(());
        }
        insert_clamped(&mut lists, index, list.clone());
        Ok(())
    }

    fn update_list_name(&self, list_id: &str, name: &str) -> Result<(), RepoError> {
        self.with_list(list_id, |list| list.name = name.to_string())
    }

    fn update_list_sorted(&self, list_id: &str, sorted: bool) -> Result<(), RepoError> {
        self.with_list(list_id, |list| list.sorted = sorted)
    }

    fn update_list_show_checked(
        &self,
        list_id: &str,
        show_checked: bool,
    ) -> Result<(), RepoError> {
        self.with_list(list_id, |list| list.show_checked = show_checked)
    }

    fn move_list(&self, from: usize, to: usize) -> Result<(), RepoError> {
        self.check_writable()?;
        move_within(&mut self.lists.borrow_mut(), from, to);
        Ok(())
    }

    fn add_item(&self, list_id: &str, item: &Item) -> Result<(), RepoError> {
        self.with_list(list_id, |list| list.items.push(item.clone()))
    }

    fn delete_item(&self, list_id: &str, item_id: &str) -> Result<(), RepoError> {
        self.with_list(list_id, |list| list.items.retain(|i| i.id != item_id))
    }

    fn restore_item(&self, list_id: &str, item: &Item, index: usize) -> Result<(), RepoError> {
        self.with_list(list_id, |list| {
            if list.item_index(&item.id).is_none() {
                insert_clamped(&mut list.items, index, item.clone());
            }
        })
    }

    fn update_item_description(
        &self,
        list_id: &str,
        item_id: &str,
        description: &str,
    ) -> Result<(), RepoError> {
        self.with_item(list_id, item_id, |item| {
            item.description = description.to_string()
        })
    }

    fn update_item_checked(
        &self,
        list_id: &str,
        item_id: &str,
        checked: bool,
    ) -> Result<(), RepoError> {
        self.with_item(list_id, item_id, |item| item.checked = checked)
    }

    fn move_item(
        &self,
        list_id: &str,
        item_id: &str,
        from: usize,
        to: usize,
    ) -> Result<(), RepoError> {
        self.with_list(list_id, |list| {
            if list.items.get(from).is_some_and(|i| i.id == item_id) {
                move_within(&mut list.items, from, to);
            }
        })
    }
}

/// The "Groceries" and "Backpacking" lists shown on first launch.
pub fn example_lists() -> Vec<List> {
    let groceries = [
        ("Milk", false),
        ("Eggs", false),
        ("Bread", true),
        ("Butter", true),
        ("Cheese", true),
        ("Apples", false),
        ("Oranges", false),
        ("Bananas", false),
        ("Blueberries", true),
        ("Raspberries", true),
        ("Grapes", false),
        ("Strawberries", false),
        ("Blackberries", true),
        ("Peaches", true),
        ("Plums", true),
        ("Pears", true),
    ];
    let backpacking = [
        ("Tent", false),
        ("Stove", false),
        ("Fuel", true),
        ("Backpack", true),
        ("Rain fly", true),
        ("Food", false),
        ("Water filter", false),
        ("Water bottle", false),
        ("Shoes", true),
        ("Hat", true),
        ("Sunglasses", false),
        ("First aid kit", false),
        ("Headlamp", true),
        ("Radio", true),
        ("Batteries", true),
        ("Sleeping bag", true),
    ];
    fn to_items(entries: &[(&str, bool)]) -> Vec<Item> {
        entries
            .iter()
            .map(|(description, checked)| Item::new(*description, *checked))
            .collect()
    }
    vec![
        List::new("Groceries").with_items(to_items(&groceries)),
        List::new("Backpacking").with_items(to_items(&backpacking)),
    ]
}
