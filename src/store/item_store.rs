use std::collections::HashSet;
use std::rc::Rc;

use super::events::{EventChannel, Inserted, Notice, NoticeAction};
use super::observable::{Observable, Watcher};
use super::projection::{all_checked, project, suggestions};
use super::{StoreError, UNDO_LABEL, persisted};
use crate::model::{Item, Suggestion};
use crate::repo::{Repository, insert_clamped, move_within};

/// The items of one list, plus its rendering flags and projection.
///
/// Indices taken by [`move_item`](Self::move_item) are positions in the
/// projection; everything else addresses items by id.
pub struct ItemStore {
    repo: Rc<dyn Repository>,
    events: EventChannel,
    list_id: String,
    name: Observable<String>,
    sorted: Observable<bool>,
    show_checked: Observable<bool>,
    items: Observable<Vec<Item>>,
    projection: Observable<Vec<Item>>,
    /// Last deleted item and its raw index
    deleted: Option<(usize, Item)>,
    highlighted: HashSet<String>,
}

impl ItemStore {
    pub fn open(
        repo: Rc<dyn Repository>,
        events: EventChannel,
        list_id: &str,
    ) -> Result<Self, StoreError> {
        let list = repo
            .get_list(list_id)?
            .ok_or_else(|| StoreError::ListNotFound(list_id.to_string()))?;
        let projection = project(&list.items, list.sorted, list.show_checked);
        Ok(ItemStore {
            repo,
            events,
            list_id: list.id,
            name: Observable::new(list.name),
            sorted: Observable::new(list.sorted),
            show_checked: Observable::new(list.show_checked),
            items: Observable::new(list.items),
            projection: Observable::new(projection),
            deleted: None,
            highlighted: HashSet::new(),
        })
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    pub fn name(&self) -> &str {
        self.name.get()
    }

    pub fn sorted(&self) -> bool {
        *self.sorted.get()
    }

    pub fn show_checked(&self) -> bool {
        *self.show_checked.get()
    }

    /// All items in manual order
    pub fn items(&self) -> Vec<Item> {
        self.items.get().clone()
    }

    /// The items as rendered: filtered by `show_checked`, sorted if `sorted`
    pub fn projected_items(&self) -> Vec<Item> {
        self.projection.get().clone()
    }

    /// Whether the list has items and all of them are checked
    pub fn all_checked(&self) -> bool {
        all_checked(self.items.get())
    }

    pub fn watch_items(&mut self) -> Watcher {
        self.items.watch()
    }

    pub fn watch_projection(&mut self) -> Watcher {
        self.projection.watch()
    }

    pub fn watch_name(&mut self) -> Watcher {
        self.name.watch()
    }

    pub fn watch_sorted(&mut self) -> Watcher {
        self.sorted.watch()
    }

    pub fn watch_show_checked(&mut self) -> Watcher {
        self.show_checked.watch()
    }

    fn reproject(&mut self) {
        let projection = project(self.items.get(), self.sorted(), self.show_checked());
        self.projection.set(projection);
    }

    fn raw_index(&self, item_id: &str) -> Option<usize> {
        self.items.get().iter().position(|i| i.id == item_id)
    }

    fn projected_index(&self, item_id: &str) -> Option<usize> {
        self.projection.get().iter().position(|i| i.id == item_id)
    }

    /// Signal the UI to scroll to `item_id`, if it is visible
    fn signal_inserted(&self, item_id: &str) {
        if let Some(index) = self.projected_index(item_id) {
            self.events.emit_inserted(Inserted::Item {
                list_id: self.list_id.clone(),
                index,
            });
        }
    }

    /// Append an item and return it
    pub fn add_item(&mut self, description: &str, checked: bool) -> Item {
        let item = Item::new(description, checked);
        self.items.update(|items| items.push(item.clone()));
        self.highlighted.insert(item.id.clone());
        persisted("add_item", self.repo.add_item(&self.list_id, &item));
        self.reproject();
        self.signal_inserted(&item.id);
        item
    }

    /// Remove an item into the undo slot and publish an undo notice
    pub fn delete_item(&mut self, item_id: &str) -> Option<Item> {
        let index = self.raw_index(item_id)?;
        let mut removed = None;
        self.items.update(|items| removed = Some(items.remove(index)));
        let item = removed?;
        self.highlighted.remove(item_id);
        persisted("delete_item", self.repo.delete_item(&self.list_id, item_id));
        self.reproject();

        self.deleted = Some((index, item.clone()));
        let action = NoticeAction::UndoDeleteItem {
            list_id: self.list_id.clone(),
        };
        self.events.publish(
            Notice::new(format!("Deleted: {}", item.description)).with_action(UNDO_LABEL, action),
        );
        Some(item)
    }

    /// Restore the last deleted item at its former raw position
    pub fn undo_delete(&mut self) {
        let Some((index, item)) = self.deleted.take() else {
            return;
        };
        let restored = item.clone();
        self.items.update(|items| {
            insert_clamped(items, index, restored);
        });
        self.highlighted.insert(item.id.clone());
        persisted(
            "restore_item",
            self.repo.restore_item(&self.list_id, &item, index),
        );
        self.reproject();
        self.signal_inserted(&item.id);
    }

    pub fn can_undo(&self) -> bool {
        self.deleted.is_some()
    }

    pub fn update_description(&mut self, item_id: &str, description: &str) {
        let Some(index) = self.raw_index(item_id) else {
            return;
        };
        self.items
            .update(|items| items[index].description = description.to_string());
        persisted(
            "update_item_description",
            self.repo
                .update_item_description(&self.list_id, item_id, description),
        );
        self.reproject();
    }

    /// Check or uncheck an item. Returns whether every item is now checked
    /// (`false` when the id is unknown).
    pub fn update_checked(&mut self, item_id: &str, checked: bool) -> bool {
        let Some(index) = self.raw_index(item_id) else {
            return false;
        };
        self.items.update(|items| items[index].checked = checked);
        persisted(
            "update_item_checked",
            self.repo.update_item_checked(&self.list_id, item_id, checked),
        );
        self.reproject();
        self.all_checked()
    }

    /// Move the item shown at projected `from` to where the item at projected
    /// `to` sits in manual order.
    pub fn move_item(&mut self, from: usize, to: usize) {
        let projection = self.projection.get();
        if from == to || from >= projection.len() || to >= projection.len() {
            return;
        }
        let moving = projection[from].id.clone();
        let target = projection[to].id.clone();
        let (Some(raw_from), Some(raw_to)) = (self.raw_index(&moving), self.raw_index(&target))
        else {
            return;
        };

        self.items.update(|items| {
            move_within(items, raw_from, raw_to);
        });
        persisted(
            "move_item",
            self.repo.move_item(&self.list_id, &moving, raw_from, raw_to),
        );
        self.reproject();
    }

    pub fn set_sorted(&mut self, sorted: bool) {
        self.sorted.set(sorted);
        persisted(
            "update_list_sorted",
            self.repo.update_list_sorted(&self.list_id, sorted),
        );
        self.reproject();
    }

    pub fn set_show_checked(&mut self, show_checked: bool) {
        self.show_checked.set(show_checked);
        persisted(
            "update_list_show_checked",
            self.repo.update_list_show_checked(&self.list_id, show_checked),
        );
        self.reproject();
    }

    pub fn rename(&mut self, name: &str) {
        self.name.set(name.to_string());
        persisted(
            "update_list_name",
            self.repo.update_list_name(&self.list_id, name),
        );
    }

    /// Autocomplete matches for `query` among this list's items
    pub fn autocomplete_suggestions(&self, query: &str) -> Vec<Suggestion> {
        suggestions(self.items.get(), query)
    }

    /// Bring back every item whose description is `text`: uncheck and
    /// highlight them, then signal the last one.
    pub fn select_suggestion(&mut self, text: &str) {
        let ids: Vec<String> = self
            .items
            .get()
            .iter()
            .filter(|i| i.description == text)
            .map(|i| i.id.clone())
            .collect();
        let Some(last) = ids.last().cloned() else {
            return;
        };

        self.items.update(|items| {
            for item in items.iter_mut().filter(|i| i.description == text) {
                item.checked = false;
            }
        });
        for id in ids {
            persisted(
                "update_item_checked",
                self.repo.update_item_checked(&self.list_id, &id, false),
            );
            self.highlighted.insert(id);
        }
        self.reproject();
        self.signal_inserted(&last);
    }

    pub fn is_highlighted(&self, item_id: &str) -> bool {
        self.highlighted.contains(item_id)
    }

    pub fn clear_highlight(&mut self, item_id: &str) {
        self.highlighted.remove(item_id);
    }

    /// Run a notice action that belongs to this store. Returns whether it did.
    pub fn perform(&mut self, action: &NoticeAction) -> bool {
        match action {
            NoticeAction::UndoDeleteItem { list_id }
                if *list_id == self.list_id && self.can_undo() =>
            {
                self.undo_delete();
                true
            }
            _ => false,
        }
    }
}
