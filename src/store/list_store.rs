use std::collections::HashSet;
use std::rc::Rc;

use super::events::{EventChannel, Inserted, Notice, NoticeAction};
use super::observable::{Observable, Watcher};
use super::{UNDO_LABEL, persisted};
use crate::model::{DefaultsConfig, List, ListSummary};
use crate::repo::{Repository, insert_clamped, move_within};

/// The ordered collection of lists, with one-level undo of deletion.
pub struct ListStore {
    repo: Rc<dyn Repository>,
    events: EventChannel,
    lists: Observable<Vec<ListSummary>>,
    /// Last deleted list and the index it was removed from
    deleted: Option<(usize, List)>,
    highlighted: HashSet<String>,
    defaults: DefaultsConfig,
}

impl ListStore {
    /// Load the collection from `repo`. A failed read starts empty.
    pub fn new(repo: Rc<dyn Repository>, events: EventChannel) -> Self {
        let lists = repo.list_summaries().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load lists");
            Vec::new()
        });
        ListStore {
            repo,
            events,
            lists: Observable::new(lists),
            deleted: None,
            highlighted: HashSet::new(),
            defaults: DefaultsConfig::default(),
        }
    }

    /// Settings for lists created by [`create`](Self::create)
    pub fn with_defaults(mut self, defaults: DefaultsConfig) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn events(&self) -> &EventChannel {
        &self.events
    }

    /// Snapshot of the collection in display order
    pub fn lists(&self) -> Vec<ListSummary> {
        self.lists.get().clone()
    }

    pub fn watch(&mut self) -> Watcher {
        self.lists.watch()
    }

    /// Reload summaries from the repository, e.g. after an item store
    /// renamed its list.
    pub fn refresh(&mut self) {
        match self.repo.list_summaries() {
            Ok(lists) => {
                self.lists.set(lists);
            }
            Err(e) => tracing::warn!(error = %e, "could not reload lists"),
        }
    }

    fn index_of(&self, list_id: &str) -> Option<usize> {
        self.lists.get().iter().position(|l| l.id == list_id)
    }

    /// Append a new empty list and return its id
    pub fn create(&mut self, name: Option<&str>) -> String {
        let mut list = List::new(name.unwrap_or(&self.defaults.list_name));
        list.sorted = self.defaults.sorted;
        list.show_checked = self.defaults.show_checked;
        let id = list.id.clone();

        self.lists.update(|lists| lists.push(list.summary()));
        persisted("add_list", self.repo.add_list(&list));

        let index = self.lists.get().len() - 1;
        tracing::debug!(list = %id, index, "list created");
        self.events.emit_inserted(Inserted::List { index });
        id
    }

    pub fn rename(&mut self, list_id: &str, name: &str) {
        let Some(index) = self.index_of(list_id) else {
            return;
        };
        self.lists.update(|lists| lists[index].name = name.to_string());
        persisted("update_list_name", self.repo.update_list_name(list_id, name));
    }

    /// Remove a list, keeping it (items included) in the undo slot
    pub fn delete(&mut self, list_id: &str) {
        let Some(index) = self.index_of(list_id) else {
            return;
        };
        let mut summary = None;
        self.lists.update(|lists| summary = Some(lists.remove(index)));
        let Some(summary) = summary else {
            return;
        };

        let list = match self.repo.get_list(list_id) {
            Ok(Some(list)) => list,
            other => {
                if let Err(e) = other {
                    tracing::warn!(list = %list_id, error = %e, "could not load list for undo");
                }
                let mut list = List::new(summary.name.clone());
                list.id = summary.id.clone();
                list
            }
        };
        persisted("delete_list", self.repo.delete_list(list_id));
        self.highlighted.remove(list_id);

        let message = format!("Deleted: {}", list.name);
        self.deleted = Some((index, list));
        self.events
            .publish(Notice::new(message).with_action(UNDO_LABEL, NoticeAction::UndoDeleteList));
    }

    /// Restore the last deleted list at its former position
    pub fn undo_delete(&mut self) {
        let Some((index, list)) = self.deleted.take() else {
            return;
        };
        let mut at = index;
        let summary = list.summary();
        self.lists
            .update(|lists| at = insert_clamped(lists, index, summary));
        persisted("restore_list", self.repo.restore_list(&list, index));

        self.highlighted.insert(list.id.clone());
        self.events.emit_inserted(Inserted::List { index: at });
    }

    pub fn can_undo(&self) -> bool {
        self.deleted.is_some()
    }

    /// Move the list at `from` to `to`. Out-of-range or equal indices are a no-op.
    pub fn move_list(&mut self, from: usize, to: usize) {
        let len = self.lists.get().len();
        if from == to || from >= len || to >= len {
            return;
        }
        self.lists.update(|lists| {
            move_within(lists, from, to);
        });
        persisted("move_list", self.repo.move_list(from, to));
    }

    pub fn is_highlighted(&self, list_id: &str) -> bool {
        self.highlighted.contains(list_id)
    }

    pub fn clear_highlight(&mut self, list_id: &str) {
        self.highlighted.remove(list_id);
    }

    /// Run a notice action that belongs to this store. Returns whether it did.
    pub fn perform(&mut self, action: &NoticeAction) -> bool {
        match action {
            NoticeAction::UndoDeleteList if self.can_undo() => {
                self.undo_delete();
                true
            }
            _ => false,
        }
    }
}
