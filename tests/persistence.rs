//! Store behavior over the file repository, across reopened sessions.

use std::rc::Rc;
use std::time::Duration;

use lysta::io::data_dir::init_data_dir;
use lysta::io::lock::WriteLock;
use lysta::repo::FileRepository;
use lysta::repo::memory::example_lists;
use lysta::store::{EventChannel, Inserted, ItemStore, ListStore, StoreError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn open(tmp: &TempDir) -> (Rc<FileRepository>, EventChannel, ListStore) {
    let repo = Rc::new(FileRepository::open(&tmp.path().join("lysta")).unwrap());
    let events = EventChannel::new();
    let lists = ListStore::new(repo.clone(), events.clone());
    (repo, events, lists)
}

fn names(lists: &ListStore) -> Vec<String> {
    lists.lists().into_iter().map(|l| l.name).collect()
}

#[test]
fn list_changes_survive_reopen() {
    let tmp = TempDir::new().unwrap();
    init_data_dir(tmp.path(), false, &example_lists()).unwrap();

    {
        let (_repo, _events, mut lists) = open(&tmp);
        lists.create(Some("Hardware store"));
        lists.move_list(2, 0);
        let backpacking = lists.lists()[2].id.clone();
        lists.rename(&backpacking, "Camping");
    }

    let (_repo, _events, lists) = open(&tmp);
    assert_eq!(names(&lists), vec!["Hardware store", "Groceries", "Camping"]);
}

#[test]
fn delete_and_undo_round_trips_through_disk() {
    let tmp = TempDir::new().unwrap();
    init_data_dir(tmp.path(), false, &example_lists()).unwrap();
    let (repo, events, mut lists) = open(&tmp);
    let rx = events.subscribe();

    let groceries = lists.lists()[0].id.clone();
    let before = {
        let store = ItemStore::open(repo.clone(), events.clone(), &groceries).unwrap();
        store.items()
    };

    lists.delete(&groceries);
    assert_eq!(names(&open(&tmp).2), vec!["Backpacking"]);

    let notice = rx.take_notice().unwrap();
    assert!(lists.perform(notice.action.as_ref().unwrap()));
    assert_eq!(rx.next_inserted(), Some(Inserted::List { index: 0 }));

    let (repo, events, reopened) = open(&tmp);
    assert_eq!(names(&reopened), vec!["Groceries", "Backpacking"]);
    let store = ItemStore::open(repo, events, &groceries).unwrap();
    assert_eq!(store.items(), before);
}

#[test]
fn item_changes_survive_reopen() {
    let tmp = TempDir::new().unwrap();
    init_data_dir(tmp.path(), false, &[]).unwrap();
    let list_id = {
        let (repo, events, mut lists) = open(&tmp);
        let id = lists.create(Some("Errands"));
        let mut store = ItemStore::open(repo, events, &id).unwrap();
        let post = store.add_item("Post office", false);
        store.add_item("Bank", true);
        store.add_item("bakery", false);
        store.set_sorted(true);
        store.set_show_checked(false);
        store.update_description(&post.id, "Post office (parcel)");
        id
    };

    let (repo, events, _lists) = open(&tmp);
    let store = ItemStore::open(repo, events, &list_id).unwrap();
    assert!(store.sorted());
    assert!(!store.show_checked());
    let shown: Vec<String> = store
        .projected_items()
        .into_iter()
        .map(|i| i.description)
        .collect();
    assert_eq!(shown, vec!["bakery", "Post office (parcel)"]);
}

#[test]
fn projected_move_persists_raw_order() {
    let tmp = TempDir::new().unwrap();
    init_data_dir(tmp.path(), false, &[]).unwrap();
    let (repo, events, mut lists) = open(&tmp);
    let id = lists.create(Some("Letters"));

    let mut store = ItemStore::open(repo.clone(), events.clone(), &id).unwrap();
    store.add_item("a", true);
    store.add_item("b", false);
    store.add_item("c", false);
    store.set_show_checked(false);
    store.move_item(0, 1);

    let reopened = ItemStore::open(repo, events, &id).unwrap();
    let raw: Vec<String> = reopened.items().into_iter().map(|i| i.description).collect();
    assert_eq!(raw, vec!["a", "c", "b"]);
}

#[test]
fn open_fails_when_generated_ids_cannot_be_stored() {
    let tmp = TempDir::new().unwrap();
    let data_dir = init_data_dir(tmp.path(), false, &[]).unwrap();
    let (_repo, _events, mut lists) = open(&tmp);
    let id = lists.create(Some("Weekend"));
    std::fs::write(
        data_dir.join(format!("lists/{}.md", id)),
        "# Weekend\n\n- [ ] Laundry\n",
    )
    .unwrap();

    let repo = Rc::new(
        FileRepository::open(&data_dir)
            .unwrap()
            .with_lock_timeout(Duration::from_millis(50)),
    );
    let held = WriteLock::acquire_default(&data_dir).unwrap();
    let result = ItemStore::open(repo.clone(), EventChannel::new(), &id);
    assert!(matches!(result, Err(StoreError::Repository(_))));
    drop(held);

    // Ids handed out after a successful open are the stored ones
    let mut store = ItemStore::open(repo.clone(), EventChannel::new(), &id).unwrap();
    let laundry = store.items()[0].id.clone();
    store.update_checked(&laundry, true);
    let reopened = ItemStore::open(repo, EventChannel::new(), &id).unwrap();
    assert!(reopened.items()[0].checked);
}
