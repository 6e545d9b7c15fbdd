//! Integration tests for the `lysta` CLI.
//!
//! Each test creates a temp directory, runs `lysta` as a subprocess,
//! and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Get the path to the built `lysta` binary.
fn lysta_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("lysta");
    path
}

fn run(root: &Path, args: &[&str]) -> Output {
    Command::new(lysta_bin())
        .arg("-C")
        .arg(root)
        .args(args)
        .output()
        .expect("failed to run lysta")
}

/// Run and return stdout, asserting success
fn run_ok(root: &Path, args: &[&str]) -> String {
    let output = run(root, args);
    assert!(
        output.status.success(),
        "lysta {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

fn run_json(root: &Path, args: &[&str]) -> serde_json::Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    serde_json::from_str(&run_ok(root, &full)).unwrap()
}

fn setup_with_examples() -> TempDir {
    let tmp = TempDir::new().unwrap();
    run_ok(tmp.path(), &["init", "--examples"]);
    tmp
}

fn shown(root: &Path, list: &str) -> Vec<String> {
    let detail = run_json(root, &["show", list]);
    detail["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["description"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Setup
// ============================================================================

#[test]
fn init_creates_data_dir() {
    let tmp = TempDir::new().unwrap();
    let out = run_ok(tmp.path(), &["init"]);
    assert!(out.contains("Initialized"));
    assert!(tmp.path().join("lysta/lysta.toml").exists());
    assert!(tmp.path().join("lysta/lists").is_dir());

    let again = run(tmp.path(), &["init"]);
    assert!(!again.status.success());
    assert!(String::from_utf8_lossy(&again.stderr).contains("--force"));
}

#[test]
fn commands_outside_data_dir_fail() {
    let tmp = TempDir::new().unwrap();
    let output = run(tmp.path(), &["lists"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: "));
}

#[test]
fn discovery_walks_up() {
    let tmp = setup_with_examples();
    let nested = tmp.path().join("a/b");
    fs::create_dir_all(&nested).unwrap();
    let out = run_ok(&nested, &["lists"]);
    assert!(out.contains("Groceries"));
}

// ============================================================================
// Lists
// ============================================================================

#[test]
fn lists_in_order() {
    let tmp = setup_with_examples();
    let lists = run_json(tmp.path(), &["lists"]);
    let names: Vec<&str> = lists
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Groceries", "Backpacking"]);
    assert_eq!(lists[1]["position"], 2);
}

#[test]
fn new_rename_move_remove() {
    let tmp = setup_with_examples();
    let created = run_json(tmp.path(), &["new", "Hardware"]);
    assert_eq!(created["position"], 3);
    let id = created["id"].as_str().unwrap().to_string();

    run_ok(tmp.path(), &["new"]);
    run_ok(tmp.path(), &["rename", &id, "Hardware store"]);
    run_ok(tmp.path(), &["mv", "3", "1"]);

    let out = run_ok(tmp.path(), &["lists"]);
    let rows: Vec<&str> = out.lines().collect();
    assert!(rows[0].contains("Hardware store"));
    assert!(rows[3].contains("New list"));

    let removed = run_ok(tmp.path(), &["rm", "backpacking"]);
    assert_eq!(removed.trim(), "Deleted: Backpacking");
    assert_eq!(run_json(tmp.path(), &["lists"]).as_array().unwrap().len(), 3);
}

#[test]
fn unknown_list_is_an_error() {
    let tmp = setup_with_examples();
    let output = run(tmp.path(), &["show", "Camping"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("list not found: Camping"));
}

// ============================================================================
// Items
// ============================================================================

#[test]
fn add_check_and_show() {
    let tmp = TempDir::new().unwrap();
    run_ok(tmp.path(), &["init"]);
    run_ok(tmp.path(), &["new", "Errands"]);

    let added = run_json(tmp.path(), &["add", "errands", "Bank"]);
    assert_eq!(added["position"], 1);
    run_ok(tmp.path(), &["add", "errands", "Post office"]);

    let checked = run_json(tmp.path(), &["check", "errands", "1"]);
    assert_eq!(checked["all_checked"], false);
    let out = run_ok(tmp.path(), &["check", "errands", "2"]);
    assert!(out.contains("All items in Errands are checked"));

    let show = run_ok(tmp.path(), &["show", "errands"]);
    assert_eq!(show, "Errands\n1  [x] Bank\n2  [x] Post office\n");

    run_ok(tmp.path(), &["uncheck", "errands", "1"]);
    let detail = run_json(tmp.path(), &["show", "errands"]);
    assert_eq!(detail["items"][0]["checked"], false);
    assert_eq!(detail["all_checked"], false);
}

#[test]
fn list_file_is_plain_markdown() {
    let tmp = TempDir::new().unwrap();
    run_ok(tmp.path(), &["init"]);
    let created = run_json(tmp.path(), &["new", "Errands"]);
    let id = created["id"].as_str().unwrap();
    run_ok(tmp.path(), &["add", "Errands", "Bank", "--checked"]);

    let text = fs::read_to_string(tmp.path().join(format!("lysta/lists/{}.md", id))).unwrap();
    assert!(text.starts_with("# Errands\n\n- [x] `"));
    assert!(text.ends_with("` Bank\n"));
}

#[test]
fn sort_and_hide_checked() {
    let tmp = setup_with_examples();
    run_ok(tmp.path(), &["show-checked", "groceries", "off"]);
    run_ok(tmp.path(), &["sort", "groceries", "on"]);
    assert_eq!(
        shown(tmp.path(), "groceries"),
        vec!["Apples", "Bananas", "Eggs", "Grapes", "Milk", "Oranges", "Strawberries"]
    );
    let header = run_ok(tmp.path(), &["show", "groceries"]);
    assert!(header.starts_with("Groceries (sorted, checked hidden)\n"));
}

#[test]
fn edit_delete_and_move_items() {
    let tmp = setup_with_examples();
    run_ok(tmp.path(), &["show-checked", "1", "off"]);
    // Shown: Milk Eggs Apples Oranges Bananas Grapes Strawberries
    run_ok(tmp.path(), &["edit", "1", "1", "Oat milk"]);
    let deleted = run_ok(tmp.path(), &["del", "1", "2"]);
    assert_eq!(deleted.trim(), "Deleted: Eggs");
    run_ok(tmp.path(), &["mv-item", "1", "1", "2"]);

    let items = shown(tmp.path(), "1");
    assert_eq!(&items[..3], &["Apples", "Oat milk", "Oranges"]);

    let out = run(tmp.path(), &["del", "1", "99"]);
    assert!(!out.status.success());
}

#[test]
fn suggest_and_pick() {
    let tmp = setup_with_examples();
    let suggestions = run_json(tmp.path(), &["suggest", "groceries", "b"]);
    let found: Vec<(String, bool)> = suggestions
        .as_array()
        .unwrap()
        .iter()
        .map(|s| {
            (
                s["text"].as_str().unwrap().to_string(),
                s["checked"].as_bool().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        found,
        vec![
            ("Bread".to_string(), true),
            ("Butter".to_string(), true),
            ("Bananas".to_string(), false),
            ("Blueberries".to_string(), true),
            ("Blackberries".to_string(), true),
        ]
    );

    let picked = run_ok(tmp.path(), &["pick", "groceries", "Bread"]);
    assert_eq!(picked.trim(), "3");
    let detail = run_json(tmp.path(), &["show", "groceries"]);
    assert_eq!(detail["items"][2]["description"], "Bread");
    assert_eq!(detail["items"][2]["checked"], false);

    let missing = run(tmp.path(), &["pick", "groceries", "Caviar"]);
    assert!(!missing.status.success());
}

// ============================================================================
// Recovery log
// ============================================================================

#[test]
fn deleted_list_lands_in_recovery_log() {
    let tmp = setup_with_examples();
    run_ok(tmp.path(), &["rm", "Groceries"]);

    let entries = run_json(tmp.path(), &["recovery"]);
    assert_eq!(entries[0]["category"], "delete");
    assert!(entries[0]["body"].as_str().unwrap().contains("Milk"));

    let path = run_ok(tmp.path(), &["recovery", "--path"]);
    assert!(path.trim().ends_with(".recovery.log"));
}
