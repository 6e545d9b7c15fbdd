use lysta::parse::{parse_list, serialize_list};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn read_fixture(fixture_name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(fixture_name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Could not read fixture {}: {}", fixture_name, e))
}

/// Helper: load a fixture file, parse it, serialize it, and assert byte-for-byte equality
fn assert_list_round_trip(fixture_name: &str) {
    let source = read_fixture(fixture_name);
    let parsed = parse_list(&source);
    assert_eq!(parsed.missing_ids, 0, "fixture {} has items without ids", fixture_name);
    assert!(parsed.dropped.is_empty(), "fixture {} has stray lines", fixture_name);

    let title = parsed.title.unwrap_or_default();
    let output = serialize_list(&title, &parsed.items);

    assert_eq!(
        output, source,
        "Round-trip failed for fixture: {}",
        fixture_name
    );
}

#[test]
fn round_trip_groceries() {
    assert_list_round_trip("groceries.md");
}

#[test]
fn round_trip_backticks_in_description() {
    assert_list_round_trip("backpacking.md");
}

#[test]
fn round_trip_empty_list() {
    assert_list_round_trip("empty.md");
}

#[test]
fn hand_written_file_normalizes() {
    let source = read_fixture("hand_written.md");
    let parsed = parse_list(&source);
    assert_eq!(parsed.title.as_deref(), Some("Weekend"));
    assert_eq!(parsed.missing_ids, 2);
    assert_eq!(parsed.dropped, vec!["* not an item"]);

    let descriptions: Vec<&str> = parsed.items.iter().map(|i| i.description.as_str()).collect();
    assert_eq!(descriptions, vec!["Laundry", "Call grandma", "Fix the bike"]);

    // Once ids are assigned the canonical form is stable
    let canonical = serialize_list("Weekend", &parsed.items);
    let reparsed = parse_list(&canonical);
    assert_eq!(reparsed.items, parsed.items);
    assert_eq!(serialize_list("Weekend", &reparsed.items), canonical);
}
