use crate::model::Item;
use crate::parse::checkbox;

/// Serialize a list to its markdown representation.
///
/// Line breaks in the name or a description would split the entry across
/// lines, so they are written as spaces.
pub fn serialize_list(name: &str, items: &[Item]) -> String {
    let mut out = format!("# {}\n", single_line(name));
    if !items.is_empty() {
        out.push('\n');
    }
    for item in items {
        out.push_str(checkbox(item.checked));
        out.push('`');
        out.push_str(&item.id);
        out.push_str("` ");
        out.push_str(&single_line(&item.description));
        out.push('\n');
    }
    out
}

fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
