pub mod list_parser;
pub mod list_serializer;

pub use list_parser::{ParsedList, parse_list};
pub use list_serializer::serialize_list;

/// Checkbox marker for an item line: `- [ ] ` or `- [x] `
pub(crate) fn checkbox(checked: bool) -> &'static str {
    if checked { "- [x] " } else { "- [ ] " }
}
