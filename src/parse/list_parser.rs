use crate::model::{Item, new_id};

/// Result of parsing a list file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedList {
    /// Text of the first `# ` heading, if any
    pub title: Option<String>,
    pub items: Vec<Item>,
    /// Number of items that had no `` `id` `` and were given a fresh one
    pub missing_ids: usize,
    /// Non-blank lines that are neither the title nor an item
    pub dropped: Vec<String>,
}

/// Parse a list file from its source text.
///
/// Format: an optional `# Title` line followed by one item per line:
///
/// ```text
/// # Groceries
///
/// - [ ] `0b7c…` Milk
/// - [x] `5e21…` Bread
/// ```
///
/// The id in backticks is optional on input; items without one get a fresh
/// id and are counted in `missing_ids` so the caller can write the file back.
pub fn parse_list(source: &str) -> ParsedList {
    let mut parsed = ParsedList::default();

    for line in source.lines() {
        let line = line.trim_end_matches('\r');
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(item) = parse_item_line(trimmed) {
            if item.1 {
                parsed.missing_ids += 1;
            }
            parsed.items.push(item.0);
            continue;
        }

        if parsed.title.is_none()
            && parsed.items.is_empty()
            && let Some(title) = trimmed.strip_prefix("# ")
        {
            parsed.title = Some(title.trim().to_string());
            continue;
        }

        parsed.dropped.push(line.to_string());
    }

    parsed
}

/// Parse one `- [ ] ...` line. Returns the item and whether its id was generated.
fn parse_item_line(line: &str) -> Option<(Item, bool)> {
    let (checked, rest) = if let Some(rest) = line.strip_prefix("- [ ]") {
        (false, rest)
    } else if let Some(rest) = line
        .strip_prefix("- [x]")
        .or_else(|| line.strip_prefix("- [X]"))
    {
        (true, rest)
    } else {
        return None;
    };
    // Marker must be followed by a space or end the line
    let rest = if rest.is_empty() {
        rest
    } else {
        rest.strip_prefix(' ')?
    };

    if let Some(after_tick) = rest.strip_prefix('`')
        && let Some((id, description)) = after_tick.split_once('`')
        && !id.is_empty()
        && !id.contains(char::is_whitespace)
    {
        let description = description.strip_prefix(' ').unwrap_or(description);
        let item = Item {
            id: id.to_string(),
            description: description.to_string(),
            checked,
        };
        return Some((item, false));
    }

    let item = Item {
        id: new_id(),
        description: rest.to_string(),
        checked,
    };
    Some((item, true))
}
