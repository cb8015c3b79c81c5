//! Input interpretation helpers for command handlers.

use percent_encoding::percent_decode_str;
use serde_json::Value;

use crate::domain::ProjectFiles;

/// Split pane entries on commas: `["a,b", "c"]` → `[["a", "b"], ["c"]]`.
pub fn file_to_panes<'a>(entries: impl IntoIterator<Item = &'a str>) -> Vec<Vec<String>> {
    entries
        .into_iter()
        .map(|entry| entry.split(',').map(str::to_string).collect::<Vec<_>>())
        .filter(|pane| !pane.is_empty())
        .collect()
}

/// Pane entries from a raw `path` payload value: a string or an array.
/// Non-string items are skipped.
pub fn panes_from_value(value: Option<&Value>) -> Vec<Vec<String>> {
    match value {
        Some(Value::String(path)) => file_to_panes([path.as_str()]),
        Some(Value::Array(items)) => file_to_panes(items.iter().filter_map(Value::as_str)),
        _ => Vec::new(),
    }
}

/// Keep only paths present in `files`, then drop panes left empty.
pub fn filter_panes(panes: Vec<Vec<String>>, files: &ProjectFiles) -> Vec<Vec<String>> {
    panes
        .into_iter()
        .map(|pane| {
            pane.into_iter()
                .filter(|path| files.contains_key(path))
                .collect::<Vec<_>>()
        })
        .filter(|pane| !pane.is_empty())
        .collect()
}

/// Normalize a preview path.
///
/// Percent-decodes, cuts at the first `#` or `?`, trims, and adds a leading
/// `/`. Returns an empty string for anything that is not a non-blank string.
pub fn clean_preview_path(input: Option<&Value>) -> String {
    let Some(raw) = input.and_then(Value::as_str) else {
        return String::new();
    };
    let decoded = percent_decode_str(raw).decode_utf8_lossy();
    let path = decoded
        .split(['#', '?'])
        .next()
        .unwrap_or_default()
        .trim();
    if path.is_empty() {
        String::new()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
