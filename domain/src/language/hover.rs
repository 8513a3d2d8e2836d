//! Hover results.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverContent {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hover {
    pub contents: Vec<HoverContent>,
}

/// Normalize a `textDocument/hover` result.
///
/// `contents` may be a bare string, a single `{ value }` record
/// (`MarkupContent` / `MarkedString`) or a list of either. Returns `None`
/// when the result or its contents are absent.
pub fn hover_from_result(result: Option<&Value>) -> Option<Hover> {
    let contents = result?.get("contents")?;
    let entries: Vec<&Value> = match contents {
        Value::Null => return None,
        Value::Array(list) => list.iter().collect(),
        single => vec![single],
    };

    Some(Hover {
        contents: entries.into_iter().map(content_value).collect(),
    })
}

fn content_value(entry: &Value) -> HoverContent {
    let value = match entry {
        Value::String(s) => s.clone(),
        other => match other.get("value").and_then(Value::as_str) {
            Some(v) => v.to_string(),
            None => other.to_string(),
        },
    };
    HoverContent { value }
}
