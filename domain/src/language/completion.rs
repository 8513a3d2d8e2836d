//! Completion results and their mapping to editor suggestions.

use serde::Deserialize;
use serde_json::Value;

/// A completion item as returned by the language server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    pub label: String,
    #[serde(default)]
    pub kind: Option<u32>,
    #[serde(default)]
    pub insert_text: Option<String>,
}

/// A suggestion in the shape the editing surface expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub label: String,
    pub kind: Option<u32>,
    pub insert_text: String,
}

impl From<CompletionItem> for Suggestion {
    fn from(item: CompletionItem) -> Self {
        let insert_text = item.insert_text.unwrap_or_else(|| item.label.clone());
        Self {
            label: item.label,
            kind: item.kind,
            insert_text,
        }
    }
}

/// Map a `textDocument/completion` result into suggestions.
///
/// Accepts a completion list (`{ "items": [...] }`) or a bare item array.
/// Items that do not parse are skipped; anything else yields no suggestions.
pub fn suggestions_from_result(result: Option<&Value>) -> Vec<Suggestion> {
    let items = match result {
        Some(Value::Array(items)) => items,
        Some(Value::Object(map)) => match map.get("items") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(|item| serde_json::from_value::<CompletionItem>(item.clone()).ok())
        .map(Suggestion::from)
        .collect()
}
