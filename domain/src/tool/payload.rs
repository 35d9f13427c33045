//! Successful result shapes, one variant per tool category

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, Entry, EntrySummary, RemoteDocument, SearchMatch};

/// Payload of a successful invocation.
///
/// Serialized with a `kind` tag so transport consumers can tell the
/// shapes apart without probing for fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolPayload {
    /// A single catalog entry
    Entry(Entry),
    /// Entries, optionally filtered by category
    EntryList {
        #[serde(skip_serializing_if = "Option::is_none")]
        category: Option<Category>,
        entries: Vec<EntrySummary>,
    },
    /// Ranked matches for a free-text query
    SearchResults {
        query: String,
        matches: Vec<SearchMatch>,
    },
    /// Usage examples of one entry
    Examples { name: String, examples: Vec<String> },
    /// Document fetched from the remote docs API
    RemoteDocument(RemoteDocument),
}

impl ToolPayload {
    /// Tag value used in the serialized form
    pub fn kind(&self) -> &'static str {
        match self {
            ToolPayload::Entry(_) => "entry",
            ToolPayload::EntryList { .. } => "entry_list",
            ToolPayload::SearchResults { .. } => "search_results",
            ToolPayload::Examples { .. } => "examples",
            ToolPayload::RemoteDocument(_) => "remote_document",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_is_tagged() {
        let payload = ToolPayload::Examples {
            name: "retry".to_string(),
            examples: vec!["retry(3, op)".to_string()],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["kind"], payload.kind());
        assert_eq!(value["name"], "retry");
    }

    #[test]
    fn test_entry_list_omits_missing_category() {
        let payload = ToolPayload::EntryList {
            category: None,
            entries: Vec::new(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["kind"], "entry_list");
        assert!(value.get("category").is_none());
    }
}
