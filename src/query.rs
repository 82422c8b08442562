//! Free-text search over menu items
//!
//! Candidates arrive as loose JSON from the chat client: a record may carry
//! its name under `item` or `name`, may lack a description, or may hold
//! numbers where strings are expected. None of that is an error here.

use crate::error::MenuError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const MISSING_NAME: &str = "Menu Item";
const MISSING_DESCRIPTION: &str = "No Description";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub index: usize,
    pub item: String,
    pub description: String,
}

/// Body of a chat query
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub menu_items: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: Vec<QueryResult>,
}

impl ChatRequest {
    /// Both a non-empty query and an array of candidates are required
    pub fn validate(&self) -> Result<(&str, &[Value]), MenuError> {
        let query = self.query.as_deref().unwrap_or_default();
        let items = self.menu_items.as_ref().and_then(Value::as_array);

        match items {
            Some(items) if !query.is_empty() => Ok((query, items.as_slice())),
            _ => Err(MenuError::InvalidRequest(
                "Query and menu items are required and must be valid.".to_string(),
            )),
        }
    }
}

/// Match `query` against every candidate's name and description.
///
/// Results keep candidate order and are numbered from 1.
pub fn process_query(query: &str, candidates: &[Value]) -> Vec<QueryResult> {
    let needle = query.to_lowercase();

    candidates
        .iter()
        .filter_map(|candidate| {
            let name = candidate_name(candidate);
            let description = field_text(candidate, "description");

            let matches = name.to_lowercase().contains(&needle)
                || description.to_lowercase().contains(&needle);
            matches.then_some((name, description))
        })
        .zip(1..)
        .map(|((name, description), index)| QueryResult {
            index,
            item: or_placeholder(name, MISSING_NAME),
            description: or_placeholder(description, MISSING_DESCRIPTION),
        })
        .collect()
}

fn candidate_name(candidate: &Value) -> String {
    let name = field_text(candidate, "item");
    if name.is_empty() {
        field_text(candidate, "name")
    } else {
        name
    }
}

/// Coerce a field to text; absent, null and structured values become ""
fn field_text(candidate: &Value, key: &str) -> String {
    match candidate.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn or_placeholder(value: String, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}
