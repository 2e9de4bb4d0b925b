//! # Payloads
//!
//! Request bodies accepted by the featured-category routes.
//!
//! ## Reorder
//!
//! The admin UI has sent several shapes over time, all accepted:
//!
//! - `["id1", "id2"]`, order implied by the array
//! - `{ "updates": [...] }` or `{ "items": [...] }`
//! - elements as `{ "_id" | "id", "index" | "order" }`, hints optional
//!
//! Normalization runs in a fixed order: drop unusable elements, dedupe by id keeping the
//! first, fall back to the position in that deduplicated sequence when there is no hint,
//! stable sort by hint, then renumber `1..=K`. Only the relative order of hints matters.
//!
//! A hint of `0` counts as no hint, so the element falls back to its sequence position.
//! Older admin builds sorted an explicit `0` ahead of everything else; here
//! `[{ "_id": "x", "index": 1 }, { "_id": "y", "index": 0 }]` keeps x first.
use std::collections::HashSet;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::AppError;

#[derive(Deserialize)]
pub struct AddRequest {
    #[serde(default, rename = "categoryId")]
    pub category_id: Option<String>,
}

#[derive(Deserialize)]
pub struct RepositionRequest {
    #[serde(default)]
    pub index: Value,
}

impl RepositionRequest {
    /// Numbers and numeric strings are accepted.
    pub fn desired(&self) -> Result<f64, AppError> {
        let parsed = match &self.index {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };

        parsed
            .filter(|index| index.is_finite())
            .ok_or(AppError::InvalidInput("Invalid index value"))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum ReorderPayload {
    List(Vec<RawUpdate>),
    Updates { updates: Vec<RawUpdate> },
    Items { items: Vec<RawUpdate> },
    Unrecognized(Value),
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum RawUpdate {
    Id(String),
    Object(Map<String, Value>),
    Ignored(Value),
}

struct Hinted {
    id: String,
    hint: Option<f64>,
}

impl RawUpdate {
    fn hinted(self) -> Option<Hinted> {
        match self {
            RawUpdate::Id(id) if !id.is_empty() => Some(Hinted { id, hint: None }),
            RawUpdate::Object(object) => {
                let id = ["_id", "id"]
                    .into_iter()
                    .filter_map(|key| object.get(key).and_then(Value::as_str))
                    .find(|id| !id.is_empty())?
                    .to_string();

                // Zero is absent, positions start at 1 (see module docs)
                let hint = ["index", "order"]
                    .into_iter()
                    .filter_map(|key| object.get(key).and_then(Value::as_f64))
                    .find(|hint| *hint != 0.0);

                Some(Hinted { id, hint })
            }
            RawUpdate::Ignored(other) => {
                debug!("Skipping reorder element {other}");
                None
            }
            RawUpdate::Id(_) => None,
        }
    }
}

impl ReorderPayload {
    pub fn into_updates(self) -> Vec<RawUpdate> {
        match self {
            ReorderPayload::List(updates)
            | ReorderPayload::Updates { updates }
            | ReorderPayload::Items { items: updates } => updates,
            ReorderPayload::Unrecognized(other) => {
                debug!("Unrecognized reorder payload {other}");
                Vec::new()
            }
        }
    }
}

pub fn normalize_updates(raw: Vec<RawUpdate>) -> Vec<(String, u32)> {
    let mut seen = HashSet::new();

    let mut ranked: Vec<(String, f64)> = raw
        .into_iter()
        .filter_map(RawUpdate::hinted)
        .filter(|update| seen.insert(update.id.clone()))
        .enumerate()
        .map(|(position, update)| (update.id, update.hint.unwrap_or(position as f64)))
        .collect();

    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    ranked
        .into_iter()
        .zip(1..)
        .map(|((id, _), order)| (id, order))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn normalize(value: Value) -> Vec<(String, u32)> {
        let payload: ReorderPayload = serde_json::from_value(value).unwrap();
        normalize_updates(payload.into_updates())
    }

    fn ids(updates: &[(String, u32)]) -> Vec<(&str, u32)> {
        updates.iter().map(|(id, order)| (id.as_str(), *order)).collect()
    }

    #[test]
    fn test_bare_ids_follow_input_order() {
        let updates = normalize(json!(["b", "a", { "_id": "c", "index": 0 }]));
        assert_eq!(ids(&updates), vec![("b", 1), ("a", 2), ("c", 3)]);
    }

    #[test]
    fn test_zero_hint_uses_sequence_position() {
        let updates = normalize(json!([
            { "_id": "x", "index": 1 },
            { "_id": "y", "index": 0 }
        ]));
        assert_eq!(ids(&updates), vec![("x", 1), ("y", 2)]);
    }

    #[test]
    fn test_explicit_hints() {
        let updates = normalize(json!({
            "updates": [
                { "id": "x", "order": 30 },
                { "_id": "y", "index": 10 },
                { "_id": "z", "index": 20 }
            ]
        }));
        assert_eq!(ids(&updates), vec![("y", 1), ("z", 2), ("x", 3)]);
    }

    #[test]
    fn test_duplicates_keep_first() {
        let updates = normalize(json!({
            "items": [
                { "_id": "a", "index": 5 },
                { "_id": "b", "index": 1 },
                { "_id": "a", "index": 0.5 }
            ]
        }));
        assert_eq!(ids(&updates), vec![("b", 1), ("a", 2)]);
    }

    #[test]
    fn test_index_wins_over_order() {
        let updates = normalize(json!([
            { "_id": "a", "index": 9, "order": 1 },
            { "_id": "b", "index": "2", "order": 3 }
        ]));
        assert_eq!(ids(&updates), vec![("b", 1), ("a", 2)]);
    }

    #[test]
    fn test_unusable_elements_dropped() {
        let updates = normalize(json!([42, null, { "index": 1 }, "", "kept"]));
        assert_eq!(ids(&updates), vec![("kept", 1)]);
    }

    #[test]
    fn test_unrecognized_shapes_are_empty() {
        assert!(normalize(json!({ "other": [] })).is_empty());
        assert!(normalize(json!("a")).is_empty());
        assert!(normalize(json!([])).is_empty());
    }

    #[test]
    fn test_desired_index() {
        let desired = |value: Value| RepositionRequest { index: value }.desired();

        assert_eq!(desired(json!(3)).unwrap(), 3.0);
        assert_eq!(desired(json!(" 2.5 ")).unwrap(), 2.5);
        assert!(desired(json!("abc")).is_err());
        assert!(desired(Value::Null).is_err());
        assert!(desired(json!("NaN")).is_err());
    }
}
