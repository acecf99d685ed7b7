use serde_json::Value;
use taggable_core::{Condition, Document, Filter, TAGS_FIELD};

/// Evaluate `filter` against one document.
pub fn matches(document: &Document, filter: &Filter) -> bool {
    filter
        .conditions
        .iter()
        .all(|condition| condition_matches(document, condition))
}

pub fn condition_matches(document: &Document, condition: &Condition) -> bool {
    match condition {
        Condition::Eq { field, value } => match field_value(document, field) {
            // Array fields match when any element equals the value.
            Some(Value::Array(items)) => {
                items.contains(value) || matches!(value, Value::Array(expected) if *expected == items)
            }
            Some(found) => &found == value,
            None => value.is_null(),
        },
        Condition::ContainsAny { field, values } => {
            let items = field_items(document, field);
            values.iter().any(|v| items.contains(v))
        }
        Condition::ContainsAll { field, values } => {
            let items = field_items(document, field);
            values.iter().all(|v| items.contains(v))
        }
        Condition::Not { condition } => !condition_matches(document, condition),
        Condition::Nothing => false,
    }
}

fn field_value(document: &Document, field: &str) -> Option<Value> {
    if field == TAGS_FIELD {
        return Some(Value::Array(
            document.tags.iter().cloned().map(Value::String).collect(),
        ));
    }
    document.field(field)
}

/// Elements of an array field; a scalar counts as a one-element array.
fn field_items(document: &Document, field: &str) -> Vec<Value> {
    match field_value(document, field) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => Vec::new(),
        Some(scalar) => vec![scalar],
    }
}
