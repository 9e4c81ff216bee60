use chrono::Utc;
use serde_json::{Map, Value};

use crate::models::test::TestContent;
use crate::utils::id::random_suffix;

// Both the nested collection keys and their flat-shape counterparts.
const COLLECTION_PREFIXES: &[(&str, &str)] = &[
    ("sections", "section"),
    ("questions", "question"),
    ("tasks", "task"),
    ("parts", "part"),
    ("readingSections", "section"),
    ("listeningSections", "section"),
    ("writingTasks", "task"),
    ("speakingParts", "part"),
];

const INTERNAL_ID_FIELD: &str = "_id";
const SUFFIX_LENGTH: usize = 9;

/// Returns a copy of `content` in which every entity held in a recognized
/// collection (`sections`, `questions`, `tasks`, `parts`, at any depth)
/// carries a stable string `id`, and the database-internal `_id` field is
/// stripped. Ids already present are preserved, so repeated passes are
/// no-ops.
pub fn assign_ids(content: &Value) -> Value {
    let mut out = content.clone();
    walk(&mut out);
    out
}

/// Typed wrapper over [`assign_ids`] for the service write path.
pub fn assign_content_ids(content: &TestContent) -> TestContent {
    let value = serde_json::to_value(content).unwrap_or(Value::Null);
    serde_json::from_value(assign_ids(&value)).unwrap_or_default()
}

pub fn generate_entity_id(prefix: &str) -> String {
    format!(
        "{}-{}-{}",
        prefix,
        Utc::now().timestamp_millis(),
        random_suffix(SUFFIX_LENGTH)
    )
}

fn walk(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                let prefix = collection_prefix(key);
                match (prefix, child) {
                    (Some(prefix), Value::Array(items)) => {
                        for item in items.iter_mut() {
                            if let Value::Object(entity) = item {
                                ensure_entity_id(entity, prefix);
                            }
                            walk(item);
                        }
                    }
                    (_, other) => walk(other),
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                walk(item);
            }
        }
        _ => {}
    }
}

fn ensure_entity_id(entity: &mut Map<String, Value>, prefix: &str) {
    let internal = entity.remove(INTERNAL_ID_FIELD);

    let has_id = match entity.get("id") {
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(_)) => true,
        _ => false,
    };
    if has_id {
        return;
    }

    let id = internal
        .as_ref()
        .and_then(internal_id_string)
        .unwrap_or_else(|| generate_entity_id(prefix));
    entity.insert("id".to_string(), Value::String(id));
}

fn internal_id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        // Mongo extended-JSON export shape.
        Value::Object(map) => map.get("$oid").and_then(Value::as_str).map(str::to_owned),
        _ => None,
    }
}

fn collection_prefix(key: &str) -> Option<&'static str> {
    COLLECTION_PREFIXES
        .iter()
        .find(|(collection, _)| *collection == key)
        .map(|(_, prefix)| *prefix)
}
