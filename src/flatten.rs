//! One-to-one flattening of nested JSON objects into `_`-joined columns.
//!
//! Objects are walked recursively; lists are leaves and stay list-valued so the entity builders
//! can explode them later. Leading underscores on a key segment are dropped, so `__twarc.url`
//! becomes `twarc_url`.

use crate::fields::{POST_ID, REFERENCE_LEVEL};
use crate::table::Row;
use serde_json::{Map, Value};

/// Flatten `value` into `out` under `prefix`. An empty prefix places object keys at top level.
pub fn flatten_into(prefix: &str, value: Value, out: &mut Row) {
    match value {
        Value::Object(obj) => {
            for (key, v) in obj {
                let seg = key.trim_start_matches('_');
                let name = if prefix.is_empty() { seg.to_string() } else { format!("{prefix}_{seg}") };
                flatten_into(&name, v, out);
            }
        }
        leaf => {
            out.insert(prefix.to_string(), leaf);
        }
    }
}

pub fn flatten_object(obj: Map<String, Value>) -> Row {
    let mut out = Row::new();
    flatten_into("", Value::Object(obj), &mut out);
    out
}

/// Move a flattened record's own `id` to `post_id`.
pub fn rename_id(row: &mut Row) {
    if let Some(id) = row.remove("id") {
        row.insert(POST_ID.to_string(), id);
    }
}

/// Normalize one API record into a level-0 post row. Non-object records yield `None`.
pub fn flatten_record(record: Value) -> Option<Row> {
    let Value::Object(obj) = record else { return None };
    let mut row = flatten_object(obj);
    rename_id(&mut row);
    row.insert(REFERENCE_LEVEL.to_string(), Value::String("0".to_string()));
    Some(row)
}
