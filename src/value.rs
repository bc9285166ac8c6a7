//! Value helpers shared by fields and forms
//!
//! Field values are plain `serde_json::Value` trees. A resolved form is a
//! [`Values`] map, possibly nested when fields declare custom value keys.

use serde_json::{Map, Value};

/// Resolved form values (field key or value path → value)
pub type Values = Map<String, Value>;

/// Loose emptiness test used by the base field
///
/// `Null`, `false`, zero, `""` and empty containers are blank. Any non-empty
/// string is not, so `"0"` counts as a real answer.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Render a value for messages and prompts
///
/// Strings are shown verbatim, everything else as compact JSON.
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Write `value` under `path`, creating intermediate maps as needed.
///
/// An intermediate segment holding a non-map value is silently replaced by a
/// fresh map. An empty path writes nothing.
pub fn set_nested(values: &mut Values, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = values;
    for segment in parents {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(map) => map,
            _ => return,
        };
    }
    current.insert(last.clone(), value);
}
