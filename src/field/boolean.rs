//! Yes/no fields

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::Field;
use crate::error::Result;
use crate::value;

static FALSY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(0|false|no|n)$").unwrap());
static TRUTHY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(1|true|yes|y)$").unwrap());

/// Parse a yes/no answer; configured normalizers do not apply
pub(super) fn normalize(field: &Field, value: &Value) -> Result<Value> {
    if let Value::Bool(b) = value {
        return Ok(Value::Bool(*b));
    }

    let text = value::display(value);
    if FALSY.is_match(&text) {
        Ok(Value::Bool(false))
    } else if TRUTHY.is_match(&text) {
        Ok(Value::Bool(true))
    } else {
        Err(field.invalid(format!(
            "Invalid value for '{}': {} (expected 1, 0, true, or false)",
            field.name, text
        )))
    }
}

pub(super) fn question_text(field: &Field) -> String {
    let header = field.question_header(false);
    let default = field
        .get_default()
        .is_some_and(|d| !value::is_blank(d));
    format!("{}? [default: {}] ", header.trim_end_matches('?'), default)
}
