//! List fields

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::Field;
use crate::value;

static COMMA_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,\s]+").unwrap());
static COMMA_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,\r\n]+").unwrap());
static NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").unwrap());

/// Delimiter used to split a string into list items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitPattern {
    /// Commas and any whitespace
    #[default]
    CommaWhitespace,
    /// Commas and line breaks, so items may contain spaces
    CommaNewline,
    /// Line breaks only
    Newline,
}

impl SplitPattern {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "comma_whitespace" => Some(SplitPattern::CommaWhitespace),
            "comma_newline" => Some(SplitPattern::CommaNewline),
            "newline" => Some(SplitPattern::Newline),
            _ => None,
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            SplitPattern::CommaWhitespace => &COMMA_WHITESPACE,
            SplitPattern::CommaNewline => &COMMA_NEWLINE,
            SplitPattern::Newline => &NEWLINE,
        }
    }

    fn is_comma_separated(self) -> bool {
        self != SplitPattern::Newline
    }

    /// Split a string, dropping empty items
    pub fn split(self, text: &str) -> Vec<Value> {
        self.regex()
            .split(text)
            .filter(|item| !item.is_empty())
            .map(|item| Value::String(item.to_string()))
            .collect()
    }

    /// Turn a string or a repeated flag into a list
    ///
    /// A single-item list is unpacked first: it is usually one flag holding
    /// a delimited string.
    pub(super) fn normalize(self, value: Value) -> Value {
        let value = match value {
            Value::Array(mut items) if items.len() == 1 => items.remove(0),
            other => other,
        };
        match value {
            Value::String(text) => Value::Array(self.split(&text)),
            Value::Array(items) => Value::Array(items),
            Value::Null => Value::Null,
            scalar => Value::Array(vec![scalar]),
        }
    }

    pub(super) fn question_text(self, field: &Field) -> String {
        let mut text = field.question_header(false);
        if let Some(default) = field.get_default().filter(|d| !value::is_blank(d)) {
            text.push_str(&format!("\nDefault: {}", join(default)));
        }
        if self.is_comma_separated() {
            text.push_str("\nEnter comma-separated values");
            if !field.is_required() {
                text.push_str(" (or leave this blank)");
            }
        }
        text.push('\n');
        text.push_str(&field.prompt);
        text
    }
}

/// Join list items for display
pub(super) fn join(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(value::display)
            .collect::<Vec<_>>()
            .join(", "),
        other => value::display(other),
    }
}

fn items(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        scalar => vec![scalar],
    }
}

/// Every item of `user_value` appears in `expected`
pub(super) fn contained_in(user_value: &Value, expected: &Value) -> bool {
    let allowed = items(expected);
    items(user_value).iter().all(|item| allowed.contains(item))
}
