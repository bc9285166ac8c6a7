//! Enumerated-choice fields

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::{Check, Field};
use crate::error::Result;
use crate::value::{self, Values};

/// Longest generated option list appended to a description
const DESCRIBE_LIMIT: usize = 255;

pub type OptionsCallback = Arc<dyn Fn(&Values) -> Choices + Send + Sync>;

/// The accepted values of a choice field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choices {
    /// Positional list: the values themselves are accepted
    List(Vec<String>),
    /// Keyed labels: keys are accepted, labels are shown
    Map(Vec<(String, String)>),
}

impl Choices {
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Choices::List(items.into_iter().map(Into::into).collect())
    }

    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Choices::Map(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Build from a JSON list or object
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(Choices::List(items.iter().map(value::display).collect())),
            Value::Object(map) => Some(Choices::Map(
                map.iter().map(|(k, v)| (k.clone(), value::display(v))).collect(),
            )),
            _ => None,
        }
    }

    /// Accepted values
    pub fn valid_values(&self) -> Vec<String> {
        match self {
            Choices::List(items) => items.clone(),
            Choices::Map(entries) => entries.iter().map(|(k, _)| k.clone()).collect(),
        }
    }

    /// Labels in display order
    fn labels(&self) -> Vec<&str> {
        match self {
            Choices::List(items) => items.iter().map(String::as_str).collect(),
            Choices::Map(entries) => entries.iter().map(|(_, v)| v.as_str()).collect(),
        }
    }
}

impl Default for Choices {
    fn default() -> Self {
        Choices::List(Vec::new())
    }
}

/// Configuration of a choice field
#[derive(Clone)]
pub struct OptionsConfig {
    pub choices: Choices,
    /// Ask with a numbered menu rather than free text
    pub as_choice: bool,
    /// Accept values outside the choices
    pub allow_other: bool,
    /// Append the accepted values to the description
    pub auto_describe: bool,
    /// Pick by position even when the choices are keyed
    pub choose_with_number: bool,
    options_callback: Option<OptionsCallback>,
}

impl From<Choices> for OptionsConfig {
    fn from(choices: Choices) -> Self {
        Self {
            choices,
            as_choice: true,
            allow_other: false,
            auto_describe: true,
            choose_with_number: false,
            options_callback: None,
        }
    }
}

impl OptionsConfig {
    pub fn new(choices: Choices) -> Self {
        choices.into()
    }

    pub fn as_choice(mut self, as_choice: bool) -> Self {
        self.as_choice = as_choice;
        self
    }

    pub fn allow_other(mut self, allow: bool) -> Self {
        self.allow_other = allow;
        self
    }

    pub fn auto_describe(mut self, describe: bool) -> Self {
        self.auto_describe = describe;
        self
    }

    pub fn choose_with_number(mut self, by_number: bool) -> Self {
        self.choose_with_number = by_number;
        self
    }

    /// Recompute the choices from previously resolved values
    pub fn options_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Values) -> Choices + Send + Sync + 'static,
    {
        self.options_callback = Some(Arc::new(callback));
        self
    }

    pub fn valid_values(&self) -> Vec<String> {
        self.choices.valid_values()
    }

    fn is_positional(&self) -> bool {
        matches!(self.choices, Choices::List(_))
    }

    pub(super) fn refresh(&mut self, previous_values: &Values) {
        if let Some(callback) = &self.options_callback {
            self.choices = callback(previous_values);
        }
    }

    pub(super) fn check(&self, value: &Value) -> Check {
        if self.allow_other {
            return Check::Pass;
        }
        let valid = self.valid_values();
        if value.as_str().is_some_and(|v| valid.iter().any(|o| o == v)) {
            Check::Pass
        } else {
            Check::Message(format!(
                "{} is not one of: {}",
                value::display(value),
                valid.join(", ")
            ))
        }
    }

    pub(super) fn describe(&self, mut description: String) -> String {
        let valid = self.valid_values();
        if valid.is_empty() || !self.auto_describe {
            return description;
        }
        let separator = if valid.len() == 2 { "' or '" } else { "', '" };
        let listed = format!("'{}'", valid.join(separator));
        if listed.len() < DESCRIBE_LIMIT {
            description.push_str(" (");
            if self.allow_other {
                description.push_str("e.g. ");
            }
            description.push_str(&listed);
            description.push(')');
        }
        description
    }

    /// Keys shown in the menu, paired with labels
    fn menu(&self) -> Vec<(String, &str)> {
        match &self.choices {
            Choices::Map(entries) if !self.choose_with_number => entries
                .iter()
                .map(|(k, v)| (k.clone(), v.as_str()))
                .collect(),
            choices => choices
                .labels()
                .into_iter()
                .enumerate()
                .map(|(i, label)| (i.to_string(), label))
                .collect(),
        }
    }

    pub(super) fn choice_text(&self, field: &Field) -> String {
        let mut text = field.question_header(true);
        for (key, label) in self.menu() {
            text.push_str(&format!("\n  [{key}] {label}"));
        }
        text.push('\n');
        if self.is_positional() || self.choose_with_number {
            text.push_str("Enter a number to choose: ");
        } else {
            text.push_str(&field.prompt);
        }
        text
    }

    pub(super) fn completion_hints(&self) -> Vec<String> {
        if self.is_positional() {
            Vec::new()
        } else {
            self.valid_values()
        }
    }

    /// Map a menu answer to the accepted value
    pub(super) fn choose(&self, field: &Field, answer: Value) -> Result<Value> {
        if field.is_empty(&answer) {
            if !field.is_required() {
                return Ok(Value::Null);
            }
            return match field.get_default() {
                Some(default) => Ok(default.clone()),
                None => Err(field.missing(format!("'{}' is required", field.name))),
            };
        }

        let mut input = value::display(&answer);
        if self.choose_with_number {
            let labels = self.choices.labels();
            if let Some(label) = input.parse::<usize>().ok().and_then(|i| labels.get(i)) {
                input = label.to_string();
            }
        }

        let chosen = match &self.choices {
            Choices::List(items) => input
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i))
                .cloned()
                .unwrap_or(input),
            Choices::Map(entries) => {
                if entries.iter().any(|(k, _)| *k == input) {
                    input
                } else {
                    entries
                        .iter()
                        .find(|(_, v)| *v == input)
                        .map(|(k, _)| k.clone())
                        .unwrap_or(input)
                }
            }
        };

        let chosen = Value::String(chosen);
        field.validate(&chosen, false)?;
        Ok(chosen)
    }
}

/// Whether a resolved choice satisfies a literal condition; a list means "any of"
pub(super) fn matches(user_value: &Value, expected: &Value) -> bool {
    match expected {
        Value::Array(allowed) => allowed.contains(user_value),
        other => user_value == other,
    }
}

impl fmt::Debug for OptionsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsConfig")
            .field("choices", &self.choices)
            .field("as_choice", &self.as_choice)
            .field("allow_other", &self.allow_other)
            .field("auto_describe", &self.auto_describe)
            .field("choose_with_number", &self.choose_with_number)
            .field("options_callback", &self.options_callback.is_some())
            .finish()
    }
}
