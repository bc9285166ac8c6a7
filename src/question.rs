//! Interactive question description
//!
//! A [`Question`] is what a field hands to a [`PromptAsker`](crate::PromptAsker):
//! the text to show, the default used for an empty answer, how many attempts
//! are allowed and the validator that turns an answer into a value.

use std::fmt;

use serde_json::Value;

use crate::error::{FieldRef, Result};

type AnswerValidator<'a> = Box<dyn Fn(Value) -> Result<Value> + 'a>;

/// A question generated from a field
pub struct Question<'a> {
    /// Full prompt text (header, hints and prompt marker)
    pub text: String,
    /// Value used when the user enters nothing
    pub default: Option<Value>,
    /// Number of answers accepted before giving up
    pub max_attempts: u32,
    /// Completion hints
    pub autocomplete: Vec<String>,
    /// The field being asked for
    pub field: FieldRef,
    validator: AnswerValidator<'a>,
}

impl<'a> Question<'a> {
    pub(crate) fn new(
        text: String,
        field: FieldRef,
        validator: impl Fn(Value) -> Result<Value> + 'a,
    ) -> Self {
        Self {
            text,
            default: None,
            max_attempts: 1,
            autocomplete: Vec::new(),
            field,
            validator: Box::new(validator),
        }
    }

    pub(crate) fn with_default(mut self, default: Option<Value>) -> Self {
        self.default = default;
        self
    }

    pub(crate) fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub(crate) fn with_autocomplete(mut self, values: Vec<String>) -> Self {
        self.autocomplete = values;
        self
    }

    /// Turn a raw line into the answer value
    ///
    /// Surrounding whitespace is trimmed; a blank line falls back to the default.
    pub fn answer_from_line(&self, line: &str) -> Value {
        let line = line.trim();
        if line.is_empty() {
            self.default.clone().unwrap_or(Value::Null)
        } else {
            Value::String(line.to_string())
        }
    }

    /// Run the field's validator on an answer
    pub fn validate(&self, answer: Value) -> Result<Value> {
        (self.validator)(answer)
    }
}

impl fmt::Debug for Question<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("text", &self.text)
            .field("default", &self.default)
            .field("max_attempts", &self.max_attempts)
            .field("autocomplete", &self.autocomplete)
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}
