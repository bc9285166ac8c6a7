//! Error types with fix suggestions

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::value::Values;

/// Result type for form operations
pub type Result<T> = std::result::Result<T, FormError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// Identifies the field an error is about, so callers can name the flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    /// Human-readable field name
    pub name: String,
    /// Command-line option name, without the leading `--`
    pub option_name: String,
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' (--{})", self.name, self.option_name)
    }
}

#[derive(Error, Debug)]
pub enum FormError {
    // ─────────────────────────────────────────────────────────────
    // Field-level errors
    // ─────────────────────────────────────────────────────────────
    #[error("{message}")]
    InvalidValue { message: String, field: FieldRef },

    #[error("{message}")]
    MissingValue { message: String, field: FieldRef },

    #[error("{message}")]
    ConditionalField {
        message: String,
        field: FieldRef,
        /// Values resolved before the offending field
        previous_values: Values,
    },

    #[error("Failed to read file: {}", path.display())]
    FileRead {
        path: PathBuf,
        field: FieldRef,
        #[source]
        source: std::io::Error,
    },

    #[error("Input closed while asking for {field}")]
    InputAborted { field: FieldRef },

    // ─────────────────────────────────────────────────────────────
    // Configuration errors
    // ─────────────────────────────────────────────────────────────
    #[error("{message} (field '{field}')")]
    Config { field: String, message: String },

    #[error("Invalid form definition: {message}")]
    Definition { message: String },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormError {
    /// The field this error is about, if it is a field-level error
    pub fn field(&self) -> Option<&FieldRef> {
        match self {
            FormError::InvalidValue { field, .. }
            | FormError::MissingValue { field, .. }
            | FormError::ConditionalField { field, .. }
            | FormError::FileRead { field, .. }
            | FormError::InputAborted { field } => Some(field),
            _ => None,
        }
    }
}

impl FixSuggestion for FormError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            FormError::InvalidValue { .. } => Some("Check the value against the field description"),
            FormError::MissingValue { .. } => {
                Some("Pass the flag, or run in an interactive terminal to be asked for it")
            }
            FormError::ConditionalField { .. } => {
                Some("Remove the flag, or change the field it depends on so it applies")
            }
            FormError::FileRead { .. } => Some("Check file path and permissions"),
            FormError::InputAborted { .. } => Some("Provide the value as a flag when input is not a terminal"),
            FormError::Config { .. } => Some("Check the field configuration keys and value types"),
            FormError::Definition { .. } => Some("Every field needs a unique key and a name"),
            FormError::Yaml(_) => Some("Check YAML syntax: indentation and quoting"),
            FormError::Json(_) => None,
            FormError::Io(_) => Some("Check file path and permissions"),
        }
    }
}
