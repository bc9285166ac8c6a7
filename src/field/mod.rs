//! Form fields
//!
//! A [`Field`] is one named input slot: it knows how to normalize and validate
//! a raw value, when it counts as empty or required, which default applies,
//! whether a dependency condition matches and how to describe itself as a flag
//! and as an interactive question.
//!
//! Variant behaviour (booleans, lists, choices, files, validated strings) is
//! selected by [`FieldKind`]; the shared behaviour is the fallback arm of each
//! dispatching method.

mod array;
mod boolean;
mod config;
mod file;
mod options;
mod pattern;

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub use array::SplitPattern;
pub use file::FileConfig;
pub use options::{Choices, OptionsConfig};

use crate::context::Mode;
use crate::error::{FieldRef, FormError, Result};
use crate::input::{Arity, InputSource, OptionSpec};
use crate::question::Question;
use crate::value::{self, Values};

/// Characters not allowed in a derived option name
static OPTION_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9-]+").unwrap());

/// Outcome of a validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Pass,
    /// Failure with a generated message naming the flag or field
    Fail,
    /// Failure with a custom message
    Message(String),
}

impl From<bool> for Check {
    fn from(ok: bool) -> Self {
        if ok {
            Check::Pass
        } else {
            Check::Fail
        }
    }
}

impl From<std::result::Result<(), String>> for Check {
    fn from(result: std::result::Result<(), String>) -> Self {
        match result {
            Ok(()) => Check::Pass,
            Err(message) => Check::Message(message),
        }
    }
}

pub type Validator = Arc<dyn Fn(&Value) -> Check + Send + Sync>;
pub type Normalizer = Arc<dyn Fn(Value) -> Value + Send + Sync>;
pub type DefaultCallback = Arc<dyn Fn(&Values, Mode) -> Value + Send + Sync>;
pub type ConditionPredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Dependency rule on another field's resolved value
#[derive(Clone)]
pub enum Condition {
    /// The value must equal this (lists and choices widen this to membership)
    Equals(Value),
    Predicate(ConditionPredicate),
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Equals(value) => f.debug_tuple("Equals").field(value).finish(),
            Condition::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Variant of a field
#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    Boolean,
    Array(SplitPattern),
    Options(OptionsConfig),
    File(FileConfig),
    Email,
    Url,
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Boolean => "boolean",
            FieldKind::Array(_) => "array",
            FieldKind::Options(_) => "options",
            FieldKind::File(_) => "file",
            FieldKind::Email => "email",
            FieldKind::Url => "url",
        }
    }
}

/// One named input slot
#[derive(Clone)]
pub struct Field {
    name: String,
    kind: FieldKind,
    option_name: Option<String>,
    shortcut: Option<char>,
    description: String,
    question_line: Option<String>,
    autocomplete_values: Option<Vec<String>>,
    required: bool,
    default: Option<Value>,
    original_default: Option<Value>,
    default_is_explicit: bool,
    default_callback: Option<DefaultCallback>,
    prompt: String,
    required_marker: String,
    validators: Vec<Validator>,
    normalizers: Vec<Normalizer>,
    max_attempts: u32,
    conditions: Vec<(String, Condition)>,
    value_keys: Vec<String>,
    include_as_option: bool,
    avoid_question: bool,
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

impl Field {
    fn with_kind(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            option_name: None,
            shortcut: None,
            description: String::new(),
            question_line: None,
            autocomplete_values: None,
            required: true,
            default: None,
            original_default: None,
            default_is_explicit: false,
            default_callback: None,
            prompt: "> ".to_string(),
            required_marker: "* ".to_string(),
            validators: Vec::new(),
            normalizers: Vec::new(),
            max_attempts: 5,
            conditions: Vec::new(),
            value_keys: Vec::new(),
            include_as_option: true,
            avoid_question: false,
        }
    }

    /// Free-text field
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Text)
    }

    /// Yes/no field, defaulting to `true` unless a default or default callback is set
    pub fn boolean(name: impl Into<String>) -> Self {
        let mut field = Self::with_kind(name, FieldKind::Boolean);
        field.default = Some(Value::Bool(true));
        field.original_default = Some(Value::Bool(true));
        field.autocomplete_values = Some(
            ["true", "false", "yes", "no"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        field
    }

    /// Multi-valued field split on commas and whitespace
    pub fn array(name: impl Into<String>) -> Self {
        Self::array_split(name, SplitPattern::default())
    }

    /// Multi-valued field with a specific delimiter
    pub fn array_split(name: impl Into<String>, split: SplitPattern) -> Self {
        let mut field = Self::with_kind(name, FieldKind::Array(split));
        field.default = Some(Value::Array(Vec::new()));
        field
    }

    /// Enumerated-choice field
    pub fn options(name: impl Into<String>, config: impl Into<OptionsConfig>) -> Self {
        Self::with_kind(name, FieldKind::Options(config.into()))
    }

    /// File path field
    pub fn file(name: impl Into<String>, config: FileConfig) -> Self {
        Self::with_kind(name, FieldKind::File(config))
    }

    /// Email address field
    pub fn email(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Email)
    }

    /// URL field; the URL must have a host
    pub fn url(name: impl Into<String>) -> Self {
        Self::with_kind(name, FieldKind::Url)
    }

    // ------------------------------------------------------------------
    // Builder methods
    // ------------------------------------------------------------------

    pub fn option_name(mut self, option_name: impl Into<String>) -> Self {
        self.option_name = Some(option_name.into());
        self
    }

    pub fn shortcut(mut self, shortcut: char) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Line shown under the name in a question; `""` hides the description
    pub fn question_line(mut self, line: impl Into<String>) -> Self {
        self.question_line = Some(line.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Static default; also remembered as the original default
    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.set_default(default.into());
        self
    }

    /// Default computed from the values resolved before this field
    pub fn default_callback<F>(self, callback: F) -> Self
    where
        F: Fn(&Values) -> Value + Send + Sync + 'static,
    {
        self.default_callback_with_mode(move |values, _| callback(values))
    }

    /// Like [`Field::default_callback`], also receiving the resolution mode
    pub fn default_callback_with_mode<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Values, Mode) -> Value + Send + Sync + 'static,
    {
        if matches!(self.kind, FieldKind::Boolean) && !self.default_is_explicit {
            self.default = None;
            self.original_default = None;
        }
        self.default_callback = Some(Arc::new(callback));
        self
    }

    /// Add a validator; it receives the normalized value
    pub fn validator<F, R>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Check>,
    {
        self.validators
            .push(Arc::new(move |v: &Value| -> Check { validator(v).into() }));
        self
    }

    /// Add a normalizer; normalizers run in the order they were added
    pub fn normalizer<F>(mut self, normalizer: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.normalizers.push(Arc::new(normalizer));
        self
    }

    /// Only include this field when `dependency` resolved to `value`
    pub fn condition(mut self, dependency: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions
            .push((dependency.into(), Condition::Equals(value.into())));
        self
    }

    /// Only include this field when `predicate` accepts the value of `dependency`
    pub fn condition_fn<F>(mut self, dependency: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.conditions
            .push((dependency.into(), Condition::Predicate(Arc::new(predicate))));
        self
    }

    /// Path under which the value is returned, e.g. `["foo", "bar"]`
    pub fn value_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn include_as_option(mut self, include: bool) -> Self {
        self.include_as_option = include;
        self
    }

    /// Only ask when the field is required and has no default
    pub fn avoid_question(mut self, avoid: bool) -> Self {
        self.avoid_question = avoid;
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn required_marker(mut self, marker: impl Into<String>) -> Self {
        self.required_marker = marker.into();
        self
    }

    pub fn autocomplete_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.autocomplete_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    fn set_default(&mut self, default: Value) {
        let default = (!default.is_null()).then_some(default);
        self.default = default.clone();
        self.original_default = default;
        self.default_is_explicit = true;
    }
}

// ============================================================================
// ACCESSORS
// ============================================================================

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Command-line option name: explicit, or a slug of the field name
    pub fn get_option_name(&self) -> String {
        match &self.option_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => OPTION_NAME_PATTERN
                .replace_all(&self.name.to_lowercase(), "-")
                .into_owned(),
        }
    }

    pub fn get_shortcut(&self) -> Option<char> {
        self.shortcut
    }

    pub fn is_option(&self) -> bool {
        self.include_as_option
    }

    pub fn get_value_keys(&self) -> &[String] {
        &self.value_keys
    }

    pub fn get_conditions(&self) -> &[(String, Condition)] {
        &self.conditions
    }

    /// Current default (possibly recomputed by the default callback)
    pub fn get_default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Default as configured, unaffected by the default callback
    pub fn get_original_default(&self) -> Option<&Value> {
        self.original_default.as_ref()
    }

    pub fn get_max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Reference used in errors
    pub fn to_ref(&self) -> FieldRef {
        FieldRef {
            name: self.name.clone(),
            option_name: self.get_option_name(),
        }
    }

    /// Whether the user must end up with a value
    pub fn is_required(&self) -> bool {
        match &self.kind {
            FieldKind::Array(_) => {
                self.required && self.default.as_ref().map_or(true, value::is_blank)
            }
            _ => self.required,
        }
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn is_empty(&self, value: &Value) -> bool {
        match &self.kind {
            FieldKind::Boolean if *value == Value::Bool(false) => false,
            FieldKind::Array(_) if value.as_str() == Some("0") => true,
            _ => value::is_blank(value),
        }
    }

    pub fn should_ask_as_question(&self) -> bool {
        if self.avoid_question {
            return self.is_required() && !self.has_default();
        }
        true
    }

    pub(crate) fn invalid(&self, message: impl Into<String>) -> FormError {
        FormError::InvalidValue {
            message: message.into(),
            field: self.to_ref(),
        }
    }

    pub(crate) fn missing(&self, message: impl Into<String>) -> FormError {
        FormError::MissingValue {
            message: message.into(),
            field: self.to_ref(),
        }
    }
}

// ============================================================================
// VALUES
// ============================================================================

impl Field {
    /// Canonicalize raw input; `Null` passes through untouched
    pub fn normalize(&self, value: &Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let value = match &self.kind {
            FieldKind::Boolean => return boolean::normalize(self, value),
            FieldKind::Array(split) => split.normalize(value.clone()),
            _ => value.clone(),
        };
        Ok(self.normalizers.iter().fold(value, |v, normalize| normalize(v)))
    }

    /// Validate a raw value; `from_option` picks the flag-oriented message
    pub fn validate(&self, value: &Value, from_option: bool) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }

        let normalized = self.normalize(value)?;
        let checks = self
            .validators
            .iter()
            .map(|validator| validator(&normalized))
            .chain(std::iter::once_with(|| self.kind_check(&normalized)));

        for check in checks {
            match check {
                Check::Pass => {}
                Check::Message(message) => return Err(self.invalid(message)),
                Check::Fail => {
                    let message = if from_option {
                        format!(
                            "Invalid value for --{}: {}",
                            self.get_option_name(),
                            value::display(value)
                        )
                    } else {
                        format!("Invalid value for '{}': {}", self.name, value::display(value))
                    };
                    return Err(self.invalid(message));
                }
            }
        }
        Ok(())
    }

    fn kind_check(&self, normalized: &Value) -> Check {
        match &self.kind {
            FieldKind::Options(config) => config.check(normalized),
            FieldKind::File(config) => config.check(normalized),
            FieldKind::Email => pattern::check_email(normalized),
            FieldKind::Url => pattern::check_url(normalized),
            FieldKind::Text | FieldKind::Boolean | FieldKind::Array(_) => Check::Pass,
        }
    }

    /// The user's value if it is present, or the default otherwise
    ///
    /// A list answer equal to the default is the accepted default and is
    /// stored as is, not split again.
    pub fn final_value(&self, user_value: &Value) -> Result<Value> {
        let accepted_default =
            matches!(self.kind, FieldKind::Array(_)) && self.default.as_ref() == Some(user_value);
        let value = if accepted_default || self.is_empty(user_value) {
            self.default.clone().unwrap_or(Value::Null)
        } else {
            self.normalize(user_value)?
        };

        match &self.kind {
            FieldKind::File(config) if config.contents_as_value && !value::is_blank(&value) => {
                file::read_contents(self, &value)
            }
            _ => Ok(value),
        }
    }

    /// Read this field's flag from the input
    ///
    /// Returns `None` when the flag is unknown or empty, or when it was not
    /// supplied by the user and still holds the original default.
    pub fn value_from_input(&self, input: &dyn InputSource, normalize: bool) -> Result<Option<Value>> {
        let option_name = self.get_option_name();
        if !input.has_option(&option_name) {
            return Ok(None);
        }
        let Some(value) = input.option_value(&option_name) else {
            return Ok(None);
        };
        if self.is_empty(&value) {
            return Ok(None);
        }
        if !input.is_explicit(&option_name) && self.original_default.as_ref() == Some(&value) {
            return Ok(None);
        }

        if normalize {
            self.normalize(&value).map(Some)
        } else {
            Ok(Some(value))
        }
    }

    /// Whether a resolved value of this field satisfies a condition
    pub fn matches_condition(&self, user_value: &Value, condition: &Condition) -> bool {
        match condition {
            Condition::Predicate(predicate) => predicate(user_value),
            Condition::Equals(expected) => match &self.kind {
                FieldKind::Array(_) => array::contained_in(user_value, expected),
                FieldKind::Options(_) => options::matches(user_value, expected),
                _ => user_value == expected,
            },
        }
    }

    /// Recompute dynamic state from the values resolved so far
    pub fn on_change(&mut self, previous_values: &Values, mode: Mode) {
        if let Some(callback) = &self.default_callback {
            let default = callback(previous_values, mode);
            self.default = (!default.is_null()).then_some(default);
        }
        if let FieldKind::Options(config) = &mut self.kind {
            config.refresh(previous_values);
        }
    }
}

// ============================================================================
// DESCRIPTIONS
// ============================================================================

impl Field {
    /// Description used for the flag and under the question header
    pub fn get_description(&self) -> String {
        let base = if self.description.is_empty() {
            self.name.clone()
        } else {
            self.description.clone()
        };
        match &self.kind {
            FieldKind::Options(config) => config.describe(base),
            _ => base,
        }
    }

    /// Flag declaration for an option registry
    pub fn option_spec(&self) -> OptionSpec {
        let arity = match &self.kind {
            FieldKind::Boolean => Arity::Flag,
            FieldKind::Array(_) => Arity::Multiple,
            _ => Arity::Single,
        };
        OptionSpec {
            name: self.get_option_name(),
            shortcut: self.shortcut,
            arity,
            description: self.get_description(),
            default: self.default.clone(),
        }
    }

    /// Question header: marker, name, flag hint, description, default
    pub(crate) fn question_header(&self, include_default: bool) -> String {
        let mut header = String::new();
        if self.is_required() {
            header.push_str(&self.required_marker);
        }
        header.push_str(&self.name);
        if self.include_as_option {
            header.push_str(&format!(" (--{})", self.get_option_name()));
        }
        match &self.question_line {
            None if !self.description.is_empty() => {
                header.push('\n');
                header.push_str(&self.description);
            }
            Some(line) if !line.is_empty() => {
                header.push('\n');
                header.push_str(line);
            }
            _ => {}
        }
        if include_default {
            if let Some(default) = &self.default {
                header.push_str(&format!("\nDefault: {}", value::display(default)));
            }
        }
        header
    }

    /// Full text of the interactive question
    pub fn question_text(&self) -> String {
        match &self.kind {
            FieldKind::Boolean => boolean::question_text(self),
            FieldKind::Array(split) => split.question_text(self),
            FieldKind::Options(config) if config.as_choice => config.choice_text(self),
            _ => format!("{}\n{}", self.question_header(true), self.prompt),
        }
    }

    /// The question handed to a prompt asker
    pub fn question(&self) -> Question<'_> {
        let text = self.question_text();
        let question = match &self.kind {
            FieldKind::Options(config) if config.as_choice => {
                Question::new(text, self.to_ref(), move |answer| config.choose(self, answer))
                    .with_default(self.default.clone())
                    .with_autocomplete(config.completion_hints())
            }
            FieldKind::Options(config) => Question::new(text, self.to_ref(), move |answer| self.check_answer(answer))
                .with_default(self.default.clone())
                .with_autocomplete(config.valid_values()),
            FieldKind::Array(_) => {
                let default = self.default.clone().filter(|d| !value::is_blank(d));
                Question::new(text, self.to_ref(), move |answer| self.check_answer(answer))
                    .with_default(default)
                    .with_autocomplete(self.autocomplete_values.clone().unwrap_or_default())
            }
            _ => Question::new(text, self.to_ref(), move |answer| self.check_answer(answer))
                .with_default(self.default.clone())
                .with_autocomplete(self.autocomplete_values.clone().unwrap_or_default()),
        };
        question.with_max_attempts(self.max_attempts)
    }

    /// Validator for interactive answers
    fn check_answer(&self, answer: Value) -> Result<Value> {
        if self.is_empty(&answer) && self.is_required() {
            return Err(self.missing(format!("'{}' is required", self.name)));
        }
        self.validate(&answer, false)?;
        Ok(answer)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("option_name", &self.get_option_name())
            .field("required", &self.required)
            .field("default", &self.default)
            .field("conditions", &self.conditions)
            .field("value_keys", &self.value_keys)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{MemoryInput, OptionRegistry};
    use serde_json::json;

    fn input_for(field: &Field) -> MemoryInput {
        let mut input = MemoryInput::new();
        input.add_option(field.option_spec());
        input
    }

    // ========== Option names ==========

    #[test]
    fn option_name_derived_from_name() {
        assert_eq!(Field::new("Field with default").get_option_name(), "field-with-default");
        assert_eq!(Field::new("Region (EU/US)").get_option_name(), "region-eu-us-");
        assert_eq!(Field::new("already-ok").get_option_name(), "already-ok");
    }

    #[test]
    fn explicit_option_name() {
        assert_eq!(Field::new("Test field").option_name("test").get_option_name(), "test");
    }

    // ========== Emptiness & requiredness ==========

    #[test]
    fn null_is_empty_for_every_kind() {
        let fields = [
            Field::new("Text"),
            Field::boolean("Bool"),
            Field::array("List"),
            Field::options("Choice", Choices::list(["a"])),
            Field::file("File", FileConfig::default()),
            Field::email("Email"),
            Field::url("URL"),
        ];
        for field in &fields {
            assert!(field.is_empty(&Value::Null), "{} should treat null as empty", field.name());
        }
    }

    #[test]
    fn false_is_not_empty_for_boolean() {
        assert!(!Field::boolean("Bool").is_empty(&json!(false)));
        assert!(Field::new("Text").is_empty(&json!(false)));
    }

    #[test]
    fn zero_string_is_not_empty() {
        assert!(!Field::new("Text").is_empty(&json!("0")));
    }

    #[test]
    fn zero_string_is_empty_for_array() {
        let field = Field::array("List");
        assert!(field.is_empty(&json!("0")));
        assert!(!field.is_empty(&json!(["0"])));
    }

    #[test]
    fn accepted_list_default_is_not_split_again() {
        let field = Field::array_split("Cities", SplitPattern::CommaNewline)
            .default(json!(["New York", "Los Angeles"]));
        assert_eq!(
            field.question().answer_from_line(""),
            json!(["New York", "Los Angeles"])
        );
        assert_eq!(
            field.final_value(&json!(["New York", "Los Angeles"])).unwrap(),
            json!(["New York", "Los Angeles"])
        );
    }

    #[test]
    fn has_default_follows_configuration() {
        assert!(!Field::new("Text").has_default());
        assert!(Field::new("Text").default("x").has_default());
        assert!(!Field::new("Text").default(Value::Null).has_default());
        assert!(Field::boolean("Bool").has_default());
    }

    #[test]
    fn boolean_default_dropped_for_callback() {
        let field = Field::boolean("Bool").default_callback(|_| json!(false));
        assert!(!field.has_default());
        let field = Field::boolean("Bool").default(false).default_callback(|_| json!(true));
        assert_eq!(field.get_default(), Some(&json!(false)));
    }

    #[test]
    fn should_ask_with_avoid_question() {
        assert!(Field::new("A").should_ask_as_question());
        assert!(Field::new("A").avoid_question(true).should_ask_as_question());
        assert!(!Field::new("A").avoid_question(true).default("x").should_ask_as_question());
        assert!(!Field::new("A").avoid_question(true).required(false).should_ask_as_question());
    }

    // ========== Normalization & validation ==========

    #[test]
    fn normalizers_run_in_order() {
        let field = Field::new("Name")
            .normalizer(|v| json!(value::display(&v).trim().to_string()))
            .normalizer(|v| json!(value::display(&v).to_uppercase()));
        assert_eq!(field.normalize(&json!("  shout ")).unwrap(), json!("SHOUT"));
        assert_eq!(field.normalize(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn normalize_is_idempotent() {
        let fields = [
            Field::new("Text").normalizer(|v| json!(value::display(&v).to_lowercase())),
            Field::boolean("Bool"),
            Field::array("List"),
            Field::options("Choice", Choices::list(["a", "b"])),
            Field::email("Email"),
        ];
        let inputs = [json!("Yes"), json!("a, b ,c"), json!(["x"]), json!("b")];
        for field in &fields {
            for input in &inputs {
                let Ok(once) = field.normalize(input) else { continue };
                assert_eq!(field.normalize(&once).unwrap(), once, "{}", field.name());
            }
        }
    }

    #[test]
    fn validate_skips_null() {
        let field = Field::new("Strict").validator(|_| false);
        assert!(field.validate(&Value::Null, true).is_ok());
    }

    #[test]
    fn generic_failure_message_from_option() {
        let field = Field::new("Test field").option_name("test").validator(|v| v == "ok");
        let err = field.validate(&json!("bad"), true).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for --test: bad");
        assert!(matches!(err, FormError::InvalidValue { .. }));
    }

    #[test]
    fn generic_failure_message_interactive() {
        let field = Field::new("Test field").validator(|v| v == "ok");
        let err = field.validate(&json!("bad"), false).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for 'Test field': bad");
    }

    #[test]
    fn custom_failure_message() {
        let field = Field::new("Custom").validator(|v: &Value| {
            if v == "valid" {
                Ok(())
            } else {
                Err("Not valid".to_string())
            }
        });
        assert!(field.validate(&json!("valid"), true).is_ok());
        assert_eq!(field.validate(&json!("nope"), true).unwrap_err().to_string(), "Not valid");
    }

    #[test]
    fn validators_see_normalized_value() {
        let field = Field::new("Upper")
            .normalizer(|v| json!(value::display(&v).to_uppercase()))
            .validator(|v| v == "ABC");
        assert!(field.validate(&json!("abc"), true).is_ok());
    }

    // ========== Final values ==========

    #[test]
    fn final_value_prefers_user_value() {
        let field = Field::new("Name").default("fallback");
        assert_eq!(field.final_value(&json!("given")).unwrap(), json!("given"));
        assert_eq!(field.final_value(&json!("")).unwrap(), json!("fallback"));
        assert_eq!(field.final_value(&Value::Null).unwrap(), json!("fallback"));
    }

    #[test]
    fn final_value_without_default_is_null() {
        assert_eq!(Field::new("Name").final_value(&Value::Null).unwrap(), Value::Null);
    }

    // ========== Input ==========

    #[test]
    fn value_from_input_explicit() {
        let field = Field::new("Name");
        let input = input_for(&field).arg("name", "Alice");
        assert_eq!(field.value_from_input(&input, false).unwrap(), Some(json!("Alice")));
    }

    #[test]
    fn value_from_input_ignores_untouched_default() {
        let field = Field::new("Name").default("Bob");
        let input = input_for(&field);
        assert_eq!(field.value_from_input(&input, false).unwrap(), None);
    }

    #[test]
    fn value_from_input_keeps_explicit_default() {
        let field = Field::new("Name").default("Bob");
        let input = input_for(&field).arg("name", "Bob");
        assert_eq!(field.value_from_input(&input, false).unwrap(), Some(json!("Bob")));
    }

    #[test]
    fn value_from_input_accepts_preset_value() {
        let field = Field::new("Name").default("Bob");
        let mut input = input_for(&field);
        input.set_option("name", "Carol");
        assert_eq!(field.value_from_input(&input, false).unwrap(), Some(json!("Carol")));
    }

    #[test]
    fn value_from_input_unknown_flag() {
        let field = Field::new("Name");
        assert_eq!(field.value_from_input(&MemoryInput::new(), false).unwrap(), None);
    }

    #[test]
    fn value_from_input_normalizes_on_request() {
        let field = Field::boolean("Active");
        let input = input_for(&field).arg("active", "no");
        assert_eq!(field.value_from_input(&input, true).unwrap(), Some(json!(false)));
        assert_eq!(field.value_from_input(&input, false).unwrap(), Some(json!("no")));
    }

    // ========== Conditions & dynamic defaults ==========

    #[test]
    fn literal_and_predicate_conditions() {
        let field = Field::new("Dependency");
        assert!(field.matches_condition(&json!("X"), &Condition::Equals(json!("X"))));
        assert!(!field.matches_condition(&json!("Y"), &Condition::Equals(json!("X"))));

        let starts_with_x: ConditionPredicate =
            Arc::new(|v: &Value| value::display(v).starts_with('x'));
        assert!(field.matches_condition(&json!("xyz"), &Condition::Predicate(starts_with_x)));
    }

    #[test]
    fn on_change_recomputes_default() {
        let mut field = Field::new("Copy").default_callback(|values| {
            values.get("x").cloned().unwrap_or(Value::Null)
        });
        let mut values = Values::new();
        values.insert("x".into(), json!("from x"));
        field.on_change(&values, Mode::Full);
        assert_eq!(field.get_default(), Some(&json!("from x")));
        assert_eq!(field.get_original_default(), None);

        field.on_change(&Values::new(), Mode::Full);
        assert!(!field.has_default());
    }

    #[test]
    fn default_callback_sees_mode() {
        let mut field = Field::new("Mode").default_callback_with_mode(|_, mode| json!(mode.to_string()));
        field.on_change(&Values::new(), Mode::BeforeInteraction);
        assert_eq!(field.get_default(), Some(&json!("before-interaction")));
    }

    // ========== Descriptions & questions ==========

    #[test]
    fn question_text_order() {
        let field = Field::new("Region")
            .option_name("region")
            .description("Where to deploy")
            .default("eu");
        assert_eq!(
            field.question_text(),
            "* Region (--region)\nWhere to deploy\nDefault: eu\n> "
        );
    }

    #[test]
    fn question_line_overrides_description() {
        let field = Field::new("Region").description("Help text").question_line("Pick one");
        assert!(field.question_text().contains("\nPick one\n"));
        assert!(!field.question_text().contains("Help text"));

        let hidden = Field::new("Region").description("Help text").question_line("");
        assert_eq!(hidden.question_text(), "* Region (--region)\n> ");
    }

    #[test]
    fn question_for_form_only_field_has_no_flag_hint() {
        let field = Field::new("Secret").include_as_option(false).required(false);
        assert_eq!(field.question_text(), "Secret\n> ");
    }

    #[test]
    fn question_validator_reports_missing_value() {
        let field = Field::new("Test field");
        let question = field.question();
        let err = question.validate(Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "'Test field' is required");
        assert!(matches!(err, FormError::MissingValue { .. }));
    }

    #[test]
    fn option_spec_describes_flag() {
        let spec = Field::new("Name").shortcut('n').description("Your name").option_spec();
        assert_eq!(spec.name, "name");
        assert_eq!(spec.shortcut, Some('n'));
        assert_eq!(spec.arity, Arity::Single);
        assert_eq!(spec.description, "Your name");

        assert_eq!(Field::boolean("Flag").option_spec().arity, Arity::Flag);
        assert_eq!(Field::array("List").option_spec().arity, Arity::Multiple);
    }

    #[test]
    fn description_falls_back_to_name() {
        assert_eq!(Field::new("Plain").get_description(), "Plain");
    }
}
