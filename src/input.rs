//! Command-line collaborators
//!
//! [`OptionRegistry`] receives a form's flags at setup time and
//! [`InputSource`] answers questions about the parsed command line. Both are
//! traits so the resolution engine does not depend on one CLI framework;
//! [`MemoryInput`] implements both for programmatic use and tests, and
//! [`crate::cli`] adapts clap.

use std::collections::HashMap;

use serde_json::Value;

/// How many values a flag takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly one value (`--name value`)
    Single,
    /// Repeatable, each occurrence adds a value
    Multiple,
    /// Optional value; the bare flag means `true`
    Flag,
}

/// A flag declared by a field
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    pub name: String,
    pub shortcut: Option<char>,
    pub arity: Arity,
    pub description: String,
    pub default: Option<Value>,
}

/// Something flags can be registered with
pub trait OptionRegistry {
    fn add_option(&mut self, spec: OptionSpec);
}

impl OptionRegistry for Vec<OptionSpec> {
    fn add_option(&mut self, spec: OptionSpec) {
        self.push(spec);
    }
}

/// Parsed command-line input as seen by the resolution engine
pub trait InputSource {
    /// Whether a flag with this name is registered
    fn has_option(&self, name: &str) -> bool;

    /// The flag's current value, including a registered default
    fn option_value(&self, name: &str) -> Option<Value>;

    /// Whether the user supplied the flag (as opposed to it holding its default)
    fn is_explicit(&self, name: &str) -> bool;

    /// Whether questions may be asked
    fn is_interactive(&self) -> bool;
}

// ============================================================================
// IN-MEMORY INPUT
// ============================================================================

/// In-memory input: registered flags, user-supplied values and preset values
///
/// ```
/// use flagform::{Field, Form, MemoryInput};
///
/// let form = Form::new().with_field("name", Field::new("Name"));
/// let input = MemoryInput::for_form(&form).arg("name", "Alice");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryInput {
    options: HashMap<String, OptionSpec>,
    explicit: HashMap<String, Value>,
    preset: HashMap<String, Value>,
    interactive: bool,
}

impl MemoryInput {
    /// Create an empty, non-interactive input
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input with every flag of `form` registered
    pub fn for_form(form: &crate::Form) -> Self {
        let mut input = Self::new();
        form.register_options(&mut input);
        input
    }

    /// Supply a flag value as the user would on the command line
    ///
    /// Repeating a multi-valued flag appends to it.
    pub fn arg(mut self, name: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        let multiple = self
            .options
            .get(name)
            .is_some_and(|spec| spec.arity == Arity::Multiple);

        if multiple {
            let slot = self
                .explicit
                .entry(name.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = slot {
                items.push(value);
            }
        } else {
            self.explicit.insert(name.to_string(), value);
        }
        self
    }

    /// Supply a bare flag (`--name` without a value)
    pub fn flag(self, name: &str) -> Self {
        self.arg(name, true)
    }

    /// Set a flag's value without marking it as user-supplied
    pub fn set_option(&mut self, name: &str, value: impl Into<Value>) {
        self.preset.insert(name.to_string(), value.into());
    }

    /// Allow or forbid interactive questions
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }
}

impl OptionRegistry for MemoryInput {
    fn add_option(&mut self, spec: OptionSpec) {
        self.options.insert(spec.name.clone(), spec);
    }
}

impl InputSource for MemoryInput {
    fn has_option(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    fn option_value(&self, name: &str) -> Option<Value> {
        self.explicit
            .get(name)
            .or_else(|| self.preset.get(name))
            .cloned()
            .or_else(|| self.options.get(name).and_then(|spec| spec.default.clone()))
    }

    fn is_explicit(&self, name: &str) -> bool {
        self.explicit.contains_key(name)
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}
