//! Form: ordered, keyed fields and two-pass resolution
//!
//! Resolution runs the same routine twice. The [`Mode::BeforeInteraction`]
//! pass only checks flags the user supplied, so a typo fails before any
//! question is asked; the [`Mode::Full`] pass fills the gaps from defaults
//! or prompts and produces the value map.

use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::context::Mode;
use crate::error::{FormError, Result};
use crate::field::Field;
use crate::input::{InputSource, OptionRegistry, OptionSpec};
use crate::prompt::PromptAsker;
use crate::value::{self, Values};

/// Insertion-ordered collection of keyed fields
#[derive(Debug, Clone, Default)]
pub struct Form {
    fields: Vec<(String, Field)>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Form::add_field`]
    pub fn with_field(mut self, key: impl Into<String>, field: Field) -> Self {
        self.add_field(key, field);
        self
    }

    /// Add a field; re-using a key replaces that field in place
    pub fn add_field(&mut self, key: impl Into<String>, field: Field) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = field,
            None => self.fields.push((key, field)),
        }
    }

    pub fn from_fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Field)>,
        K: Into<String>,
    {
        let mut form = Self::new();
        for (key, field) in fields {
            form.add_field(key, field);
        }
        form
    }

    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, f)| (k.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Register the flag of every field exposed as an option
    pub fn register_options(&self, registry: &mut dyn OptionRegistry) {
        for (_, field) in &self.fields {
            if field.is_option() {
                registry.add_option(field.option_spec());
            }
        }
    }

    pub fn option_specs(&self) -> Vec<OptionSpec> {
        let mut specs = Vec::new();
        self.register_options(&mut specs);
        specs
    }

    /// Check explicitly supplied flags without asking anything
    pub fn validate_before_interaction(&mut self, input: &dyn InputSource) -> Result<()> {
        self.run_pass(Mode::BeforeInteraction, input, None).map(|_| ())
    }

    /// Resolve every field into a value map
    ///
    /// Supplied flags are validated first; then each included field takes its
    /// flag value, an answer from `asker` (interactive input only) or its
    /// default.
    pub fn resolve(&mut self, input: &dyn InputSource, asker: &mut dyn PromptAsker) -> Result<Values> {
        self.validate_before_interaction(input)?;
        self.run_pass(Mode::Full, input, Some(asker))
    }

    /// Whether every condition of `field` holds for the values resolved so far
    ///
    /// A condition on an unknown dependency (not a field of this form, or no
    /// value yet) is skipped before interaction and fails otherwise.
    pub fn include_field(&self, field: &Field, previous_values: &Values, mode: Mode) -> bool {
        for (dependency, condition) in field.get_conditions() {
            let known = self
                .field(dependency)
                .zip(previous_values.get(dependency).filter(|v| !v.is_null()));
            let Some((dependency_field, dependency_value)) = known else {
                if mode.tolerates_unknown_dependencies() {
                    continue;
                }
                return false;
            };
            if !dependency_field.matches_condition(dependency_value, condition) {
                return false;
            }
        }
        true
    }

    #[instrument(skip_all, fields(mode = %mode))]
    fn run_pass(
        &mut self,
        mode: Mode,
        input: &dyn InputSource,
        mut asker: Option<&mut dyn PromptAsker>,
    ) -> Result<Values> {
        let mut values = Values::new();

        for index in 0..self.fields.len() {
            self.fields[index].1.on_change(&values, mode);
            let (key, field) = &self.fields[index];

            if !self.include_field(field, &values, mode) {
                if field.value_from_input(input, false)?.is_some() {
                    return Err(FormError::ConditionalField {
                        message: format!("--{} is not applicable", field.get_option_name()),
                        field: field.to_ref(),
                        previous_values: values,
                    });
                }
                debug!(field = %key, "conditions not met, skipping");
                continue;
            }

            let mut user_value = Value::Null;
            if let Some(supplied) = field.value_from_input(input, false)? {
                field.validate(&supplied, true)?;
                trace!(field = %key, "value from flag");
                user_value = supplied;
            } else if mode.resolves_missing_values() {
                match asker.as_deref_mut() {
                    Some(asker) if input.is_interactive() && field.should_ask_as_question() => {
                        user_value = asker.ask(&field.question())?;
                        asker.write_separator();
                        trace!(field = %key, "value from prompt");
                    }
                    _ if field.is_required() && !field.has_default() => {
                        return Err(FormError::MissingValue {
                            message: format!("--{} is required", field.get_option_name()),
                            field: field.to_ref(),
                        });
                    }
                    _ => trace!(field = %key, "value from default"),
                }
            }

            let path = match field.get_value_keys() {
                [] => vec![key.clone()],
                keys => keys.to_vec(),
            };
            value::set_nested(&mut values, &path, field.final_value(&user_value)?);
        }

        Ok(values)
    }
}
