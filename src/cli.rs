//! clap adapter
//!
//! A form registers its flags into a `Vec<clap::Arg>`; after parsing,
//! [`MatchesInput`] exposes the `ArgMatches` to the resolution engine.

use std::collections::HashMap;

use clap::parser::ValueSource;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde_json::Value;

use crate::form::Form;
use crate::input::{Arity, InputSource, OptionRegistry, OptionSpec};
use crate::value;

/// Build the clap argument for a flag
pub fn to_arg(spec: &OptionSpec) -> Arg {
    let mut arg = Arg::new(spec.name.clone())
        .long(spec.name.clone())
        .help(spec.description.clone())
        .value_parser(value_parser!(String));

    if let Some(short) = spec.shortcut {
        arg = arg.short(short);
    }

    arg = match spec.arity {
        Arity::Single => arg.action(ArgAction::Set),
        Arity::Multiple => arg.action(ArgAction::Append),
        Arity::Flag => arg
            .action(ArgAction::Set)
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true"),
    };

    match (&spec.default, spec.arity) {
        (Some(Value::Array(items)), Arity::Multiple) if !items.is_empty() => {
            arg.default_values(items.iter().map(value::display).collect::<Vec<_>>())
        }
        (Some(default), arity) if arity != Arity::Multiple && !default.is_array() => {
            arg.default_value(value::display(default))
        }
        _ => arg,
    }
}

impl OptionRegistry for Vec<Arg> {
    fn add_option(&mut self, spec: OptionSpec) {
        self.push(to_arg(&spec));
    }
}

/// A clap command carrying every flag of a form
pub fn form_command(name: &str, form: &Form) -> Command {
    let mut args: Vec<Arg> = Vec::new();
    form.register_options(&mut args);
    Command::new(name.to_string()).args(args)
}

/// Parsed clap matches as an input source
#[derive(Debug)]
pub struct MatchesInput<'a> {
    matches: &'a ArgMatches,
    specs: HashMap<String, OptionSpec>,
    interactive: bool,
}

impl<'a> MatchesInput<'a> {
    /// `specs` are the flags the form registered, as returned by [`Form::option_specs`]
    pub fn new(matches: &'a ArgMatches, specs: Vec<OptionSpec>) -> Self {
        Self {
            matches,
            specs: specs.into_iter().map(|s| (s.name.clone(), s)).collect(),
            interactive: false,
        }
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }
}

impl InputSource for MatchesInput<'_> {
    fn has_option(&self, name: &str) -> bool {
        self.specs.contains_key(name) && self.matches.try_contains_id(name).is_ok()
    }

    fn option_value(&self, name: &str) -> Option<Value> {
        let spec = self.specs.get(name)?;
        if !self.is_explicit(name) {
            return spec.default.clone();
        }

        let values: Vec<Value> = self
            .matches
            .try_get_many::<String>(name)
            .ok()
            .flatten()?
            .map(|v| Value::String(v.clone()))
            .collect();

        match spec.arity {
            Arity::Multiple => Some(Value::Array(values)),
            Arity::Single | Arity::Flag => values.into_iter().last(),
        }
    }

    fn is_explicit(&self, name: &str) -> bool {
        self.specs.contains_key(name)
            && matches!(
                self.matches.value_source(name),
                Some(ValueSource::CommandLine | ValueSource::EnvVariable)
            )
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}
