//! Dynamic field configuration by key
//!
//! Used by the YAML loader; the builder methods are the typed equivalent.

use serde_json::Value;

use super::{Choices, Condition, Field, FieldKind, SplitPattern};
use crate::error::{FormError, Result};
use crate::value;

impl Field {
    /// Set one configuration key
    ///
    /// Only known keys are accepted: anything else is a configuration error,
    /// as is a value of the wrong shape.
    pub fn set(&mut self, key: &str, value: Value) -> Result<()> {
        match key {
            "option_name" => self.option_name = Some(self.string(key, &value)?),
            "shortcut" => {
                let text = self.string(key, &value)?;
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => self.shortcut = Some(c),
                    _ => return Err(self.config_error(format!("{key} must be a single character"))),
                }
            }
            "description" => self.description = self.string(key, &value)?,
            "question_line" => self.question_line = Some(self.string(key, &value)?),
            "required" => self.required = self.flag(key, &value)?,
            "default" => self.set_default(value),
            "include_as_option" => self.include_as_option = self.flag(key, &value)?,
            "avoid_question" => self.avoid_question = self.flag(key, &value)?,
            "max_attempts" => {
                let attempts = value
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .filter(|n| *n > 0)
                    .ok_or_else(|| self.config_error(format!("{key} must be a positive integer")))?;
                self.max_attempts = attempts;
            }
            "value_keys" => self.value_keys = self.strings(key, &value)?,
            "autocomplete_values" => self.autocomplete_values = Some(self.strings(key, &value)?),
            "conditions" => {
                let Value::Object(conditions) = value else {
                    return Err(self.config_error(format!("{key} must be a map")));
                };
                self.conditions.extend(
                    conditions
                        .into_iter()
                        .map(|(dependency, expected)| (dependency, Condition::Equals(expected))),
                );
            }
            "prompt" => self.prompt = self.string(key, &value)?,
            "required_marker" => self.required_marker = self.string(key, &value)?,
            "normalizer" => {
                let name = self.string(key, &value)?;
                let normalizer: fn(Value) -> Value = match name.as_str() {
                    "trim" => |v: Value| map_string(v, &|s: &str| s.trim().to_string()),
                    "lowercase" => |v: Value| map_string(v, &|s: &str| s.to_lowercase()),
                    "uppercase" => |v: Value| map_string(v, &|s: &str| s.to_uppercase()),
                    other => {
                        return Err(self.config_error(format!("Unknown normalizer: {other}")))
                    }
                };
                self.normalizers.push(std::sync::Arc::new(normalizer));
            }
            _ => return self.set_variant(key, value),
        }
        Ok(())
    }

    fn set_variant(&mut self, key: &str, value: Value) -> Result<()> {
        match (self.kind.label(), key) {
            ("array", "split_pattern") => {
                let name = self.string(key, &value)?;
                let split = SplitPattern::parse(&name)
                    .ok_or_else(|| self.config_error(format!("Unknown split pattern: {name}")))?;
                self.kind = FieldKind::Array(split);
            }
            ("options", "options") => {
                let choices = Choices::from_value(&value)
                    .ok_or_else(|| self.config_error(format!("{key} must be a list or a map")))?;
                if let FieldKind::Options(config) = &mut self.kind {
                    config.choices = choices;
                }
            }
            ("options", "as_choice" | "allow_other" | "auto_describe" | "choose_with_number") => {
                let on = self.flag(key, &value)?;
                if let FieldKind::Options(config) = &mut self.kind {
                    match key {
                        "as_choice" => config.as_choice = on,
                        "allow_other" => config.allow_other = on,
                        "auto_describe" => config.auto_describe = on,
                        _ => config.choose_with_number = on,
                    }
                }
            }
            ("file", "allowed_extensions") => {
                if !value.is_array() {
                    return Err(self.config_error("allowed_extensions must be a list"));
                }
                let extensions = self.strings(key, &value)?;
                if let FieldKind::File(config) = &mut self.kind {
                    config.allowed_extensions = extensions;
                }
            }
            ("file", "require_exists" | "require_readable" | "require_writable" | "contents_as_value") => {
                let on = self.flag(key, &value)?;
                if let FieldKind::File(config) = &mut self.kind {
                    match key {
                        "require_exists" => config.require_exists = on,
                        "require_readable" => config.require_readable = on,
                        "require_writable" => config.require_writable = on,
                        _ => config.contents_as_value = on,
                    }
                }
            }
            _ => return Err(self.config_error(format!("Unrecognized config key: {key}"))),
        }
        Ok(())
    }

    fn config_error(&self, message: impl Into<String>) -> FormError {
        FormError::Config {
            field: self.name.clone(),
            message: message.into(),
        }
    }

    fn string(&self, key: &str, value: &Value) -> Result<String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(_) | Value::Bool(_) => Ok(value::display(value)),
            _ => Err(self.config_error(format!("{key} must be a string"))),
        }
    }

    fn flag(&self, key: &str, value: &Value) -> Result<bool> {
        value
            .as_bool()
            .ok_or_else(|| self.config_error(format!("{key} must be true or false")))
    }

    fn strings(&self, key: &str, value: &Value) -> Result<Vec<String>> {
        match value {
            Value::Array(items) => items.iter().map(|item| self.string(key, item)).collect(),
            Value::String(s) => Ok(vec![s.clone()]),
            _ => Err(self.config_error(format!("{key} must be a list of strings"))),
        }
    }
}

fn map_string(value: Value, f: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(|item| map_string(item, f)).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FileConfig, OptionsConfig};
    use serde_json::json;

    #[test]
    fn unknown_key_is_rejected() {
        let mut field = Field::new("Test field");
        let err = field.set("invalid", json!(1)).unwrap_err();
        assert!(matches!(err, FormError::Config { .. }));
        assert!(err.to_string().contains("Unrecognized config key: invalid"));
    }

    #[test]
    fn variant_key_on_wrong_kind_is_rejected() {
        let mut field = Field::new("Plain");
        assert!(field.set("allow_other", json!(true)).is_err());
        assert!(field.set("split_pattern", json!("newline")).is_err());
    }

    #[test]
    fn base_keys() {
        let mut field = Field::new("Name");
        field.set("option_name", json!("who")).unwrap();
        field.set("shortcut", json!("w")).unwrap();
        field.set("description", json!("Your name")).unwrap();
        field.set("required", json!(false)).unwrap();
        field.set("default", json!("anon")).unwrap();
        field.set("max_attempts", json!(2)).unwrap();
        field.set("value_keys", json!(["person", "name"])).unwrap();

        assert_eq!(field.get_option_name(), "who");
        assert_eq!(field.get_shortcut(), Some('w'));
        assert!(!field.is_required());
        assert_eq!(field.get_original_default(), Some(&json!("anon")));
        assert_eq!(field.get_max_attempts(), 2);
        assert_eq!(field.get_value_keys(), ["person", "name"]);
    }

    #[test]
    fn wrong_shapes() {
        let mut field = Field::new("Name");
        assert!(field.set("required", json!("yes")).is_err());
        assert!(field.set("shortcut", json!("ab")).is_err());
        assert!(field.set("max_attempts", json!(0)).is_err());
        assert!(field.set("conditions", json!(["a"])).is_err());
    }

    #[test]
    fn conditions_from_map() {
        let mut field = Field::new("Dependent").default("kept");
        field.set("conditions", json!({"mode": "advanced"})).unwrap();
        assert_eq!(field.name(), "Dependent");
        assert_eq!(field.get_default(), Some(&json!("kept")));
        let [(dependency, Condition::Equals(expected))] = field.get_conditions() else {
            panic!("expected one literal condition");
        };
        assert_eq!(dependency, "mode");
        assert_eq!(expected, &json!("advanced"));
    }

    #[test]
    fn named_normalizers() {
        let mut field = Field::new("Name");
        field.set("normalizer", json!("trim")).unwrap();
        field.set("normalizer", json!("lowercase")).unwrap();
        assert_eq!(field.normalize(&json!("  MiXeD ")).unwrap(), json!("mixed"));
        assert!(field.set("normalizer", json!("reverse")).is_err());
    }

    #[test]
    fn options_keys() {
        let mut field = Field::options("Color", OptionsConfig::new(Choices::list(["red"])));
        field.set("options", json!({"r": "Red", "g": "Green"})).unwrap();
        field.set("allow_other", json!(true)).unwrap();
        let FieldKind::Options(config) = field.kind() else { unreachable!() };
        assert_eq!(config.valid_values(), vec!["r", "g"]);
        assert!(config.allow_other);
    }

    #[test]
    fn file_keys() {
        let mut field = Field::file("Config", FileConfig::default());
        let err = field.set("allowed_extensions", json!("yaml")).unwrap_err();
        assert!(err.to_string().contains("allowed_extensions must be a list"));

        field.set("allowed_extensions", json!(["yaml", "yml"])).unwrap();
        field.set("require_exists", json!(false)).unwrap();
        let FieldKind::File(config) = field.kind() else { unreachable!() };
        assert_eq!(config.allowed_extensions, vec!["yaml", "yml"]);
        assert!(!config.require_exists);
    }

    #[test]
    fn split_pattern_key() {
        let mut field = Field::array("Cities");
        field.set("split_pattern", json!("comma_newline")).unwrap();
        assert!(matches!(field.kind(), FieldKind::Array(SplitPattern::CommaNewline)));
        assert!(field.set("split_pattern", json!("tabs")).is_err());
    }
}
