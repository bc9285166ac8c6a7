//! Declarative form definitions
//!
//! A YAML document lists fields in order; every key besides `key`, `name` and
//! `type` is a configuration key applied with [`Field::set`].
//!
//! ```yaml
//! fields:
//!   - key: name
//!     name: Name
//!     description: Your name
//!   - key: region
//!     name: Region
//!     type: options
//!     options: { eu: Europe, us: United States }
//!     default: eu
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{FormError, Result};
use crate::field::{Choices, Field, FileConfig, OptionsConfig};
use crate::form::Form;

/// Form definition parsed from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormDefinition {
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Deserialize)]
pub struct FieldDefinition {
    pub key: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: FieldType,
    /// Remaining configuration keys, in document order
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Boolean,
    Array,
    Options,
    File,
    Email,
    Url,
}

impl FormDefinition {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Build the form, applying each field's settings in order
    pub fn into_form(self) -> Result<Form> {
        let mut seen = HashSet::new();
        let mut form = Form::new();

        for definition in self.fields {
            if !seen.insert(definition.key.clone()) {
                return Err(FormError::Definition {
                    message: format!("duplicate field key '{}'", definition.key),
                });
            }
            let key = definition.key.clone();
            form.add_field(key, definition.into_field()?);
        }

        for (key, field) in form.fields() {
            for (dependency, _) in field.get_conditions() {
                if form.field(dependency).is_none() {
                    warn!(field = %key, dependency = %dependency, "condition on unknown field");
                }
            }
        }

        debug!(fields = form.len(), "form definition loaded");
        Ok(form)
    }
}

impl FieldDefinition {
    pub fn into_field(self) -> Result<Field> {
        let mut field = match self.kind {
            FieldType::Text => Field::new(self.name),
            FieldType::Boolean => Field::boolean(self.name),
            FieldType::Array => Field::array(self.name),
            FieldType::Options => {
                if !self.settings.contains_key("options") {
                    return Err(FormError::Definition {
                        message: format!("options field '{}' needs an 'options' list", self.key),
                    });
                }
                Field::options(self.name, OptionsConfig::new(Choices::default()))
            }
            FieldType::File => Field::file(self.name, FileConfig::default()),
            FieldType::Email => Field::email(self.name),
            FieldType::Url => Field::url(self.name),
        };

        for (key, value) in self.settings {
            field.set(&key, value)?;
        }
        Ok(field)
    }
}
