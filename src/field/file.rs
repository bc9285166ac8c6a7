//! File path fields

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{Check, Field};
use crate::error::{FormError, Result};
use crate::value;

/// Requirements on a file path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConfig {
    pub require_exists: bool,
    /// Only checked when the file must exist
    pub require_readable: bool,
    /// Only checked when the file must exist
    pub require_writable: bool,
    /// Accepted extensions, with or without a leading dot; `""` accepts names without a dot
    pub allowed_extensions: Vec<String>,
    /// Resolve to the file's contents instead of its path
    pub contents_as_value: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            require_exists: true,
            require_readable: true,
            require_writable: false,
            allowed_extensions: Vec::new(),
            contents_as_value: false,
        }
    }
}

impl FileConfig {
    pub fn require_exists(mut self, require: bool) -> Self {
        self.require_exists = require;
        self
    }

    pub fn require_readable(mut self, require: bool) -> Self {
        self.require_readable = require;
        self
    }

    pub fn require_writable(mut self, require: bool) -> Self {
        self.require_writable = require;
        self
    }

    pub fn allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn contents_as_value(mut self, contents: bool) -> Self {
        self.contents_as_value = contents;
        self
    }

    pub(super) fn check(&self, value: &Value) -> Check {
        let name = value::display(value);
        let path = Path::new(&name);

        if self.require_exists && !path.exists() {
            return Check::Message(format!("File not found: {name}"));
        }
        if path.is_dir() {
            return Check::Message(format!("The file is a directory: {name}"));
        }
        if self.require_exists && self.require_readable && fs::File::open(path).is_err() {
            return Check::Message(format!("File not readable: {name}"));
        }
        if self.require_exists && self.require_writable && !is_writable(path) {
            return Check::Message(format!("File not writable: {name}"));
        }
        if !self.matches_extension(&name) {
            return Check::Message(format!(
                "Invalid file extension (allowed: {})",
                self.allowed_extensions.join(", ")
            ));
        }
        Check::Pass
    }

    fn matches_extension(&self, name: &str) -> bool {
        if self.allowed_extensions.is_empty() {
            return true;
        }
        let with_suffix = self
            .allowed_extensions
            .iter()
            .any(|ext| name.ends_with(&format!(".{}", ext.trim_start_matches('.'))));
        let bare = self.allowed_extensions.iter().any(String::is_empty) && !name.contains('.');
        with_suffix || bare
    }
}

fn is_writable(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| !meta.permissions().readonly())
}

/// Replace a path with the file's contents
///
/// Text files become a string; anything that is not UTF-8 becomes a list of bytes.
pub(super) fn read_contents(field: &Field, path: &Value) -> Result<Value> {
    let path = PathBuf::from(value::display(path));
    let bytes = fs::read(&path).map_err(|source| FormError::FileRead {
        path: path.clone(),
        field: field.to_ref(),
        source,
    })?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => Value::String(text),
        Err(err) => Value::Array(err.into_bytes().into_iter().map(Value::from).collect()),
    })
}
