//! Project manifest (`toys.json` at the sources root).
//!
//! # Example
//!
//! ```json
//! {
//!     "title": "My application",
//!     "languages": ["fr", "en"]
//! }
//! ```
//!
//! Every key is kept (in declaration order) so the shell template can read
//! arbitrary values through `{{key}}` tags.

use serde_json::{Map, Value, json};
use std::path::Path;

use crate::core::BuildResult;
use crate::utils::json::load_json_file;

/// Default file name of module and project manifests.
pub const DEFAULT_MANIFEST: &str = "toys.json";

/// Merged project configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    values: Map<String, Value>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        let mut values = Map::new();
        values.insert("lang".into(), json!("en"));
        values.insert("languages".into(), json!(["en"]));
        values.insert("main_file".into(), json!("main.tpl"));
        values.insert("toys_filename".into(), json!(DEFAULT_MANIFEST));
        values.insert("compressor_filename".into(), json!("compressor.json"));
        Self { values }
    }
}

impl ProjectConfig {
    /// Load the manifest at `path` and merge it over the defaults.
    pub fn load(path: &Path) -> BuildResult<Self> {
        let overrides: Map<String, Value> = load_json_file(path)?;
        Ok(Self::from_map(overrides))
    }

    /// Merge `overrides` over the defaults (shallow) and pin `lang` to the
    /// first declared language.
    pub fn from_map(overrides: Map<String, Value>) -> Self {
        let mut config = Self::default();
        for (key, value) in overrides {
            config.values.insert(key, value);
        }

        if let Some(first) = config.languages().first().cloned() {
            config.values.insert("lang".into(), Value::String(first));
        }
        config
    }

    /// Raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Effective default language.
    pub fn lang(&self) -> &str {
        self.str_or("lang", "en")
    }

    /// Declared languages.
    pub fn languages(&self) -> Vec<String> {
        match self.values.get("languages") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(single)) => vec![single.clone()],
            _ => Vec::new(),
        }
    }

    /// Shell template file name, relative to the sources root.
    pub fn main_file(&self) -> &str {
        self.str_or("main_file", "main.tpl")
    }

    /// Module manifest file name.
    pub fn manifest_filename(&self) -> &str {
        self.str_or("toys_filename", DEFAULT_MANIFEST)
    }

    /// Compressor hook file name inside a module directory.
    pub fn compressor_filename(&self) -> &str {
        self.str_or("compressor_filename", "compressor.json")
    }

    /// Compact JSON object of every value.
    pub fn to_json(&self) -> String {
        Value::Object(self.values.clone()).to_string()
    }

    fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
    }
}
