//! Module manifest (`toys.json` inside a module directory).
//!
//! # Defaults
//!
//! ```json
//! {
//!     "main"    : "module.js",
//!     "autoload": false,
//!     "relpath" : "",
//!     "require" : [],
//!     "styles"  : ["styles/*"],
//!     "scripts" : ["scripts/*"],
//!     "assets"  : ["assets/*"],
//!     "models"  : ["models/*"],
//!     "views"   : ["views/*"],
//!     "lang"    : ["lang/*"]
//! }
//! ```
//!
//! Keys override defaults one by one; unknown keys are ignored. List fields
//! also accept a single string.

use serde::{Deserialize, Serialize};

use crate::core::FileCategory;
use crate::utils::json::one_or_many;

/// Decoded module manifest merged over defaults. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Entry-point script, relative to the module directory.
    pub main: String,
    /// Load at startup without being required.
    pub autoload: bool,
    /// Redirect asset lookup to `<module dir>/<relpath>`.
    pub relpath: String,
    /// Namespaces loaded before this module.
    #[serde(deserialize_with = "one_or_many")]
    pub require: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub styles: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub scripts: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub assets: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub models: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub views: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub lang: Vec<String>,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            main: "module.js".into(),
            autoload: false,
            relpath: String::new(),
            require: Vec::new(),
            styles: FileCategory::Styles.default_patterns(),
            scripts: FileCategory::Scripts.default_patterns(),
            assets: FileCategory::Assets.default_patterns(),
            models: FileCategory::Models.default_patterns(),
            views: FileCategory::Views.default_patterns(),
            lang: FileCategory::Lang.default_patterns(),
        }
    }
}

impl ModuleConfig {
    /// Glob pattern list declared for `category`.
    pub fn patterns(&self, category: FileCategory) -> &[String] {
        match category {
            FileCategory::Styles => &self.styles,
            FileCategory::Scripts => &self.scripts,
            FileCategory::Assets => &self.assets,
            FileCategory::Models => &self.models,
            FileCategory::Views => &self.views,
            FileCategory::Lang => &self.lang,
        }
    }
}
