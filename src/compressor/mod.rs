//! Per-module compressor hooks.
//!
//! A module may ship a hook file next to its manifest that overrides or
//! vetoes the default compression of its files. Every hook answers with a
//! [`HookOutcome`]:
//!
//! | Outcome    | Meaning                                              |
//! |------------|------------------------------------------------------|
//! | `Continue` | run the default action (copy, or minify then cache)  |
//! | `Skip`     | do nothing for this file; the hook handled it        |
//! | `Abort`    | fail the whole build with the carried message        |
//!
//! `initialize` answering `Skip` detaches the compressor from its module.

mod command;

pub use command::load_hook_file;

use serde_json::Value;
use std::fmt;

use crate::core::{BuildError, CategoryMap, FileCategory, format_message};
use crate::module::{AssetFile, Module};

/// Result of one hook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    Continue,
    Skip,
    Abort(String),
}

impl HookOutcome {
    /// Decode a hook's JSON answer.
    ///
    /// `null`/`true` continue, `false` skips, a string aborts with that
    /// message and `[format, [args...]]` aborts with the formatted message.
    /// An object `{"data": ..., "result": ...}` replaces `data` first and
    /// then applies `result`.
    pub fn from_value(value: Value, data: &mut Option<String>) -> Self {
        match value {
            Value::Null | Value::Bool(true) => Self::Continue,
            Value::Bool(false) => Self::Skip,
            Value::String(message) => Self::Abort(message),
            Value::Array(items) => {
                let mut items = items.into_iter();
                let Some(Value::String(message)) = items.next() else {
                    return Self::Abort("compressor hook returned a malformed message".into());
                };
                let args: Vec<String> = match items.next() {
                    Some(Value::Array(args)) => args.iter().map(stringify).collect(),
                    Some(other) => vec![stringify(&other)],
                    None => Vec::new(),
                };
                Self::Abort(format_message(&message, &args))
            }
            Value::Object(mut map) => {
                match map.remove("data") {
                    Some(Value::String(replacement)) => *data = Some(replacement),
                    Some(Value::Null) | None => {}
                    Some(other) => *data = Some(stringify(&other)),
                }
                match map.remove("result") {
                    Some(result) => Self::from_value(result, data),
                    None => Self::Continue,
                }
            }
            Value::Number(n) => Self::Abort(format!("compressor hook returned `{n}`")),
        }
    }

    /// Turn an abort into the build error it stands for.
    pub fn into_result(self) -> Result<bool, BuildError> {
        match self {
            Self::Continue => Ok(true),
            Self::Skip => Ok(false),
            Self::Abort(message) => Err(BuildError::Compressor(message)),
        }
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Hook run once when the module is constructed.
pub type InitHook = Box<dyn Fn(&Module) -> HookOutcome>;

/// Hook run for one file; may rewrite `file.data`.
pub type FileHook = Box<dyn Fn(&mut AssetFile) -> HookOutcome>;

/// Optional hook slots of one module.
#[derive(Default)]
pub struct Compressor {
    initialize: Option<InitHook>,
    files: CategoryMap<Option<FileHook>>,
}

impl Compressor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_initialize(mut self, hook: impl Fn(&Module) -> HookOutcome + 'static) -> Self {
        self.initialize = Some(Box::new(hook));
        self
    }

    /// Set the hook for files of `category`.
    pub fn on_file(
        mut self,
        category: FileCategory,
        hook: impl Fn(&mut AssetFile) -> HookOutcome + 'static,
    ) -> Self {
        *self.files.get_mut(category) = Some(Box::new(hook));
        self
    }

    pub fn run_initialize(&self, module: &Module) -> HookOutcome {
        self.initialize
            .as_ref()
            .map_or(HookOutcome::Continue, |hook| hook(module))
    }

    /// Run the hook matching `file.category`; no hook means `Continue`.
    pub fn run_file(&self, file: &mut AssetFile) -> HookOutcome {
        self.files
            .get(file.category)
            .as_ref()
            .map_or(HookOutcome::Continue, |hook| hook(file))
    }
}

impl fmt::Debug for Compressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hooks: Vec<&str> = self
            .files
            .iter()
            .filter(|(_, hook)| hook.is_some())
            .map(|(category, _)| category.name())
            .collect();
        f.debug_struct("Compressor")
            .field("initialize", &self.initialize.is_some())
            .field("files", &hooks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{FileContext, ModuleIdentity};
    use serde_json::json;
    use std::path::PathBuf;
    use std::rc::Rc;

    fn decode(value: Value) -> (HookOutcome, Option<String>) {
        let mut data = Some("before".to_string());
        let outcome = HookOutcome::from_value(value, &mut data);
        (outcome, data)
    }

    #[test]
    fn test_outcome_from_scalars() {
        assert_eq!(decode(Value::Null).0, HookOutcome::Continue);
        assert_eq!(decode(json!(true)).0, HookOutcome::Continue);
        assert_eq!(decode(json!(false)).0, HookOutcome::Skip);
        assert_eq!(
            decode(json!("broken")).0,
            HookOutcome::Abort("broken".into())
        );
    }

    #[test]
    fn test_outcome_formatted_abort() {
        let (outcome, _) = decode(json!(["%s failed with %d errors", ["lint", 3]]));
        assert_eq!(outcome, HookOutcome::Abort("lint failed with 3 errors".into()));
    }

    #[test]
    fn test_outcome_replaces_data() {
        let (outcome, data) = decode(json!({"data": "rewritten", "result": false}));
        assert_eq!(outcome, HookOutcome::Skip);
        assert_eq!(data.as_deref(), Some("rewritten"));

        let (outcome, data) = decode(json!({"data": "rewritten"}));
        assert_eq!(outcome, HookOutcome::Continue);
        assert_eq!(data.as_deref(), Some("rewritten"));
    }

    #[test]
    fn test_into_result() {
        assert!(HookOutcome::Continue.into_result().unwrap());
        assert!(!HookOutcome::Skip.into_result().unwrap());
        let err = HookOutcome::Abort("nope".into()).into_result().unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }

    #[test]
    fn test_missing_hook_continues() {
        let compressor = Compressor::new().on_file(FileCategory::Styles, |_| HookOutcome::Skip);
        let ctx = FileContext {
            owner: Rc::new(ModuleIdentity {
                namespace: "app".into(),
                id: "app".into(),
                class_name: "App".into(),
            }),
            base_path: PathBuf::from("app"),
            sources_path: PathBuf::from("app"),
            release_path: PathBuf::from("release/app"),
            url: "app".into(),
        };
        let mut script = AssetFile::new(&ctx, FileCategory::Scripts, PathBuf::from("app/app.js"));
        let mut style = AssetFile::new(&ctx, FileCategory::Styles, PathBuf::from("app/main.css"));
        assert_eq!(compressor.run_file(&mut script), HookOutcome::Continue);
        assert_eq!(compressor.run_file(&mut style), HookOutcome::Skip);
        assert_eq!(
            format!("{compressor:?}"),
            "Compressor { initialize: false, files: [\"styles\"] }"
        );
    }
}
