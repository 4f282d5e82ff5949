//! Shell template rendering.
//!
//! The main file is read verbatim, normalized, then scanned once for
//! `{{ tag }}` placeholders. Each tag resolves through, in order:
//!
//! 1. a built-in handler (`styles`, `scripts`, `views`, `config`, `texts`, `modules`)
//! 2. a project config key, stringified
//! 3. a builder state field (`compile`, `compress`, `cache`, `clean`, `output_type`)
//!
//! Unresolved tags stay as written. Replacements are never rescanned.

mod handlers;

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::config::RunOptions;
use crate::core::{BuildError, BuildResult};
use crate::module::LoadedModules;
use crate::utils::path::fs::read_normalized;
use crate::utils::text::normalize_contents;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+?)\}\}").expect("valid tag regex"));

pub struct Renderer<'a> {
    options: &'a RunOptions,
    loaded: &'a LoadedModules,
}

impl<'a> Renderer<'a> {
    pub fn new(options: &'a RunOptions, loaded: &'a LoadedModules) -> Self {
        Self { options, loaded }
    }

    /// Render the project's main file.
    pub fn render(&self) -> BuildResult<String> {
        let main_file = self.options.path("main_file")?;
        if !main_file.is_file() {
            return Err(BuildError::PathNotFound(main_file.to_path_buf()));
        }
        let template = read_normalized(main_file)?;
        self.render_str(&template)
    }

    /// Normalize `template` and resolve its tags in one pass.
    pub fn render_str(&self, template: &str) -> BuildResult<String> {
        let template = normalize_contents(template);
        let mut output = String::with_capacity(template.len());
        let mut last = 0;

        for caps in TAG_RE.captures_iter(&template) {
            let (Some(whole), Some(tag)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            output.push_str(&template[last..whole.start()]);
            match self.resolve(tag.as_str().trim())? {
                Some(value) => output.push_str(&value),
                None => output.push_str(whole.as_str()),
            }
            last = whole.end();
        }
        output.push_str(&template[last..]);

        Ok(output)
    }

    fn resolve(&self, tag: &str) -> BuildResult<Option<String>> {
        if let Some(handler) = handlers::find(tag) {
            return handler(self).map(Some);
        }
        if let Some(value) = self.options.project.get(tag) {
            return Ok(Some(stringify(value)));
        }
        Ok(self.options.state_field(tag))
    }
}

/// Template form of a config value.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{Compiler, Minifiers};
    use crate::config::RunFlags;
    use crate::module::{Registry, load_modules};
    use crate::test_utils::TestProject;

    fn render(project: &TestProject, flags: RunFlags, template: &str) -> String {
        let options = project.options(flags);
        let registry = Registry::scan(&options).unwrap();
        let mut loaded = load_modules(&registry).unwrap();
        Compiler::new(&options, Minifiers::default())
            .unwrap()
            .compile(&mut loaded)
            .unwrap();
        Renderer::new(&options, &loaded).render_str(template).unwrap()
    }

    fn core_and_app() -> TestProject {
        let project = TestProject::new();
        project.module("core", r#"{"autoload": true}"#);
        project.write("src/core/scripts/a.js", "var A = 1;");
        project.module("app", r#"{"autoload": true, "require": ["core"]}"#);
        project.write("src/app/scripts/b.js", "var B = 2;");
        project
    }

    #[test]
    fn test_config_key_and_verbatim() {
        let project = TestProject::new();
        project.write("src/toys.json", r#"{"foo": "bar", "debug": true, "off": false, "n": 3}"#);
        let out = render(
            &project,
            RunFlags::default(),
            "{{foo}} {{ debug }}[{{off}}]{{n}} {{missing}} {{lang}}",
        );
        assert_eq!(out, "bar 1[]3 {{missing}} en");
    }

    #[test]
    fn test_handler_wins_over_config_key() {
        let project = core_and_app();
        project.write("src/toys.json", r#"{"styles": "from config", "modules": "from config"}"#);
        let out = render(&project, RunFlags::default(), "{{styles}}|{{modules}}");
        assert_eq!(out, "|[\"Core\",\"App\"]");
    }

    #[test]
    fn test_state_fields() {
        let project = TestProject::new();
        let out = render(
            &project,
            RunFlags::new(true, false, false, false),
            "{{compile}}/{{compress}}/{{output_type}}",
        );
        assert_eq!(out, "1//uncompressed");
    }

    #[test]
    fn test_dev_scripts_in_dependency_order() {
        let project = core_and_app();
        let out = render(&project, RunFlags::default(), "{{scripts}}\n{{modules}}");
        assert_eq!(
            out,
            "<!-- Scripts -->\n\
             \t\t<script src=\"src/core/scripts/a.js\"></script>\n\
             \t\t<script src=\"src/app/scripts/b.js\"></script>\n\
             [\"Core\",\"App\"]"
        );
    }

    #[test]
    fn test_compiled_urls_are_release_relative() {
        let project = core_and_app();
        let out = render(&project, RunFlags::new(true, false, false, false), "{{scripts}}");
        assert!(out.contains("<script src=\"./core/scripts/a.js\"></script>"));
    }

    #[test]
    fn test_compressed_styles_inlined() {
        let project = TestProject::new();
        project.module("app", r#"{"autoload": true}"#);
        project.write("src/app/styles/main.css", "a {\n    color: #ff0000;\n}");
        let out = render(&project, RunFlags::new(true, true, true, false), "{{styles}}");
        assert_eq!(
            out,
            "<!-- Styles -->\n\
             \t\t<style type=\"text/css\">\n\
             \t\t/* ===>>> ./app/styles/main.css */a{color:red}\n\
             \t\t</style>"
        );
    }

    #[test]
    fn test_view_block() {
        let project = TestProject::new();
        project.module("widget", r#"{"autoload": true}"#);
        project.write("src/widget/views/default.tpl", "<p>hi</p>\n");
        let out = render(&project, RunFlags::default(), "{{views}}");
        assert_eq!(
            out,
            "<!-- Views -->\n\t\t<script type=\"text/html\" id=\"widget-default-view\"><p>hi</p></script>"
        );
    }

    #[test]
    fn test_texts_grouped_by_language_and_class() {
        let project = core_and_app();
        project.write("src/core/lang/en.json", r#"{"ok": "OK"}"#);
        project.write("src/app/lang/en.json", r#"{"title": "App"}"#);
        project.write("src/app/lang/fr.json", r#"{"title": "Appli"}"#);
        let out = render(&project, RunFlags::default(), "{{texts}}");
        assert_eq!(
            out,
            r#"{"en":{"Core":{"ok":"OK"},"App":{"title":"App"}},"fr":{"App":{"title":"Appli"}}}"#
        );
    }

    #[test]
    fn test_config_tag() {
        let project = TestProject::new();
        project.write("src/toys.json", r#"{"languages": ["fr", "en"]}"#);
        let out = render(&project, RunFlags::default(), "{{config}}");
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["lang"], "fr");
        assert_eq!(value["main_file"], "main.tpl");
    }

    #[test]
    fn test_replacements_not_rescanned() {
        let project = TestProject::new();
        project.write("src/toys.json", r#"{"a": "{{b}}", "b": "nope"}"#);
        let out = render(&project, RunFlags::default(), "{{a}}");
        assert_eq!(out, "{{b}}");
    }

    #[test]
    fn test_empty_collections() {
        let project = TestProject::new();
        let out = render(&project, RunFlags::default(), "[{{styles}}{{scripts}}{{views}}]{{modules}}");
        assert_eq!(out, "[][]");
    }

    #[test]
    fn test_missing_main_file() {
        let project = TestProject::new();
        std::fs::remove_file(project.root().join("src/main.tpl")).unwrap();
        let options = project.options(RunFlags::default());
        let loaded = LoadedModules::default();
        let err = Renderer::new(&options, &loaded).render().unwrap_err();
        assert!(matches!(err, BuildError::PathNotFound(_)));
    }
}
