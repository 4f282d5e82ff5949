//! Modules: directories carrying a `toys.json` manifest.
//!
//! # Structure
//!
//! ```text
//! module/
//! ├── manifest.rs  # ModuleConfig (toys.json)
//! ├── file.rs      # AssetFile
//! ├── expand.rs    # glob patterns -> ordered file lists
//! ├── registry.rs  # namespace tree built by scanning the sources root
//! └── loader.rs    # dependency-ordered aggregation
//! ```

mod expand;
mod file;
mod loader;
mod manifest;
mod registry;

pub use file::{AssetFile, FileContext, ModuleIdentity};
pub use loader::{LoadedModules, load_modules};
pub use manifest::ModuleConfig;
pub use registry::Registry;

use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::compressor::{self, Compressor, HookOutcome};
use crate::config::RunOptions;
use crate::core::{BuildError, BuildResult, CategoryMap, FileCategory};
use crate::utils::json::load_json_file;
use crate::utils::text::classify;

/// One discovered module.
#[derive(Debug)]
pub struct Module {
    /// Lowercase, slash-separated path from the sources root.
    pub namespace: String,
    pub id: String,
    pub class_name: String,
    /// Module directory.
    pub base_path: PathBuf,
    pub release_path: PathBuf,
    pub url: String,
    pub config: ModuleConfig,
    pub files: CategoryMap<Vec<AssetFile>>,
    pub compressor: Option<Compressor>,
}

impl Module {
    /// Build the module living in `dir` under `namespace`.
    ///
    /// With compression on, a hook file next to the manifest is attached and
    /// its `initialize` hook runs once the file lists are known.
    pub fn load(namespace: &str, dir: &Path, options: &RunOptions) -> BuildResult<Self> {
        let manifest = dir.join(options.project.manifest_filename());
        let config: ModuleConfig = load_json_file(&manifest)?;

        let identity = Rc::new(ModuleIdentity {
            namespace: namespace.to_string(),
            id: namespace.replace('/', ""),
            class_name: classify(namespace),
        });

        let base_path = dir.to_path_buf();
        let sources_path = if config.relpath.is_empty() {
            base_path.clone()
        } else {
            base_path.join(&config.relpath)
        };
        let release_path = options.paths.join("release", namespace)?;
        let relpath = if options.compile() { "" } else { config.relpath.as_str() };
        let url = options.urls.join("build", &[namespace, relpath])?;

        let ctx = FileContext {
            owner: Rc::clone(&identity),
            base_path: base_path.clone(),
            sources_path,
            release_path: release_path.clone(),
            url: url.clone(),
        };

        let mut files = CategoryMap::try_from_fn(|category| {
            expand::expand_patterns(&ctx, category, config.patterns(category))
        })?;

        // The entry point always runs after the module's other scripts.
        let main = base_path.join(&config.main);
        if !config.main.is_empty() && main.is_file() {
            let scripts = files.get_mut(FileCategory::Scripts);
            scripts.retain(|file| file.path != main);
            // Lives under the module directory, not the asset root.
            let main_ctx = FileContext {
                sources_path: base_path.clone(),
                url: options.urls.join("build", &[namespace])?,
                ..ctx.clone()
            };
            scripts.push(AssetFile::new(&main_ctx, FileCategory::Scripts, main));
        }

        let mut module = Self {
            namespace: identity.namespace.clone(),
            id: identity.id.clone(),
            class_name: identity.class_name.clone(),
            base_path,
            release_path,
            url,
            config,
            files,
            compressor: None,
        };

        if options.compress() {
            let hook_file = module.base_path.join(options.project.compressor_filename());
            if let Some(compressor) = compressor::load_hook_file(&hook_file, &module.base_path)? {
                module.attach_compressor(compressor)?;
            }
        }

        Ok(module)
    }

    /// Attach `compressor` after running its `initialize` hook.
    ///
    /// `Skip` leaves the module without a compressor; `Abort` fails.
    pub fn attach_compressor(&mut self, compressor: Compressor) -> BuildResult<()> {
        match compressor.run_initialize(self) {
            HookOutcome::Continue => self.compressor = Some(compressor),
            HookOutcome::Skip => self.compressor = None,
            HookOutcome::Abort(message) => return Err(BuildError::Compressor(message)),
        }
        Ok(())
    }

    /// Files declared for `category`.
    #[inline]
    pub fn files(&self, category: FileCategory) -> &[AssetFile] {
        self.files.get(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunFlags;
    use crate::test_utils::TestProject;

    fn names(files: &[AssetFile]) -> Vec<&str> {
        files.iter().map(|f| f.relative_path.as_str()).collect()
    }

    #[test]
    fn test_identity_and_urls() {
        let project = TestProject::new();
        let dir = project.module("ui/date-picker", "{}");
        project.write("src/ui/date-picker/styles/main.css", "a {}");

        let options = project.options(RunFlags::default());
        let module = Module::load("ui/date-picker", &dir, &options).unwrap();

        assert_eq!(module.id, "uidate-picker");
        assert_eq!(module.class_name, "UiDatePicker");
        assert_eq!(module.url, "src/ui/date-picker");
        assert!(module.release_path.ends_with("dist/uncompressed/ui/date-picker"));

        let styles = module.files(FileCategory::Styles);
        assert_eq!(styles[0].url, "src/ui/date-picker/styles/main.css");
        assert_eq!(styles[0].id, "uidate-picker-main-css");
    }

    #[test]
    fn test_relpath_redirects_assets() {
        let project = TestProject::new();
        let dir = project.module("vendor", r#"{"relpath": "dist", "main": ""}"#);
        project.write("src/vendor/dist/scripts/lib.js", "lib()");
        project.write("src/vendor/scripts/ignored.js", "nope()");

        let dev = Module::load("vendor", &dir, &project.options(RunFlags::default())).unwrap();
        assert_eq!(names(dev.files(FileCategory::Scripts)), ["scripts/lib.js"]);
        assert_eq!(dev.url, "src/vendor/dist");
        assert_eq!(dev.files(FileCategory::Scripts)[0].url, "src/vendor/dist/scripts/lib.js");

        let flags = RunFlags::new(true, false, false, false);
        let compiled = Module::load("vendor", &dir, &project.options(flags)).unwrap();
        assert_eq!(compiled.url, "./vendor");
    }

    #[test]
    fn test_relpath_main_file_stays_in_module_dir() {
        let project = TestProject::new();
        let dir = project.module("vendor", r#"{"relpath": "dist"}"#);
        project.write("src/vendor/dist/scripts/lib.js", "lib()");
        project.write("src/vendor/module.js", "var Vendor;");

        let dev = Module::load("vendor", &dir, &project.options(RunFlags::default())).unwrap();
        let urls: Vec<_> = dev.files(FileCategory::Scripts).iter().map(|f| f.url.as_str()).collect();
        assert_eq!(urls, ["src/vendor/dist/scripts/lib.js", "src/vendor/module.js"]);

        let flags = RunFlags::new(true, false, false, false);
        let compiled = Module::load("vendor", &dir, &project.options(flags)).unwrap();
        let main = compiled.files(FileCategory::Scripts).last().unwrap();
        assert_eq!(main.url, "./vendor/module.js");
        assert!(main.release_path.ends_with("dist/uncompressed/vendor/module.js"));
    }

    #[test]
    fn test_main_file_moves_last() {
        let project = TestProject::new();
        let dir = project.module("app", r#"{"main": "scripts/app.js"}"#);
        project.write("src/app/scripts/app.js", "start()");
        project.write("src/app/scripts/b.js", "b()");
        project.write("src/app/scripts/c.js", "c()");

        let module = Module::load("app", &dir, &project.options(RunFlags::default())).unwrap();
        assert_eq!(
            names(module.files(FileCategory::Scripts)),
            ["scripts/b.js", "scripts/c.js", "scripts/app.js"]
        );
    }

    #[test]
    fn test_main_file_outside_patterns_appended() {
        let project = TestProject::new();
        let dir = project.module("app", "{}");
        project.write("src/app/module.js", "var App;");
        project.write("src/app/scripts/a.js", "a()");

        let module = Module::load("app", &dir, &project.options(RunFlags::default())).unwrap();
        assert_eq!(names(module.files(FileCategory::Scripts)), ["scripts/a.js", "module.js"]);
    }

    #[test]
    fn test_malformed_manifest() {
        let project = TestProject::new();
        let dir = project.module("broken", "{ \"autoload\": ");
        let err = Module::load("broken", &dir, &project.options(RunFlags::default())).unwrap_err();
        assert!(matches!(err, BuildError::ManifestDecode { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_compressor_only_with_compress() {
        let project = TestProject::new();
        let dir = project.module("app", "{}");
        project.write("src/app/compressor.json", r#"{"styles": ["true"]}"#);

        let plain = Module::load("app", &dir, &project.options(RunFlags::new(true, false, false, false))).unwrap();
        assert!(plain.compressor.is_none());

        let compressed = Module::load("app", &dir, &project.options(RunFlags::new(true, true, false, false))).unwrap();
        assert!(compressed.compressor.is_some());
    }

    #[test]
    fn test_initialize_skip_detaches() {
        let project = TestProject::new();
        let dir = project.module("app", "{}");
        let mut module = Module::load("app", &dir, &project.options(RunFlags::default())).unwrap();

        let compressor = Compressor::new()
            .on_initialize(|_| HookOutcome::Skip)
            .on_file(FileCategory::Styles, |_| HookOutcome::Abort("unreachable".into()));
        module.attach_compressor(compressor).unwrap();
        assert!(module.compressor.is_none());

        let compressor = Compressor::new().on_initialize(|m| HookOutcome::Abort(format!("{} refused", m.class_name)));
        let err = module.attach_compressor(compressor).unwrap_err();
        assert_eq!(err.to_string(), "App refused");
    }
}
