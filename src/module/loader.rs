//! Dependency-ordered module loading.
//!
//! Starting from every autoload module (in discovery order), each namespace is
//! loaded depth-first: required namespaces first, then the module's own
//! files are appended to the aggregate. A namespace is marked as loaded
//! before its requirements are visited, so diamonds contribute once and a
//! `require` cycle stops at its second visit instead of recursing forever.

use rustc_hash::FxHashSet;
use std::rc::Rc;

use super::{AssetFile, Module, Registry};
use crate::core::{BuildResult, CategoryMap, FileCategory};

/// Per-category files of every loaded module, in load order.
///
/// Models never form their own list; each module's models are spliced in
/// front of that module's scripts.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    files: CategoryMap<Vec<AssetFile>>,
}

impl Aggregate {
    #[inline]
    pub fn files(&self, category: FileCategory) -> &[AssetFile] {
        self.files.get(category)
    }

    /// Mutable access for the compiler, which fills `AssetFile::data`.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (FileCategory, &mut Vec<AssetFile>)> {
        self.files.iter_mut()
    }

    fn merge(&mut self, module: &Module) {
        for category in FileCategory::ALL {
            match category {
                FileCategory::Models => {}
                FileCategory::Scripts => {
                    let scripts = self.files.get_mut(FileCategory::Scripts);
                    scripts.extend(module.files(FileCategory::Models).iter().cloned());
                    scripts.extend(module.files(FileCategory::Scripts).iter().cloned());
                }
                _ => self
                    .files
                    .get_mut(category)
                    .extend(module.files(category).iter().cloned()),
            }
        }
    }
}

/// Output of [`load_modules`].
#[derive(Debug, Default)]
pub struct LoadedModules {
    pub aggregate: Aggregate,
    /// Class names of autoload modules, dependencies first.
    pub startup: Vec<String>,
    /// Loaded modules in visitation order.
    pub modules: Vec<Rc<Module>>,
}

/// Load every autoload module of `registry` and its requirements.
pub fn load_modules(registry: &Registry) -> BuildResult<LoadedModules> {
    let mut loader = Loader {
        registry,
        loaded: FxHashSet::default(),
        result: LoadedModules::default(),
    };

    for module in registry.modules().iter().filter(|m| m.config.autoload) {
        loader.load(&module.namespace)?;
    }

    Ok(loader.result)
}

struct Loader<'a> {
    registry: &'a Registry,
    loaded: FxHashSet<String>,
    result: LoadedModules,
}

impl Loader<'_> {
    fn load(&mut self, namespace: &str) -> BuildResult<()> {
        for module in self.registry.get_module(namespace)? {
            if !self.loaded.insert(module.namespace.clone()) {
                continue;
            }

            for required in &module.config.require {
                self.load(required)?;
            }

            if module.config.autoload {
                self.result.startup.push(module.class_name.clone());
            }
            self.result.aggregate.merge(&module);
            self.result.modules.push(module);
        }
        Ok(())
    }
}
