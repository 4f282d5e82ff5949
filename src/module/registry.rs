//! Namespace-indexed module tree.
//!
//! Every directory below the sources root that directly holds a module
//! manifest becomes a module; scanning never stops at a module, so modules
//! nest. A namespace lookup returns the module at that path plus every module
//! nested under it.

use jwalk::WalkDir;
use std::path::Path;
use std::rc::Rc;

use super::Module;
use crate::config::RunOptions;
use crate::core::{BuildError, BuildResult};
use crate::utils::path::{normalize_path, to_slash};

#[derive(Debug, Default)]
struct RegistryNode {
    modules: Vec<Rc<Module>>,
    /// Insertion-ordered children keyed by namespace segment.
    children: Vec<(String, RegistryNode)>,
}

impl RegistryNode {
    fn child(&self, segment: &str) -> Option<&RegistryNode> {
        self.children
            .iter()
            .find(|(name, _)| name == segment)
            .map(|(_, node)| node)
    }

    fn child_or_insert(&mut self, segment: &str) -> &mut RegistryNode {
        let index = match self.children.iter().position(|(name, _)| name == segment) {
            Some(index) => index,
            None => {
                self.children.push((segment.to_string(), RegistryNode::default()));
                self.children.len() - 1
            }
        };
        &mut self.children[index].1
    }

    /// Own modules first, then each child subtree in insertion order.
    fn collect(&self, out: &mut Vec<Rc<Module>>) {
        out.extend(self.modules.iter().cloned());
        for (_, child) in &self.children {
            child.collect(out);
        }
    }
}

/// All modules of one build, populated once by [`Registry::scan`].
#[derive(Debug, Default)]
pub struct Registry {
    root: RegistryNode,
    /// Discovery order.
    modules: Vec<Rc<Module>>,
}

impl Registry {
    /// Walk the sources root and load every module found.
    pub fn scan(options: &RunOptions) -> BuildResult<Self> {
        let sources = options.path("sources")?;
        let manifest = options.project.manifest_filename();
        let mut registry = Self::default();

        for dir in module_dirs(sources, manifest) {
            let relative = dir.strip_prefix(sources).unwrap_or(&dir);
            let namespace = to_slash(relative).to_lowercase();
            let module = Module::load(&namespace, &dir, options)?;
            crate::debug!(
                "scan";
                "found module `{}` ({}) at {} -> {}",
                namespace,
                module.id,
                module.url,
                module.release_path.display()
            );
            registry.add_module(&namespace, module);
        }

        Ok(registry)
    }

    /// Append `module` to the leaf at `namespace`, creating nodes on the way.
    pub fn add_module(&mut self, namespace: &str, module: Module) {
        let module = Rc::new(module);
        let mut node = &mut self.root;
        for segment in segments(namespace) {
            node = node.child_or_insert(segment);
        }
        node.modules.push(Rc::clone(&module));
        self.modules.push(module);
    }

    /// Every module at or below `namespace`.
    pub fn get_module(&self, namespace: &str) -> BuildResult<Vec<Rc<Module>>> {
        let mut node = &self.root;
        for segment in segments(namespace) {
            node = node
                .child(segment)
                .ok_or_else(|| BuildError::ModuleNotFound(normalize_path(namespace)))?;
        }

        let mut found = Vec::new();
        node.collect(&mut found);
        Ok(found)
    }

    /// `true` if the tree has a node at `namespace`.
    pub fn contains(&self, namespace: &str) -> bool {
        self.get_module(namespace).is_ok()
    }

    /// Modules in discovery order.
    pub fn modules(&self) -> &[Rc<Module>] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }
}

fn segments(namespace: &str) -> impl Iterator<Item = &str> {
    namespace.split(['/', '\\']).filter(|s| !s.is_empty())
}

/// Directories below `root` holding a `manifest` file, sorted depth-first.
fn module_dirs(root: &Path, manifest: &str) -> Vec<std::path::PathBuf> {
    WalkDir::new(root)
        .sort(true)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.path())
        .filter(|dir| dir.join(manifest).is_file())
        .collect()
}
