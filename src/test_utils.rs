//! Throw-away project trees for unit tests.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::{ProjectLayout, RunFlags, RunOptions};

/// A project rooted in a temp directory:
///
/// ```text
/// <root>/
/// ├── src/
/// │   ├── toys.json
/// │   └── main.tpl
/// └── dist/
/// ```
pub struct TestProject {
    _dir: TempDir,
    root: PathBuf,
}

impl TestProject {
    /// Project with an empty project manifest and a minimal shell template.
    pub fn new() -> Self {
        let project = Self::bare();
        project.write("src/toys.json", "{}");
        project.write("src/main.tpl", "<html>{{styles}}{{scripts}}</html>");
        project
    }

    /// Directories only, no project manifest.
    pub fn bare() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("dist")).unwrap();
        Self { _dir: dir, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> ProjectLayout {
        ProjectLayout {
            builder: self.root.clone(),
            sources: self.root.join("src"),
            output: self.root.join("dist"),
            cache: PathBuf::from("cache"),
        }
    }

    pub fn options(&self, flags: RunFlags) -> RunOptions {
        RunOptions::resolve(flags, &self.layout()).unwrap()
    }

    /// Write `content` to `relative` (from the root), creating parents.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Create module `namespace` under `src/` with `manifest` as its `toys.json`.
    pub fn module(&self, namespace: &str, manifest: &str) -> PathBuf {
        let path = self.write(&format!("src/{namespace}/toys.json"), manifest);
        path.parent().unwrap().to_path_buf()
    }
}
