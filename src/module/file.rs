//! One on-disk asset belonging to one module.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::core::FileCategory;
use crate::utils::path::to_slash;
use crate::utils::text::slugify;

/// Identity of the module owning a file.
///
/// Files keep this instead of the module itself so a module can own its
/// file lists without a reference cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleIdentity {
    /// Lowercase, slash-separated path from the sources root.
    pub namespace: String,
    /// Namespace with separators stripped.
    pub id: String,
    /// PascalCase runtime identifier.
    pub class_name: String,
}

/// Module locations a file derives its own paths from.
#[derive(Debug, Clone)]
pub struct FileContext {
    pub owner: Rc<ModuleIdentity>,
    pub base_path: PathBuf,
    pub sources_path: PathBuf,
    pub release_path: PathBuf,
    pub url: String,
}

/// A module file.
#[derive(Debug, Clone)]
pub struct AssetFile {
    pub owner: Rc<ModuleIdentity>,
    pub category: FileCategory,
    /// Absolute source path.
    pub path: PathBuf,
    /// File name with extension.
    pub name: String,
    /// DOM-safe id (`<module id>-<slug>`, lowercase).
    pub id: String,
    /// Path relative to the module's asset root, slash-separated.
    pub relative_path: String,
    pub release_path: PathBuf,
    pub url: String,
    pub compressible: bool,
    /// Compiled contents, filled by the compiler.
    pub data: Option<String>,
}

impl AssetFile {
    pub fn new(ctx: &FileContext, category: FileCategory, path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let id = format!("{}-{}", ctx.owner.id, slugify(&name)).to_lowercase();

        let relative_path = path
            .strip_prefix(&ctx.sources_path)
            .or_else(|_| path.strip_prefix(&ctx.base_path))
            .map(to_slash)
            .unwrap_or_else(|_| name.clone());

        let release_path = ctx.release_path.join(&relative_path);
        let url = if ctx.url.is_empty() {
            relative_path.clone()
        } else {
            format!("{}/{}", ctx.url, relative_path)
        };

        Self {
            owner: Rc::clone(&ctx.owner),
            category,
            path,
            name,
            id,
            relative_path,
            release_path,
            url,
            compressible: category.is_compressible(),
            data: None,
        }
    }

    /// File name without its last extension.
    pub fn stem(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }

    /// Compiled data, or an empty string when nothing was compiled.
    pub fn data_or_empty(&self) -> &str {
        self.data.as_deref().unwrap_or_default()
    }
}
