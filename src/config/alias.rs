//! Named path and URL tables.
//!
//! Every filesystem location the builder touches is registered once under an
//! alias (`sources`, `release`, `cache`, ...) and read back by name. Reading
//! an alias that was never registered is a programming error surfaced as
//! [`BuildError::AliasNotDefined`].

use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

use crate::core::{BuildError, BuildResult};
use crate::utils::path::{concat_path, fs::absolute_path, normalize_path};

/// Filesystem path aliases (absolute paths).
#[derive(Debug, Clone, Default)]
pub struct PathAliases {
    entries: FxHashMap<String, PathBuf>,
}

impl PathAliases {
    /// Register `path`, which must exist, under `alias`.
    pub fn set(&mut self, alias: &str, path: &Path) -> BuildResult<PathBuf> {
        self.set_under(alias, path, "")
    }

    /// Register `base/sub` under `alias`. Only `base` has to exist.
    pub fn set_under(&mut self, alias: &str, base: &Path, sub: impl AsRef<Path>) -> BuildResult<PathBuf> {
        let mut path = absolute_path(base)?;
        let sub = sub.as_ref();
        if !sub.as_os_str().is_empty() {
            path = path.join(sub);
        }
        self.entries.insert(alias.to_string(), path.clone());
        Ok(path)
    }

    /// Path registered under `alias`.
    pub fn get(&self, alias: &str) -> BuildResult<&Path> {
        self.entries
            .get(alias)
            .map(PathBuf::as_path)
            .ok_or_else(|| BuildError::AliasNotDefined {
                kind: "path",
                alias: alias.to_string(),
            })
    }

    /// `alias` path with slash-separated `subpath` appended.
    pub fn join(&self, alias: &str, subpath: &str) -> BuildResult<PathBuf> {
        let base = self.get(alias)?;
        let subpath = normalize_path(subpath);
        Ok(if subpath.is_empty() {
            base.to_path_buf()
        } else {
            base.join(subpath)
        })
    }
}

/// Relative URL aliases (slash-separated, no leading or trailing slash).
#[derive(Debug, Clone, Default)]
pub struct UrlAliases {
    entries: FxHashMap<String, String>,
}

impl UrlAliases {
    /// Register a URL under `alias`.
    pub fn set(&mut self, alias: &str, url: &str) -> String {
        let url = normalize_path(url);
        self.entries.insert(alias.to_string(), url.clone());
        url
    }

    /// URL registered under `alias`.
    pub fn get(&self, alias: &str) -> BuildResult<&str> {
        self.entries
            .get(alias)
            .map(String::as_str)
            .ok_or_else(|| BuildError::AliasNotDefined {
                kind: "URL",
                alias: alias.to_string(),
            })
    }

    /// `alias` URL with `segments` appended; empty segments are skipped.
    pub fn join(&self, alias: &str, segments: &[&str]) -> BuildResult<String> {
        let base = self.get(alias)?;
        let rest = concat_path(segments);
        Ok(match (base.is_empty(), rest.is_empty()) {
            (_, true) => base.to_string(),
            (true, false) => rest,
            (false, false) => format!("{base}/{rest}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_alias_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut paths = PathAliases::default();
        let sources = paths.set("sources", dir.path()).unwrap();

        assert_eq!(paths.get("sources").unwrap(), sources);
        assert_eq!(
            paths.join("sources", "/app/toys.json").unwrap(),
            sources.join("app/toys.json")
        );
    }

    #[test]
    fn test_path_alias_requires_existing_base() {
        let mut paths = PathAliases::default();
        let err = paths.set("sources", Path::new("/nonexistent/toys")).unwrap_err();
        assert!(matches!(err, BuildError::PathNotFound(_)));
    }

    #[test]
    fn test_set_under_allows_missing_child() {
        let dir = TempDir::new().unwrap();
        let mut paths = PathAliases::default();
        let release = paths.set_under("release", dir.path(), "compressed").unwrap();
        assert!(release.ends_with("compressed"));
        assert!(!release.exists());
    }

    #[test]
    fn test_undefined_alias() {
        let paths = PathAliases::default();
        let err = paths.get("cache").unwrap_err();
        assert_eq!(err.to_string(), "path alias [cache] not defined");

        let urls = UrlAliases::default();
        let err = urls.get("build").unwrap_err();
        assert_eq!(err.to_string(), "URL alias [build] not defined");
    }

    #[test]
    fn test_url_join() {
        let mut urls = UrlAliases::default();
        urls.set("build", "../src/");
        urls.set("root", "");
        assert_eq!(urls.join("build", &["app", ""]).unwrap(), "../src/app");
        assert_eq!(urls.join("build", &[]).unwrap(), "../src");
        assert_eq!(urls.join("root", &["app"]).unwrap(), "app");
    }
}
