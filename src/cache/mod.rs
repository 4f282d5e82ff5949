//! Minification cache.
//!
//! A flat directory holding one entry per source file:
//!
//! - file name: hex digest of the absolute source path
//! - contents: the compiled (minified) output
//! - mtime: forced to the source's mtime when the entry is written
//!
//! An entry is valid iff its mtime still equals the source's mtime. File
//! contents are never hashed.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::core::{BuildError, BuildResult};
use crate::utils::path::fs::{make_path, remove_path};

/// Modification time of `path`, if it can be read.
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Cache rooted at one directory.
#[derive(Debug, Clone)]
pub struct MinifyCache {
    dir: PathBuf,
}

impl MinifyCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Entry name for `source` (first 16 bytes of its blake3 path digest).
    pub fn key(source: &Path) -> String {
        let hash = blake3::hash(source.as_os_str().as_encoded_bytes());
        hex::encode(&hash.as_bytes()[..16])
    }

    pub fn entry_path(&self, source: &Path) -> PathBuf {
        self.dir.join(Self::key(source))
    }

    /// Cached output for `source`, if the entry is still fresh.
    pub fn get(&self, source: &Path) -> Option<String> {
        let entry = self.entry_path(source);
        let source_mtime = get_mtime(source)?;
        if get_mtime(&entry)? != source_mtime {
            return None;
        }
        fs::read_to_string(&entry).ok()
    }

    /// Store `data` for `source`, stamped with the source's current mtime.
    pub fn set(&self, source: &Path, data: &str) -> BuildResult<()> {
        let mtime = source
            .metadata()
            .and_then(|m| m.modified())
            .map_err(|e| BuildError::io(source, e))?;

        make_path(&self.dir)?;
        let entry = self.entry_path(source);
        fs::write(&entry, data).map_err(|e| BuildError::io(&entry, e))?;

        File::options()
            .write(true)
            .open(&entry)
            .and_then(|file| file.set_modified(mtime))
            .map_err(|e| BuildError::io(&entry, e))
    }

    /// Remove the whole cache directory.
    pub fn clear(&self) -> BuildResult<bool> {
        remove_path(&self.dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn touch(path: &Path, offset: u64) {
        let mtime = get_mtime(path).unwrap() + Duration::from_secs(offset);
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
    }

    #[test]
    fn test_key_is_stable_per_path() {
        let a = MinifyCache::key(Path::new("/src/app/a.js"));
        assert_eq!(a.len(), 32);
        assert_eq!(a, MinifyCache::key(Path::new("/src/app/a.js")));
        assert_ne!(a, MinifyCache::key(Path::new("/src/app/b.js")));
    }

    #[test]
    fn test_hit_then_miss_after_touch() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.js");
        fs::write(&source, "var a = 1;").unwrap();
        let cache = MinifyCache::new(dir.path().join("cache"));

        assert_eq!(cache.get(&source), None);
        cache.set(&source, "var a=1").unwrap();
        assert_eq!(cache.get(&source).as_deref(), Some("var a=1"));

        touch(&source, 5);
        assert_eq!(cache.get(&source), None);
    }

    #[test]
    fn test_missing_source() {
        let dir = TempDir::new().unwrap();
        let cache = MinifyCache::new(dir.path());
        let source = dir.path().join("gone.css");
        assert_eq!(cache.get(&source), None);
        assert!(matches!(cache.set(&source, ""), Err(BuildError::Io { .. })));
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.css");
        fs::write(&source, "a {}").unwrap();
        let cache = MinifyCache::new(dir.path().join("cache"));
        cache.set(&source, "a{}").unwrap();

        assert!(cache.clear().unwrap());
        assert!(!dir.path().join("cache").exists());
        assert!(!cache.clear().unwrap());
    }
}
