//! Glob pattern expansion into ordered file lists.

use glob::{MatchOptions, Pattern};
use jwalk::WalkDir;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

use super::file::{AssetFile, FileContext};
use crate::core::{BuildError, BuildResult, DecodeReason, FileCategory};
use crate::utils::path::normalize_path;

/// `*` neither crosses `/` nor matches hidden entries.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Expand `patterns` (relative to the module asset root) into files.
///
/// Order: pattern order, then match order within one pattern, with
/// directories flattened depth-first in place. A path already listed is
/// never added twice.
pub fn expand_patterns(
    ctx: &FileContext,
    category: FileCategory,
    patterns: &[String],
) -> BuildResult<Vec<AssetFile>> {
    let mut seen = FxHashSet::default();
    let mut files = Vec::new();

    for pattern in patterns {
        for path in glob_paths(&ctx.sources_path, pattern)? {
            if path.is_file() {
                if seen.insert(path.clone()) {
                    files.push(AssetFile::new(ctx, category, path));
                }
            } else if path.is_dir() {
                for nested in walk_files(&path) {
                    if seen.insert(nested.clone()) {
                        files.push(AssetFile::new(ctx, category, nested));
                    }
                }
            }
        }
    }

    Ok(files)
}

/// Paths matching `pattern` under `root`, sorted.
///
/// A pattern naming a directory is treated as `<dir>/*`.
fn glob_paths(root: &Path, pattern: &str) -> BuildResult<Vec<PathBuf>> {
    let mut pattern = normalize_path(pattern);
    if root.join(&pattern).is_dir() {
        pattern.push_str("/*");
    }

    let full = format!(
        "{}/{}",
        Pattern::escape(&root.to_string_lossy()),
        pattern
    );
    let matches = glob::glob_with(&full, MATCH_OPTIONS).map_err(|e| BuildError::ManifestDecode {
        path: root.to_path_buf(),
        reason: DecodeReason::Pattern(format!("{pattern}: {}", e.msg)),
    })?;

    // Unreadable entries are skipped, like a shell glob would.
    Ok(matches.filter_map(Result::ok).collect())
}

/// Every non-hidden file below `dir`, depth-first and sorted by name.
fn walk_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort(true)
        .skip_hidden(true)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .collect()
}
