//! Path and URL string helpers.
//!
//! - [`fs`]: filesystem side (absolute paths, copy, remove)
//! - this module: pure slash-separated string manipulation

pub mod fs;

use std::path::{Component, Path};

/// Replace backslashes with slashes, collapse repeated separators and trim
/// leading/trailing separators.
///
/// # Example
/// ```ignore
/// normalize_path("\\foo//bar/") -> "foo/bar"
/// ```
pub fn normalize_path(path: &str) -> String {
    path.split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Join non-empty segments with `/`, normalizing each one.
pub fn concat_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| normalize_path(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Slash-separated form of a filesystem path.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Relative URL leading from directory `from` to `to`.
///
/// Shared leading components are dropped, one `..` is emitted per remaining
/// component of `from`, then the rest of `to` follows.
///
/// # Example
/// ```ignore
/// relative_path("/www/builder", "/www/src")  -> "../src"
/// relative_path("/www", "/www/dist/compressed") -> "dist/compressed"
/// ```
pub fn relative_path(from: &Path, to: &Path) -> String {
    let from: Vec<_> = from.components().collect();
    let to: Vec<_> = to.components().collect();

    let shared = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - shared];
    parts.extend(
        to[shared..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}
