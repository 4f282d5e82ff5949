//! Text and identifier helpers.

use regex::Regex;
use std::sync::LazyLock;

/// Characters outside this set collapse to `-` in slugs.
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_\-]+").expect("valid slug regex"));

/// Separators between `classify` words.
static WORD_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("valid split regex"));

/// Normalize text content: CRLF to LF, tabs to four spaces, outer whitespace trimmed.
pub fn normalize_contents(content: &str) -> String {
    content
        .replace("\r\n", "\n")
        .replace('\t', "    ")
        .trim()
        .to_string()
}

/// Replace runs of characters outside `[A-Za-z0-9_-]` with a single `-`.
pub fn slugify(input: &str) -> String {
    SLUG_RE.replace_all(input, "-").into_owned()
}

/// PascalCase class name from a namespace (`app/user-list` -> `AppUserList`).
pub fn classify(input: &str) -> String {
    WORD_SPLIT_RE
        .split(input)
        .map(ucfirst)
        .collect::<Vec<_>>()
        .concat()
}

/// Uppercase the first character.
pub fn ucfirst(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `"1 module"`, `"3 modules"`.
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}

/// Strip leading `/* ... */` comment blocks left at the top of minified output.
pub fn remove_first_comment_block(data: &str) -> String {
    let mut data = data;
    while data.starts_with("/*") {
        match data.find("*/") {
            Some(end) => data = data[end + 2..].trim(),
            None => break,
        }
    }
    data.to_string()
}
