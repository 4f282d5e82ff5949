//! Build error taxonomy.
//!
//! Every variant is fatal: nothing is retried, and errors unwind unmodified
//! to the command entry point.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for build internals.
pub type BuildResult<T> = Result<T, BuildError>;

/// Fatal build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("path `{}` does not exist", .0.display())]
    PathNotFound(PathBuf),

    #[error("{kind} alias [{alias}] not defined")]
    AliasNotDefined { kind: &'static str, alias: String },

    #[error("module `{0}` not defined")]
    ModuleNotFound(String),

    #[error("module [{0}] already exists")]
    ModuleAlreadyExists(String),

    #[error("{reason} for decoding: {}", .path.display())]
    ManifestDecode { path: PathBuf, reason: DecodeReason },

    #[error("{0}")]
    Compressor(String),

    #[error("IO error at `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Classified reason a JSON manifest failed to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeReason {
    /// File is empty or decodes to nothing usable.
    Empty,
    /// Malformed JSON text.
    Syntax { line: usize, column: usize },
    /// Document ended in the middle of a value.
    Truncated,
    /// Valid JSON with the wrong shape (e.g. an array where an object is expected).
    Shape(String),
    /// Not valid UTF-8.
    Encoding,
    /// A glob pattern that cannot be compiled.
    Pattern(String),
}

impl DecodeReason {
    /// Classify a `serde_json` error.
    pub fn classify(err: &serde_json::Error) -> Self {
        use serde_json::error::Category;
        match err.classify() {
            Category::Syntax => Self::Syntax {
                line: err.line(),
                column: err.column(),
            },
            Category::Eof => Self::Truncated,
            Category::Data => Self::Shape(err.to_string()),
            Category::Io => Self::Encoding,
        }
    }
}

impl fmt::Display for DecodeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty document"),
            Self::Syntax { line, column } => {
                write!(f, "Syntax error, malformed JSON (line {line}, column {column})")
            }
            Self::Truncated => f.write_str("Unexpected end of JSON input"),
            Self::Shape(detail) => write!(f, "Unexpected JSON structure ({detail})"),
            Self::Encoding => f.write_str("Malformed UTF-8 characters"),
            Self::Pattern(detail) => write!(f, "Invalid glob pattern ({detail})"),
        }
    }
}

/// Substitute `%s`/`%d` placeholders with `args` in order; `%%` is a literal `%`.
///
/// Missing arguments leave the placeholder empty, extra arguments are ignored.
pub fn format_message(message: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(message.len());
    let mut args = args.iter();
    let mut chars = message.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some('s' | 'd') => {
                chars.next();
                if let Some(arg) = args.next() {
                    out.push_str(arg);
                }
            }
            _ => out.push('%'),
        }
    }
    out
}
