//! Prefixed, colored status lines on stderr.
//!
//! stdout carries the rendered document, so nothing here ever writes to it.
//!
//! ```ignore
//! log!("build"; "found {}", plural_count(n, "module"));
//! debug!("cache"; "hit {}", file.url);
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream, Style};
use std::{
    io::{Write, stderr},
    sync::atomic::{AtomicBool, Ordering},
};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Turn `debug!` output on or off (`--verbose`).
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// `log!("prefix"; "format", args...)`
#[macro_export]
macro_rules! log {
    ($prefix:expr; $($arg:tt)*) => {
        $crate::logger::log($prefix, &format!($($arg)*))
    };
}

/// Like [`log!`], printed only in verbose mode.
#[macro_export]
macro_rules! debug {
    ($prefix:expr; $($arg:tt)*) => {
        if $crate::logger::is_verbose() {
            $crate::logger::log($prefix, &format!($($arg)*))
        }
    };
}

/// Write `[prefix] message` as one line.
pub fn log(prefix: &str, message: &str) {
    let mut err = stderr().lock();
    // Wipe whatever a previous partial line left behind.
    let _ = execute!(err, Clear(ClearType::UntilNewLine));
    let _ = writeln!(err, "{} {message}", styled_prefix(prefix));
}

fn styled_prefix(prefix: &str) -> String {
    let style = match prefix.to_ascii_lowercase().as_str() {
        "error" => Style::new().bright_red(),
        "build" => Style::new().bright_blue(),
        "make" => Style::new().bright_green(),
        _ => Style::new().bright_yellow(),
    };
    let label = format!("[{prefix}]");
    label
        .if_supports_color(Stream::Stderr, |text| text.style(style.bold()))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_text_survives_styling() {
        owo_colors::set_override(false);
        assert_eq!(styled_prefix("Build"), "[Build]");
        assert_eq!(styled_prefix("warning"), "[warning]");
    }

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
