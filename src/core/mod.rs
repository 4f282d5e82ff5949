//! Core types - pure abstractions shared across the codebase.

mod category;
mod error;

pub use category::{CategoryMap, FileCategory};
pub use error::{BuildError, BuildResult, DecodeReason, format_message};
