//! Utility modules for the project builder.

pub mod exec;
pub mod json;
pub mod path;
pub mod text;
