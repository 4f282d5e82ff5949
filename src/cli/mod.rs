//! Command-line interface module.

mod args;
pub mod build;
pub mod make;

pub use args::{BuildArgs, Cli, Commands, PathArgs};
