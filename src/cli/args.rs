//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::RunFlags;

/// Toys module builder CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Builder settings file (default: toys.toml, searched upward)
    #[arg(short = 'C', long, global = true, default_value = "toys.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render the shell, or compile a release tree
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Scaffold a new module
    #[command(visible_alias = "m")]
    Make {
        /// Namespace of the new module (e.g. `ui/date-picker`)
        namespace: String,

        #[command(flatten)]
        paths: PathArgs,
    },
}

/// Directory overrides shared by every command.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// Sources directory (relative to the settings file)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub sources: Option<PathBuf>,

    /// Output directory holding the release trees
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Minification cache directory
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub cache: Option<PathBuf>,
}

/// Build command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Compile a release tree instead of rendering the dev shell
    #[arg(short = 'c', long)]
    pub compile: bool,

    /// Minify and inline styles, scripts and views (implies --compile)
    #[arg(short = 'z', long)]
    pub compress: bool,

    /// Bypass the minification cache
    #[arg(long)]
    pub nocache: bool,

    /// Remove the cache and release directories first
    #[arg(long)]
    pub clean: bool,

    /// Write the output document to a file instead of stdout
    #[arg(short = 'f', long = "out-file", value_hint = clap::ValueHint::FilePath)]
    pub out_file: Option<PathBuf>,

    #[command(flatten)]
    pub paths: PathArgs,
}

impl BuildArgs {
    pub const fn flags(&self) -> RunFlags {
        RunFlags::new(self.compile, self.compress, self.nocache, self.clean)
    }
}
