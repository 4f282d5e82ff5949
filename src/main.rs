//! Toys - a module builder for single-page applications.

mod cache;
mod cli;
mod compiler;
mod compressor;
mod config;
mod core;
mod logger;
mod module;
mod render;
mod utils;

#[cfg(test)]
mod test_utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    if let Err(e) = run(&cli) {
        log!("error"; "{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Build { build_args } => cli::build::build(cli, build_args),
        Commands::Make { namespace, paths } => cli::make::make(cli, namespace, paths),
    }
}
