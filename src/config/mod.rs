//! Configuration for the module builder.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── alias.rs    # PathAliases, UrlAliases
//! ├── project.rs  # ProjectConfig (<sources>/toys.json)
//! ├── options.rs  # RunFlags, ProjectLayout, RunOptions
//! ├── util.rs     # settings file lookup
//! └── mod.rs      # BuilderConfig (toys.toml, this file)
//! ```
//!
//! # Layers
//!
//! | Layer                  | Source                 | Holds                          |
//! |------------------------|------------------------|--------------------------------|
//! | `BuilderConfig`        | `toys.toml` (optional) | sources/output/cache dirs      |
//! | CLI                    | `PathArgs`, `BuildArgs`| directory overrides, flags     |
//! | `ProjectConfig`        | `<sources>/toys.json`  | template-visible settings      |

mod alias;
mod options;
mod project;
mod util;

pub use alias::{PathAliases, UrlAliases};
pub use options::{OutputVariant, ProjectLayout, RunFlags, RunOptions};
pub use project::ProjectConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::cli::PathArgs;
use crate::log;
use util::find_config_file;

/// `[paths]` section of `toys.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the module tree
    pub sources: PathBuf,
    /// Root of the release trees
    pub output: PathBuf,
    /// Minification cache
    pub cache: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            sources: "src".into(),
            output: "dist".into(),
            cache: "cache".into(),
        }
    }
}

/// Builder settings, read from `toys.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Directory the settings file lives in (or the working directory)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub paths: PathsConfig,
}

impl BuilderConfig {
    /// Find `config_name` upward from the working directory and apply CLI
    /// overrides. A missing settings file means defaults rooted at the cwd.
    pub fn load(config_name: &Path, overrides: &PathArgs) -> Result<Self> {
        let mut config = match find_config_file(config_name) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config
            }
            None => Self {
                root: std::env::current_dir().context("Failed to get current working directory")?,
                ..Self::default()
            },
        };
        config.apply_overrides(overrides);
        Ok(config)
    }

    fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("Invalid settings in {}", path.display()))?;

        if !ignored.is_empty() {
            let display_path = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_else(|| path.to_string_lossy());
            log!("warning"; "unknown fields in {}, ignoring: {}", display_path, ignored.join(", "));
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn apply_overrides(&mut self, args: &PathArgs) {
        Self::update_option(&mut self.paths.sources, args.sources.as_ref());
        Self::update_option(&mut self.paths.output, args.output.as_ref());
        Self::update_option(&mut self.paths.cache, args.cache.as_ref());
    }

    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Absolute directory layout; relative entries hang off `root`.
    pub fn layout(&self) -> ProjectLayout {
        ProjectLayout {
            builder: self.root.clone(),
            sources: self.root.join(&self.paths.sources),
            output: self.root.join(&self.paths.output),
            cache: self.root.join(&self.paths.cache),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let (config, ignored) = BuilderConfig::parse_with_ignored("").unwrap();
        assert_eq!(config.paths, PathsConfig::default());
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (config, ignored) = BuilderConfig::parse_with_ignored(
            "[paths]\nsources = \"app\"\nassets = \"x\"\n\n[serve]\nport = 1\n",
        )
        .unwrap();
        assert_eq!(config.paths.sources, PathBuf::from("app"));
        assert_eq!(config.paths.output, PathBuf::from("dist"));
        assert_eq!(ignored, ["paths.assets", "serve"]);
    }

    #[test]
    fn test_overrides_and_layout() {
        let mut config = BuilderConfig {
            root: PathBuf::from("/work"),
            ..BuilderConfig::default()
        };
        config.apply_overrides(&PathArgs {
            sources: Some("app".into()),
            output: None,
            cache: Some("/tmp/toys-cache".into()),
        });

        let layout = config.layout();
        assert_eq!(layout.builder, PathBuf::from("/work"));
        assert_eq!(layout.sources, PathBuf::from("/work/app"));
        assert_eq!(layout.output, PathBuf::from("/work/dist"));
        assert_eq!(layout.cache, PathBuf::from("/tmp/toys-cache"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(BuilderConfig::parse_with_ignored("[paths\n").is_err());
    }
}
