//! Per-run options, resolved once at the command boundary.

use std::fmt;
use std::path::{Path, PathBuf};

use super::{PathAliases, ProjectConfig, UrlAliases, project::DEFAULT_MANIFEST};
use crate::core::BuildResult;
use crate::utils::path::relative_path;

/// Build flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunFlags {
    /// Produce a release tree instead of a dev shell.
    pub compile: bool,
    /// Minify and inline styles/scripts/views (implies `compile`).
    pub compress: bool,
    /// Use the minification cache.
    pub cache: bool,
    /// Remove cache and release directories before building.
    pub clean: bool,
}

impl Default for RunFlags {
    fn default() -> Self {
        Self {
            compile: false,
            compress: false,
            cache: true,
            clean: false,
        }
    }
}

impl RunFlags {
    /// Flags from the individual switches; `compress` turns `compile` on.
    pub const fn new(compile: bool, compress: bool, nocache: bool, clean: bool) -> Self {
        Self {
            compile: compile || compress,
            compress,
            cache: !nocache,
            clean,
        }
    }
}

/// Release directory variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputVariant {
    Compressed,
    Uncompressed,
}

impl OutputVariant {
    pub const fn from_flags(flags: &RunFlags) -> Self {
        if flags.compress {
            Self::Compressed
        } else {
            Self::Uncompressed
        }
    }

    /// Directory name under the output root.
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Compressed => "compressed",
            Self::Uncompressed => "uncompressed",
        }
    }

    /// Both variants, for cleaning.
    pub const ALL: [Self; 2] = [Self::Compressed, Self::Uncompressed];
}

impl fmt::Display for OutputVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// On-disk layout of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// Directory the dev shell is served from; URLs are relative to it.
    pub builder: PathBuf,
    /// Root of the module tree (holds the project manifest).
    pub sources: PathBuf,
    /// Root of the release trees.
    pub output: PathBuf,
    /// Minification cache directory.
    pub cache: PathBuf,
}

/// Everything a build needs to know, fixed for one invocation.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub flags: RunFlags,
    pub variant: OutputVariant,
    pub paths: PathAliases,
    pub urls: UrlAliases,
    pub project: ProjectConfig,
}

impl RunOptions {
    /// Register path/URL aliases for `layout` and load the project manifest.
    ///
    /// The builder, sources and output directories must exist, as must the
    /// project manifest.
    pub fn resolve(flags: RunFlags, layout: &ProjectLayout) -> BuildResult<Self> {
        let variant = OutputVariant::from_flags(&flags);
        let mut paths = PathAliases::default();
        let mut urls = UrlAliases::default();

        let builder = paths.set("builder", &layout.builder)?;
        let sources = paths.set("sources", &layout.sources)?;
        let config = paths.set("config", &sources.join(DEFAULT_MANIFEST))?;
        let output = paths.set("output", &layout.output)?;
        paths.set_under("cache", &builder, &layout.cache)?;
        let release = paths.set_under("release", &output, variant.dir_name())?;

        let sources_url = urls.set("sources", &relative_path(&builder, &sources));
        urls.set("release", &relative_path(&builder, &release));
        urls.set("build", if flags.compile { "." } else { sources_url.as_str() });

        let project = ProjectConfig::load(&config)?;
        paths.set_under("main_file", &sources, project.main_file())?;

        Ok(Self {
            flags,
            variant,
            paths,
            urls,
            project,
        })
    }

    #[inline]
    pub const fn compile(&self) -> bool {
        self.flags.compile
    }

    #[inline]
    pub const fn compress(&self) -> bool {
        self.flags.compress
    }

    #[inline]
    pub const fn use_cache(&self) -> bool {
        self.flags.cache
    }

    /// Shorthand for `paths.get(alias)`.
    pub fn path(&self, alias: &str) -> BuildResult<&Path> {
        self.paths.get(alias)
    }

    /// Builder state readable from the shell template as `{{field}}`.
    pub fn state_field(&self, name: &str) -> Option<String> {
        let flag = |b: bool| if b { "1" } else { "" }.to_string();
        match name {
            "compile" => Some(flag(self.flags.compile)),
            "compress" => Some(flag(self.flags.compress)),
            "cache" => Some(flag(self.flags.cache)),
            "clean" => Some(flag(self.flags.clean)),
            "output_type" => Some(self.variant.dir_name().to_string()),
            _ => None,
        }
    }
}
