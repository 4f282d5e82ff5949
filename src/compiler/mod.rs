//! Release compilation of aggregated files.
//!
//! Nothing happens outside compile mode: the dev shell references sources by
//! URL. When compiling:
//!
//! | Mode       | Category                       | Action                                   |
//! |------------|--------------------------------|------------------------------------------|
//! | copy       | all but views/lang             | byte copy to the release path            |
//! | compress   | assets (and lang)              | hook, then copy unless skipped           |
//! | compress   | styles/scripts/models/views    | cache, else read + hook + minify + cache |
//!
//! Compressed files are never copied; their `data` is inlined by the
//! renderer. A hook abort stops the build and leaves whatever was already
//! written in the release tree.

mod minify;

pub use minify::Minifiers;

use std::fs;

use crate::cache::MinifyCache;
use crate::compressor::Compressor;
use crate::config::RunOptions;
use crate::core::{BuildError, BuildResult};
use crate::module::{AssetFile, LoadedModules};
use crate::utils::path::fs::copy_file;
use crate::utils::text::normalize_contents;

/// Counters reported after a compile.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CompileStats {
    pub copied: usize,
    pub minified: usize,
    pub cached: usize,
    pub skipped: usize,
}

pub struct Compiler<'a> {
    options: &'a RunOptions,
    cache: Option<MinifyCache>,
    minifiers: Minifiers,
    stats: CompileStats,
}

impl<'a> Compiler<'a> {
    pub fn new(options: &'a RunOptions, minifiers: Minifiers) -> BuildResult<Self> {
        let cache = if options.use_cache() {
            Some(MinifyCache::new(options.path("cache")?))
        } else {
            None
        };
        Ok(Self {
            options,
            cache,
            minifiers,
            stats: CompileStats::default(),
        })
    }

    /// Copy or compress every aggregated file, filling `AssetFile::data`.
    pub fn compile(mut self, loaded: &mut LoadedModules) -> BuildResult<CompileStats> {
        if !self.options.compile() {
            return Ok(self.stats);
        }

        let LoadedModules {
            aggregate, modules, ..
        } = loaded;

        for (_, files) in aggregate.iter_mut() {
            for file in files.iter_mut() {
                let compressor = modules
                    .iter()
                    .find(|m| m.namespace == file.owner.namespace)
                    .and_then(|m| m.compressor.as_ref());

                if self.options.compress() {
                    self.compress_file(file, compressor)?;
                } else {
                    self.copy_file(file)?;
                }
            }
        }

        Ok(self.stats)
    }

    /// Views and lang files only exist to be inlined.
    fn copy_file(&mut self, file: &AssetFile) -> BuildResult<()> {
        if file.category.is_copied() {
            copy_file(&file.path, &file.release_path)?;
            self.stats.copied += 1;
        }
        Ok(())
    }

    fn compress_file(&mut self, file: &mut AssetFile, compressor: Option<&Compressor>) -> BuildResult<()> {
        if !file.compressible {
            if run_hook(compressor, file)? {
                self.copy_file(file)?;
            } else {
                self.stats.skipped += 1;
            }
            return Ok(());
        }

        if let Some(data) = self.cache.as_ref().and_then(|c| c.get(&file.path)) {
            crate::debug!("cache"; "hit {} ({})", file.url, file.id);
            file.data = Some(data);
            self.stats.cached += 1;
            return Ok(());
        }

        let source = fs::read(&file.path).map_err(|e| BuildError::io(&file.path, e))?;
        file.data = Some(normalize_contents(&String::from_utf8_lossy(&source)));

        if run_hook(compressor, file)? {
            let minified = self.minifiers.minify(file.category, file.data_or_empty());
            file.data = Some(minified);
            crate::debug!("minify"; "{}: {}", file.owner.namespace, file.relative_path);
            self.stats.minified += 1;
        } else {
            self.stats.skipped += 1;
        }

        if let Some(cache) = &self.cache {
            cache.set(&file.path, file.data_or_empty())?;
        }
        Ok(())
    }
}

/// `Ok(true)` to run the default action, `Ok(false)` if the hook skipped it.
fn run_hook(compressor: Option<&Compressor>, file: &mut AssetFile) -> BuildResult<bool> {
    match compressor {
        Some(compressor) => compressor.run_file(file).into_result(),
        None => Ok(true),
    }
}
