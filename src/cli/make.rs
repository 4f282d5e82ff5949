//! Module scaffolding.
//!
//! Creates a module directory with a manifest and one starter file per
//! category:
//!
//! ```text
//! <namespace>/
//! ├── toys.json
//! ├── module.js
//! ├── assets/
//! ├── lang/<lang>.json
//! ├── models/model.js
//! ├── scripts/
//! ├── styles/default.css
//! └── views/default.tpl
//! ```

use anyhow::{Result, bail};
use serde_json::{Value, json};
use std::path::PathBuf;

use crate::{
    cli::{Cli, PathArgs},
    config::{BuilderConfig, RunFlags, RunOptions},
    core::{BuildError, FileCategory},
    log,
    module::{ModuleConfig, Registry},
    utils::{
        path::{
            fs::{make_path, write_file},
            normalize_path,
        },
        text::classify,
    },
};

/// Entry point of `toys make <namespace>`.
pub fn make(cli: &Cli, namespace: &str, paths: &PathArgs) -> Result<()> {
    let config = BuilderConfig::load(&cli.config, paths)?;
    let options = RunOptions::resolve(RunFlags::default(), &config.layout())?;
    let dir = make_module(&options, namespace)?;
    log!("make"; "created {}", dir.display());
    Ok(())
}

/// Scaffold `namespace` under the sources root and return its directory.
pub fn make_module(options: &RunOptions, namespace: &str) -> Result<PathBuf> {
    let namespace = normalize_path(&namespace.trim().to_lowercase());
    if namespace.is_empty() {
        bail!("module namespace is empty");
    }

    let registry = Registry::scan(options)?;
    if registry.contains(&namespace) {
        return Err(BuildError::ModuleAlreadyExists(namespace).into());
    }

    let dir = options.paths.join("sources", &namespace)?;
    let class_name = classify(&namespace);

    for category in FileCategory::ALL {
        make_path(&dir.join(category.name()))?;
    }

    let defaults = ModuleConfig::default();
    write_file(
        &dir.join(options.project.manifest_filename()),
        manifest_template(&defaults)?,
    )?;
    write_file(
        &dir.join("lang").join(format!("{}.json", options.project.lang())),
        format!("{:#}\n", json!({ "name": class_name })),
    )?;
    write_file(
        &dir.join(&defaults.main),
        format!("var {class_name} = ToysModule.extend({{}});\n"),
    )?;
    write_file(
        &dir.join("models/model.js"),
        format!("{class_name}.Model = ToysModel.extend({{}});\n"),
    )?;
    write_file(
        &dir.join("styles/default.css"),
        format!("#{} {{}}\n", class_name.to_lowercase()),
    )?;
    write_file(
        &dir.join("views/default.tpl"),
        format!("<div>\n    <h1>{class_name}</h1>\n</div>\n"),
    )?;

    log!("make"; "module `{}` ({})", namespace, class_name);
    Ok(dir)
}

/// Pretty manifest with the `:` of every key aligned.
fn manifest_template(config: &ModuleConfig) -> Result<String> {
    let Value::Object(map) = serde_json::to_value(config)? else {
        bail!("module defaults are not an object");
    };

    let width = map.keys().map(|k| k.len() + 2).max().unwrap_or(0);
    let lines: Vec<String> = map
        .iter()
        .map(|(key, value)| format!("    {:<width$}: {value}", format!("\"{key}\"")))
        .collect();

    Ok(format!("{{\n{}\n}}\n", lines.join(",\n")))
}
