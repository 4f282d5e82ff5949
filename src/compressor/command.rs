//! Command-backed hooks loaded from a module's hook file.
//!
//! ```json
//! {
//!     "initialize": ["./check-tools.sh"],
//!     "styles"    : ["npx", "postcss", "--use", "autoprefixer"],
//!     "views"     : "./inline-views.sh"
//! }
//! ```
//!
//! Commands run in the module directory. File data (for compressible
//! categories) is piped on stdin, and the trimmed stdout is decoded with
//! [`HookOutcome::from_value`]. `$TOYS_*` variables are substituted in
//! arguments and exported to the process.

use serde::Deserialize;
use std::path::Path;

use super::{Compressor, HookOutcome};
use crate::core::{BuildResult, FileCategory};
use crate::module::{AssetFile, Module};
use crate::utils::exec::Cmd;
use crate::utils::json::{load_json_file, one_or_many};
use crate::utils::path::to_slash;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct HookFile {
    #[serde(deserialize_with = "one_or_many")]
    initialize: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    assets: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    styles: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    scripts: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    views: Vec<String>,
}

/// Load `path` as a [`Compressor`]. A missing file is not an error.
pub fn load_hook_file(path: &Path, module_dir: &Path) -> BuildResult<Option<Compressor>> {
    if !path.is_file() {
        return Ok(None);
    }

    let hooks: HookFile = load_json_file(path)?;
    let mut compressor = Compressor::new();

    if !hooks.initialize.is_empty() {
        let command = hooks.initialize;
        let dir = module_dir.to_path_buf();
        compressor = compressor.on_initialize(move |module: &Module| {
            let vars = module_vars(&module.namespace, &module.class_name, &dir);
            run_command(&command, &dir, &vars, None, &mut None)
        });
    }

    for (category, command) in [
        (FileCategory::Assets, hooks.assets),
        (FileCategory::Styles, hooks.styles),
        (FileCategory::Scripts, hooks.scripts),
        (FileCategory::Views, hooks.views),
    ] {
        if command.is_empty() {
            continue;
        }
        let dir = module_dir.to_path_buf();
        compressor = compressor.on_file(category, move |file: &mut AssetFile| {
            let vars = file_vars(file, &dir);
            let input = file.compressible.then(|| file.data_or_empty().to_string());
            run_command(&command, &dir, &vars, input.as_deref(), &mut file.data)
        });
    }

    Ok(Some(compressor))
}

type Vars = Vec<(String, String)>;

fn module_vars(namespace: &str, class_name: &str, dir: &Path) -> Vars {
    vec![
        ("TOYS_MODULE".into(), namespace.into()),
        ("TOYS_CLASS".into(), class_name.into()),
        ("TOYS_MODULE_PATH".into(), to_slash(dir)),
    ]
}

fn file_vars(file: &AssetFile, dir: &Path) -> Vars {
    let mut vars = module_vars(&file.owner.namespace, &file.owner.class_name, dir);
    vars.extend([
        ("TOYS_TYPE".into(), file.category.name().into()),
        ("TOYS_FILE".into(), to_slash(&file.path)),
        ("TOYS_RELEASE_PATH".into(), to_slash(&file.release_path)),
        ("TOYS_URL".into(), file.url.clone()),
    ]);
    vars
}

/// Replace `$TOYS_*` occurrences in `args`.
///
/// Longer names go first so `$TOYS_MODULE_PATH` is not eaten by `$TOYS_MODULE`.
fn resolve_args(args: &[String], vars: &Vars) -> Vec<String> {
    let mut ordered: Vec<_> = vars.iter().collect();
    ordered.sort_by_key(|(key, _)| std::cmp::Reverse(key.len()));

    args.iter()
        .map(|arg| {
            let mut result = arg.clone();
            for (key, value) in &ordered {
                result = result.replace(&format!("${key}"), value);
            }
            result
        })
        .collect()
}

fn run_command(
    command: &[String],
    dir: &Path,
    vars: &Vars,
    input: Option<&str>,
    data: &mut Option<String>,
) -> HookOutcome {
    let resolved = resolve_args(command, vars);
    let mut cmd = Cmd::from_slice(&resolved).cwd(dir).envs(vars);
    if let Some(input) = input {
        cmd = cmd.stdin(input);
    }
    let name = cmd.program_name();

    let output = match cmd.run() {
        Ok(output) => output,
        Err(e) => return HookOutcome::Abort(format!("failed to run compressor hook `{name}`: {e}")),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return HookOutcome::Abort(format!("compressor hook `{name}` failed: {}", stderr.trim()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout.trim();
    if stdout.is_empty() {
        return HookOutcome::Continue;
    }

    match serde_json::from_str(stdout) {
        Ok(value) => HookOutcome::from_value(value, data),
        Err(_) => HookOutcome::Abort(format!("compressor hook `{name}` printed invalid output: {stdout}")),
    }
}
