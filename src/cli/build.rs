//! Build orchestration.
//!
//! Build pipeline phases:
//! - **Init** - clean, then create cache and release directories
//! - **Scan** - discover modules under the sources root
//! - **Load** - dependency-ordered aggregation of autoload modules
//! - **Compile** - copy or compress into the release tree
//! - **Render** - fill the shell template
//! - **Finalize** - write `index.html` (compile mode) and emit the document

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::{
    cache::MinifyCache,
    cli::{BuildArgs, Cli},
    compiler::{Compiler, Minifiers},
    config::{BuilderConfig, OutputVariant, ProjectLayout, RunFlags, RunOptions},
    debug, log,
    module::{Registry, load_modules},
    render::Renderer,
    utils::{
        path::fs::{make_path, remove_path, write_file},
        text::{plural_count, ucfirst},
    },
};

/// Entry point of `toys build`.
pub fn build(cli: &Cli, args: &BuildArgs) -> Result<()> {
    let config = BuilderConfig::load(&cli.config, &args.paths)?;
    let document = build_project(args.flags(), &config.layout())?;
    emit(&document, args.out_file.as_deref())
}

/// Run the pipeline and return the output document.
pub fn build_project(flags: RunFlags, layout: &ProjectLayout) -> Result<String> {
    init_build(flags, layout)?;

    let options = RunOptions::resolve(flags, layout)?;

    let registry = Registry::scan(&options)?;
    log!("build"; "found {}", plural_count(registry.len(), "module"));

    let mut loaded = load_modules(&registry)?;
    drop(registry);
    debug!("build"; "startup: {}", loaded.startup.join(", "));

    let stats = Compiler::new(&options, Minifiers::default())?.compile(&mut loaded)?;
    if options.compile() {
        log!(
            "build";
            "{} copied, {} minified, {} cached, {} skipped",
            stats.copied, stats.minified, stats.cached, stats.skipped
        );
    }

    let shell = Renderer::new(&options, &loaded).render()?;
    if !options.compile() {
        return Ok(shell);
    }

    finalize_release(&options, &shell)
}

/// Clean and prepare directories. Runs before aliases are registered, so
/// paths come straight from the layout.
fn init_build(flags: RunFlags, layout: &ProjectLayout) -> Result<()> {
    let cache = layout.builder.join(&layout.cache);

    if flags.clean {
        MinifyCache::new(&cache).clear()?;
        for variant in OutputVariant::ALL {
            remove_path(&layout.output.join(variant.dir_name()))?;
        }
        debug!("build"; "cleaned cache and release directories");
    }

    if flags.compile {
        make_path(&cache)?;
        make_path(&layout.output.join(OutputVariant::from_flags(&flags).dir_name()))?;
    }

    Ok(())
}

/// Write `<release>/index.html` and return the confirmation page.
fn finalize_release(options: &RunOptions, shell: &str) -> Result<String> {
    let release = options.path("release")?;
    let index = release.join("index.html");
    write_file(&index, shell)?;

    let live = format!("{}/index.html", options.urls.get("release")?);
    log!("build"; "wrote {}", live);

    Ok(confirmation_page(options.variant, &live, &index))
}

fn confirmation_page(variant: OutputVariant, live: &str, file: &Path) -> String {
    let title = format!("{} version", ucfirst(variant.dir_name()));
    format!(
        "<html lang=\"en\"><head><meta charset=\"utf-8\"><title>Toys builder - {title}</title></head>\
         <body><h1>{title}</h1><hr /><pre><b>Live location :</b> <a href=\"{live}\">{live}</a>\n\
         <b>File location :</b> {}</pre></body></html>",
        file.display()
    )
}

/// Print `document` to stdout, or write it to `out_file`.
fn emit(document: &str, out_file: Option<&Path>) -> Result<()> {
    match out_file {
        Some(path) => fs::write(path, document)
            .with_context(|| format!("Failed to write output to '{}'", path.display())),
        None => {
            println!("{document}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestProject;

    fn project() -> TestProject {
        let project = TestProject::new();
        project.module("app", r#"{"autoload": true}"#);
        project.write("src/app/styles/main.css", "a {\n    color: #ff0000;\n}");
        project.write("src/app/scripts/app.js", "var answer = 42;");
        project
    }

    #[test]
    fn test_dev_build_returns_shell() {
        let project = project();
        let document = build_project(RunFlags::default(), &project.layout()).unwrap();
        assert!(document.starts_with("<html><!-- Styles -->"));
        assert!(document.contains("<link href=\"src/app/styles/main.css\" rel=\"stylesheet\">"));
        assert!(!project.root().join("dist/uncompressed").exists());
    }

    #[test]
    fn test_compile_writes_index_and_confirmation() {
        let project = project();
        let flags = RunFlags::new(true, false, false, false);
        let document = build_project(flags, &project.layout()).unwrap();

        let index = project.root().join("dist/uncompressed/index.html");
        let shell = fs::read_to_string(&index).unwrap();
        assert!(shell.contains("<script src=\"./app/scripts/app.js\"></script>"));
        assert!(project.root().join("dist/uncompressed/app/scripts/app.js").is_file());
        assert!(project.root().join("cache").is_dir());

        assert!(document.contains("<title>Toys builder - Uncompressed version</title>"));
        assert!(document.contains(
            "<a href=\"dist/uncompressed/index.html\">dist/uncompressed/index.html</a>"
        ));
        assert!(document.contains(&index.display().to_string()));
    }

    #[test]
    fn test_compress_inlines_everything() {
        let project = project();
        let flags = RunFlags::new(false, true, false, false);
        let document = build_project(flags, &project.layout()).unwrap();
        assert!(document.contains("Compressed version"));

        let shell = fs::read_to_string(project.root().join("dist/compressed/index.html")).unwrap();
        assert!(shell.contains("a{color:red}"));
        assert!(shell.contains("<script type=\"text/javascript\">"));
        assert!(shell.contains("var answer=42"), "{shell}");
        assert!(!project.root().join("dist/compressed/app").exists());
    }

    #[test]
    fn test_clean_removes_previous_output() {
        let project = project();
        let stale = project.write("dist/compressed/old.txt", "stale");
        let cached = project.write("cache/0123", "stale");

        let flags = RunFlags::new(true, false, false, true);
        build_project(flags, &project.layout()).unwrap();

        assert!(!stale.exists());
        assert!(!cached.exists());
        assert!(project.root().join("dist/uncompressed/index.html").is_file());
    }

    #[test]
    fn test_missing_requirement_fails() {
        let project = TestProject::new();
        project.module("app", r#"{"autoload": true, "require": ["nowhere"]}"#);
        let err = build_project(RunFlags::default(), &project.layout()).unwrap_err();
        assert_eq!(err.to_string(), "module `nowhere` not defined");
    }

    #[test]
    fn test_emit_to_file() {
        let project = TestProject::new();
        let path = project.root().join("out.html");
        emit("<html></html>", Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "<html></html>");
    }
}
