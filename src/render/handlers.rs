//! Generated fragments for the built-in tags.

use serde_json::{Map, Value};

use super::Renderer;
use crate::core::{BuildResult, FileCategory};
use crate::module::AssetFile;
use crate::utils::json::load_json_file;
use crate::utils::path::fs::read_normalized;
use crate::utils::text::{slugify, ucfirst};

/// Tag handler producing the replacement text.
pub type TagHandler = fn(&Renderer<'_>) -> BuildResult<String>;

/// Built-in tags. Checked before project config keys.
pub const HANDLERS: &[(&str, TagHandler)] = &[
    ("styles", render_styles),
    ("scripts", render_scripts),
    ("views", render_views),
    ("config", render_config),
    ("texts", render_texts),
    ("modules", render_modules),
];

pub fn find(tag: &str) -> Option<TagHandler> {
    HANDLERS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, handler)| *handler)
}

/// `<!-- Label -->` followed by one line per entry, indented two tabs.
fn html_collection(label: &str, lines: &[String]) -> String {
    let mut buffer = format!("<!-- {} -->\n", ucfirst(label));
    for line in lines {
        buffer.push_str("\t\t");
        buffer.push_str(line);
        buffer.push('\n');
    }
    buffer.trim().to_string()
}

fn render_styles(renderer: &Renderer<'_>) -> BuildResult<String> {
    Ok(render_assets(renderer, FileCategory::Styles))
}

fn render_scripts(renderer: &Renderer<'_>) -> BuildResult<String> {
    Ok(render_assets(renderer, FileCategory::Scripts))
}

/// Tags by URL in dev/copy mode; one inline element in compressed mode.
fn render_assets(renderer: &Renderer<'_>, category: FileCategory) -> String {
    let files = renderer.loaded.aggregate.files(category);
    if files.is_empty() {
        return String::new();
    }

    let styles = category == FileCategory::Styles;
    let lines: Vec<String> = if renderer.options.compress() {
        let (open, close) = if styles {
            ("<style type=\"text/css\">", "</style>")
        } else {
            ("<script type=\"text/javascript\">", "</script>")
        };
        std::iter::once(open.to_string())
            .chain(files.iter().map(|f| format!("/* ===>>> {} */{}", f.url, f.data_or_empty())))
            .chain(std::iter::once(close.to_string()))
            .collect()
    } else {
        files
            .iter()
            .map(|f| {
                if styles {
                    format!("<link href=\"{}\" rel=\"stylesheet\">", f.url)
                } else {
                    format!("<script src=\"{}\"></script>", f.url)
                }
            })
            .collect()
    };

    html_collection(category.name(), &lines)
}

fn render_views(renderer: &Renderer<'_>) -> BuildResult<String> {
    let views = renderer.loaded.aggregate.files(FileCategory::Views);
    if views.is_empty() {
        return Ok(String::new());
    }

    let lines = views
        .iter()
        .map(|view| {
            let content = match &view.data {
                Some(data) => data.clone(),
                None => read_normalized(&view.path)?,
            };
            Ok(format!(
                "<script type=\"text/html\" id=\"{}\">{content}</script>",
                view_id(view)
            ))
        })
        .collect::<BuildResult<Vec<_>>>()?;

    Ok(html_collection("views", &lines))
}

/// `<module id>-<slug of the file stem>-view`, lowercase.
fn view_id(view: &AssetFile) -> String {
    format!("{}-{}-view", view.owner.id, slugify(view.stem())).to_lowercase()
}

fn render_config(renderer: &Renderer<'_>) -> BuildResult<String> {
    Ok(renderer.options.project.to_json())
}

/// `{ lang: { ClassName: { key: text } } }` over every loaded lang file.
fn render_texts(renderer: &Renderer<'_>) -> BuildResult<String> {
    let mut compiled: Map<String, Value> = Map::new();

    for file in renderer.loaded.aggregate.files(FileCategory::Lang) {
        let texts: Map<String, Value> = load_json_file(&file.path)?;
        let language = compiled
            .entry(file.stem().to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(language) = language else {
            continue;
        };
        let module = language
            .entry(file.owner.class_name.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(module) = module {
            module.extend(texts);
        }
    }

    Ok(Value::Object(compiled).to_string())
}

fn render_modules(renderer: &Renderer<'_>) -> BuildResult<String> {
    Ok(Value::from(renderer.loaded.startup.clone()).to_string())
}
