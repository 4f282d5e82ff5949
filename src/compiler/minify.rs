//! Default minifiers, one per compressible category.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. Views go through an
//! identity minifier.

use std::sync::LazyLock;

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{
    CompressOptions, CompressOptionsUnused, Minifier as OxcMinifier, MinifierOptions,
};
use oxc::parser::Parser;
use oxc::span::SourceType;

use crate::core::FileCategory;
use crate::utils::text::remove_first_comment_block;

/// Text minifier.
pub trait Minifier: Send + Sync {
    /// Minified `source`, or `None` when it cannot be parsed.
    fn minify(&self, source: &str) -> Option<String>;
}

#[derive(Debug, Default)]
pub struct CssMinifier;

impl Minifier for CssMinifier {
    fn minify(&self, source: &str) -> Option<String> {
        let stylesheet = StyleSheet::parse(source, ParserOptions::default()).ok()?;
        let result = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..PrinterOptions::default()
            })
            .ok()?;
        Some(result.code)
    }
}

/// Module scripts share the global scope: they are parsed as classic
/// scripts, top-level names are never mangled and unreferenced top-level
/// declarations are kept.
#[derive(Debug, Default)]
pub struct JsMinifier;

impl Minifier for JsMinifier {
    fn minify(&self, source: &str) -> Option<String> {
        let allocator = Allocator::default();
        let source_type = SourceType::script();
        let ret = Parser::new(&allocator, source, source_type).parse();
        if !ret.errors.is_empty() {
            return None;
        }
        let mut program = ret.program;
        let options = MinifierOptions {
            mangle: Some(MangleOptions {
                top_level: Some(false),
                ..MangleOptions::default()
            }),
            compress: Some(CompressOptions {
                unused: CompressOptionsUnused::Keep,
                ..CompressOptions::smallest()
            }),
        };
        let ret = OxcMinifier::new(options).minify(&allocator, &mut program);
        let code = Codegen::new()
            .with_options(CodegenOptions {
                minify: true,
                comments: CommentOptions::disabled(),
                ..CodegenOptions::default()
            })
            .with_scoping(ret.scoping)
            .build(&program)
            .code;
        Some(code)
    }
}

#[derive(Debug, Default)]
pub struct HtmlMinifier;

impl Minifier for HtmlMinifier {
    fn minify(&self, source: &str) -> Option<String> {
        Some(source.to_string())
    }
}

static CSS: LazyLock<CssMinifier> = LazyLock::new(CssMinifier::default);
static JS: LazyLock<JsMinifier> = LazyLock::new(JsMinifier::default);
static HTML: LazyLock<HtmlMinifier> = LazyLock::new(HtmlMinifier::default);

/// Minifier set handed to the compiler.
#[derive(Clone, Copy)]
pub struct Minifiers {
    pub css: &'static dyn Minifier,
    pub js: &'static dyn Minifier,
    pub html: &'static dyn Minifier,
}

impl Default for Minifiers {
    fn default() -> Self {
        Self {
            css: &*CSS,
            js: &*JS,
            html: &*HTML,
        }
    }
}

impl Minifiers {
    pub fn for_category(&self, category: FileCategory) -> Option<&'static dyn Minifier> {
        match category {
            FileCategory::Styles => Some(self.css),
            FileCategory::Scripts | FileCategory::Models => Some(self.js),
            FileCategory::Views => Some(self.html),
            FileCategory::Assets | FileCategory::Lang => None,
        }
    }

    /// Minify `source` as `category`; unparsable input is kept as is.
    ///
    /// A leading `/* */` block left in style or script output is dropped.
    pub fn minify(&self, category: FileCategory, source: &str) -> String {
        let Some(code) = self
            .for_category(category)
            .and_then(|minifier| minifier.minify(source))
        else {
            return source.to_string();
        };
        match category {
            FileCategory::Styles | FileCategory::Scripts | FileCategory::Models => {
                remove_first_comment_block(&code)
            }
            _ => code,
        }
    }
}

impl std::fmt::Debug for Minifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Minifiers")
    }
}
