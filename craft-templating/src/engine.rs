//! Template engine for rendering named templates
//!
//! [`TemplateEngine`] pairs a liquid parser with a [`TemplateLoader`]; the
//! loader supplies both the templates rendered by path and the partials they
//! include. Field types render their inputs through the [`Templates`] trait so
//! they never depend on the engine directly.

use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::error::{Result, TemplatingError};
use crate::loader::TemplateLoader;

static INPUT_ID_BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\[\]]+").expect("Failed to compile input id regex"));

/// Turn an input name such as `fields[accentColor]` into an HTML id
/// (`fields-accentColor`).
pub fn format_input_id(name: &str) -> String {
    INPUT_ID_BRACKETS
        .replace_all(name, "-")
        .trim_end_matches('-')
        .to_string()
}

/// Rendering collaborator used by field types.
pub trait Templates: fmt::Debug {
    /// Render the template at `path` with `params` bound as globals.
    fn render(&self, path: &str, params: liquid::Object) -> Result<String>;

    /// HTML id for an input name.
    fn format_input_id(&self, name: &str) -> String {
        format_input_id(name)
    }
}

/// Liquid-backed template engine
pub struct TemplateEngine {
    parser: liquid::Parser,
    loader: TemplateLoader,
}

impl TemplateEngine {
    /// Engine serving the built-in form includes
    pub fn new() -> Result<Self> {
        Self::with_loader(TemplateLoader::with_builtins())
    }

    /// Engine over a prepared loader
    pub fn with_loader(loader: TemplateLoader) -> Result<Self> {
        let parser = build_parser(&loader)?;
        Ok(Self { parser, loader })
    }

    /// Engine serving the built-ins plus every template under `dir`
    pub fn with_directory(dir: &Path) -> Result<Self> {
        let mut loader = TemplateLoader::with_builtins();
        loader.load_directory(dir)?;
        Self::with_loader(loader)
    }

    /// Add a template and rebuild the parser so it is available as a partial.
    pub fn add_template(&mut self, name: impl Into<String>, source: impl Into<String>) -> Result<()> {
        self.loader.add(name, source);
        self.parser = build_parser(&self.loader)?;
        Ok(())
    }

    pub fn loader(&self) -> &TemplateLoader {
        &self.loader
    }

    pub fn has_template(&self, path: &str) -> bool {
        self.loader.contains(path)
    }

    /// Render an inline template string.
    pub fn render_str(&self, source: &str, params: &liquid::Object) -> Result<String> {
        let template = self
            .parser
            .parse(source)
            .map_err(|e| TemplatingError::Parse(e.to_string()))?;
        template
            .render(params)
            .map_err(|e| TemplatingError::Render(e.to_string()))
    }
}

impl Templates for TemplateEngine {
    fn render(&self, path: &str, params: liquid::Object) -> Result<String> {
        let source = self
            .loader
            .get(path)
            .ok_or_else(|| TemplatingError::TemplateNotFound {
                name: path.to_string(),
            })?;
        trace!(template = %path, "rendering template");
        self.render_str(source, &params)
    }
}

impl fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("templates", &self.loader.names())
            .finish()
    }
}

fn build_parser(loader: &TemplateLoader) -> Result<liquid::Parser> {
    let partials = liquid::partials::EagerCompiler::new(loader.clone());
    liquid::ParserBuilder::with_stdlib()
        .partials(partials)
        .build()
        .map_err(|e| TemplatingError::Parse(e.to_string()))
}
