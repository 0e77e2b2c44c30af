//! Template loading
//!
//! A [`TemplateLoader`] maps template paths (`_includes/forms/color`,
//! `news/_entry`) to liquid source. It is filled from built-in form includes,
//! from in-memory sources, and optionally from a directory of `.liquid` or
//! `.html` files. The same loader serves liquid `{% include %}` partials.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::error::{Result, TemplatingError};

/// Template file extensions recognised when loading a directory
pub const TEMPLATE_EXTENSIONS: &[&str] = &[".liquid", ".html"];

/// Path prefix of the built-in form includes
pub const FORM_INCLUDES: &str = "_includes/forms";

const COLOR_INPUT: &str = r#"<div class="color-container"><div class="color small static"><div class="color-preview" style="background-color: {{ value | escape }};"></div></div><input type="color" class="color-input" id="{{ id | escape }}" name="{{ name | escape }}" value="{{ value | escape }}" size="10"></div>"#;

const TEXT_INPUT: &str = r#"<input type="text" class="text fullwidth" id="{{ id | escape }}" name="{{ name | escape }}" value="{{ value | escape }}"{% if maxlength %} maxlength="{{ maxlength }}"{% endif %}{% if placeholder %} placeholder="{{ placeholder | escape }}"{% endif %}>"#;

const NUMBER_INPUT: &str = r#"<input type="number" class="text" id="{{ id | escape }}" name="{{ name | escape }}" value="{{ value | escape }}"{% if min %} min="{{ min }}"{% endif %}{% if max %} max="{{ max }}"{% endif %}{% if step %} step="{{ step }}"{% endif %}>"#;

const LIGHTSWITCH_INPUT: &str = r#"<div class="lightswitch{% if on %} on{% endif %}" id="{{ id | escape }}" role="checkbox" aria-checked="{% if on %}true{% else %}false{% endif %}"><input type="hidden" name="{{ name | escape }}" value="{% if on %}1{% endif %}"></div>"#;

/// Built-in form includes, keyed by template path
pub fn builtin_templates() -> HashMap<String, String> {
    [
        ("color", COLOR_INPUT),
        ("text", TEXT_INPUT),
        ("number", NUMBER_INPUT),
        ("lightswitch", LIGHTSWITCH_INPUT),
    ]
    .into_iter()
    .map(|(name, source)| (format!("{FORM_INCLUDES}/{name}"), source.to_string()))
    .collect()
}

/// Candidate keys for a requested template path.
///
/// Liquid appends nothing to include names, but callers may ask for
/// `news/_entry.liquid` or `news/_entry`, so both forms are tried.
pub fn normalize_template_name(requested: &str) -> Vec<String> {
    let trimmed = requested.trim_start_matches('/');
    let mut candidates = vec![trimmed.to_string()];

    for ext in TEMPLATE_EXTENSIONS {
        if let Some(stem) = trimmed.strip_suffix(ext) {
            candidates.push(stem.to_string());
        }
    }
    for ext in TEMPLATE_EXTENSIONS {
        candidates.push(format!("{trimmed}{ext}"));
    }

    let mut seen = std::collections::HashSet::new();
    candidates
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// In-memory template store that doubles as a liquid partial source.
#[derive(Debug, Clone, Default)]
pub struct TemplateLoader {
    templates: HashMap<String, String>,
}

impl TemplateLoader {
    /// Empty loader without the built-in includes
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loader holding only the built-in form includes
    pub fn with_builtins() -> Self {
        Self {
            templates: builtin_templates(),
        }
    }

    /// Loader from a map of path → source
    pub fn new(templates: HashMap<String, String>) -> Self {
        Self { templates }
    }

    /// Add or replace a template.
    pub fn add(&mut self, name: impl Into<String>, source: impl Into<String>) {
        let name = name.into();
        let key = name.trim_start_matches('/').to_string();
        debug!(template = %key, "registered template");
        self.templates.insert(key, source.into());
    }

    /// Load every `.liquid`/`.html` file under `dir`, keyed by its relative
    /// path without extension. Files override templates already present.
    pub fn load_directory(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            return Err(TemplatingError::TemplateNotFound {
                name: dir.display().to_string(),
            });
        }
        let mut loaded = 0;
        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(%e, "skipping unreadable template entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(dir) else {
                continue;
            };
            let relative = relative.to_string_lossy().replace('\\', "/");
            let Some(name) = TEMPLATE_EXTENSIONS
                .iter()
                .find_map(|ext| relative.strip_suffix(ext))
            else {
                continue;
            };
            match std::fs::read_to_string(entry.path()) {
                Ok(source) => {
                    self.templates.insert(name.to_string(), source);
                    loaded += 1;
                }
                Err(e) => warn!(path = ?entry.path(), %e, "skipping unreadable template"),
            }
        }
        debug!(dir = ?dir, loaded, "loaded template directory");
        Ok(loaded)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Template source for `name`, trying the normalized variants.
    pub fn get(&self, name: &str) -> Option<&str> {
        for candidate in normalize_template_name(name) {
            if let Some(source) = self.templates.get(&candidate) {
                trace!(requested = %name, found = %candidate, "template lookup");
                return Some(source);
            }
        }
        trace!(requested = %name, "template lookup missed");
        None
    }

    /// All template paths, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.templates.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl liquid::partials::PartialSource for TemplateLoader {
    fn contains(&self, name: &str) -> bool {
        TemplateLoader::contains(self, name)
    }

    fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    fn try_get(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(Cow::Borrowed)
    }
}
