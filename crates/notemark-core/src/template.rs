//! Minimal `{{ key }}` templates
//!
//! Used for the front matter preamble and for shortcode grammars. Only
//! plain placeholder substitution is supported; Hugo's own `{{< >}}` and
//! `{{% %}}` delimiters are left untouched because a placeholder name
//! must start with a letter or underscore.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::{ExportError, Result};

/// Placeholder values keyed by name; values are inserted as-is
pub type Fields = BTreeMap<String, String>;

static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();

fn placeholder_re() -> &'static Regex {
    PLACEHOLDER_RE.get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap())
}

/// A template source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

/// Result of a line-oriented render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// The rendered text
    pub text: String,
    /// Placeholders that had no value, in order of appearance
    pub missing: Vec<String>,
}

impl Template {
    /// Create a template from source text
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Load a template file
    pub fn from_file(path: &Path) -> Result<Self> {
        fs::read_to_string(path)
            .map(Self::new)
            .map_err(|e| ExportError::Template(format!("{}: {}", path.display(), e)))
    }

    /// The template source
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of appearance
    pub fn placeholders(&self) -> Vec<&str> {
        placeholder_re()
            .captures_iter(&self.source)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// Render line by line, dropping every line that references a
    /// placeholder without a value
    pub fn render_lines(&self, fields: &Fields) -> Rendered {
        let re = placeholder_re();
        let mut rendered = Rendered::default();

        for line in self.source.split_inclusive('\n') {
            let missing: Vec<String> = re
                .captures_iter(line)
                .filter_map(|caps| caps.get(1))
                .filter(|name| !fields.contains_key(name.as_str()))
                .map(|name| name.as_str().to_string())
                .collect();

            if missing.is_empty() {
                rendered.text.push_str(&substitute(re, line, fields));
            } else {
                rendered.missing.extend(missing);
            }
        }

        rendered
    }

    /// Render the whole source; missing placeholders become empty
    pub fn render_inline(&self, fields: &Fields) -> String {
        substitute(placeholder_re(), &self.source, fields)
    }
}

fn substitute(re: &Regex, text: &str, fields: &Fields) -> String {
    re.replace_all(text, |caps: &Captures| {
        caps.get(1)
            .and_then(|name| fields.get(name.as_str()))
            .cloned()
            .unwrap_or_default()
    })
    .into_owned()
}
