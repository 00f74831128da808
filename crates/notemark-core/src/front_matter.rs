//! Front matter preamble
//!
//! Page metadata is flattened into a key/value mapping of ready-to-emit
//! scalars, then substituted into the configured template. Strings are
//! JSON-quoted (valid YAML and TOML), lists are flow arrays, timestamps
//! are canonical UTC and booleans/numbers are bare.

use std::collections::BTreeSet;

use notemark_ast::{plain_text, PageMetadata, PropertyValue};

use crate::config::RenderConfig;
use crate::datetime::canonical;
use crate::diagnostics::{Diagnostic, TEMPLATE_FIELD_MISSING};
use crate::rich_text;
use crate::slug::page_slug;
use crate::template::Fields;

/// Built-in keys that page properties never override
const RESERVED_KEYS: [&str; 3] = ["title", "slug", "id"];

/// Status values that publish a page
const PUBLISHED_STATUSES: [&str; 2] = ["published", "done"];

/// A rendered front matter block
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    /// Rendered preamble
    pub text: String,
    /// Page slug, also used for the file name and asset directory
    pub slug: String,
    /// Template fields without a value
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the front matter of a page
///
/// # Example
///
/// ```
/// use notemark_ast::{PageMetadata, RichText};
/// use notemark_core::{build_front_matter, RenderConfig, Template};
///
/// let page = PageMetadata::with_title("p1", vec![RichText::plain("Hello")]);
/// let config = RenderConfig::default()
///     .with_template(Template::new("---\ntitle: {{ title }}\nslug: {{ slug }}\n---\n"));
///
/// let front = build_front_matter(&page, &config);
/// assert_eq!(front.text, "---\ntitle: \"Hello\"\nslug: \"hello\"\n---\n");
/// ```
pub fn build_front_matter(page: &PageMetadata, config: &RenderConfig) -> FrontMatter {
    let slug = page_slug(page, &config.output.page_name_prefix);
    let fields = front_matter_fields(page, &slug);
    let rendered = config.template.render_lines(&fields);

    let mut seen = BTreeSet::new();
    let diagnostics = rendered
        .missing
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .map(|name| {
            Diagnostic::info(format!("Front matter field `{}` has no value", name))
                .with_code(TEMPLATE_FIELD_MISSING)
                .with_block(page.id.clone())
                .with_help("The template line was omitted")
        })
        .collect();

    FrontMatter {
        text: rendered.text,
        slug,
        diagnostics,
    }
}

/// Key/value mapping offered to the front matter template
pub fn front_matter_fields(page: &PageMetadata, slug: &str) -> Fields {
    let mut fields = Fields::new();

    for (name, value) in &page.properties {
        let key = normalize_key(name);
        if key.is_empty() || RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        if let Some(formatted) = format_value(value) {
            fields.insert(key, formatted);
        }
    }

    if let Some(date) = canonical(&page.created_time) {
        fields.entry("date".to_string()).or_insert(date);
    }
    if let Some(lastmod) = canonical(&page.last_edited_time) {
        fields.entry("lastmod".to_string()).or_insert(lastmod);
    }
    fields
        .entry("draft".to_string())
        .or_insert_with(|| is_draft(page).to_string());

    fields.insert(
        "title".to_string(),
        quote(&rich_text::render(page.title())),
    );
    fields.insert("slug".to_string(), quote(slug));
    if !page.id.is_empty() {
        fields.insert("id".to_string(), quote(&page.id));
    }

    fields
}

/// Template key for a property name: lower-case, runs of
/// non-alphanumerics as one underscore
///
/// ```
/// use notemark_core::front_matter::normalize_key;
///
/// assert_eq!(normalize_key("Publish Date"), "publish_date");
/// ```
pub fn normalize_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            key.push(c);
        } else if !key.is_empty() && !key.ends_with('_') {
            key.push('_');
        }
    }
    key.trim_end_matches('_').to_string()
}

/// A page is a draft unless its status says it is published; pages
/// without a status are not drafts
fn is_draft(page: &PageMetadata) -> bool {
    page.properties
        .iter()
        .filter(|(name, _)| normalize_key(name) == "status")
        .find_map(|(_, value)| match value {
            PropertyValue::Status(status) | PropertyValue::Select(status) => Some(status.as_deref()),
            _ => None,
        })
        .map_or(false, |status| {
            !status.is_some_and(|s| {
                PUBLISHED_STATUSES
                    .iter()
                    .any(|published| s.eq_ignore_ascii_case(published))
            })
        })
}

fn format_value(value: &PropertyValue) -> Option<String> {
    match value {
        PropertyValue::Title(runs) | PropertyValue::RichText(runs) => {
            non_empty(&plain_text(runs)).map(quote)
        }
        PropertyValue::Number(number) => number.filter(|n| n.is_finite()).map(format_number),
        PropertyValue::Select(value)
        | PropertyValue::Status(value)
        | PropertyValue::Url(value)
        | PropertyValue::Email(value) => value.as_deref().and_then(non_empty).map(quote),
        PropertyValue::MultiSelect(values) | PropertyValue::People(values) => {
            Some(flow_list(values))
        }
        PropertyValue::Date(date) => date.as_ref().map(|d| format_timestamp(&d.start)),
        PropertyValue::Checkbox(checked) => Some(checked.to_string()),
        PropertyValue::CreatedTime(raw) | PropertyValue::LastEditedTime(raw) => {
            non_empty(raw).map(format_timestamp)
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn flow_list(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|v| quote(v)).collect();
    format!("[{}]", items.join(", "))
}

fn format_timestamp(raw: &str) -> String {
    canonical(raw).unwrap_or_else(|| quote(raw))
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
