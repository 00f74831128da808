//! Filesystem-safe slugs

use std::sync::OnceLock;

use notemark_ast::{plain_text, PageMetadata};
use regex::Regex;

static DISALLOWED_RE: OnceLock<Regex> = OnceLock::new();
static HYPHENS_RE: OnceLock<Regex> = OnceLock::new();

/// Slug used when neither the title nor the page id yields one
pub const FALLBACK_SLUG: &str = "untitled";

/// Lower-case `input` and collapse every run of characters outside
/// `[a-z0-9_.-]` to a single hyphen, trimming hyphens at both ends
///
/// Leading dots are dropped as well, so a slug is never `.`, `..` or a
/// hidden file name.
///
/// Slugifying a slug returns it unchanged.
///
/// ```
/// use notemark_core::slug::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("hello-world"), "hello-world");
/// ```
pub fn slugify(input: &str) -> String {
    let disallowed = DISALLOWED_RE.get_or_init(|| Regex::new(r"[^a-z0-9_.-]+").unwrap());
    let hyphens = HYPHENS_RE.get_or_init(|| Regex::new(r"-{2,}").unwrap());

    let lowered = input.to_lowercase();
    let replaced = disallowed.replace_all(&lowered, "-");
    let collapsed = hyphens.replace_all(&replaced, "-");
    collapsed
        .trim_start_matches(['-', '.'])
        .trim_end_matches('-')
        .to_string()
}

/// Slug of a page: its prefixed title, else its id
pub fn page_slug(page: &PageMetadata, prefix: &str) -> String {
    let title = format!("{}{}", prefix, plain_text(page.title()));
    [slugify(&title), slugify(&page.id)]
        .into_iter()
        .find(|slug| !slug.is_empty())
        .unwrap_or_else(|| FALLBACK_SLUG.to_string())
}
