//! Inline rich text rendering
//!
//! Converts a sequence of annotated runs into inline Markdown. Nesting is
//! fixed, outermost first: link, underline, strikethrough, bold, italic,
//! code. Delimiters close in reverse order of opening. Colors have no
//! Markdown form and are dropped.

use notemark_ast::{Annotations, RichText};

use crate::escape::{escape_link_destination, escape_table_cell, escape_text, inline_code_ticks};

/// Render runs as inline Markdown
///
/// # Example
///
/// ```
/// use notemark_ast::RichText;
/// use notemark_core::rich_text::render;
///
/// let spans = vec![RichText::plain("Hello "), RichText::plain("world").bold()];
/// assert_eq!(render(&spans), "Hello **world**");
/// ```
pub fn render(spans: &[RichText]) -> String {
    let mut out = String::new();
    for run in merge(spans) {
        render_run(&run, &mut out);
    }
    out
}

/// Render runs for use inside a pipe table cell
pub fn render_table_cell(spans: &[RichText]) -> String {
    escape_table_cell(&render(spans))
}

/// Adjacent runs with the same styling and link, joined
struct Run<'a> {
    text: String,
    annotations: Annotations,
    href: Option<&'a str>,
}

fn merge(spans: &[RichText]) -> Vec<Run<'_>> {
    let mut runs: Vec<Run<'_>> = Vec::new();
    for span in spans {
        if span.text.is_empty() && span.href.is_none() {
            continue;
        }
        let href = span.href.as_deref();
        match runs.last_mut() {
            Some(last) if last.annotations == span.annotations && last.href == href => {
                last.text.push_str(&span.text);
            }
            _ => runs.push(Run {
                text: span.text.clone(),
                annotations: span.annotations,
                href,
            }),
        }
    }
    runs
}

fn render_run(run: &Run<'_>, out: &mut String) {
    let (lead, core, trail) = split_edges(&run.text);

    if core.is_empty() {
        // Whitespace only: nothing to style, and a link needs visible text
        out.push_str(lead);
        if let Some(href) = run.href {
            out.push_str(href);
        }
        return;
    }

    let a = run.annotations;
    let mut inner = if a.code {
        code_span(core)
    } else {
        escape_text(core)
    };
    if a.italic {
        inner = format!("*{}*", inner);
    }
    if a.bold {
        inner = format!("**{}**", inner);
    }
    if a.strikethrough {
        inner = format!("~~{}~~", inner);
    }
    if a.underline {
        inner = format!("<u>{}</u>", inner);
    }
    if let Some(href) = run.href {
        inner = format!("[{}]({})", inner, escape_link_destination(href));
    }

    out.push_str(lead);
    out.push_str(&inner);
    out.push_str(trail);
}

/// Split text into leading whitespace, content and trailing whitespace
///
/// Emphasis delimiters cannot sit next to whitespace, so styled content
/// is wrapped without its surrounding blanks.
fn split_edges(text: &str) -> (&str, &str, &str) {
    let core = text.trim();
    if core.is_empty() {
        return (text, "", "");
    }
    let start = text.len() - text.trim_start().len();
    let end = start + core.len();
    (&text[..start], core, &text[end..])
}

fn code_span(content: &str) -> String {
    let ticks = "`".repeat(inline_code_ticks(content));
    if content.starts_with('`') || content.ends_with('`') {
        format!("{} {} {}", ticks, content, ticks)
    } else {
        format!("{}{}{}", ticks, content, ticks)
    }
}
