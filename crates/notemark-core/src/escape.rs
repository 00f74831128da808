//! Markdown escaping utilities
//!
//! Pure helpers for escaping literal text and sizing code fences.

/// Escape Markdown metacharacters in literal inline text
///
/// Escapes `\`, `*`, `_`, `` ` ``, `[` and `]`.
///
/// ```
/// use notemark_core::escape::escape_text;
///
/// assert_eq!(escape_text("*bold*"), "\\*bold\\*");
/// assert_eq!(escape_text("[link]"), "\\[link\\]");
/// ```
pub fn escape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 10);
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

/// Neutralise block markers at the start of each line of rendered inline
/// text, so a paragraph reading `1. not a list` or `# not a heading`
/// stays a paragraph
///
/// ```
/// use notemark_core::escape::escape_line_starts;
///
/// assert_eq!(escape_line_starts("# not a heading"), "\\# not a heading");
/// assert_eq!(escape_line_starts("2024. A year"), "2024\\. A year");
/// assert_eq!(escape_line_starts("a - b"), "a - b");
/// ```
pub fn escape_line_starts(rendered: &str) -> String {
    rendered
        .split('\n')
        .map(escape_line_start)
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_line_start(line: &str) -> String {
    let rest = line.trim_start_matches([' ', '\t']);
    let lead = &line[..line.len() - rest.len()];
    let bytes = rest.as_bytes();

    let marker = match bytes.first() {
        // Headings, quotes, bullets, setext underlines
        Some(b'#' | b'>' | b'-' | b'+' | b'=') => Some(0),
        Some(b'~') if rest.starts_with("~~~") => Some(0),
        Some(b'0'..=b'9') => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            let delimited = matches!(bytes.get(digits), Some(b'.' | b')'));
            let spaced = matches!(bytes.get(digits + 1), None | Some(b' ' | b'\t'));
            (digits <= 9 && delimited && spaced).then_some(digits)
        }
        _ => None,
    };

    match marker {
        Some(at) => format!("{}{}\\{}", lead, &rest[..at], &rest[at..]),
        None => line.to_string(),
    }
}

/// Make already-rendered inline Markdown safe inside a table cell
///
/// Pipes would split the cell and newlines would end the row.
pub fn escape_table_cell(rendered: &str) -> String {
    rendered
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

/// Escape a URL used as a link destination
pub fn escape_link_destination(url: &str) -> String {
    let mut result = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            ' ' => result.push_str("%20"),
            '(' | ')' | '<' | '>' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

/// Longest run of `ch` in `content`
fn longest_run(content: &str, ch: char) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;

    for c in content.chars() {
        if c == ch {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }

    max_run
}

/// Number of backticks for a fenced code block (at least 3)
///
/// ```
/// use notemark_core::escape::fence_length;
///
/// assert_eq!(fence_length("let x = 1;"), 3);
/// assert_eq!(fence_length("```rust\ncode\n```"), 4);
/// ```
pub fn fence_length(content: &str) -> usize {
    longest_run(content, '`').max(2) + 1
}

/// Number of backticks for an inline code span (at least 1)
pub fn inline_code_ticks(content: &str) -> usize {
    longest_run(content, '`') + 1
}
