//! Markdown body generator
//!
//! Walks a block tree and produces the Markdown body of a page. The walk
//! uses an explicit stack of sibling iterators, so nesting depth is bounded
//! by memory rather than by the call stack. A block's own line is computed
//! when the walk enters it (images are resolved at that point); its output
//! is composed with its rendered children when the walk leaves it.

use std::slice;

use notemark_assets::{AssetError, AssetResolver, ResolvedAssets};
use notemark_ast::{plain_text, Block, BlockKind, FileSource, RichText, TableRow};

use crate::config::RenderConfig;
use crate::diagnostics::{
    Diagnostic, ASSET_FETCH_FAILURE, ASSET_WRITE_FAILURE, UNSUPPORTED_BLOCK,
};
use crate::escape::{escape_line_starts, escape_link_destination, escape_text, fence_length};
use crate::rich_text::{render as render_text, render_table_cell};
use crate::shortcode::{ShortcodeArgs, ShortcodeKind};
use crate::slug::slugify;

/// Indentation per nesting level
pub const INDENT: usize = 4;

/// Horizontal rule literal
pub const DIVIDER: &str = "---";

/// Markdown generator for one page
pub struct MarkdownGenerator<'a> {
    config: &'a RenderConfig,
    page_slug: &'a str,
    prefetched: Option<&'a ResolvedAssets>,
    resolver: Option<&'a AssetResolver>,
    diagnostics: Vec<Diagnostic>,
}

/// Rendered output of one block
struct Piece {
    text: String,
    list_item: bool,
}

/// Rendered children of one block
struct Body {
    text: String,
    /// Starts with a list item, so it can follow a list line directly
    tight: bool,
}

/// A block's own output, computed on entry
enum Head {
    /// Own text; children follow at the same level
    Block(String),
    /// A list line; children are indented under it
    Item(String),
    /// Quoted text; children are quoted too
    Quote(String),
    Callout { icon: Option<String>, text: String },
    Toggle(String),
    /// Children only
    Transparent,
}

enum Opened {
    Skip,
    /// Emit the head and ignore children
    Leaf(Head),
    /// Emit the head and descend into children
    Node(Head),
}

/// One level of the walk: the block that owns it and its children
struct Level<'b> {
    owner: Option<(&'b Block, Head)>,
    siblings: slice::Iter<'b, Block>,
    ordinal: usize,
    pieces: Vec<Piece>,
}

impl<'b> Level<'b> {
    fn new(owner: Option<(&'b Block, Head)>, siblings: &'b [Block]) -> Self {
        Self {
            owner,
            siblings: siblings.iter(),
            ordinal: 0,
            pieces: Vec::new(),
        }
    }

    /// Ordinal for the next sibling; runs of numbered items count from 1
    fn next_ordinal(&mut self, block: &Block) -> usize {
        if matches!(block.kind(), BlockKind::NumberedListItem { .. }) {
            self.ordinal += 1;
        } else {
            self.ordinal = 0;
        }
        self.ordinal
    }

    fn finish(self) -> (Option<(&'b Block, Head)>, Body) {
        let tight = self
            .pieces
            .iter()
            .find(|p| !p.text.is_empty())
            .map_or(true, |p| p.list_item);
        (
            self.owner,
            Body {
                text: join_pieces(self.pieces),
                tight,
            },
        )
    }
}

impl<'a> MarkdownGenerator<'a> {
    /// Create a generator for the page whose slug is `page_slug`
    pub fn new(config: &'a RenderConfig, page_slug: &'a str) -> Self {
        Self {
            config,
            page_slug,
            prefetched: None,
            resolver: None,
            diagnostics: Vec::new(),
        }
    }

    /// Resolve images that were not prefetched with `resolver`
    pub fn with_resolver(mut self, resolver: &'a AssetResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Use results of a concurrent prefetch, keyed by source URL
    pub fn with_prefetched(mut self, assets: &'a ResolvedAssets) -> Self {
        self.prefetched = Some(assets);
        self
    }

    /// Diagnostics collected so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the generator, returning its diagnostics
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Render a sequence of top-level sibling blocks
    pub fn render_blocks(&mut self, blocks: &[Block]) -> String {
        finish_body(self.render_sequence(blocks))
    }

    /// Render a single block and its children, indented `depth` levels
    pub fn render_block(&mut self, block: &Block, depth: usize) -> String {
        let text = self.render_sequence(slice::from_ref(block));
        finish_body(indent(&text, depth * INDENT))
    }

    fn render_sequence(&mut self, blocks: &[Block]) -> String {
        let mut stack = vec![Level::new(None, blocks)];

        loop {
            let Some(level) = stack.last_mut() else {
                return String::new();
            };

            if let Some(block) = level.siblings.next() {
                let ordinal = level.next_ordinal(block);
                match self.open(block, ordinal) {
                    Opened::Skip => {}
                    Opened::Leaf(head) => {
                        let empty = Body {
                            text: String::new(),
                            tight: true,
                        };
                        let piece = self.close(block, head, empty);
                        level.pieces.push(piece);
                    }
                    Opened::Node(head) => {
                        stack.push(Level::new(Some((block, head)), block.children()));
                    }
                }
                continue;
            }

            let Some(done) = stack.pop() else {
                return String::new();
            };
            let (owner, body) = done.finish();
            match (owner, stack.last_mut()) {
                (Some((block, head)), Some(parent)) => {
                    let piece = self.close(block, head, body);
                    parent.pieces.push(piece);
                }
                _ => return body.text,
            }
        }
    }

    /// Compute a block's own output
    fn open(&mut self, block: &Block, ordinal: usize) -> Opened {
        match block.kind() {
            BlockKind::Paragraph { text } => Opened::Node(Head::Block(block_text(text))),
            BlockKind::Heading { level, text } => {
                let hashes = "#".repeat(usize::from((*level).clamp(1, 6)));
                let line = format!("{} {}", hashes, render_text(text));
                Opened::Node(Head::Block(line.trim_end().to_string()))
            }
            BlockKind::BulletedListItem { text } => {
                Opened::Node(Head::Item(format!("- {}", block_text(text))))
            }
            BlockKind::NumberedListItem { text } => {
                Opened::Node(Head::Item(format!("{}. {}", ordinal, block_text(text))))
            }
            BlockKind::ToDo { text, checked } => {
                let mark = if *checked { 'x' } else { ' ' };
                Opened::Node(Head::Item(format!("- [{}] {}", mark, block_text(text))))
            }
            BlockKind::Toggle { text } => Opened::Node(Head::Toggle(render_text(text))),
            BlockKind::Quote { text } => Opened::Node(Head::Quote(block_text(text))),
            BlockKind::Callout { text, icon } => Opened::Node(Head::Callout {
                icon: icon.clone(),
                text: block_text(text),
            }),
            BlockKind::Code {
                language,
                text,
                caption,
            } => Opened::Node(Head::Block(code_block(language.as_deref(), text, caption))),
            BlockKind::Image { source, caption } => {
                Opened::Node(Head::Block(self.image(block, source, caption)))
            }
            BlockKind::Video { source, caption } => {
                Opened::Node(Head::Block(self.video(block, source, caption)))
            }
            BlockKind::Bookmark { url, caption } => Opened::Node(Head::Block(self.link_card(
                ShortcodeKind::Bookmark,
                block,
                url,
                caption,
            ))),
            BlockKind::Embed { url, caption } => Opened::Node(Head::Block(self.link_card(
                ShortcodeKind::Embed,
                block,
                url,
                caption,
            ))),
            BlockKind::Equation { expression } => {
                Opened::Node(Head::Block(format!("$$\n{}\n$$", expression.trim())))
            }
            BlockKind::Divider => Opened::Node(Head::Block(DIVIDER.to_string())),
            BlockKind::Table {
                has_column_header,
                rows,
                ..
            } => Opened::Node(Head::Block(table(*has_column_header, rows))),
            BlockKind::SyncedBlock {
                synced_from: Some(original),
            } => {
                let args = ShortcodeArgs {
                    id: original.clone(),
                    ..Default::default()
                };
                match self.shortcode(ShortcodeKind::Synced, &args) {
                    Some(out) => Opened::Leaf(Head::Block(out)),
                    None => Opened::Node(Head::Transparent),
                }
            }
            BlockKind::SyncedBlock { synced_from: None }
            | BlockKind::ColumnList
            | BlockKind::Column => Opened::Node(Head::Transparent),
            BlockKind::ChildPage { title } => Opened::Leaf(Head::Block(format!(
                "[{}]({})",
                escape_text(title),
                slugify(title)
            ))),
            BlockKind::Unsupported => {
                log::debug!("Skipping unsupported block {}", block.id());
                self.diagnostics.push(
                    Diagnostic::warning("Unsupported block kind")
                        .with_code(UNSUPPORTED_BLOCK)
                        .with_block(block.id())
                        .with_help("The block and its children were skipped"),
                );
                Opened::Skip
            }
        }
    }

    /// Compose a block's own output with its rendered children
    fn close(&self, block: &Block, head: Head, body: Body) -> Piece {
        match head {
            Head::Block(text) => Piece::block(join_parts(&[&text, &body.text])),
            Head::Item(line) => {
                let text = if body.text.is_empty() {
                    line
                } else {
                    let sep = if body.tight { "\n" } else { "\n\n" };
                    format!("{}{}{}", line, sep, indent(&body.text, INDENT))
                };
                Piece {
                    text,
                    list_item: true,
                }
            }
            Head::Quote(text) => Piece::block(quote_lines(&join_parts(&[&text, &body.text]))),
            Head::Callout { icon, text } => {
                let args = ShortcodeArgs {
                    content: join_parts(&[&text, &body.text]),
                    icon: icon.clone().unwrap_or_default(),
                    id: block.id().to_string(),
                    ..Default::default()
                };
                if let Some(out) = self.shortcode(ShortcodeKind::Callout, &args) {
                    return Piece::block(out);
                }
                let first = match icon {
                    Some(icon) if !icon.is_empty() => format!("{} {}", icon, text),
                    _ => text,
                };
                Piece::block(quote_lines(&join_parts(&[&first, &body.text])))
            }
            Head::Toggle(summary) => {
                let text = if body.text.is_empty() {
                    format!("<details>\n<summary>{}</summary>\n</details>", summary)
                } else {
                    format!(
                        "<details>\n<summary>{}</summary>\n\n{}\n\n</details>",
                        summary, body.text
                    )
                };
                Piece::block(text)
            }
            Head::Transparent => Piece::block(body.text),
        }
    }

    fn shortcode(&self, kind: ShortcodeKind, args: &ShortcodeArgs) -> Option<String> {
        self.config.grammar()?.expand(kind, args)
    }

    fn image(&mut self, block: &Block, source: &FileSource, caption: &[RichText]) -> String {
        let link = self.resolve_asset(block, source);
        let alt = escape_text(plain_text(caption).trim());
        format!("![{}]({})", alt, escape_link_destination(&link))
    }

    /// Link to embed for an image; the original URL when resolution fails
    fn resolve_asset(&mut self, block: &Block, source: &FileSource) -> String {
        let prefetched = self.prefetched.and_then(|assets| assets.get(source.url()));
        match (prefetched, self.resolver) {
            (Some(Ok(link)), _) => link.clone(),
            (Some(Err(e)), _) => {
                self.report_asset_failure(block, e);
                source.url().to_string()
            }
            (None, Some(resolver)) => {
                match resolver.resolve(source, self.page_slug, &self.config.assets) {
                    Ok(link) => link,
                    Err(e) => {
                        self.report_asset_failure(block, &e);
                        source.url().to_string()
                    }
                }
            }
            (None, None) => source.url().to_string(),
        }
    }

    fn report_asset_failure(&mut self, block: &Block, err: &AssetError) {
        let code = if err.is_write() {
            ASSET_WRITE_FAILURE
        } else {
            ASSET_FETCH_FAILURE
        };
        log::debug!("Image of block {} left unresolved: {}", block.id(), err);
        self.diagnostics.push(
            Diagnostic::error(format!("Image unavailable: {}", err))
                .with_code(code)
                .with_block(block.id())
                .with_help("The original URL was kept as a placeholder"),
        );
    }

    fn video(&self, block: &Block, source: &FileSource, caption: &[RichText]) -> String {
        if let FileSource::External { url } = source {
            let args = ShortcodeArgs {
                url: url.clone(),
                caption: plain_text(caption),
                id: block.id().to_string(),
                ..Default::default()
            };
            if let Some(out) = self.shortcode(ShortcodeKind::Video, &args) {
                return out;
            }
        }
        link_line(source.url(), caption)
    }

    fn link_card(
        &self,
        kind: ShortcodeKind,
        block: &Block,
        url: &str,
        caption: &[RichText],
    ) -> String {
        let args = ShortcodeArgs {
            url: url.to_string(),
            caption: plain_text(caption),
            id: block.id().to_string(),
            ..Default::default()
        };
        self.shortcode(kind, &args)
            .unwrap_or_else(|| link_line(url, caption))
    }
}

impl Piece {
    fn block(text: String) -> Self {
        Self {
            text,
            list_item: false,
        }
    }
}

/// Join sibling outputs: list items stay tight, everything else gets a
/// blank line between
fn join_pieces(pieces: Vec<Piece>) -> String {
    let mut out = String::new();
    let mut previous_item: Option<bool> = None;

    for piece in pieces.into_iter().filter(|p| !p.text.is_empty()) {
        if let Some(previous_item) = previous_item {
            out.push_str(if previous_item && piece.list_item {
                "\n"
            } else {
                "\n\n"
            });
        }
        out.push_str(&piece.text);
        previous_item = Some(piece.list_item);
    }

    out
}

/// Inline text that opens a block, with leading block markers escaped
fn block_text(text: &[RichText]) -> String {
    escape_line_starts(&render_text(text))
}

fn join_parts(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn finish_body(mut text: String) -> String {
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

fn indent(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    let pad = " ".repeat(width);
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn quote_lines(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn link_line(url: &str, caption: &[RichText]) -> String {
    let label = render_text(caption);
    let label = if label.trim().is_empty() {
        escape_text(url)
    } else {
        label
    };
    format!("[{}]({})", label, escape_link_destination(url))
}

fn code_block(language: Option<&str>, text: &[RichText], caption: &[RichText]) -> String {
    let source = plain_text(text);
    let fence = "`".repeat(fence_length(&source));
    let language = match language.map(str::trim) {
        Some(lang) if !lang.eq_ignore_ascii_case("plain text") => {
            lang.to_lowercase().replace(' ', "-")
        }
        _ => String::new(),
    };

    let mut out = format!("{}{}\n{}", fence, language, source);
    if !source.is_empty() && !source.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&fence);

    let caption = plain_text(caption);
    if !caption.trim().is_empty() {
        out.push_str(&format!("\n\n*{}*", escape_text(caption.trim())));
    }
    out
}

fn table(has_column_header: bool, rows: &[TableRow]) -> String {
    let width = rows.iter().map(|row| row.cells.len()).max().unwrap_or(0);
    if width == 0 {
        return String::new();
    }

    let render_row = |cells: &[Vec<RichText>]| {
        let mut line = String::from("|");
        for i in 0..width {
            let cell = cells.get(i).map(|c| render_table_cell(c)).unwrap_or_default();
            line.push(' ');
            line.push_str(&cell);
            line.push_str(" |");
        }
        line
    };

    let mut rows = rows.iter();
    let header: &[Vec<RichText>] = if has_column_header {
        rows.next().map(|row| row.cells.as_slice()).unwrap_or(&[])
    } else {
        &[]
    };

    let mut lines = vec![render_row(header), format!("|{}", " --- |".repeat(width))];
    lines.extend(rows.map(|row| render_row(&row.cells)));
    lines.join("\n")
}

/// Render a page body with the given configuration
///
/// Images are linked to their source URLs; use [`MarkdownGenerator`]
/// with a resolver to download hosted files.
pub fn render_body(
    blocks: &[Block],
    config: &RenderConfig,
    page_slug: &str,
) -> (String, Vec<Diagnostic>) {
    let mut generator = MarkdownGenerator::new(config, page_slug);
    let body = generator.render_blocks(blocks);
    (body, generator.into_diagnostics())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShortcodeSyntax;
    use crate::shortcode::ShortcodeGrammar;
    use notemark_ast::RichText;

    fn text(s: &str) -> Vec<RichText> {
        vec![RichText::plain(s)]
    }

    fn render(blocks: &[Block]) -> String {
        render_body(blocks, &RenderConfig::default(), "page").0
    }

    fn render_hugo(blocks: &[Block]) -> String {
        let config = RenderConfig::default()
            .with_shortcodes(ShortcodeSyntax::Grammar(ShortcodeGrammar::hugo()));
        render_body(blocks, &config, "page").0
    }

    #[test]
    fn test_leading_block_markers_stay_literal() {
        let blocks = vec![
            Block::paragraph(text("1. not a list")),
            Block::paragraph(text("# not a heading")),
            Block::bulleted(text("- nested?")),
            Block::quote(text("> doubled")),
        ];
        assert_eq!(
            render(&blocks),
            "1\\. not a list\n\n\\# not a heading\n\n- \\- nested?\n\n> \\> doubled\n"
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn test_heading_levels() {
        let blocks = vec![
            Block::heading(1, text("One")),
            Block::heading(2, text("Two")),
            Block::heading(3, text("Three")),
        ];
        assert_eq!(render(&blocks), "# One\n\n## Two\n\n### Three\n");
    }

    #[test]
    fn test_paragraph_with_rich_text() {
        let blocks = vec![Block::paragraph(vec![
            RichText::plain("Hello "),
            RichText::plain("world").bold(),
        ])];
        assert_eq!(render(&blocks), "Hello **world**\n");
    }

    #[test]
    fn test_empty_paragraph_emits_nothing() {
        let blocks = vec![
            Block::paragraph(text("a")),
            Block::paragraph(vec![]),
            Block::paragraph(text("b")),
        ];
        assert_eq!(render(&blocks), "a\n\nb\n");
    }

    #[test]
    fn test_bulleted_list_is_tight() {
        let blocks = vec![Block::bulleted(text("one")), Block::bulleted(text("two"))];
        assert_eq!(render(&blocks), "- one\n- two\n");
    }

    #[test]
    fn test_nested_list_indent() {
        let blocks = vec![Block::bulleted(text("parent")).with_children(vec![
            Block::bulleted(text("child")).with_children(vec![Block::bulleted(text("grandchild"))]),
        ])];
        assert_eq!(
            render(&blocks),
            "- parent\n    - child\n        - grandchild\n"
        );
    }

    #[test]
    fn test_list_item_with_paragraph_child() {
        let blocks = vec![Block::bulleted(text("item"))
            .with_children(vec![Block::paragraph(text("more"))])];
        assert_eq!(render(&blocks), "- item\n\n    more\n");
    }

    #[test]
    fn test_numbered_counter_resets() {
        let blocks = vec![
            Block::numbered(text("a")),
            Block::numbered(text("b")),
            Block::paragraph(text("break")),
            Block::numbered(text("c")),
        ];
        assert_eq!(render(&blocks), "1. a\n2. b\n\nbreak\n\n1. c\n");
    }

    #[test]
    fn test_nested_numbering_is_independent() {
        let blocks = vec![
            Block::numbered(text("a")).with_children(vec![
                Block::numbered(text("a.1")),
                Block::numbered(text("a.2")),
            ]),
            Block::numbered(text("b")),
        ];
        assert_eq!(
            render(&blocks),
            "1. a\n    1. a.1\n    2. a.2\n2. b\n"
        );
    }

    #[test]
    fn test_to_do() {
        let blocks = vec![
            Block::to_do(text("done"), true),
            Block::to_do(text("open"), false),
        ];
        assert_eq!(render(&blocks), "- [x] done\n- [ ] open\n");
    }

    #[test]
    fn test_quote_with_children() {
        let blocks = vec![Block::quote(text("said"))
            .with_children(vec![Block::paragraph(text("more"))])];
        assert_eq!(render(&blocks), "> said\n>\n> more\n");
    }

    #[test]
    fn test_code_is_verbatim() {
        let blocks = vec![Block::code("rust", "let x = *y_ptr;")];
        assert_eq!(render(&blocks), "```rust\nlet x = *y_ptr;\n```\n");
    }

    #[test]
    fn test_code_fence_grows() {
        let blocks = vec![Block::code("markdown", "```\ninner\n```")];
        assert_eq!(
            render(&blocks),
            "````markdown\n```\ninner\n```\n````\n"
        );
    }

    #[test]
    fn test_code_plain_text_language_and_caption() {
        let blocks = vec![Block::new(BlockKind::Code {
            language: Some("plain text".to_string()),
            text: text("x"),
            caption: text("Listing 1"),
        })];
        assert_eq!(render(&blocks), "```\nx\n```\n\n*Listing 1*\n");
    }

    #[test]
    fn test_divider_and_equation() {
        let blocks = vec![
            Block::divider(),
            Block::new(BlockKind::Equation {
                expression: "e = mc^2".to_string(),
            }),
        ];
        assert_eq!(render(&blocks), "---\n\n$$\ne = mc^2\n$$\n");
    }

    #[test]
    fn test_external_image() {
        let blocks = vec![Block::image(
            FileSource::External {
                url: "https://example.com/a.png".to_string(),
            },
            text("A cat"),
        )];
        assert_eq!(render(&blocks), "![A cat](https://example.com/a.png)\n");
    }

    #[test]
    fn test_table_with_header() {
        let blocks = vec![Block::new(BlockKind::Table {
            has_column_header: true,
            has_row_header: false,
            rows: vec![
                TableRow::new(vec![text("Name"), text("Value")]),
                TableRow::new(vec![text("a|b"), text("1")]),
            ],
        })];
        assert_eq!(
            render(&blocks),
            "| Name | Value |\n| --- | --- |\n| a\\|b | 1 |\n"
        );
    }

    #[test]
    fn test_table_without_header_gets_empty_one() {
        let blocks = vec![Block::new(BlockKind::Table {
            has_column_header: false,
            has_row_header: false,
            rows: vec![TableRow::new(vec![text("a"), text("b")])],
        })];
        assert_eq!(render(&blocks), "|  |  |\n| --- | --- |\n| a | b |\n");
    }

    #[test]
    fn test_toggle() {
        let blocks = vec![Block::new(BlockKind::Toggle { text: text("More") })
            .with_children(vec![Block::paragraph(text("hidden"))])];
        assert_eq!(
            render(&blocks),
            "<details>\n<summary>More</summary>\n\nhidden\n\n</details>\n"
        );
    }

    #[test]
    fn test_callout_default_and_shortcode() {
        let blocks = vec![Block::new(BlockKind::Callout {
            text: text("Careful"),
            icon: Some("⚠️".to_string()),
        })];
        assert_eq!(render(&blocks), "> ⚠️ Careful\n");
        assert_eq!(
            render_hugo(&blocks),
            "{{% callout icon=\"⚠️\" %}}\nCareful\n{{% /callout %}}\n"
        );
    }

    #[test]
    fn test_bookmark_and_embed() {
        let blocks = vec![
            Block::new(BlockKind::Bookmark {
                url: "https://example.com".to_string(),
                caption: vec![],
            }),
            Block::new(BlockKind::Embed {
                url: "https://example.com/e".to_string(),
                caption: text("Demo"),
            }),
        ];
        assert_eq!(
            render(&blocks),
            "[https://example.com](https://example.com)\n\n[Demo](https://example.com/e)\n"
        );
        assert_eq!(
            render_hugo(&blocks),
            "{{< bookmark url=\"https://example.com\" caption=\"\" >}}\n\n{{< embed url=\"https://example.com/e\" >}}\n"
        );
    }

    #[test]
    fn test_synced_reference() {
        let blocks = vec![Block::new(BlockKind::SyncedBlock {
            synced_from: Some("orig-1".to_string()),
        })
        .with_children(vec![Block::paragraph(text("shared"))])];
        assert_eq!(render(&blocks), "shared\n");
        assert_eq!(render_hugo(&blocks), "{{< synced id=\"orig-1\" >}}\n");
    }

    #[test]
    fn test_columns_are_flattened() {
        let blocks = vec![Block::new(BlockKind::ColumnList).with_children(vec![
            Block::new(BlockKind::Column).with_children(vec![Block::paragraph(text("left"))]),
            Block::new(BlockKind::Column).with_children(vec![Block::paragraph(text("right"))]),
        ])];
        assert_eq!(render(&blocks), "left\n\nright\n");
    }

    #[test]
    fn test_child_page_link() {
        let blocks = vec![Block::new(BlockKind::ChildPage {
            title: "Sub Page".to_string(),
        })];
        assert_eq!(render(&blocks), "[Sub Page](sub-page)\n");
    }

    #[test]
    fn test_unsupported_is_skipped_with_diagnostic() {
        let blocks = vec![
            Block::paragraph(text("before")),
            Block::new(BlockKind::Unsupported).with_id("u1"),
            Block::paragraph(text("after")),
        ];
        let (body, diagnostics) = render_body(&blocks, &RenderConfig::default(), "page");
        assert_eq!(body, "before\n\nafter\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].has_code(UNSUPPORTED_BLOCK));
        assert_eq!(diagnostics[0].block.as_deref(), Some("u1"));
    }

    #[test]
    fn test_render_block_at_depth() {
        let config = RenderConfig::default();
        let mut generator = MarkdownGenerator::new(&config, "page");
        let out = generator.render_block(&Block::bulleted(text("x")), 1);
        assert_eq!(out, "    - x\n");
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let mut block = Block::quote(text("leaf"));
        for _ in 0..3_000 {
            block = Block::new(BlockKind::ColumnList).with_children(vec![block]);
        }
        assert_eq!(render(&[block]), "> leaf\n");
    }
}
