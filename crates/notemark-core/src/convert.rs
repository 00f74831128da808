//! Page conversion
//!
//! Ties the pieces together for one page: front matter, concurrent image
//! prefetch, body rendering, assembly and the atomic write. Batches of
//! pages are converted in parallel; a failing page never affects the
//! others.

use std::path::PathBuf;

use notemark_assets::AssetResolver;
use notemark_ast::{Block, BlockKind, FileSource, PageDocument};
use rayon::prelude::*;

use crate::assemble::{assemble, write_document};
use crate::config::{RenderConfig, ShortcodeSyntax};
use crate::shortcode::ShortcodeKind;
use crate::datetime::Timestamp;
use crate::diagnostics::{Diagnostic, UNKNOWN_SHORTCODE_GRAMMAR};
use crate::error::Result;
use crate::front_matter::build_front_matter;
use crate::generator::MarkdownGenerator;

/// A page rendered in memory
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// Destination path
    pub path: PathBuf,
    /// Page slug
    pub slug: String,
    /// Complete document: front matter, blank line, body
    pub content: String,
    /// Non-fatal problems met while rendering
    pub diagnostics: Vec<Diagnostic>,
}

/// A page written to disk
#[derive(Debug, Clone, PartialEq)]
pub struct PageOutcome {
    /// Where the document was written
    pub path: PathBuf,
    /// Page slug
    pub slug: String,
    /// Non-fatal problems met while rendering
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of converting one page of a batch
#[derive(Debug)]
pub struct PageResult {
    /// Page identifier
    pub id: String,
    pub result: Result<PageOutcome>,
}

/// Outcome of a batch conversion, in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub pages: Vec<PageResult>,
}

impl BatchReport {
    /// Number of pages written
    pub fn succeeded(&self) -> usize {
        self.pages.iter().filter(|p| p.result.is_ok()).count()
    }

    /// Number of pages that could not be written
    pub fn failed(&self) -> usize {
        self.pages.len() - self.succeeded()
    }

    /// True when every page was written
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Diagnostics of all written pages
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.pages
            .iter()
            .filter_map(|p| p.result.as_ref().ok())
            .flat_map(|outcome| outcome.diagnostics.iter())
    }
}

/// Render a page without writing it
///
/// With a resolver, hosted images are fetched concurrently before the
/// body is rendered; without one, every image keeps its source URL.
pub fn render_page(
    document: &PageDocument,
    config: &RenderConfig,
    resolver: Option<&AssetResolver>,
) -> RenderedPage {
    let front = build_front_matter(&document.page, config);
    let slug = front.slug;
    let mut diagnostics = front.diagnostics;

    if let ShortcodeSyntax::Unknown(name) = &config.shortcodes {
        diagnostics.push(
            Diagnostic::warning(format!("Unknown shortcode grammar `{}`", name))
                .with_code(UNKNOWN_SHORTCODE_GRAMMAR)
                .with_help("Plain Markdown was used instead"),
        );
    }

    let prefetched = resolver.map(|resolver| {
        resolver.resolve_all(image_sources(&document.blocks, config), &slug, &config.assets)
    });

    let mut generator = MarkdownGenerator::new(config, &slug);
    if let Some(resolver) = resolver {
        generator = generator.with_resolver(resolver);
    }
    if let Some(prefetched) = &prefetched {
        generator = generator.with_prefetched(prefetched);
    }
    let body = generator.render_blocks(&document.blocks);
    diagnostics.extend(generator.into_diagnostics());

    let created = Timestamp::parse(&document.page.created_time);
    let path = config.output.path_for(&slug, created.as_ref());

    RenderedPage {
        path,
        content: assemble(&front.text, &body),
        slug,
        diagnostics,
    }
}

/// Render a page and write it to its destination
pub fn convert_page(
    document: &PageDocument,
    config: &RenderConfig,
    resolver: Option<&AssetResolver>,
) -> Result<PageOutcome> {
    let page = render_page(document, config, resolver);
    write_document(&page.path, &page.content)?;

    Ok(PageOutcome {
        path: page.path,
        slug: page.slug,
        diagnostics: page.diagnostics,
    })
}

/// Convert pages in parallel
pub fn convert_batch(
    documents: &[PageDocument],
    config: &RenderConfig,
    resolver: Option<&AssetResolver>,
) -> BatchReport {
    let pages = documents
        .par_iter()
        .map(|document| {
            let result = convert_page(document, config, resolver);
            if let Err(ref e) = result {
                log::warn!("Page {} failed: {}", document.page.id, e);
            }
            PageResult {
                id: document.page.id.clone(),
                result,
            }
        })
        .collect();

    BatchReport { pages }
}

/// Image sources in document order, skipping subtrees that are not rendered
fn image_sources<'b>(blocks: &'b [Block], config: &RenderConfig) -> Vec<&'b FileSource> {
    // A synced reference collapses to a shortcode when the grammar has one
    let synced_shortcode = config
        .grammar()
        .is_some_and(|grammar| grammar.template(ShortcodeKind::Synced).is_some());

    let mut sources = Vec::new();
    let mut stack: Vec<&Block> = blocks.iter().rev().collect();

    while let Some(block) = stack.pop() {
        match block.kind() {
            BlockKind::Unsupported | BlockKind::ChildPage { .. } => continue,
            BlockKind::SyncedBlock {
                synced_from: Some(_),
            } if synced_shortcode => continue,
            BlockKind::Image { source, .. } => sources.push(source),
            _ => {}
        }
        stack.extend(block.children().iter().rev());
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcode::ShortcodeGrammar;
    use notemark_ast::{PageMetadata, RichText};

    fn hosted(url: &str) -> FileSource {
        FileSource::Hosted {
            url: url.to_string(),
            expiry_time: None,
        }
    }

    #[test]
    fn test_image_sources_order_and_skips() {
        let blocks = vec![
            Block::image(hosted("https://s3/a.png"), vec![]),
            Block::bulleted(vec![]).with_children(vec![Block::image(hosted("https://s3/b.png"), vec![])]),
            Block::new(BlockKind::Unsupported)
                .with_children(vec![Block::image(hosted("https://s3/c.png"), vec![])]),
            Block::image(hosted("https://s3/d.png"), vec![]),
        ];
        let urls: Vec<&str> = image_sources(&blocks, &RenderConfig::default())
            .iter()
            .map(|s| s.url())
            .collect();
        assert_eq!(urls, vec!["https://s3/a.png", "https://s3/b.png", "https://s3/d.png"]);
    }

    #[test]
    fn test_image_sources_skip_synced_references_rendered_as_shortcodes() {
        let blocks = vec![Block::new(BlockKind::SyncedBlock {
            synced_from: Some("origin".to_string()),
        })
        .with_children(vec![Block::image(hosted("https://s3/s.png"), vec![])])];

        let plain = RenderConfig::default();
        let urls: Vec<&str> = image_sources(&blocks, &plain).iter().map(|s| s.url()).collect();
        assert_eq!(urls, vec!["https://s3/s.png"]);

        let hugo = RenderConfig::default()
            .with_shortcodes(ShortcodeSyntax::Grammar(ShortcodeGrammar::hugo()));
        assert!(image_sources(&blocks, &hugo).is_empty());

        // A grammar without a synced template renders the children in place
        let partial = ShortcodeGrammar {
            synced: None,
            ..ShortcodeGrammar::hugo()
        };
        let partial = RenderConfig::default().with_shortcodes(ShortcodeSyntax::Grammar(partial));
        assert_eq!(image_sources(&blocks, &partial).len(), 1);
    }

    #[test]
    fn test_render_page_without_resolver() {
        let mut document = PageDocument::new(PageMetadata::with_title(
            "p1",
            vec![RichText::plain("My Post")],
        ));
        document.page.created_time = "2024-03-05T10:00:00Z".to_string();
        document.push(Block::paragraph(vec![RichText::plain("Hi")]));

        let page = render_page(&document, &RenderConfig::default(), None);
        assert_eq!(page.path, PathBuf::from("content/posts/my-post.md"));
        assert!(page.content.starts_with("---\ntitle: \"My Post\"\n"));
        assert!(page.content.ends_with("---\n\nHi\n"));
    }

    #[test]
    fn test_unknown_grammar_reported() {
        let document = PageDocument::new(PageMetadata::with_title("p1", vec![]));
        let config = RenderConfig::default()
            .with_shortcodes(ShortcodeSyntax::Unknown("zola".to_string()));
        let page = render_page(&document, &config, None);
        assert!(page
            .diagnostics
            .iter()
            .any(|d| d.has_code(UNKNOWN_SHORTCODE_GRAMMAR)));
    }

    #[test]
    fn test_batch_report_counts() {
        let report = BatchReport::default();
        assert_eq!(report.succeeded(), 0);
        assert!(report.is_success());
    }
}
