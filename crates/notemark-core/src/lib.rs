//! # notemark-core
//!
//! Converts a page (metadata plus a tree of typed blocks) into a Markdown
//! document with a front matter preamble, ready for a static site
//! generator.
//!
//! ## Example
//!
//! ```
//! use notemark_ast::{Block, PageDocument, PageMetadata, RichText};
//! use notemark_core::{render_page, RenderConfig};
//!
//! let mut document = PageDocument::new(PageMetadata::with_title(
//!     "p1",
//!     vec![RichText::plain("Hello")],
//! ));
//! document.push(Block::heading(1, vec![RichText::plain("Title")]));
//! document.push(Block::paragraph(vec![
//!     RichText::plain("Hello "),
//!     RichText::plain("world").bold(),
//! ]));
//!
//! let page = render_page(&document, &RenderConfig::default(), None);
//! assert!(page.content.ends_with("# Title\n\nHello **world**\n"));
//! ```

pub mod assemble;
pub mod config;
pub mod convert;
pub mod datetime;
pub mod diagnostics;
pub mod error;
pub mod escape;
pub mod front_matter;
pub mod generator;
pub mod rich_text;
pub mod shortcode;
pub mod slug;
pub mod template;

pub use assemble::{assemble, write_document};
pub use config::{OutputLayout, RenderConfig, ShortcodeSyntax, DEFAULT_TEMPLATE};
pub use convert::{
    convert_batch, convert_page, render_page, BatchReport, PageOutcome, PageResult, RenderedPage,
};
pub use diagnostics::{Diagnostic, Severity};
pub use error::{ExportError, Result};
pub use front_matter::{build_front_matter, FrontMatter};
pub use generator::{render_body, MarkdownGenerator};
pub use shortcode::{ShortcodeArgs, ShortcodeGrammar, ShortcodeKind};
pub use slug::{page_slug, slugify};
pub use template::{Fields, Template};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
