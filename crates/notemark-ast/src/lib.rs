//! notemark-ast - Block tree definitions
//!
//! This crate provides the types used by notemark for representing a
//! page: its metadata properties and its tree of typed content blocks
//! with inline rich text.

pub mod block;
pub mod document;
pub mod inline;
pub mod metadata;

pub use block::{Block, BlockKind, FileSource, TableRow};
pub use document::PageDocument;
pub use inline::{plain_text, Annotations, RichText};
pub use metadata::{DateValue, PageMetadata, PropertyValue};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
