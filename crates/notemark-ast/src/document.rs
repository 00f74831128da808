//! Page documents
//!
//! A [`PageDocument`] pairs a page's metadata with its block tree. It is
//! also the on-disk shape of a page dump consumed by the command line tool.

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::metadata::PageMetadata;

/// A complete page: metadata plus body
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageDocument {
    /// Page metadata
    pub page: PageMetadata,
    /// Top-level blocks in document order
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl PageDocument {
    /// Create a document with no blocks
    pub fn new(page: PageMetadata) -> Self {
        Self {
            page,
            blocks: Vec::new(),
        }
    }

    /// Add a top-level block
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Check if the body is empty
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of top-level blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::RichText;

    #[test]
    fn test_empty_document() {
        let doc = PageDocument::default();
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 0);
    }

    #[test]
    fn test_push_block() {
        let mut doc = PageDocument::new(PageMetadata::with_title(
            "p",
            vec![RichText::plain("T")],
        ));
        doc.push(Block::divider());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_deserialize_dump() {
        let json = r#"{
            "page": {"id": "p1", "properties": {"Name": {"type": "title", "value": [{"text": "A"}]}}},
            "blocks": [{"type": "divider"}, {"type": "paragraph", "text": [{"text": "x"}]}]
        }"#;
        let doc: PageDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.page.id, "p1");
        assert_eq!(doc.len(), 2);
    }
}
