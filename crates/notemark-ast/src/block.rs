//! Block-level elements for page content
//!
//! A page body is an ordered sequence of [`Block`]s. Each block has a kind
//! (a closed set, see [`BlockKind`]) carrying only the payload that kind
//! needs, plus an ordered list of child blocks. Child order is document
//! order.

use serde::{Deserialize, Serialize};

use crate::inline::RichText;

/// One node of the content tree
///
/// The kind is fixed at construction; there is no setter for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Source identifier, used in diagnostics and shortcodes
    #[serde(default)]
    id: String,
    /// Kind tag and kind-specific payload
    #[serde(flatten)]
    kind: BlockKind,
    /// Nested blocks in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Block>,
}

/// Block kind with its payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    /// A paragraph of text
    Paragraph {
        #[serde(default)]
        text: Vec<RichText>,
    },
    /// A section heading (levels 1 to 3)
    Heading {
        level: u8,
        #[serde(default)]
        text: Vec<RichText>,
    },
    /// An unordered list item
    BulletedListItem {
        #[serde(default)]
        text: Vec<RichText>,
    },
    /// An ordered list item
    NumberedListItem {
        #[serde(default)]
        text: Vec<RichText>,
    },
    /// A checkbox item
    ToDo {
        #[serde(default)]
        text: Vec<RichText>,
        #[serde(default)]
        checked: bool,
    },
    /// A collapsible section
    Toggle {
        #[serde(default)]
        text: Vec<RichText>,
    },
    /// A block quote
    Quote {
        #[serde(default)]
        text: Vec<RichText>,
    },
    /// A highlighted note with an optional icon
    Callout {
        #[serde(default)]
        text: Vec<RichText>,
        #[serde(default)]
        icon: Option<String>,
    },
    /// A code listing; the runs are emitted verbatim
    Code {
        #[serde(default)]
        language: Option<String>,
        #[serde(default)]
        text: Vec<RichText>,
        #[serde(default)]
        caption: Vec<RichText>,
    },
    /// An image
    Image {
        source: FileSource,
        #[serde(default)]
        caption: Vec<RichText>,
    },
    /// A video
    Video {
        source: FileSource,
        #[serde(default)]
        caption: Vec<RichText>,
    },
    /// A link preview card
    Bookmark {
        url: String,
        #[serde(default)]
        caption: Vec<RichText>,
    },
    /// Embedded third-party content
    Embed {
        url: String,
        #[serde(default)]
        caption: Vec<RichText>,
    },
    /// A display math block
    Equation { expression: String },
    /// A horizontal rule
    Divider,
    /// A table with its rows
    Table {
        #[serde(default)]
        has_column_header: bool,
        #[serde(default)]
        has_row_header: bool,
        #[serde(default)]
        rows: Vec<TableRow>,
    },
    /// Content shared between pages; `synced_from` is set on references
    SyncedBlock {
        #[serde(default)]
        synced_from: Option<String>,
    },
    /// Container of columns
    ColumnList,
    /// A single column
    Column,
    /// A link to a sub-page
    ChildPage { title: String },
    /// Any kind this crate does not know
    #[serde(other)]
    Unsupported,
}

/// Where a media file lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileSource {
    /// Stable, externally hosted URL
    External { url: String },
    /// Source-managed URL that expires
    #[serde(rename = "file")]
    Hosted {
        url: String,
        #[serde(default)]
        expiry_time: Option<String>,
    },
}

impl FileSource {
    /// The URL regardless of hosting
    pub fn url(&self) -> &str {
        match self {
            Self::External { url } | Self::Hosted { url, .. } => url,
        }
    }

    /// Whether the URL expires and must be downloaded
    pub fn is_hosted(&self) -> bool {
        matches!(self, Self::Hosted { .. })
    }
}

/// A table row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableRow {
    /// One rich text sequence per cell
    #[serde(default)]
    pub cells: Vec<Vec<RichText>>,
}

impl TableRow {
    /// Create a row from cell contents
    pub fn new(cells: Vec<Vec<RichText>>) -> Self {
        Self { cells }
    }
}

impl BlockKind {
    /// Stable kind name, matching the serialized `type` tag
    pub fn name(&self) -> &'static str {
        match self {
            Self::Paragraph { .. } => "paragraph",
            Self::Heading { .. } => "heading",
            Self::BulletedListItem { .. } => "bulleted_list_item",
            Self::NumberedListItem { .. } => "numbered_list_item",
            Self::ToDo { .. } => "to_do",
            Self::Toggle { .. } => "toggle",
            Self::Quote { .. } => "quote",
            Self::Callout { .. } => "callout",
            Self::Code { .. } => "code",
            Self::Image { .. } => "image",
            Self::Video { .. } => "video",
            Self::Bookmark { .. } => "bookmark",
            Self::Embed { .. } => "embed",
            Self::Equation { .. } => "equation",
            Self::Divider => "divider",
            Self::Table { .. } => "table",
            Self::SyncedBlock { .. } => "synced_block",
            Self::ColumnList => "column_list",
            Self::Column => "column",
            Self::ChildPage { .. } => "child_page",
            Self::Unsupported => "unsupported",
        }
    }

    /// List items are joined without blank lines between siblings
    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            Self::BulletedListItem { .. } | Self::NumberedListItem { .. } | Self::ToDo { .. }
        )
    }
}

impl Block {
    /// Create a block without id or children
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: String::new(),
            kind,
            children: Vec::new(),
        }
    }

    /// Set the source identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the children
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    /// Source identifier (may be empty)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Kind and payload
    pub fn kind(&self) -> &BlockKind {
        &self.kind
    }

    /// Children in document order
    pub fn children(&self) -> &[Block] {
        &self.children
    }

    pub fn paragraph(text: Vec<RichText>) -> Self {
        Self::new(BlockKind::Paragraph { text })
    }

    pub fn heading(level: u8, text: Vec<RichText>) -> Self {
        Self::new(BlockKind::Heading { level, text })
    }

    pub fn bulleted(text: Vec<RichText>) -> Self {
        Self::new(BlockKind::BulletedListItem { text })
    }

    pub fn numbered(text: Vec<RichText>) -> Self {
        Self::new(BlockKind::NumberedListItem { text })
    }

    pub fn to_do(text: Vec<RichText>, checked: bool) -> Self {
        Self::new(BlockKind::ToDo { text, checked })
    }

    pub fn quote(text: Vec<RichText>) -> Self {
        Self::new(BlockKind::Quote { text })
    }

    /// A code block holding `source` as a single run
    pub fn code(language: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(BlockKind::Code {
            language: Some(language.into()),
            text: vec![RichText::plain(source)],
            caption: Vec::new(),
        })
    }

    pub fn image(source: FileSource, caption: Vec<RichText>) -> Self {
        Self::new(BlockKind::Image { source, caption })
    }

    pub fn divider() -> Self {
        Self::new(BlockKind::Divider)
    }

    /// Visit this block and every descendant in document order
    ///
    /// Uses an explicit stack, so arbitrarily deep trees are safe.
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(&'a Block)) {
        let mut stack = vec![self];
        while let Some(block) = stack.pop() {
            visit(block);
            stack.extend(block.children.iter().rev());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_constructor() {
        let block = Block::paragraph(vec![RichText::plain("Hi")]).with_id("b1");
        assert_eq!(block.id(), "b1");
        assert_eq!(block.kind().name(), "paragraph");
        assert!(block.children().is_empty());
    }

    #[test]
    fn test_list_item_detection() {
        assert!(Block::bulleted(vec![]).kind().is_list_item());
        assert!(Block::numbered(vec![]).kind().is_list_item());
        assert!(Block::to_do(vec![], true).kind().is_list_item());
        assert!(!Block::paragraph(vec![]).kind().is_list_item());
    }

    #[test]
    fn test_file_source() {
        let hosted = FileSource::Hosted {
            url: "https://s3.example.com/a.png?sig=1".to_string(),
            expiry_time: None,
        };
        assert!(hosted.is_hosted());
        assert_eq!(hosted.url(), "https://s3.example.com/a.png?sig=1");

        let external = FileSource::External {
            url: "https://example.com/b.png".to_string(),
        };
        assert!(!external.is_hosted());
    }

    #[test]
    fn test_walk_document_order() {
        let tree = Block::bulleted(vec![RichText::plain("a")])
            .with_id("a")
            .with_children(vec![
                Block::bulleted(vec![]).with_id("b").with_children(vec![
                    Block::bulleted(vec![]).with_id("c"),
                ]),
                Block::bulleted(vec![]).with_id("d"),
            ]);

        let mut ids = Vec::new();
        tree.walk(|b| ids.push(b.id().to_string()));
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_deserialize_tagged_block() {
        let json = r#"{
            "id": "h1",
            "type": "heading",
            "level": 2,
            "text": [{"text": "Intro"}]
        }"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.id(), "h1");
        match block.kind() {
            BlockKind::Heading { level, text } => {
                assert_eq!(*level, 2);
                assert_eq!(text[0].text, "Intro");
            }
            other => panic!("Expected heading, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_children_and_image() {
        let json = r#"{
            "type": "bulleted_list_item",
            "text": [{"text": "parent"}],
            "children": [
                {"type": "image", "source": {"type": "file", "url": "https://s3/x.png"}}
            ]
        }"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.children().len(), 1);
        match block.children()[0].kind() {
            BlockKind::Image { source, caption } => {
                assert!(source.is_hosted());
                assert!(caption.is_empty());
            }
            other => panic!("Expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_unknown_kind() {
        let json = r#"{"id": "x", "type": "breadcrumb"}"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.kind(), &BlockKind::Unsupported);
    }
}
