//! Inline rich text
//!
//! A block's visible text is an ordered sequence of [`RichText`] runs.
//! Each run carries its own formatting; the sequence as a whole, not the
//! bare concatenation, defines how the text looks.

use serde::{Deserialize, Serialize};

/// A contiguous styled run of text
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RichText {
    /// Plain text content
    #[serde(default)]
    pub text: String,
    /// Independent formatting flags
    #[serde(default)]
    pub annotations: Annotations,
    /// Named color (e.g. "red", "blue_background")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Hyperlink target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Boolean formatting flags of a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

impl Annotations {
    /// True when no flag is set
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

impl RichText {
    /// Create an unformatted run
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set the bold flag
    pub fn bold(mut self) -> Self {
        self.annotations.bold = true;
        self
    }

    /// Set the italic flag
    pub fn italic(mut self) -> Self {
        self.annotations.italic = true;
        self
    }

    /// Set the strikethrough flag
    pub fn strikethrough(mut self) -> Self {
        self.annotations.strikethrough = true;
        self
    }

    /// Set the underline flag
    pub fn underline(mut self) -> Self {
        self.annotations.underline = true;
        self
    }

    /// Set the inline code flag
    pub fn code(mut self) -> Self {
        self.annotations.code = true;
        self
    }

    /// Attach a color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Attach a hyperlink
    pub fn with_link(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}

/// Concatenate the raw text of a run sequence, ignoring formatting
pub fn plain_text(spans: &[RichText]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}
