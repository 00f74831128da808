//! Conversion diagnostics
//!
//! Failures local to one block or one asset are absorbed: the document is
//! still produced in a degraded form and a [`Diagnostic`] describing the
//! problem is returned next to it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A block kind the renderer has no rule for
pub const UNSUPPORTED_BLOCK: &str = "N001";
/// A hosted asset could not be downloaded
pub const ASSET_FETCH_FAILURE: &str = "N002";
/// A downloaded asset could not be written
pub const ASSET_WRITE_FAILURE: &str = "N003";
/// A front matter placeholder had no value
pub const TEMPLATE_FIELD_MISSING: &str = "N004";
/// The configured shortcode grammar does not exist
pub const UNKNOWN_SHORTCODE_GRAMMAR: &str = "N005";

/// A diagnostic message produced while converting a page
///
/// # Example
///
/// ```
/// use notemark_core::diagnostics::{Diagnostic, Severity};
///
/// let diag = Diagnostic::warning("Unsupported block kind: breadcrumb")
///     .with_code("N001")
///     .with_block("4f1c")
///     .with_help("The block was skipped");
/// assert_eq!(diag.severity, Severity::Warning);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level of the diagnostic
    pub severity: Severity,

    /// The diagnostic message
    pub message: String,

    /// Diagnostic code (e.g., "N001")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Identifier of the block the issue belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,

    /// Additional help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning, the output is degraded
    Warning,

    /// Error, part of the output is missing or broken
    Error,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            code: None,
            block: None,
            help: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Create an info diagnostic
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Set the diagnostic code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the block identifier; empty ids are ignored
    pub fn with_block(mut self, block: impl Into<String>) -> Self {
        let block = block.into();
        if !block.is_empty() {
            self.block = Some(block);
        }
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Check the code
    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }

    /// Check if this is an error-level diagnostic
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    /// Check if this is a warning-level diagnostic
    pub fn is_warning(&self) -> bool {
        matches!(self.severity, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(ref code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(ref block) = self.block {
            write!(f, " (block {})", block)?;
        }
        if let Some(ref help) = self.help {
            write!(f, "\n  = help: {}", help)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let diag = Diagnostic::error("Image unavailable")
            .with_code(ASSET_FETCH_FAILURE)
            .with_block("b1");
        assert!(diag.is_error());
        assert!(diag.has_code("N002"));
        assert_eq!(diag.block.as_deref(), Some("b1"));
    }

    #[test]
    fn test_empty_block_id_ignored() {
        let diag = Diagnostic::warning("x").with_block("");
        assert!(diag.block.is_none());
    }

    #[test]
    fn test_display() {
        let diag = Diagnostic::warning("Unsupported block kind: pdf")
            .with_code(UNSUPPORTED_BLOCK)
            .with_block("abc")
            .with_help("The block was skipped");
        assert_eq!(
            diag.to_string(),
            "warning[N001]: Unsupported block kind: pdf (block abc)\n  = help: The block was skipped"
        );
    }

    #[test]
    fn test_json_omits_empty_fields() {
        let json = serde_json::to_string(&Diagnostic::info("ok")).unwrap();
        assert_eq!(json, r#"{"severity":"info","message":"ok"}"#);
    }
}
