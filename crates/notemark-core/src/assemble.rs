//! Document assembly and output
//!
//! The document is written to a temporary file next to its destination
//! and renamed into place, so the destination holds either the complete
//! new document or whatever it held before.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{ExportError, Result};

/// Join front matter and body with exactly one blank line between them
///
/// ```
/// use notemark_core::assemble;
///
/// let doc = assemble("---\ntitle: \"A\"\n---\n", "Hello\n");
/// assert_eq!(doc, "---\ntitle: \"A\"\n---\n\nHello\n");
/// ```
pub fn assemble(front_matter: &str, body: &str) -> String {
    let front_matter = front_matter.trim_end_matches('\n');
    let body = body.trim_start_matches('\n');
    if front_matter.is_empty() {
        return body.to_string();
    }
    format!("{}\n\n{}", front_matter, body)
}

/// Atomically write `document` to `path`, creating parent directories
pub fn write_document(path: &Path, document: &str) -> Result<()> {
    let output_error = |source: io::Error| ExportError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(output_error)?;

    let mut file = NamedTempFile::new_in(dir).map_err(output_error)?;
    file.write_all(document.as_bytes()).map_err(output_error)?;
    file.flush().map_err(output_error)?;
    file.persist(path).map_err(|e| output_error(e.error))?;

    log::debug!("Wrote {} ({} bytes)", path.display(), document.len());
    Ok(())
}
