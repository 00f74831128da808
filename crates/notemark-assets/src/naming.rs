//! Stable names and links for downloaded assets
//!
//! Hosted URLs change on every request (signed query strings), so file
//! names are derived from the downloaded bytes instead. Re-running a
//! conversion overwrites the same file with the same bytes.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use sha2::{Digest, Sha256};

/// Hex digits of the content hash kept in file names
pub const HASH_PREFIX_LEN: usize = 16;

/// Extension used when the URL path has none
pub const DEFAULT_EXTENSION: &str = "png";

/// Characters escaped in a URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Compute the SHA-256 of content as lowercase hex
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Helper to format hash as hex string
mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes
            .as_ref()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}

/// File extension of the last path segment of `url`, lowercased
///
/// Query and fragment are ignored. Falls back to [`DEFAULT_EXTENSION`]
/// when the segment has no plausible extension.
pub fn extension_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.rsplit('/').next().unwrap_or(path);

    match segment.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && (1..=5).contains(&ext.len())
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            ext.to_ascii_lowercase()
        }
        _ => DEFAULT_EXTENSION.to_string(),
    }
}

/// File name for downloaded bytes: `<hash prefix>.<extension>`
pub fn asset_file_name(url: &str, content: &[u8]) -> String {
    let hash = content_hash(content);
    format!("{}.{}", &hash[..HASH_PREFIX_LEN], extension_from_url(url))
}

/// Percent-encode one URL path segment
pub fn escape_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Public link for an asset: `<base>/<escaped page slug>/<file name>`
pub fn public_link(base: &str, page_slug: &str, file_name: &str) -> String {
    format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        escape_path_segment(page_slug),
        file_name
    )
}
