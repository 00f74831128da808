//! Asset resolution
//!
//! Maps an image reference to the link that ends up in the Markdown body.
//! Stable external URLs pass through untouched; hosted (expiring) URLs are
//! downloaded, written under the page's asset directory and relinked to
//! the public base path.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use notemark_ast::FileSource;
use rayon::prelude::*;

use crate::error::{AssetError, Result};
use crate::fetch::AssetFetcher;
use crate::naming::{asset_file_name, public_link};

/// Where assets are written and how they are linked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    /// Directory that receives one sub-directory per page
    pub save_dir: PathBuf,
    /// Public base path the site serves `save_dir` under
    pub public_link: String,
    /// Download hosted files; when false their URLs are kept as-is
    pub download: bool,
}

impl Default for AssetLayout {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("static/images"),
            public_link: "/images".to_string(),
            download: true,
        }
    }
}

/// Outcome of resolving every hosted image of one page, keyed by source URL
pub type ResolvedAssets = HashMap<String, Result<String>>;

/// Resolves image references for pages
#[derive(Clone)]
pub struct AssetResolver {
    fetcher: Arc<dyn AssetFetcher>,
}

impl std::fmt::Debug for AssetResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetResolver")
            .field("fetcher", &self.fetcher.name())
            .finish()
    }
}

impl AssetResolver {
    /// Create a resolver backed by `fetcher`
    pub fn new(fetcher: impl AssetFetcher + 'static) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
        }
    }

    /// Name of the underlying fetcher
    pub fn fetcher_name(&self) -> &'static str {
        self.fetcher.name()
    }

    /// Resolve one image reference for the page identified by `page_slug`
    ///
    /// Returns the link to embed. Fails with a fetch or write error for
    /// hosted files; callers decide how to degrade.
    pub fn resolve(
        &self,
        source: &FileSource,
        page_slug: &str,
        layout: &AssetLayout,
    ) -> Result<String> {
        match source {
            FileSource::External { url } => Ok(url.clone()),
            FileSource::Hosted { url, .. } if !layout.download => Ok(url.clone()),
            FileSource::Hosted { url, .. } => self.download(url, page_slug, layout),
        }
    }

    fn download(&self, url: &str, page_slug: &str, layout: &AssetLayout) -> Result<String> {
        let bytes = self.fetcher.fetch(url)?;
        let file_name = asset_file_name(url, &bytes);

        let dir = layout.save_dir.join(page_slug);
        fs::create_dir_all(&dir).map_err(|source| AssetError::Write {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(&file_name);
        fs::write(&path, &bytes).map_err(|source| AssetError::Write {
            path: path.clone(),
            source,
        })?;
        log::debug!("Saved {} ({} bytes) to {}", url, bytes.len(), path.display());

        Ok(public_link(&layout.public_link, page_slug, &file_name))
    }

    /// Resolve every hosted image of a page concurrently
    ///
    /// Each distinct URL is fetched once. The result is joined back into
    /// the render by URL before the owning block is emitted.
    pub fn resolve_all<'a>(
        &self,
        sources: impl IntoIterator<Item = &'a FileSource>,
        page_slug: &str,
        layout: &AssetLayout,
    ) -> ResolvedAssets {
        let mut unique: Vec<&FileSource> = Vec::new();
        for source in sources {
            if source.is_hosted() && !unique.iter().any(|s| s.url() == source.url()) {
                unique.push(source);
            }
        }

        unique
            .par_iter()
            .map(|source| {
                let result = self.resolve(source, page_slug, layout);
                if let Err(ref e) = result {
                    log::warn!("Asset unavailable: {}", e);
                }
                (source.url().to_string(), result)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticFetcher(&'static [u8]);

    impl AssetFetcher for StaticFetcher {
        fn name(&self) -> &'static str {
            "static"
        }

        fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            Ok(self.0.to_vec())
        }
    }

    #[test]
    fn test_external_passthrough() {
        let resolver = AssetResolver::new(StaticFetcher(b"x"));
        let source = FileSource::External {
            url: "https://example.com/a.png".to_string(),
        };
        let link = resolver
            .resolve(&source, "post", &AssetLayout::default())
            .unwrap();
        assert_eq!(link, "https://example.com/a.png");
    }

    #[test]
    fn test_hosted_kept_when_download_disabled() {
        let resolver = AssetResolver::new(StaticFetcher(b"x"));
        let layout = AssetLayout {
            download: false,
            ..Default::default()
        };
        let source = FileSource::Hosted {
            url: "https://s3/a.png?sig=1".to_string(),
            expiry_time: None,
        };
        assert_eq!(
            resolver.resolve(&source, "post", &layout).unwrap(),
            "https://s3/a.png?sig=1"
        );
    }

    #[test]
    fn test_debug_names_fetcher() {
        let resolver = AssetResolver::new(StaticFetcher(b"x"));
        assert!(format!("{:?}", resolver).contains("static"));
    }
}
