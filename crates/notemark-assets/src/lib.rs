//! # notemark-assets
//!
//! Image asset resolution for notemark.
//!
//! Page exports reference images in two ways: stable external URLs and
//! source-hosted URLs that expire after a while. The latter must be
//! downloaded and served from the site itself.
//!
//! ## Example
//!
//! ```no_run
//! use notemark_assets::{AssetLayout, AssetResolver, HttpFetcher};
//! use notemark_ast::FileSource;
//!
//! let resolver = AssetResolver::new(HttpFetcher::new()?);
//! let layout = AssetLayout::default();
//!
//! let link = resolver.resolve(
//!     &FileSource::Hosted {
//!         url: "https://files.example.com/abc/diagram.png?sig=xyz".to_string(),
//!         expiry_time: None,
//!     },
//!     "my-post",
//!     &layout,
//! )?;
//! assert!(link.starts_with("/images/my-post/"));
//! # Ok::<(), notemark_assets::AssetError>(())
//! ```

pub mod error;
pub mod fetch;
pub mod naming;
pub mod resolver;

pub use error::{AssetError, Result};
pub use fetch::{AssetFetcher, HttpFetcher, DEFAULT_TIMEOUT};
pub use naming::{asset_file_name, content_hash, extension_from_url, public_link};
pub use resolver::{AssetLayout, AssetResolver, ResolvedAssets};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
