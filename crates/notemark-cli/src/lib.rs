//! # notemark-cli
//!
//! Command-line interface for notemark.
//!
//! ## Usage
//!
//! ```bash
//! # Convert page dumps into Markdown posts
//! notemark convert dumps/ --config notemark.toml
//!
//! # Preview without writing files or downloading images
//! notemark convert page.json --dry-run --no-download
//!
//! # Show the slug a title would get
//! notemark slug "Hello, World!"
//!
//! # Show the front matter template in effect
//! notemark template
//! ```

pub mod app;
pub mod settings;

pub use app::{
    convert_command, load_documents, run_cli, ConvertOptions, DumpFailure, LoadedDumps,
    OutputFormat,
};
pub use settings::{AssetSettings, MarkdownSettings, Settings};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
