//! Configuration settings
//!
//! Loaded from `notemark.toml`. Every section and field is optional.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notemark_assets::AssetLayout;
use notemark_core::{OutputLayout, RenderConfig, ShortcodeGrammar, ShortcodeSyntax, Template};
use serde::{Deserialize, Serialize};

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Markdown output settings
    pub markdown: MarkdownSettings,
    /// Asset download settings
    pub assets: AssetSettings,
    /// Custom shortcode grammars by name
    pub shortcodes: BTreeMap<String, ShortcodeGrammar>,
}

/// Where and how Markdown is written
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarkdownSettings {
    /// Directory receiving the posts
    pub post_save_path: PathBuf,
    /// Directory receiving downloaded images
    pub image_save_path: PathBuf,
    /// Public base path images are served under
    pub image_public_link: String,
    /// Front matter template file; the built-in template when absent
    pub template: Option<PathBuf>,
    /// Shortcode grammar name; plain Markdown when absent
    pub shortcode_syntax: Option<String>,
    /// Nest posts under their creation date
    pub group_by_month: bool,
    /// Prepended to titles before slugifying
    pub page_name_prefix: String,
}

impl Default for MarkdownSettings {
    fn default() -> Self {
        let output = OutputLayout::default();
        let assets = AssetLayout::default();
        Self {
            post_save_path: output.post_dir,
            image_save_path: assets.save_dir,
            image_public_link: assets.public_link,
            template: None,
            shortcode_syntax: None,
            group_by_month: output.group_by_date,
            page_name_prefix: output.page_name_prefix,
        }
    }
}

/// Asset download behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetSettings {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Download hosted images; when false their URLs are kept
    pub download: bool,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            timeout_secs: notemark_assets::DEFAULT_TIMEOUT.as_secs(),
            download: true,
        }
    }
}

impl AssetSettings {
    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Custom grammars with their names filled in from the table keys
    pub fn grammars(&self) -> Vec<ShortcodeGrammar> {
        self.shortcodes
            .iter()
            .map(|(name, grammar)| grammar.clone().with_name(name))
            .collect()
    }

    /// Build the render configuration
    ///
    /// Relative template paths are resolved against `base_dir`, the
    /// directory of the settings file.
    pub fn render_config(&self, base_dir: &Path) -> notemark_core::Result<RenderConfig> {
        let markdown = &self.markdown;

        let template = match &markdown.template {
            Some(path) => Template::from_file(&base_dir.join(path))?,
            None => Template::new(notemark_core::DEFAULT_TEMPLATE),
        };

        let shortcodes = ShortcodeSyntax::select(
            markdown.shortcode_syntax.as_deref().unwrap_or_default(),
            &self.grammars(),
        );

        Ok(RenderConfig::default()
            .with_output(OutputLayout {
                post_dir: markdown.post_save_path.clone(),
                group_by_date: markdown.group_by_month,
                page_name_prefix: markdown.page_name_prefix.clone(),
            })
            .with_assets(AssetLayout {
                save_dir: markdown.image_save_path.clone(),
                public_link: markdown.image_public_link.clone(),
                download: self.assets.download,
            })
            .with_template(template)
            .with_shortcodes(shortcodes))
    }
}
