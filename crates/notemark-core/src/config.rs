//! Render configuration
//!
//! A [`RenderConfig`] is built once per run and shared read-only by every
//! page conversion, including parallel ones.

use std::path::PathBuf;

use notemark_assets::AssetLayout;

use crate::datetime::Timestamp;
use crate::shortcode::ShortcodeGrammar;
use crate::template::Template;

/// Built-in front matter template
pub const DEFAULT_TEMPLATE: &str = "---
title: {{ title }}
date: {{ date }}
lastmod: {{ lastmod }}
slug: {{ slug }}
tags: {{ tags }}
categories: {{ categories }}
description: {{ description }}
draft: {{ draft }}
---
";

/// Where Markdown files are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Directory receiving the posts
    pub post_dir: PathBuf,
    /// Nest posts under a `YYYY-MM-DD` directory of their creation date
    pub group_by_date: bool,
    /// Prepended to the title before slugifying
    pub page_name_prefix: String,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            post_dir: PathBuf::from("content/posts"),
            group_by_date: false,
            page_name_prefix: String::new(),
        }
    }
}

impl OutputLayout {
    /// Output path of a page: `<post_dir>/[<YYYY-MM-DD>/]<slug>.md`
    ///
    /// Grouping is skipped when the creation time is unknown.
    pub fn path_for(&self, slug: &str, created: Option<&Timestamp>) -> PathBuf {
        let mut path = self.post_dir.clone();
        if self.group_by_date {
            if let Some(created) = created {
                path.push(created.date());
            }
        }
        path.push(format!("{}.md", slug));
        path
    }
}

/// Shortcode syntax selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ShortcodeSyntax {
    /// Plain Markdown only
    #[default]
    Off,
    /// Expand through a grammar
    Grammar(ShortcodeGrammar),
    /// A grammar was requested by a name nobody knows; plain Markdown is
    /// used and each page reports it
    Unknown(String),
}

impl ShortcodeSyntax {
    /// Select a grammar by name among `custom` and the built-ins
    ///
    /// Custom grammars shadow built-ins of the same name. An empty name
    /// turns shortcodes off.
    pub fn select(name: &str, custom: &[ShortcodeGrammar]) -> Self {
        if name.is_empty() {
            return Self::Off;
        }
        custom
            .iter()
            .find(|g| g.name == name)
            .cloned()
            .or_else(|| ShortcodeGrammar::builtin(name))
            .map(Self::Grammar)
            .unwrap_or_else(|| Self::Unknown(name.to_string()))
    }

    /// The active grammar, if any
    pub fn grammar(&self) -> Option<&ShortcodeGrammar> {
        match self {
            Self::Grammar(grammar) => Some(grammar),
            _ => None,
        }
    }
}

/// Immutable configuration for converting pages
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Markdown output layout
    pub output: OutputLayout,
    /// Asset save and link layout
    pub assets: AssetLayout,
    /// Front matter template
    pub template: Template,
    /// Shortcode expansion
    pub shortcodes: ShortcodeSyntax,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output: OutputLayout::default(),
            assets: AssetLayout::default(),
            template: Template::new(DEFAULT_TEMPLATE),
            shortcodes: ShortcodeSyntax::Off,
        }
    }
}

impl RenderConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output layout
    pub fn with_output(mut self, output: OutputLayout) -> Self {
        self.output = output;
        self
    }

    /// Set the asset layout
    pub fn with_assets(mut self, assets: AssetLayout) -> Self {
        self.assets = assets;
        self
    }

    /// Set the front matter template
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }

    /// Set the shortcode syntax
    pub fn with_shortcodes(mut self, shortcodes: ShortcodeSyntax) -> Self {
        self.shortcodes = shortcodes;
        self
    }

    /// The active shortcode grammar, if any
    pub fn grammar(&self) -> Option<&ShortcodeGrammar> {
        self.shortcodes.grammar()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for() {
        let layout = OutputLayout::default();
        assert_eq!(
            layout.path_for("hello", None),
            PathBuf::from("content/posts/hello.md")
        );
    }

    #[test]
    fn test_path_grouped_by_creation_date() {
        let layout = OutputLayout {
            group_by_date: true,
            ..Default::default()
        };
        let created = Timestamp::parse("2024-03-05T23:30:00-02:00").unwrap();
        assert_eq!(
            layout.path_for("hello", Some(&created)),
            PathBuf::from("content/posts/2024-03-06/hello.md")
        );
        assert_eq!(
            layout.path_for("hello", None),
            PathBuf::from("content/posts/hello.md")
        );
    }

    #[test]
    fn test_select_grammar() {
        assert_eq!(ShortcodeSyntax::select("", &[]), ShortcodeSyntax::Off);
        assert!(ShortcodeSyntax::select("hugo", &[]).grammar().is_some());
        assert_eq!(
            ShortcodeSyntax::select("zola", &[]),
            ShortcodeSyntax::Unknown("zola".to_string())
        );
    }

    #[test]
    fn test_custom_grammar_shadows_builtin() {
        let custom = ShortcodeGrammar {
            embed: Some("<{{ url }}>".to_string()),
            ..Default::default()
        }
        .with_name("hugo");
        let selected = ShortcodeSyntax::select("hugo", &[custom]);
        assert!(selected.grammar().unwrap().callout.is_none());
    }
}
