//! Shortcode grammars
//!
//! Some block kinds have no native Markdown form. When a grammar is
//! selected, those kinds are emitted through its templates instead of the
//! plain Markdown fallback. Templates use the `{{ content }}`,
//! `{{ icon }}`, `{{ url }}`, `{{ caption }}` and `{{ id }}` placeholders.

use serde::{Deserialize, Serialize};

use crate::template::{Fields, Template};

/// Block kinds a grammar can provide a template for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcodeKind {
    Callout,
    Embed,
    Bookmark,
    Video,
    Synced,
}

/// Values available to a shortcode template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcodeArgs {
    /// Rendered Markdown body, inserted verbatim
    pub content: String,
    pub icon: String,
    pub url: String,
    pub caption: String,
    pub id: String,
}

/// A named set of shortcode templates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortcodeGrammar {
    /// Grammar name; taken from the settings table key
    #[serde(skip)]
    pub name: String,
    pub callout: Option<String>,
    pub embed: Option<String>,
    pub bookmark: Option<String>,
    pub video: Option<String>,
    pub synced: Option<String>,
}

impl ShortcodeGrammar {
    /// The built-in Hugo grammar
    pub fn hugo() -> Self {
        Self {
            name: "hugo".to_string(),
            callout: Some(
                "{{% callout icon=\"{{ icon }}\" %}}\n{{ content }}\n{{% /callout %}}".to_string(),
            ),
            embed: Some("{{< embed url=\"{{ url }}\" >}}".to_string()),
            bookmark: Some("{{< bookmark url=\"{{ url }}\" caption=\"{{ caption }}\" >}}".to_string()),
            video: Some("{{< video src=\"{{ url }}\" >}}".to_string()),
            synced: Some("{{< synced id=\"{{ id }}\" >}}".to_string()),
        }
    }

    /// Look up a built-in grammar by name
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "hugo" => Some(Self::hugo()),
            _ => None,
        }
    }

    /// Set the grammar name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Template source for a kind, if the grammar has one
    pub fn template(&self, kind: ShortcodeKind) -> Option<&str> {
        match kind {
            ShortcodeKind::Callout => self.callout.as_deref(),
            ShortcodeKind::Embed => self.embed.as_deref(),
            ShortcodeKind::Bookmark => self.bookmark.as_deref(),
            ShortcodeKind::Video => self.video.as_deref(),
            ShortcodeKind::Synced => self.synced.as_deref(),
        }
    }

    /// Expand the template for `kind`; `None` when the grammar has none
    ///
    /// Attribute values are quoted-string safe; `content` is inserted raw.
    pub fn expand(&self, kind: ShortcodeKind, args: &ShortcodeArgs) -> Option<String> {
        let source = self.template(kind)?;

        let mut fields = Fields::new();
        fields.insert("content".to_string(), args.content.clone());
        fields.insert("icon".to_string(), escape_attribute(&args.icon));
        fields.insert("url".to_string(), escape_attribute(&args.url));
        fields.insert("caption".to_string(), escape_attribute(&args.caption));
        fields.insert("id".to_string(), escape_attribute(&args.id));

        Some(Template::new(source).render_inline(&fields))
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(ShortcodeGrammar::builtin("hugo").map(|g| g.name), Some("hugo".to_string()));
        assert!(ShortcodeGrammar::builtin("jekyll").is_none());
    }

    #[test]
    fn test_hugo_callout() {
        let args = ShortcodeArgs {
            content: "Watch *out*".to_string(),
            icon: "⚠️".to_string(),
            ..Default::default()
        };
        let out = ShortcodeGrammar::hugo()
            .expand(ShortcodeKind::Callout, &args)
            .unwrap();
        assert_eq!(out, "{{% callout icon=\"⚠️\" %}}\nWatch *out*\n{{% /callout %}}");
    }

    #[test]
    fn test_attribute_quotes_escaped() {
        let args = ShortcodeArgs {
            url: "https://x.org/?q=\"a\"".to_string(),
            caption: "say \"hi\"".to_string(),
            ..Default::default()
        };
        let out = ShortcodeGrammar::hugo()
            .expand(ShortcodeKind::Bookmark, &args)
            .unwrap();
        assert_eq!(
            out,
            "{{< bookmark url=\"https://x.org/?q=\\\"a\\\"\" caption=\"say \\\"hi\\\"\" >}}"
        );
    }

    #[test]
    fn test_missing_template() {
        let grammar = ShortcodeGrammar {
            embed: Some("<embed {{ url }}>".to_string()),
            ..Default::default()
        };
        assert!(grammar
            .expand(ShortcodeKind::Callout, &ShortcodeArgs::default())
            .is_none());
    }

    #[test]
    fn test_deserialize_custom_grammar() {
        let grammar: ShortcodeGrammar =
            serde_json::from_str(r#"{"embed": "{{< embed \"{{ url }}\" >}}"}"#).unwrap();
        assert!(grammar.callout.is_none());
        assert_eq!(grammar.template(ShortcodeKind::Embed), Some("{{< embed \"{{ url }}\" >}}"));
    }
}
