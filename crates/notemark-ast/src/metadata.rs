//! Page metadata
//!
//! A page carries a mapping from property name to typed property value,
//! mirroring the columns of the database the page lives in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::inline::RichText;

/// Metadata of one page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Page identifier
    pub id: String,
    /// Creation timestamp (RFC 3339)
    #[serde(default)]
    pub created_time: String,
    /// Last edit timestamp (RFC 3339)
    #[serde(default)]
    pub last_edited_time: String,
    /// Named properties
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

/// Typed property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    /// The page title
    Title(Vec<RichText>),
    /// Formatted text
    RichText(Vec<RichText>),
    /// A number
    Number(Option<f64>),
    /// Single choice
    Select(Option<String>),
    /// Multiple choices
    MultiSelect(Vec<String>),
    /// Workflow status
    Status(Option<String>),
    /// Date or date range
    Date(Option<DateValue>),
    /// Boolean
    Checkbox(bool),
    /// URL
    Url(Option<String>),
    /// Email address
    Email(Option<String>),
    /// User names
    People(Vec<String>),
    /// Creation timestamp
    CreatedTime(String),
    /// Last edit timestamp
    LastEditedTime(String),
}

/// A date with an optional end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateValue {
    /// Start date or datetime (ISO 8601)
    pub start: String,
    /// End date or datetime (ISO 8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl PageMetadata {
    /// Create metadata with a title stored under `Name`
    pub fn with_title(id: impl Into<String>, title: Vec<RichText>) -> Self {
        let mut meta = Self {
            id: id.into(),
            ..Default::default()
        };
        meta.properties
            .insert("Name".to_string(), PropertyValue::Title(title));
        meta
    }

    /// Set a property
    pub fn set_property(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.properties.insert(name.into(), value);
    }

    /// Get a property by exact name
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// The title runs
    ///
    /// Every page has exactly one title property; an empty slice is
    /// returned for malformed input rather than failing.
    pub fn title(&self) -> &[RichText] {
        self.properties
            .values()
            .find_map(|value| match value {
                PropertyValue::Title(runs) => Some(runs.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }
}
