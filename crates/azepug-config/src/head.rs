//! Extra `<head>` elements injected into every page.
//!
//! In the site source each element is a `[tag, attributes]` pair, with an
//! optional third item for inner content:
//!
//! ```toml
//! head = [
//!     ["meta", { name = "theme-color", content = "#3eaf7c" }],
//!     ["script", { type = "module" }, "import './hello.js'"],
//! ]
//! ```

use std::collections::BTreeMap;

use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize, Serializer};

use crate::ConfigShapeError;

/// Elements rendered without a closing tag.
const VOID_ELEMENTS: &[&str] = &["base", "link", "meta"];

/// Head element as written in the site source.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum HeadTagRaw {
    WithContent(String, BTreeMap<String, String>, String),
    Bare(String, BTreeMap<String, String>),
}

/// A validated head element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadTag {
    tag: String,
    attrs: BTreeMap<String, String>,
    content: Option<String>,
}

impl HeadTag {
    /// Tag name as written in the source (e.g., "meta").
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes, ordered by name.
    #[must_use]
    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }

    /// Attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Inner content, if any.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Render the element as HTML.
    ///
    /// Attribute values are escaped. Inner content is emitted as written.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = format!("<{}", self.tag);
        for (name, value) in &self.attrs {
            html.push(' ');
            html.push_str(name);
            html.push_str("=\"");
            html.push_str(&escape_attr(value));
            html.push('"');
        }
        html.push('>');

        let is_void = VOID_ELEMENTS
            .iter()
            .any(|void| void.eq_ignore_ascii_case(&self.tag));
        if is_void && self.content.is_none() {
            return html;
        }

        if let Some(content) = &self.content {
            html.push_str(content);
        }
        html.push_str("</");
        html.push_str(&self.tag);
        html.push('>');
        html
    }

    /// Validate a raw element. `index` is its position in `head`.
    pub(crate) fn from_raw(raw: HeadTagRaw, index: usize) -> Result<Self, ConfigShapeError> {
        let (tag, attrs, content) = match raw {
            HeadTagRaw::WithContent(tag, attrs, content) => (tag, attrs, Some(content)),
            HeadTagRaw::Bare(tag, attrs) => (tag, attrs, None),
        };

        let field = format!("head[{index}]");
        if tag.is_empty() {
            return Err(ConfigShapeError::invalid(field, "tag name cannot be empty"));
        }
        if !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigShapeError::invalid(
                field,
                format!("tag name '{tag}' must be ASCII alphanumeric"),
            ));
        }
        if let Some(name) = attrs.keys().find(|name| !is_attr_name(name)) {
            return Err(ConfigShapeError::invalid(
                field,
                format!("attribute name '{name}' is not valid"),
            ));
        }

        Ok(Self {
            tag,
            attrs,
            content,
        })
    }
}

impl Serialize for HeadTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.content.is_some() { 3 } else { 2 };
        let mut tuple = serializer.serialize_tuple(len)?;
        tuple.serialize_element(&self.tag)?;
        tuple.serialize_element(&self.attrs)?;
        if let Some(content) = &self.content {
            tuple.serialize_element(content)?;
        }
        tuple.end()
    }
}

fn is_attr_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
