//! JSON page format.
//!
//! ```json
//! {
//!   "title": "Front Desk",
//!   "body": [
//!     { "tag": "h1", "children": ["Welcome"] },
//!     { "tag": "p", "class": "note", "style": { "display": "none" }, "children": ["hidden"] }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::DomError;
use crate::node::NodeId;
use crate::style::{Display, InlineStyle, Visibility};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Vec<PageNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageNode {
    Text(String),
    Element(ElementSpec),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Whitespace separated class list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PageNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
}

impl StyleSpec {
    fn to_inline(&self) -> Result<InlineStyle, DomError> {
        let display = match &self.display {
            Some(value) => Some(Display::from_str(value).ok_or_else(|| {
                DomError::InvalidStyle {
                    property: "display",
                    value: value.clone(),
                }
            })?),
            None => None,
        };
        let visibility = match &self.visibility {
            Some(value) => Some(Visibility::from_str(value).ok_or_else(|| {
                DomError::InvalidStyle {
                    property: "visibility",
                    value: value.clone(),
                }
            })?),
            None => None,
        };
        Ok(InlineStyle {
            display,
            visibility,
        })
    }
}

impl Document {
    pub fn from_page(page: &PageSpec) -> Result<Self, DomError> {
        let mut document = Self::new();
        if let Some(title) = &page.title {
            document.set_title(title);
        }

        let body = document.body();
        for node in &page.body {
            let child = document.build_node(node)?;
            document.append_child(body, child)?;
        }

        debug!(
            "built page {:?} with {} nodes",
            page.title.as_deref().unwrap_or("untitled"),
            document.descendants(document.root()).count()
        );
        Ok(document)
    }

    pub fn from_json(json: &str) -> Result<Self, DomError> {
        let page: PageSpec = serde_json::from_str(json)?;
        Self::from_page(&page)
    }

    pub fn load(path: &Path) -> Result<Self, DomError> {
        let json = fs::read_to_string(path).map_err(|source| DomError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn build_node(&mut self, spec: &PageNode) -> Result<NodeId, DomError> {
        match spec {
            PageNode::Text(text) => Ok(self.create_text(text.as_str())),
            PageNode::Element(element) => {
                if !is_valid_tag(&element.tag) {
                    return Err(DomError::InvalidTag(element.tag.clone()));
                }

                let node = self.create_element(&element.tag);
                let style = match &element.style {
                    Some(style) => style.to_inline()?,
                    None => InlineStyle::default(),
                };
                if let Some(data) = self.element_mut(node) {
                    data.id = element.id.clone();
                    data.classes = element
                        .class
                        .as_deref()
                        .unwrap_or_default()
                        .split_whitespace()
                        .map(str::to_string)
                        .collect();
                    data.style = style;
                }

                for child in &element.children {
                    let child = self.build_node(child)?;
                    self.append_child(node, child)?;
                }
                Ok(node)
            }
        }
    }
}

fn is_valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "title": "Rooms",
        "body": [
            { "tag": "h1", "children": ["Room list"] },
            { "tag": "ul", "class": "rooms  compact", "children": [
                { "tag": "li", "children": ["Room 101"] },
                { "tag": "li", "style": { "display": "none" }, "children": ["Room 102"] }
            ] },
            "trailing text"
        ]
    }"#;

    #[test]
    fn loads_nested_page() {
        let document = Document::from_json(PAGE).unwrap();
        let body = document.body();

        assert_eq!(document.title().as_deref(), Some("Rooms"));
        assert_eq!(document.children(body).len(), 3);

        let list = document.children(body)[1];
        assert_eq!(
            document.element(list).unwrap().classes,
            vec!["rooms", "compact"]
        );
        let hidden = document.children(list)[1];
        assert!(!document.computed_style(hidden).unwrap().is_rendered());
        assert_eq!(
            document.text_content(body),
            "Room listRoom 101Room 102trailing text"
        );
    }

    #[test]
    fn rejects_bad_tags_and_styles() {
        let bad_tag = r#"{ "body": [{ "tag": "<script>" }] }"#;
        assert!(matches!(
            Document::from_json(bad_tag),
            Err(DomError::InvalidTag(_))
        ));

        let bad_style = r#"{ "body": [{ "tag": "div", "style": { "display": "sideways" } }] }"#;
        assert!(matches!(
            Document::from_json(bad_style),
            Err(DomError::InvalidStyle {
                property: "display",
                ..
            })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            Document::from_json("{ \"body\": [ "),
            Err(DomError::Json(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Document::load(Path::new("/nonexistent/hotelier/page.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/hotelier/page.json"));
    }
}
