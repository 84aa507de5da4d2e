use std::fmt::Debug;

use hotelier_dom::{Document, NodeId, ScrollBehavior, ScrollBlock};
use log::warn;

/// One run of a split text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Marker(&'a str),
}

impl<'a> Segment<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Self::Text(text) | Self::Marker(text) => *text,
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, Self::Marker(_))
    }
}

/// The render tree a [`SearchEngine`](crate::SearchEngine) searches and marks.
pub trait SearchHost {
    type Node: Copy + Eq + Debug;

    fn body(&self) -> Option<Self::Node>;

    fn children(&self, node: Self::Node) -> &[Self::Node];

    /// Text of a text node, `None` for elements.
    fn text(&self, node: Self::Node) -> Option<&str>;

    /// Lowercase tag name of an element, `None` for text nodes.
    fn tag(&self, node: Self::Node) -> Option<&str>;

    /// Computed display is not `none` and computed visibility is not `hidden`.
    fn is_rendered(&self, element: Self::Node) -> bool;

    fn is_attached(&self, node: Self::Node) -> bool;

    /// Replaces a text node in place with `segments`, wrapping every
    /// [`Segment::Marker`] in a marker element carrying `marker_class`.
    ///
    /// Returns the created markers in order, or an empty list if the node
    /// could not be replaced.
    fn replace_with_segments(
        &mut self,
        node: Self::Node,
        segments: &[Segment<'_>],
        marker_class: &str,
    ) -> Vec<Self::Node>;

    /// Puts a marker's text back in place of the marker and merges the
    /// surrounding text. Returns false if the marker is detached.
    fn unwrap_marker(&mut self, marker: Self::Node) -> bool;

    fn set_class(&mut self, node: Self::Node, class: &str, enabled: bool) -> bool;

    fn scroll_into_view(
        &mut self,
        node: Self::Node,
        behavior: ScrollBehavior,
        block: ScrollBlock,
    ) -> bool;

    fn has_stylesheet(&self, id: &str) -> bool;

    fn install_stylesheet(&mut self, id: &str, css: &str);
}

const MARKER_TAG: &str = "mark";

impl SearchHost for Document {
    type Node = NodeId;

    fn body(&self) -> Option<NodeId> {
        Some(Document::body(self))
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        Document::children(self, node)
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        Document::text(self, node)
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        Document::tag(self, node)
    }

    fn is_rendered(&self, element: NodeId) -> bool {
        self.computed_style(element)
            .is_some_and(|style| style.is_rendered())
    }

    fn is_attached(&self, node: NodeId) -> bool {
        Document::is_attached(self, node)
    }

    fn replace_with_segments(
        &mut self,
        node: NodeId,
        segments: &[Segment<'_>],
        marker_class: &str,
    ) -> Vec<NodeId> {
        let mut replacements = Vec::with_capacity(segments.len());
        let mut markers = Vec::new();

        for segment in segments {
            match segment {
                Segment::Text(text) => replacements.push(self.create_text(*text)),
                Segment::Marker(text) => {
                    let marker = self.create_element(MARKER_TAG);
                    self.add_class(marker, marker_class);
                    let inner = self.create_text(*text);
                    if let Err(e) = self.append_child(marker, inner) {
                        warn!("could not build marker for {:?}: {}", text, e);
                        return Vec::new();
                    }
                    replacements.push(marker);
                    markers.push(marker);
                }
            }
        }

        match self.replace_with(node, &replacements) {
            Ok(()) => markers,
            Err(e) => {
                warn!("could not mark text node {:?}: {}", node, e);
                Vec::new()
            }
        }
    }

    fn unwrap_marker(&mut self, marker: NodeId) -> bool {
        if !Document::is_attached(self, marker) {
            return false;
        }
        let Some(parent) = self.parent(marker) else {
            return false;
        };

        let text = self.text_content(marker);
        let replacement = self.create_text(text);
        if let Err(e) = self.replace_with(marker, &[replacement]) {
            warn!("could not unwrap marker {:?}: {}", marker, e);
            return false;
        }
        self.normalize(parent);
        true
    }

    fn set_class(&mut self, node: NodeId, class: &str, enabled: bool) -> bool {
        if !Document::is_attached(self, node) {
            return false;
        }
        if enabled {
            self.add_class(node, class)
        } else {
            self.remove_class(node, class)
        }
    }

    fn scroll_into_view(
        &mut self,
        node: NodeId,
        behavior: ScrollBehavior,
        block: ScrollBlock,
    ) -> bool {
        Document::scroll_into_view(self, node, behavior, block)
    }

    fn has_stylesheet(&self, id: &str) -> bool {
        self.element_by_id(id).is_some()
    }

    fn install_stylesheet(&mut self, id: &str, css: &str) {
        let style = self.create_element("style");
        if let Some(element) = self.element_mut(style) {
            element.id = Some(id.to_string());
        }
        let text = self.create_text(css);
        let head = self.head();
        if let Err(e) = self
            .append_child(style, text)
            .and_then(|()| self.append_child(head, style))
        {
            warn!("could not install stylesheet {:?}: {}", id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document_with_text(text: &str) -> (Document, NodeId, NodeId) {
        let mut document = Document::new();
        let p = document.create_element("p");
        let node = document.create_text(text);
        document.append_child(p, node).unwrap();
        document.append_child(document.body(), p).unwrap();
        (document, p, node)
    }

    #[test]
    fn replace_and_unwrap_round_trip() {
        let (mut document, p, node) = document_with_text("Grand Hotel lobby");
        let segments = [Segment::Marker("Grand"), Segment::Text(" Hotel lobby")];

        let markers = document.replace_with_segments(node, &segments, "hit");
        assert_eq!(markers.len(), 1);
        assert_eq!(document.tag(markers[0]), Some("mark"));
        assert!(document.has_class(markers[0], "hit"));
        assert_eq!(
            document.to_markup(p),
            "<p><mark class=\"hit\">Grand</mark> Hotel lobby</p>"
        );

        assert!(document.unwrap_marker(markers[0]));
        assert_eq!(document.to_markup(p), "<p>Grand Hotel lobby</p>");
        assert_eq!(Document::children(&document, p).len(), 1);
        assert!(!document.unwrap_marker(markers[0]));
    }

    #[test]
    fn replacing_a_detached_node_creates_no_markers() {
        let (mut document, _, node) = document_with_text("spa");
        document.remove(node);
        let markers = document.replace_with_segments(node, &[Segment::Marker("spa")], "hit");
        assert!(markers.is_empty());
    }

    #[test]
    fn stylesheet_goes_into_head() {
        let mut document = Document::new();
        assert!(!document.has_stylesheet("styles"));
        document.install_stylesheet("styles", "mark { color: red; }");
        assert!(document.has_stylesheet("styles"));

        let style = document.element_by_id("styles").unwrap();
        assert_eq!(document.parent(style), Some(document.head()));
        assert_eq!(document.text_content(style), "mark { color: red; }");
    }

    #[test]
    fn class_toggling_skips_detached_nodes() {
        let (mut document, p, _) = document_with_text("x");
        assert!(document.set_class(p, "active", true));
        assert!(document.has_class(p, "active"));
        assert!(document.set_class(p, "active", false));
        assert!(!document.has_class(p, "active"));

        document.remove(p);
        assert!(!document.set_class(p, "active", true));
    }
}
