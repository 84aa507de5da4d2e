use log::trace;

use crate::error::DomError;
use crate::node::{ElementData, Node, NodeData, NodeId};
use crate::style::{ComputedStyle, Display, ScrollBehavior, ScrollBlock, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub node: NodeId,
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

/// Scroll requests made against the document, consumed by whatever renders it.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    last_request: Option<ScrollRequest>,
    revision: u64,
}

impl Viewport {
    pub fn last_request(&self) -> Option<ScrollRequest> {
        self.last_request
    }

    /// Incremented on every accepted request so views can detect new ones.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn record(&mut self, request: ScrollRequest) {
        self.last_request = Some(request);
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Arena-backed render tree rooted at `html > (head, body)`.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    viewport: Viewport,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut document = Self {
            nodes: Vec::new(),
            root: NodeId::new(0),
            head: NodeId::new(0),
            body: NodeId::new(0),
            viewport: Viewport::default(),
        };

        let root = document.create_element("html");
        let head = document.create_element("head");
        let body = document.create_element("body");
        document.link(root, head, None);
        document.link(root, body, None);
        document.root = root;
        document.head = head;
        document.body = body;
        document
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(data));
        id
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element(ElementData::new(tag)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text(text.into()))
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.node(id).and_then(Node::as_element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.node_mut(id).map(|node| &mut node.data) {
            Some(NodeData::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.tag.as_str())
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(Node::as_text)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    /// Whether the node is reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        if self.node(id).is_none() {
            return false;
        }

        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Depth-first pre-order walk of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.node(id).is_some() {
            vec![id]
        } else {
            Vec::new()
        };
        Descendants {
            document: self,
            stack,
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.check_insertion(parent, child)?;
        if let Some(reference) = reference
            && self.parent(reference) != Some(parent)
        {
            return Err(DomError::HierarchyRequest(reference));
        }
        if reference == Some(child) {
            return Ok(());
        }

        self.detach(child);
        self.link(parent, child, reference);
        Ok(())
    }

    /// Detaches `id` from its parent. Returns false if it was already detached.
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.detach(id)
    }

    /// Replaces `target` with `replacements`, in order, at the same position.
    pub fn replace_with(
        &mut self,
        target: NodeId,
        replacements: &[NodeId],
    ) -> Result<(), DomError> {
        let parent = self.parent(target).ok_or(DomError::Detached(target))?;
        for &node in replacements {
            if node == target {
                return Err(DomError::HierarchyRequest(node));
            }
            self.check_insertion(parent, node)?;
        }

        for &node in replacements {
            self.detach(node);
        }

        let index = self
            .position_in_parent(parent, target)
            .ok_or(DomError::Detached(target))?;
        self.detach(target);

        for (offset, &node) in replacements.iter().enumerate() {
            if let Some(child) = self.node_mut(node) {
                child.parent = Some(parent);
            }
            if let Some(parent_node) = self.node_mut(parent) {
                parent_node.children.insert(index + offset, node);
            }
        }

        trace!(
            "replaced {:?} with {} node(s) under {:?}",
            target,
            replacements.len(),
            parent
        );
        Ok(())
    }

    /// Merges adjacent text children and drops empty ones, recursively.
    pub fn normalize(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        let mut previous_text: Option<NodeId> = None;

        for child in children {
            if let Some(text) = self.text(child) {
                if text.is_empty() {
                    self.detach(child);
                    continue;
                }

                if let Some(previous) = previous_text {
                    let text = text.to_string();
                    if let Some(NodeData::Text(existing)) =
                        self.node_mut(previous).map(|node| &mut node.data)
                    {
                        existing.push_str(&text);
                    }
                    self.detach(child);
                    continue;
                }

                previous_text = Some(child);
            } else {
                previous_text = None;
                self.normalize(child);
            }
        }
    }

    /// Concatenated text of every text node under `id`, hidden or not.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|node| self.text(node))
            .collect()
    }

    pub fn computed_style(&self, id: NodeId) -> Option<ComputedStyle> {
        let element = self.element(id)?;
        let display = element
            .style
            .display
            .unwrap_or_else(|| Display::default_for_tag(&element.tag));

        let mut visibility = Visibility::default();
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(declared) = self.element(node).and_then(|e| e.style.visibility) {
                visibility = declared;
                break;
            }
            current = self.parent(node);
        }

        Some(ComputedStyle {
            display,
            visibility,
        })
    }

    pub fn element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.descendants(self.root).find(|&node| {
            self.element(node)
                .and_then(|element| element.id.as_deref())
                .is_some_and(|id| id == element_id)
        })
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|element| element.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> bool {
        let Some(element) = self.element_mut(id) else {
            return false;
        };
        if !element.has_class(class) {
            element.classes.push(class.to_string());
        }
        true
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> bool {
        let Some(element) = self.element_mut(id) else {
            return false;
        };
        element.classes.retain(|c| c != class);
        true
    }

    /// Records a request to bring `id` into view. Detached nodes are ignored.
    pub fn scroll_into_view(
        &mut self,
        id: NodeId,
        behavior: ScrollBehavior,
        block: ScrollBlock,
    ) -> bool {
        if !self.is_attached(id) {
            return false;
        }

        self.viewport.record(ScrollRequest {
            node: id,
            behavior,
            block,
        });
        trace!(
            "scroll {:?} into view ({}, {})",
            id,
            behavior.as_str(),
            block.as_str()
        );
        true
    }

    pub fn title(&self) -> Option<String> {
        self.title_element().map(|title| self.text_content(title))
    }

    pub fn set_title(&mut self, title: &str) {
        let element = match self.title_element() {
            Some(element) => element,
            None => {
                let element = self.create_element("title");
                let head = self.head;
                self.link(head, element, None);
                element
            }
        };

        for child in self.children(element).to_vec() {
            self.detach(child);
        }
        let text = self.create_text(title);
        self.link(element, text, None);
    }

    fn title_element(&self) -> Option<NodeId> {
        self.children(self.head)
            .iter()
            .copied()
            .find(|&child| self.tag(child) == Some("title"))
    }

    fn position_in_parent(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    fn check_insertion(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.element(parent).is_none() || self.node(child).is_none() || child == self.root {
            return Err(DomError::HierarchyRequest(child));
        }

        let mut current = Some(parent);
        while let Some(node) = current {
            if node == child {
                return Err(DomError::HierarchyRequest(child));
            }
            current = self.parent(node);
        }

        Ok(())
    }

    fn link(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>) {
        let index = before
            .and_then(|reference| self.position_in_parent(parent, reference))
            .unwrap_or_else(|| self.children(parent).len());

        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.insert(index, child);
        }
    }

    fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.node_mut(id).and_then(|node| node.parent.take()) else {
            return false;
        };
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.retain(|&child| child != id);
        }
        true
    }
}

pub struct Descendants<'a> {
    document: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(self.document.children(node).iter().rev().copied());
        Some(node)
    }
}
