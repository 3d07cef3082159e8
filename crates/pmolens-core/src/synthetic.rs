#![forbid(unsafe_code)]

//! In-memory document for exercising the engine without a browser.
//!
//! Nodes live in an arena; hit testing uses explicit rectangles and paints
//! in document order (later nodes on top) unless a z-index says otherwise.

use crate::document::DocumentView;
use crate::geometry::{Point, ViewportRect, ViewportSize};

/// Handle to a node in a [`SyntheticDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: ViewportRect,
    z_index: i32,
}

/// Arena-backed document tree rooted at a `body` element.
#[derive(Debug, Clone)]
pub struct SyntheticDocument {
    nodes: Vec<Node>,
    viewport: ViewportSize,
}

impl Default for SyntheticDocument {
    fn default() -> Self {
        Self::new(ViewportSize::new(1280.0, 800.0))
    }
}

impl SyntheticDocument {
    /// Empty document whose body covers the whole viewport.
    #[must_use]
    pub fn new(viewport: ViewportSize) -> Self {
        let body = Node {
            tag: "body".to_string(),
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
            rect: ViewportRect::new(0.0, 0.0, viewport.width, viewport.height),
            z_index: 0,
        };
        Self {
            nodes: vec![body],
            viewport,
        }
    }

    /// The root `body` element.
    #[inline]
    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a child element and return its handle.
    pub fn append(&mut self, parent: NodeId, tag: &str, rect: ViewportRect) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            parent: Some(parent),
            children: Vec::new(),
            rect,
            z_index: 0,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append a child with attributes in one call.
    pub fn append_with(
        &mut self,
        parent: NodeId,
        tag: &str,
        rect: ViewportRect,
        attributes: &[(&str, &str)],
    ) -> NodeId {
        let id = self.append(parent, tag, rect);
        for (name, value) in attributes {
            self.set_attribute(id, name, value);
        }
        id
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let attrs = &mut self.nodes[node.0].attributes;
        match attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        self.nodes[node.0].attributes.retain(|(n, _)| n != name);
    }

    pub fn set_rect(&mut self, node: NodeId, rect: ViewportRect) {
        self.nodes[node.0].rect = rect;
    }

    pub fn set_z_index(&mut self, node: NodeId, z_index: i32) {
        self.nodes[node.0].z_index = z_index;
    }

    fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.body()];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[node.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }
}

impl DocumentView for SyntheticDocument {
    type Element = NodeId;

    fn elements_from_point(&self, point: Point) -> Vec<NodeId> {
        let mut hits: Vec<(usize, NodeId)> = self
            .preorder()
            .into_iter()
            .enumerate()
            .filter(|(_, id)| self.nodes[id.0].rect.contains(point))
            .collect();
        hits.sort_by(|(a_order, a), (b_order, b)| {
            self.nodes[b.0]
                .z_index
                .cmp(&self.nodes[a.0].z_index)
                .then(b_order.cmp(a_order))
        });
        hits.into_iter().map(|(_, id)| id).collect()
    }

    fn parent(&self, element: &NodeId) -> Option<NodeId> {
        self.nodes[element.0].parent
    }

    fn tag_name(&self, element: &NodeId) -> String {
        self.nodes[element.0].tag.clone()
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.nodes[element.0]
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    fn first_descendant_with_attribute(&self, element: &NodeId, name: &str) -> Option<NodeId> {
        self.descendants(*element)
            .into_iter()
            .find(|id| self.has_attribute(id, name))
    }

    fn query_all_with_attribute(&self, name: &str) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|id| self.has_attribute(id, name))
            .collect()
    }

    fn bounding_rect(&self, element: &NodeId) -> ViewportRect {
        self.nodes[element.0].rect
    }

    fn viewport_size(&self) -> ViewportSize {
        self.viewport
    }
}
