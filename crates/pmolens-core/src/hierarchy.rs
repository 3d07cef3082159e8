#![forbid(unsafe_code)]

//! Hierarchy tree construction.
//!
//! [`build_row`] is a pure function from the backend's [`HierarchyNode`] to
//! a renderable [`HierarchyRow`] model. Binding handlers to rendered rows is
//! the host's job; it addresses rows by [`NodePath`] and feeds interactions
//! back as [`crate::input::HierarchyEvent`]s.
//!
//! Expand/collapse is a local flag flip on the model. It never rebuilds or
//! re-fetches a subtree; [`HierarchyTree::revision`] only changes when a new
//! tree is loaded.

use std::fmt;

use serde::Serialize;

use crate::model::{HierarchyNode, SourceLocation};

/// Position of a row: child indices from the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// Path of the root row.
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Parse the `Display` form (`""` for root, `"0.2.1"` otherwise).
    pub fn parse(text: &str) -> Option<Self> {
        if text.is_empty() {
            return Some(Self::root());
        }
        text.split('.')
            .map(|part| part.parse().ok())
            .collect::<Option<Vec<usize>>>()
            .map(Self)
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

/// Row label: `propertyName : className` or just `className`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowLabel {
    pub property_name: Option<String>,
    pub class_name: String,
}

impl RowLabel {
    #[must_use]
    pub fn text(&self) -> String {
        match &self.property_name {
            Some(property) => format!("{property} : {}", self.class_name),
            None => self.class_name.clone(),
        }
    }
}

/// Leaf marker shown in front of childless rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafMarker {
    /// Row has children and shows an expander instead.
    None,
    Property,
    Section,
    /// Not navigable (framework or synthetic node).
    System,
}

impl LeafMarker {
    pub const fn color(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Property => Some("#FF9800"),
            Self::Section => Some("#1565C0"),
            Self::System => Some("#9E9E9E"),
        }
    }
}

/// Renderable model of one hierarchy node and its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyRow {
    pub path: NodePath,
    pub component_id: Option<String>,
    pub label: RowLabel,
    /// Label click target; `None` means the row is not navigable.
    pub navigation: Option<SourceLocation>,
    /// "Open instantiation" action target.
    pub instantiation: Option<SourceLocation>,
    /// Whether the "aspect history" action is offered.
    pub history_action: bool,
    pub marker: LeafMarker,
    pub expanded: bool,
    pub children: Vec<HierarchyRow>,
}

impl HierarchyRow {
    #[inline]
    pub fn is_navigable(&self) -> bool {
        self.navigation.is_some()
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Count visible rows, including this one.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        let mut count = 1;
        if self.expanded {
            for child in &self.children {
                count += child.visible_count();
            }
        }
        count
    }
}

/// Build the row model for `node` at `path`.
#[must_use]
pub fn build_row(node: &HierarchyNode, path: NodePath) -> HierarchyRow {
    let navigation = node.navigation_target().map(|location| {
        let class_name = location
            .class_name
            .clone()
            .or_else(|| node.full_class_name.clone());
        SourceLocation {
            outermost_class_name: location
                .outermost_class_name
                .clone()
                .or_else(|| node.full_class_name.clone()),
            class_name,
            ..location.clone()
        }
    });

    let marker = match (node.children.is_empty(), navigation.is_some(), node.is_property()) {
        (false, _, _) => LeafMarker::None,
        (true, false, _) => LeafMarker::System,
        (true, true, true) => LeafMarker::Property,
        (true, true, false) => LeafMarker::Section,
    };

    let children = node
        .children
        .iter()
        .enumerate()
        .map(|(i, child)| build_row(child, path.child(i)))
        .collect();

    HierarchyRow {
        component_id: node.component_id.clone().filter(|id| !id.is_empty()),
        label: RowLabel {
            property_name: node.property_name.clone(),
            class_name: node.class_name.clone(),
        },
        navigation,
        instantiation: node.instantiation_target().cloned(),
        history_action: node.is_property(),
        marker,
        expanded: true,
        children,
        path,
    }
}

/// The tree currently shown in the hierarchy panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyTree {
    root: HierarchyRow,
    revision: u64,
}

impl HierarchyTree {
    #[must_use]
    pub fn new(node: &HierarchyNode, revision: u64) -> Self {
        Self {
            root: build_row(node, NodePath::root()),
            revision,
        }
    }

    #[inline]
    pub fn root(&self) -> &HierarchyRow {
        &self.root
    }

    /// Changes only when a new tree is loaded.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn row(&self, path: &NodePath) -> Option<&HierarchyRow> {
        let mut row = &self.root;
        for &index in path.indices() {
            row = row.children.get(index)?;
        }
        Some(row)
    }

    fn row_mut(&mut self, path: &NodePath) -> Option<&mut HierarchyRow> {
        let mut row = &mut self.root;
        for &index in path.indices() {
            row = row.children.get_mut(index)?;
        }
        Some(row)
    }

    /// Flip expansion of the row at `path`. Returns the new state, or `None`
    /// for unknown paths and rows without children.
    pub fn toggle(&mut self, path: &NodePath) -> Option<bool> {
        let row = self.row_mut(path)?;
        if !row.has_children() {
            return None;
        }
        row.expanded = !row.expanded;
        Some(row.expanded)
    }

    /// Visible rows in display order.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<&HierarchyRow> {
        fn walk<'a>(row: &'a HierarchyRow, out: &mut Vec<&'a HierarchyRow>) {
            out.push(row);
            if row.expanded {
                for child in &row.children {
                    walk(child, out);
                }
            }
        }
        let mut out = Vec::with_capacity(self.root.visible_count());
        walk(&self.root, &mut out);
        out
    }
}
