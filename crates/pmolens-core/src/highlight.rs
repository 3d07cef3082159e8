#![forbid(unsafe_code)]

//! Highlight-all annotations and the hierarchy hover highlight.
//!
//! Highlight-all creates two transient elements per metadata-bearing element
//! (a box and a label above it). All of them live in one [`HighlightSet`],
//! which is cleared before every recomputation.

use serde::Serialize;

use crate::document::{
    ATTR_COMPONENT_ID, ATTR_PMO_CLASS, ATTR_PMO_PROPERTY, DocumentView, ElementRoles,
    visual_target,
};
use crate::geometry::{Point, ViewportRect};
use crate::model::short_class_name;

/// Colour category of a highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightCategory {
    Section,
    Property,
}

impl HighlightCategory {
    /// Border colour as CSS hex.
    pub const fn border_color(self) -> &'static str {
        match self {
            Self::Section => "#FF5722",
            Self::Property => "#2196F3",
        }
    }

    /// Translucent fill colour.
    pub const fn fill_color(self) -> &'static str {
        match self {
            Self::Section => "rgba(255, 87, 34, 0.08)",
            Self::Property => "rgba(33, 150, 243, 0.08)",
        }
    }

    /// Label badge background.
    pub const fn label_background(self) -> &'static str {
        match self {
            Self::Section => "linear-gradient(135deg, #FF5722 0%, #E64A19 100%)",
            Self::Property => "linear-gradient(135deg, #1976D2 0%, #1565C0 100%)",
        }
    }
}

/// One transient annotation element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HighlightItem {
    Box {
        rect: ViewportRect,
        category: HighlightCategory,
    },
    Label {
        position: Point,
        text: String,
        category: HighlightCategory,
    },
}

/// Every transient element created by highlight-all.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HighlightSet {
    items: Vec<HighlightItem>,
}

impl HighlightSet {
    #[inline]
    pub fn items(&self) -> &[HighlightItem] {
        &self.items
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Rebuild from every element carrying PMO metadata. Returns the number
    /// of annotated elements.
    pub fn rebuild<D: DocumentView>(
        &mut self,
        doc: &D,
        roles: &ElementRoles,
        label_offset: f64,
    ) -> usize {
        self.clear();
        let elements = doc.query_all_with_attribute(ATTR_PMO_CLASS);
        crate::info!(count = elements.len(), "highlighting PMO elements");

        for el in &elements {
            let class_name = doc.attribute(el, ATTR_PMO_CLASS).unwrap_or_default();
            let property = doc
                .attribute(el, ATTR_PMO_PROPERTY)
                .filter(|p| !p.is_empty() && p != "null");
            let short = short_class_name(&class_name);
            let (category, text) = match property {
                Some(property) => (HighlightCategory::Property, format!("🔹 {short}.{property}")),
                None => (HighlightCategory::Section, format!("📦 {short}")),
            };

            let rect = doc.bounding_rect(&visual_target(doc, roles, el));
            self.items.push(HighlightItem::Box { rect, category });
            self.items.push(HighlightItem::Label {
                position: Point::new(rect.left, rect.top - label_offset),
                text,
                category,
            });
        }
        elements.len()
    }
}

/// The single box shown while hovering a hierarchy row.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HoverHighlight {
    pub rect: Option<ViewportRect>,
    pub component_id: Option<String>,
}

impl HoverHighlight {
    /// Colour of the hover box.
    pub const COLOR: &'static str = "#FF9800";

    /// Highlight the live element for `component_id`. Returns the visual
    /// target so the host can scroll it into view; `None` (and no highlight)
    /// if the component is no longer in the page.
    pub fn show<D: DocumentView>(
        &mut self,
        doc: &D,
        roles: &ElementRoles,
        component_id: &str,
    ) -> Option<D::Element> {
        self.clear();
        let element = doc.find_by_attribute_value(ATTR_COMPONENT_ID, component_id)?;
        let target = visual_target(doc, roles, &element);
        self.rect = Some(doc.bounding_rect(&target));
        self.component_id = Some(component_id.to_string());
        Some(target)
    }

    /// Re-measure the highlighted component after the page moved. Drops the
    /// highlight if the component left the page.
    pub fn refresh<D: DocumentView>(&mut self, doc: &D, roles: &ElementRoles) {
        if let Some(id) = self.component_id.take() {
            self.show(doc, roles, &id);
        }
    }

    pub fn clear(&mut self) {
        self.rect = None;
        self.component_id = None;
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.rect.is_some()
    }
}
