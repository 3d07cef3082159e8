#![forbid(unsafe_code)]

//! Document capability and component metadata accessors.
//!
//! The engine reads the rendered page exclusively through [`DocumentView`].
//! The browser binding implements it over `web_sys::Document`; tests use
//! [`crate::synthetic::SyntheticDocument`].
//!
//! # Metadata contract
//!
//! A component-bearing element carries [`ATTR_COMPONENT_ID`]. Property-level
//! elements additionally carry [`ATTR_PMO_CLASS`] and [`ATTR_PMO_PROPERTY`].
//! Elements whose DOM id starts with [`ID_PREFIX`] also count as component ids.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, ViewportRect, ViewportSize};

/// Attribute carrying the component identifier.
pub const ATTR_COMPONENT_ID: &str = "data-component-id";
/// Attribute carrying the fully qualified PMO class.
pub const ATTR_PMO_CLASS: &str = "data-pmo-class";
/// Attribute carrying the PMO property name.
pub const ATTR_PMO_PROPERTY: &str = "data-pmo-property";
/// Reserved DOM id prefix that doubles as a component identifier.
pub const ID_PREFIX: &str = "pmo-";

/// Read-only view of a rendered document.
///
/// `Element` is a cheap handle; two handles compare equal iff they refer to
/// the same node.
pub trait DocumentView {
    type Element: Clone + PartialEq;

    /// All elements under `point`, topmost first.
    fn elements_from_point(&self, point: Point) -> Vec<Self::Element>;

    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Lower-case tag name.
    fn tag_name(&self, element: &Self::Element) -> String;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn has_attribute(&self, element: &Self::Element, name: &str) -> bool {
        self.attribute(element, name).is_some()
    }

    fn element_id(&self, element: &Self::Element) -> Option<String> {
        self.attribute(element, "id")
    }

    /// First descendant (document order, excluding `element`) carrying `name`.
    fn first_descendant_with_attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Option<Self::Element>;

    /// Every element carrying `name`, in document order.
    fn query_all_with_attribute(&self, name: &str) -> Vec<Self::Element>;

    /// First element carrying `name`, in document order.
    fn query_first_with_attribute(&self, name: &str) -> Option<Self::Element> {
        self.query_all_with_attribute(name).into_iter().next()
    }

    /// First element whose attribute `name` equals `value`.
    fn find_by_attribute_value(&self, name: &str, value: &str) -> Option<Self::Element> {
        self.query_all_with_attribute(name)
            .into_iter()
            .find(|el| self.attribute(el, name).as_deref() == Some(value))
    }

    fn bounding_rect(&self, element: &Self::Element) -> ViewportRect;

    fn viewport_size(&self) -> ViewportSize;
}

/// Structural role of an element, as far as highlighting cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRole {
    /// Layout row wrapping a single field (label + input).
    FieldWrapper,
    /// Grid or table; its structure is stricter than a form row.
    Tabular,
    /// Generic document boundary; ancestor walks stop here.
    Boundary,
    Plain,
}

/// Tag-name based role classification.
///
/// Defaults match the Vaadin/linkki rendering: `vaadin-form-item` wraps
/// fields, `vaadin-grid` and `table` are tabular, `body` is the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ElementRoles {
    pub field_wrapper_tags: Vec<String>,
    pub tabular_tags: Vec<String>,
    pub boundary_tags: Vec<String>,
}

impl Default for ElementRoles {
    fn default() -> Self {
        Self {
            field_wrapper_tags: vec!["vaadin-form-item".to_string()],
            tabular_tags: vec!["vaadin-grid".to_string(), "table".to_string()],
            boundary_tags: vec!["body".to_string()],
        }
    }
}

impl ElementRoles {
    /// Classify a tag name (case-insensitive).
    #[must_use]
    pub fn classify(&self, tag: &str) -> ElementRole {
        let has = |tags: &[String]| tags.iter().any(|t| t.eq_ignore_ascii_case(tag));
        if has(&self.field_wrapper_tags) {
            ElementRole::FieldWrapper
        } else if has(&self.tabular_tags) {
            ElementRole::Tabular
        } else if has(&self.boundary_tags) {
            ElementRole::Boundary
        } else {
            ElementRole::Plain
        }
    }

    pub fn role_of<D: DocumentView>(&self, doc: &D, element: &D::Element) -> ElementRole {
        self.classify(&doc.tag_name(element))
    }

    /// Nearest inclusive ancestor with `role` (DOM `closest` semantics).
    pub fn closest<D: DocumentView>(
        &self,
        doc: &D,
        element: &D::Element,
        role: ElementRole,
    ) -> Option<D::Element> {
        let mut current = Some(element.clone());
        while let Some(el) = current {
            if self.role_of(doc, &el) == role {
                return Some(el);
            }
            current = doc.parent(&el);
        }
        None
    }
}

/// Metadata the inspector shows for a component-bearing element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentMetadata {
    pub id: String,
    /// Fully qualified PMO class.
    pub class_name: String,
    pub property_name: Option<String>,
}

impl ComponentMetadata {
    /// Sections have no property name.
    #[inline]
    pub fn is_section(&self) -> bool {
        self.property_name.is_none()
    }

    #[must_use]
    pub fn short_class_name(&self) -> &str {
        crate::model::short_class_name(&self.class_name)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Resolve the component identifier for `element`.
///
/// Field wrappers look one level down into their first id-bearing
/// descendant. Otherwise the walk goes up through ancestors, stopping at the
/// document boundary, and takes the first `data-component-id` or reserved
/// `pmo-` element id.
pub fn resolve_component_id<D: DocumentView>(
    doc: &D,
    roles: &ElementRoles,
    element: &D::Element,
) -> Option<String> {
    if roles.role_of(doc, element) == ElementRole::FieldWrapper
        && let Some(child) = doc.first_descendant_with_attribute(element, ATTR_COMPONENT_ID)
        && let Some(id) = non_empty(doc.attribute(&child, ATTR_COMPONENT_ID))
    {
        return Some(id);
    }

    let mut current = Some(element.clone());
    while let Some(el) = current {
        if roles.role_of(doc, &el) == ElementRole::Boundary {
            break;
        }
        if let Some(id) = non_empty(doc.attribute(&el, ATTR_COMPONENT_ID)) {
            return Some(id);
        }
        if let Some(id) = doc.element_id(&el).filter(|id| id.starts_with(ID_PREFIX)) {
            return Some(id);
        }
        current = doc.parent(&el);
    }
    None
}

/// Typed metadata for `element`, if it carries PMO metadata *directly*.
///
/// Requires both a resolvable component id and the class attribute on the
/// element itself; inherited metadata does not count.
pub fn component_metadata<D: DocumentView>(
    doc: &D,
    roles: &ElementRoles,
    element: &D::Element,
) -> Option<ComponentMetadata> {
    let class_name = doc.attribute(element, ATTR_PMO_CLASS)?;
    let id = resolve_component_id(doc, roles, element)?;
    let property_name = doc
        .attribute(element, ATTR_PMO_PROPERTY)
        .filter(|p| !p.is_empty() && p != "null");
    Some(ComponentMetadata {
        id,
        class_name,
        property_name,
    })
}

/// Element whose bounds represent `element` visually.
///
/// An element inside a field wrapper is promoted to the wrapper, unless it
/// sits inside a tabular container other than itself.
pub fn visual_target<D: DocumentView>(
    doc: &D,
    roles: &ElementRoles,
    element: &D::Element,
) -> D::Element {
    let Some(wrapper) = roles.closest(doc, element, ElementRole::FieldWrapper) else {
        return element.clone();
    };
    match roles.closest(doc, element, ElementRole::Tabular) {
        None => wrapper,
        Some(tabular) if tabular == *element => wrapper,
        Some(_) => element.clone(),
    }
}
