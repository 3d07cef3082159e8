#![forbid(unsafe_code)]

//! Single-target overlay: the reused highlight box plus the pointer tooltip.
//!
//! The overlay is recomputed from scratch on every pointer or wheel event;
//! nothing is tracked between events except what [`OverlayState`] holds.

use serde::Serialize;

use crate::document::{DocumentView, ElementRoles, component_metadata, visual_target};
use crate::geometry::{Point, ViewportRect};
use crate::hit::SelectionState;

/// "Element i of N" hint, shown only while several candidates overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleHint {
    /// 1-based position of the current pick.
    pub position: usize,
    pub total: usize,
}

impl CycleHint {
    #[must_use]
    pub fn text(&self) -> String {
        format!(
            "Element {} of {} (Scroll to cycle)",
            self.position, self.total
        )
    }
}

/// Tooltip content and placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub position: Point,
    /// Short class name.
    pub class_name: String,
    pub property_name: Option<String>,
    pub cycle_hint: Option<CycleHint>,
    /// Reminder of the highlight-all chord.
    pub footer: String,
}

impl Tooltip {
    /// `OrderPmo.amount` for properties, `OrderPmo` for sections.
    #[must_use]
    pub fn title(&self) -> String {
        match &self.property_name {
            Some(property) => format!("{}.{}", self.class_name, property),
            None => self.class_name.clone(),
        }
    }
}

/// What the single-target overlay currently shows.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OverlayState {
    /// Bounds of the overlay box; `None` while hidden.
    pub target: Option<ViewportRect>,
    pub tooltip: Option<Tooltip>,
}

impl OverlayState {
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.target.is_some() || self.tooltip.is_some()
    }

    pub fn hide(&mut self) {
        self.target = None;
        self.tooltip = None;
    }

    /// Reposition for the current pick of `selection`, or hide if there is none.
    pub fn present<D: DocumentView>(
        &mut self,
        doc: &D,
        roles: &ElementRoles,
        selection: &SelectionState<D::Element>,
        pointer: Point,
        tooltip_offset: f64,
        footer: &str,
    ) {
        let Some(element) = selection.current() else {
            self.hide();
            return;
        };
        let target = visual_target(doc, roles, element);
        self.target = Some(doc.bounding_rect(&target));

        // Candidates always carry metadata, but the page may have changed
        // underneath us since they were resolved.
        self.tooltip = component_metadata(doc, roles, element).map(|meta| Tooltip {
            position: pointer.offset(tooltip_offset, tooltip_offset),
            class_name: meta.short_class_name().to_string(),
            property_name: meta.property_name.clone(),
            cycle_hint: selection.is_ambiguous().then(|| CycleHint {
                position: selection.index() + 1,
                total: selection.len(),
            }),
            footer: footer.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ATTR_COMPONENT_ID, ATTR_PMO_CLASS, ATTR_PMO_PROPERTY};
    use crate::synthetic::SyntheticDocument;

    #[test]
    fn hidden_without_selection() {
        let doc = SyntheticDocument::default();
        let mut overlay = OverlayState {
            target: Some(ViewportRect::default()),
            tooltip: None,
        };
        let selection = SelectionState::new();
        overlay.present(
            &doc,
            &ElementRoles::default(),
            &selection,
            Point::default(),
            15.0,
            "",
        );
        assert!(!overlay.is_visible());
    }

    #[test]
    fn overlay_uses_wrapper_bounds_and_pointer_tooltip() {
        let mut doc = SyntheticDocument::default();
        let body = doc.body();
        let row = ViewportRect::new(0.0, 100.0, 400.0, 40.0);
        let wrapper = doc.append(body, "vaadin-form-item", row);
        let field = doc.append_with(
            wrapper,
            "input",
            ViewportRect::new(150.0, 105.0, 200.0, 30.0),
            &[
                (ATTR_COMPONENT_ID, "f"),
                (ATTR_PMO_CLASS, "shop.OrderPmo"),
                (ATTR_PMO_PROPERTY, "amount"),
            ],
        );
        let mut selection = SelectionState::new();
        selection.set_candidates(vec![field]);

        let mut overlay = OverlayState::default();
        overlay.present(
            &doc,
            &ElementRoles::default(),
            &selection,
            Point::new(160.0, 110.0),
            15.0,
            "Ctrl+Shift+H to highlight all",
        );
        assert_eq!(overlay.target, Some(row));
        let tooltip = overlay.tooltip.unwrap();
        assert_eq!(tooltip.position, Point::new(175.0, 125.0));
        assert_eq!(tooltip.title(), "OrderPmo.amount");
        assert_eq!(tooltip.cycle_hint, None);
    }

    #[test]
    fn cycle_hint_when_ambiguous() {
        let mut doc = SyntheticDocument::default();
        let body = doc.body();
        let r = ViewportRect::new(0.0, 0.0, 100.0, 100.0);
        let outer = doc.append_with(body, "div", r, &[(ATTR_COMPONENT_ID, "o"), (ATTR_PMO_CLASS, "a.Outer")]);
        let inner = doc.append_with(outer, "div", r, &[(ATTR_COMPONENT_ID, "i"), (ATTR_PMO_CLASS, "a.Inner")]);
        let mut selection = SelectionState::new();
        selection.set_candidates(vec![inner, outer]);
        selection.cycle_next();

        let mut overlay = OverlayState::default();
        overlay.present(&doc, &ElementRoles::default(), &selection, Point::default(), 15.0, "");
        let tooltip = overlay.tooltip.unwrap();
        assert_eq!(tooltip.title(), "Outer");
        let hint = tooltip.cycle_hint.unwrap();
        assert_eq!(hint.text(), "Element 2 of 2 (Scroll to cycle)");
    }
}
