#![forbid(unsafe_code)]

//! [`DocumentView`] over the live browser document.

use pmolens_core::document::DocumentView;
use pmolens_core::geometry::{Point, ViewportRect, ViewportSize};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Window};

/// The page being inspected, minus the inspector's own UI.
pub struct BrowserDocument {
    window: Window,
    document: Document,
    /// Container of every inspector layer; never reported as a hit.
    root: Element,
}

impl BrowserDocument {
    pub fn new(window: Window, document: Document, root: Element) -> Self {
        Self {
            window,
            document,
            root,
        }
    }

    fn is_own(&self, element: &Element) -> bool {
        self.root.contains(Some(element.unchecked_ref()))
    }
}

impl DocumentView for BrowserDocument {
    type Element = Element;

    fn elements_from_point(&self, point: Point) -> Vec<Element> {
        self.document
            .elements_from_point(point.x as f32, point.y as f32)
            .iter()
            .filter_map(|value| value.dyn_into::<Element>().ok())
            .filter(|el| !self.is_own(el))
            .collect()
    }

    fn parent(&self, element: &Element) -> Option<Element> {
        element.parent_element()
    }

    fn tag_name(&self, element: &Element) -> String {
        element.tag_name().to_ascii_lowercase()
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn has_attribute(&self, element: &Element, name: &str) -> bool {
        element.has_attribute(name)
    }

    fn element_id(&self, element: &Element) -> Option<String> {
        Some(element.id()).filter(|id| !id.is_empty())
    }

    fn first_descendant_with_attribute(&self, element: &Element, name: &str) -> Option<Element> {
        element.query_selector(&format!("[{name}]")).ok().flatten()
    }

    fn query_all_with_attribute(&self, name: &str) -> Vec<Element> {
        let Ok(nodes) = self.document.query_selector_all(&format!("[{name}]")) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter(|el| !self.is_own(el))
            .collect()
    }

    fn bounding_rect(&self, element: &Element) -> ViewportRect {
        let rect = element.get_bounding_client_rect();
        ViewportRect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn viewport_size(&self) -> ViewportSize {
        let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };
        ViewportSize::new(
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
    }
}
