#![forbid(unsafe_code)]

//! Read model of everything the inspector currently shows.
//!
//! The host repaints from a [`Scene`] after every call into the controller.
//! Nothing here is mutable; the controller owns the state it borrows from.

use serde::Serialize;

use crate::highlight::{HighlightSet, HoverHighlight};
use crate::hierarchy::HierarchyTree;
use crate::history::DispatchHistoryView;
use crate::menu::ContextMenu;
use crate::overlay::OverlayState;

/// Page cursor the host should apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
}

impl Cursor {
    /// CSS `cursor` value.
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Default => "",
            Self::Crosshair => "crosshair",
        }
    }
}

/// State of the floating controls cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlsState {
    pub expanded: bool,
    pub inspect_active: bool,
    pub highlight_active: bool,
    pub hierarchy_active: bool,
}

/// Borrowed snapshot of the visible inspector state.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene<'a> {
    pub overlay: &'a OverlayState,
    pub highlights: &'a HighlightSet,
    pub hover: &'a HoverHighlight,
    pub context_menu: Option<&'a ContextMenu>,
    pub hierarchy: Option<&'a HierarchyTree>,
    pub dispatch: Option<&'a DispatchHistoryView>,
    pub controls: ControlsState,
    pub cursor: Cursor,
}

impl Scene<'_> {
    /// True when nothing but the controls cluster is on screen.
    pub fn is_blank(&self) -> bool {
        !self.overlay.is_visible()
            && self.highlights.is_empty()
            && !self.hover.is_visible()
            && self.context_menu.is_none()
            && self.hierarchy.is_none()
            && self.dispatch.is_none()
    }
}
