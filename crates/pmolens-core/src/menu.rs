#![forbid(unsafe_code)]

//! Context menu built from a resolved component's location data.

use serde::{Serialize, Serializer};

use crate::config::MenuFootprint;
use crate::geometry::{Point, ViewportSize};
use crate::model::{LocationData, short_class_name};

/// Actions offered by the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    OpenProperty,
    OpenClass,
    OpenInstantiation,
    ShowDispatcherHistory,
}

impl MenuAction {
    /// Stable identifier used as the DOM `data-action` value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenProperty => "open-property",
            Self::OpenClass => "open-class",
            Self::OpenInstantiation => "open-instantiation",
            Self::ShowDispatcherHistory => "show-dispatcher-history",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open-property" => Some(Self::OpenProperty),
            "open-class" => Some(Self::OpenClass),
            "open-instantiation" => Some(Self::OpenInstantiation),
            "show-dispatcher-history" => Some(Self::ShowDispatcherHistory),
            _ => None,
        }
    }
}

impl Serialize for MenuAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One actionable menu row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub action: MenuAction,
    pub title: String,
    pub subtitle: String,
}

/// A fully built, positioned context menu.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextMenu {
    pub position: Point,
    /// Short class name, or `None` if the backend knows no class.
    pub title: Option<String>,
    /// Property name, or `"Section"`.
    pub subtitle: String,
    pub entries: Vec<MenuEntry>,
    /// Data the entries act on.
    #[serde(skip)]
    pub data: LocationData,
}

impl ContextMenu {
    /// Build the menu for `data`, clamped into `viewport` at `anchor`.
    #[must_use]
    pub fn build(
        data: LocationData,
        anchor: Point,
        viewport: ViewportSize,
        footprint: MenuFootprint,
    ) -> Self {
        let class = data.display_class_name().map(|c| short_class_name(c).to_string());
        let class_label = class.clone().unwrap_or_else(|| "Unknown".to_string());
        let mut entries = Vec::with_capacity(4);

        if let Some(property) = &data.property_name {
            entries.push(MenuEntry {
                action: MenuAction::OpenProperty,
                title: "Open Property".into(),
                subtitle: format!("Jump to {property}"),
            });
        }
        entries.push(MenuEntry {
            action: MenuAction::OpenClass,
            title: "Open Class".into(),
            subtitle: format!("Jump to class {class_label}"),
        });
        if data.instantiation_location.is_some() {
            entries.push(MenuEntry {
                action: MenuAction::OpenInstantiation,
                title: "Open Instantiation".into(),
                subtitle: "Where object was created".into(),
            });
        }
        if !data.history().is_empty() {
            entries.push(MenuEntry {
                action: MenuAction::ShowDispatcherHistory,
                title: "Aspect Overview".into(),
                subtitle: "View aspect execution details".into(),
            });
        }

        Self {
            position: clamp_position(anchor, viewport, footprint),
            title: class,
            subtitle: data.property_name.clone().unwrap_or_else(|| "Section".into()),
            entries,
            data,
        }
    }

    pub fn has_action(&self, action: MenuAction) -> bool {
        self.entries.iter().any(|e| e.action == action)
    }
}

/// Keep the menu's footprint inside the viewport. When the viewport is
/// smaller than the footprint the menu sticks to the top-left corner.
#[must_use]
pub fn clamp_position(anchor: Point, viewport: ViewportSize, footprint: MenuFootprint) -> Point {
    Point::new(
        anchor.x.min(viewport.width - footprint.width).max(0.0),
        anchor.y.min(viewport.height - footprint.height).max(0.0),
    )
}
