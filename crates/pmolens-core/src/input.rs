#![forbid(unsafe_code)]

//! Host-neutral input schema.
//!
//! The web host translates DOM events into [`InspectorEvent`] values and
//! applies the returned [`EventDisposition`] to the original DOM event.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;
use crate::geometry::Point;
use crate::hierarchy::NodePath;
use crate::menu::MenuAction;

bitflags! {
    /// Modifier keys held during an input event.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

/// A keyboard event as seen by the engine: DOM `key` plus modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub mods: Modifiers,
}

impl KeyInput {
    #[must_use]
    pub fn new(key: impl Into<String>, mods: Modifiers) -> Self {
        Self {
            key: key.into(),
            mods,
        }
    }
}

/// A key plus the modifiers that must be held.
///
/// Extra modifiers do not prevent a match: `Escape` also fires with Shift
/// held, `Ctrl+Shift+E` also with Alt. Textual form is `Ctrl+Shift+E`;
/// single characters match case-insensitively because browsers report `E`
/// while Shift is held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub key: String,
    pub mods: Modifiers,
}

impl KeyChord {
    #[must_use]
    pub fn new(key: impl Into<String>, mods: Modifiers) -> Self {
        Self {
            key: key.into(),
            mods,
        }
    }

    /// Parse `Ctrl+Shift+E`, `Escape`, `Alt+F2` and similar.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut mods = Modifiers::empty();
        let mut key = None;
        for part in text.split('+').map(str::trim) {
            if part.is_empty() {
                return Err(ConfigError::InvalidChord(text.to_string()));
            }
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => mods |= Modifiers::CTRL,
                "shift" => mods |= Modifiers::SHIFT,
                "alt" | "option" => mods |= Modifiers::ALT,
                "super" | "meta" | "cmd" => mods |= Modifiers::SUPER,
                _ if key.is_none() => key = Some(part.to_string()),
                _ => return Err(ConfigError::InvalidChord(text.to_string())),
            }
        }
        key.map(|key| Self { key, mods })
            .ok_or_else(|| ConfigError::InvalidChord(text.to_string()))
    }

    /// Whether `input` triggers this chord.
    #[must_use]
    pub fn matches(&self, input: &KeyInput) -> bool {
        if !input.mods.contains(self.mods) {
            return false;
        }
        if self.key.chars().count() == 1 {
            self.key.eq_ignore_ascii_case(&input.key)
        } else {
            self.key == input.key
        }
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Modifiers::CTRL, "Ctrl"),
            (Modifiers::ALT, "Alt"),
            (Modifiers::SHIFT, "Shift"),
            (Modifiers::SUPER, "Super"),
        ] {
            if self.mods.contains(flag) {
                write!(f, "{name}+")?;
            }
        }
        f.write_str(&self.key)
    }
}

impl Serialize for KeyChord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KeyChord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Which part of the page a click landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickTarget {
    /// The inspected application itself.
    Page,
    ContextMenu,
    HierarchyPanel,
    DispatchPanel,
    /// The floating controls cluster.
    Controls,
}

impl ClickTarget {
    /// Whether the click landed inside one of the inspector's own floating panels.
    #[inline]
    pub fn is_floating_panel(self) -> bool {
        self != Self::Page
    }
}

/// Buttons of the floating controls cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlButton {
    /// Expands or collapses the cluster; collapsing resets everything.
    Main,
    Inspect,
    HighlightAll,
    Hierarchy,
}

/// Interactions inside the hierarchy panel, addressed by node path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyEvent {
    ToggleExpanded(NodePath),
    LabelClicked(NodePath),
    InstantiationClicked(NodePath),
    HistoryClicked(NodePath),
    RowEnter(NodePath),
    RowLeave,
    Close,
}

/// Everything the host can feed into the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum InspectorEvent {
    Key(KeyInput),
    PointerMove(Point),
    /// Vertical wheel delta; positive scrolls down.
    Wheel {
        delta_y: f64,
    },
    Click {
        position: Point,
        target: ClickTarget,
    },
    Control(ControlButton),
    MenuEntry(MenuAction),
    Hierarchy(HierarchyEvent),
    /// Expand or collapse the breakdown of a displayed dispatch record.
    ToggleDispatchEntry(usize),
    CloseDispatchPanel,
    /// Page scrolled or resized; recompute annotations from scratch.
    Refresh,
}

/// What the host must do with the originating DOM event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventDisposition {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl EventDisposition {
    /// Leave the event alone.
    pub const PASS: Self = Self {
        prevent_default: false,
        stop_propagation: false,
    };

    /// Suppress the default action only.
    pub const PREVENT: Self = Self {
        prevent_default: true,
        stop_propagation: false,
    };

    /// Swallow the event entirely.
    pub const CONSUME: Self = Self {
        prevent_default: true,
        stop_propagation: true,
    };
}
