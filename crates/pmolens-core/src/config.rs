#![forbid(unsafe_code)]

//! Inspector configuration.
//!
//! The page passes a JSON object when booting the inspector. Every field is
//! optional; unknown fields are rejected so typos surface early.

use serde::{Deserialize, Serialize};

use crate::document::ElementRoles;
use crate::error::ConfigError;
use crate::input::{KeyChord, Modifiers};

/// Key chords bound to the mode controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Keybindings {
    pub toggle_inspect: KeyChord,
    pub toggle_highlight_all: KeyChord,
    pub reset: KeyChord,
}

impl Default for Keybindings {
    fn default() -> Self {
        let chord = Modifiers::CTRL | Modifiers::SHIFT;
        Self {
            toggle_inspect: KeyChord::new("E", chord),
            toggle_highlight_all: KeyChord::new("H", chord),
            reset: KeyChord::new("Escape", Modifiers::empty()),
        }
    }
}

/// Fixed footprint reserved for the context menu when clamping it into the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuFootprint {
    pub width: f64,
    pub height: f64,
}

impl Default for MenuFootprint {
    fn default() -> Self {
        Self {
            width: 340.0,
            height: 500.0,
        }
    }
}

/// Top-level inspector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct InspectorConfig {
    /// Port of the local IDE tooling endpoint.
    pub inspector_port: u16,
    /// Servlet context path of the inspected application (`""`, `"app"`, `"/app"`).
    pub context_path: String,
    /// Source root below the project, used to build editor paths.
    pub source_root: String,
    /// Source-file extension appended to class paths.
    pub source_extension: String,
    pub keybindings: Keybindings,
    pub roles: ElementRoles,
    pub menu_footprint: MenuFootprint,
    /// Tooltip distance from the pointer, both axes.
    pub tooltip_offset: f64,
    /// Vertical distance of highlight labels above their box.
    pub label_offset: f64,
    /// Keep an in-memory diagnostic log of state transitions.
    pub diagnostics: bool,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            inspector_port: 63342,
            context_path: String::new(),
            source_root: "src/main/java".to_string(),
            source_extension: ".java".to_string(),
            keybindings: Keybindings::default(),
            roles: ElementRoles::default(),
            menu_footprint: MenuFootprint::default(),
            tooltip_offset: 15.0,
            label_offset: 24.0,
            diagnostics: false,
        }
    }
}

impl InspectorConfig {
    /// Parse a JSON configuration document. An empty document yields defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Context path in `/app` form, or empty for the root context.
    #[must_use]
    pub fn normalized_context_path(&self) -> String {
        let trimmed = self.context_path.trim();
        if trimmed.is_empty() || trimmed == "/" {
            return String::new();
        }
        let with_slash = if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        };
        with_slash.trim_end_matches('/').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(InspectorConfig::from_json("  ").unwrap(), InspectorConfig::default());
        assert_eq!(InspectorConfig::from_json("{}").unwrap(), InspectorConfig::default());
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config = InspectorConfig::from_json(
            r#"{"inspectorPort": 8091, "contextPath": "shop",
                "keybindings": {"toggleInspect": "Alt+I"}}"#,
        )
        .unwrap();
        assert_eq!(config.inspector_port, 8091);
        assert_eq!(config.context_path, "shop");
        assert_eq!(config.keybindings.toggle_inspect, KeyChord::new("I", Modifiers::ALT));
        assert_eq!(
            config.keybindings.toggle_highlight_all,
            Keybindings::default().toggle_highlight_all
        );
    }

    #[test]
    fn invalid_documents_are_errors() {
        assert!(matches!(
            InspectorConfig::from_json("{nope"),
            Err(ConfigError::Parse(_))
        ));
        assert!(InspectorConfig::from_json(r#"{"inspectorPrt": 1}"#).is_err());
        assert!(InspectorConfig::from_json(r#"{"keybindings": {"reset": "Ctrl+"}}"#).is_err());
    }

    #[test]
    fn context_path_normalization() {
        let mut config = InspectorConfig::default();
        for (raw, expected) in [
            ("", ""),
            ("/", ""),
            ("app", "/app"),
            ("/app", "/app"),
            ("/app/", "/app"),
        ] {
            config.context_path = raw.to_string();
            assert_eq!(config.normalized_context_path(), expected, "raw={raw:?}");
        }
    }
}
