#![forbid(unsafe_code)]

//! Wire model of the location lookup response.
//!
//! The backend is lenient about what it sends (missing locations, `"null"`
//! property names, non-numeric line numbers), so the deserializers here
//! normalise instead of failing.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Short form of a dotted class name (`a.b.CustomerPmo` -> `CustomerPmo`).
#[must_use]
pub fn short_class_name(class_name: &str) -> &str {
    class_name.rsplit('.').next().unwrap_or(class_name)
}

/// A class + line in the inspected application's sources.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    #[serde(default)]
    pub class_name: Option<String>,
    /// Top-level declaring type when `class_name` names a nested type.
    #[serde(default)]
    pub outermost_class_name: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default = "default_line_number", deserialize_with = "de_line_number")]
    pub line_number: u32,
    /// Method that declares the property, for property locations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,
}

impl SourceLocation {
    /// Location of `class_name` at line 1.
    #[must_use]
    pub fn for_class(class_name: impl Into<String>) -> Self {
        Self {
            class_name: Some(class_name.into()),
            line_number: 1,
            ..Self::default()
        }
    }

    /// The class a file path must be derived from: outermost first, then the class itself.
    #[must_use]
    pub fn path_class(&self) -> Option<&str> {
        self.outermost_class_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.class_name.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// Whether this location can be opened at all.
    #[inline]
    pub fn is_navigable(&self) -> bool {
        self.class_name.as_deref().is_some_and(|name| !name.is_empty())
    }
}

/// One recorded execution of an aspect on a property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRecord {
    pub aspect_name: String,
    #[serde(default)]
    pub result: Value,
    /// Contributing class -> value, in backend order.
    #[serde(default)]
    pub breakdown: Map<String, Value>,
    /// Creation time in epoch milliseconds, when the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// One node of the component containment tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    #[serde(default)]
    pub component_id: Option<String>,
    #[serde(default = "unknown_class_name")]
    pub class_name: String,
    #[serde(default)]
    pub full_class_name: Option<String>,
    #[serde(default, deserialize_with = "de_property_name")]
    pub property_name: Option<String>,
    #[serde(default)]
    pub class_location: Option<SourceLocation>,
    #[serde(default)]
    pub property_location: Option<SourceLocation>,
    #[serde(default)]
    pub instantiation_location: Option<SourceLocation>,
    #[serde(default)]
    pub has_instantiation_location: bool,
    #[serde(default, deserialize_with = "de_children")]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Property nodes carry a property name; everything else is a section.
    #[inline]
    pub fn is_property(&self) -> bool {
        self.property_name.is_some()
    }

    /// Where clicking the node's label navigates: property first, then class.
    #[must_use]
    pub fn navigation_target(&self) -> Option<&SourceLocation> {
        self.property_location.as_ref().or(self.class_location.as_ref())
    }

    /// Instantiation location, only if the backend flagged it as present.
    #[must_use]
    pub fn instantiation_target(&self) -> Option<&SourceLocation> {
        if self.has_instantiation_location {
            self.instantiation_location.as_ref()
        } else {
            None
        }
    }
}

/// Result of a location lookup for one component.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    #[serde(default)]
    pub component_id: Option<String>,
    #[serde(default)]
    pub pmo_class_name: Option<String>,
    #[serde(default)]
    pub pmo_instance_id: Option<String>,
    #[serde(default)]
    pub class_location: Option<SourceLocation>,
    #[serde(default)]
    pub property_location: Option<SourceLocation>,
    #[serde(default)]
    pub instantiation_location: Option<SourceLocation>,
    #[serde(default)]
    pub has_instantiation_location: bool,
    #[serde(default, deserialize_with = "de_property_name")]
    pub property_name: Option<String>,
    /// Chronological; display reverses it.
    #[serde(default)]
    pub dispatcher_history: Option<Vec<DispatchRecord>>,
    #[serde(default)]
    pub hierarchy: Option<HierarchyNode>,
    /// Human-readable path from the root to this component.
    #[serde(default)]
    pub hierarchy_path: Option<String>,
    /// Set by the backend instead of data when the lookup failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LocationData {
    /// Property-level components carry a property name; others are sections.
    #[inline]
    pub fn is_property(&self) -> bool {
        self.property_name.is_some()
    }

    /// Class location, falling back to the bare PMO class name at line 1.
    #[must_use]
    pub fn class_target(&self) -> SourceLocation {
        match (&self.class_location, &self.pmo_class_name) {
            (Some(location), _) => location.clone(),
            (None, Some(class_name)) => SourceLocation::for_class(class_name.clone()),
            (None, None) => SourceLocation {
                line_number: 1,
                ..SourceLocation::default()
            },
        }
    }

    /// Dotted class name for display, if any is known.
    #[must_use]
    pub fn display_class_name(&self) -> Option<&str> {
        self.class_location
            .as_ref()
            .and_then(|loc| loc.class_name.as_deref())
            .or(self.pmo_class_name.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// History records, empty when absent.
    #[must_use]
    pub fn history(&self) -> &[DispatchRecord] {
        self.dispatcher_history.as_deref().unwrap_or(&[])
    }
}

/// Render a JSON value the way the panels display it: strings verbatim,
/// `null` as `null`, everything else in compact JSON.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn default_line_number() -> u32 {
    1
}

fn unknown_class_name() -> String {
    "Unknown".to_string()
}

fn de_line_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    let line = match value {
        Some(Value::Number(n)) => n.as_u64().map(|n| u32::try_from(n).unwrap_or(u32::MAX)),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    Ok(line.filter(|&n| n > 0).unwrap_or(1))
}

fn de_property_name<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|name| !name.is_empty() && name != "null"))
}

fn de_children<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<HierarchyNode>, D::Error> {
    Ok(Option::<Vec<HierarchyNode>>::deserialize(deserializer)?.unwrap_or_default())
}
