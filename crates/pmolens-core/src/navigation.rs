#![forbid(unsafe_code)]

//! Editor-open requests.
//!
//! Opening a file is a fire-and-forget call to a local IDE endpoint. The
//! engine only builds the request; the host performs it and reports back a
//! [`NavigationOutcome`].

use std::fmt;

use serde::Serialize;

use crate::config::InspectorConfig;
use crate::model::SourceLocation;

/// A request to open `file_path` at `line` in the developer's editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationRequest {
    /// Path relative to the source root, e.g. `shop/OrderPmo.java`.
    pub file_path: String,
    pub line: u32,
    /// Full URL of the tooling endpoint.
    pub url: String,
}

impl NavigationRequest {
    /// Build a request for `location`, or `None` if it names no class.
    #[must_use]
    pub fn for_location(location: &SourceLocation, config: &InspectorConfig) -> Option<Self> {
        if !location.is_navigable() {
            return None;
        }
        let file_path = source_path(location.path_class()?, &config.source_extension);
        let line = location.line_number.max(1);
        let root = config.source_root.trim_matches('/');
        let url = if root.is_empty() {
            format!(
                "http://localhost:{}/api/file/{file_path}?line={line}",
                config.inspector_port
            )
        } else {
            format!(
                "http://localhost:{}/api/file/{root}/{file_path}?line={line}",
                config.inspector_port
            )
        };
        Some(Self {
            file_path,
            line,
            url,
        })
    }
}

/// Derive a source path from a class name: strip nested-type suffixes,
/// turn package separators into path separators, append `extension`.
#[must_use]
pub fn source_path(class_name: &str, extension: &str) -> String {
    let top_level = class_name.split('$').next().unwrap_or(class_name);
    format!("{}{extension}", top_level.replace('.', "/"))
}

/// Result of performing a [`NavigationRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Opened,
    Failed(String),
}

impl fmt::Display for NavigationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opened => f.write_str("opened"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// User-visible notice for a failed editor-open.
#[must_use]
pub fn failure_notice(port: u16) -> String {
    format!("Failed to open in IDE. Ensure IntelliJ is running on port {port}.")
}
