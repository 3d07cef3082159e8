#![forbid(unsafe_code)]

//! Core: host-agnostic inspection engine for PMO-backed web UIs.
//!
//! The engine never touches a real document. Every query goes through the
//! [`document::DocumentView`] capability, every side effect leaves the engine
//! as an [`controller::Effect`], and everything that must be visible is
//! described by [`scene::Scene`]. The `pmolens-web` crate binds all three to
//! the browser.

pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod geometry;
pub mod hierarchy;
pub mod highlight;
pub mod history;
pub mod hit;
pub mod input;
pub mod logging;
pub mod lookup;
pub mod menu;
pub mod model;
pub mod navigation;
pub mod overlay;
pub mod scene;

#[cfg(any(test, feature = "test-helpers"))]
pub mod synthetic;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};

pub use config::InspectorConfig;
pub use controller::{Effect, Inspector};
pub use document::{ComponentMetadata, DocumentView, ElementRole, ElementRoles};
pub use error::{ConfigError, LookupError};
pub use model::{DispatchRecord, HierarchyNode, LocationData, SourceLocation};
