#![forbid(unsafe_code)]

//! Location lookup requests and response parsing.
//!
//! Every request carries a [`LookupTicket`]. The controller remembers the
//! latest ticket per [`LookupPurpose`] kind and drops responses for any
//! other ticket, so a slow response for a target the user already left can
//! never overwrite a newer one.

use serde::Serialize;
use url::form_urlencoded;

use crate::config::InspectorConfig;
use crate::error::LookupError;
use crate::geometry::{Point, ViewportSize};
use crate::hierarchy::NodePath;
use crate::model::LocationData;

/// Correlation tag of one lookup request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LookupTicket(pub u64);

/// Why a lookup was issued; decides what its response feeds.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupPurpose {
    /// Open the context menu at `anchor` once data arrives.
    ContextMenu {
        anchor: Point,
        viewport: ViewportSize,
    },
    /// Render the full hierarchy panel.
    Hierarchy,
    /// Open the dispatch history for a hierarchy row.
    DispatchHistory { path: NodePath },
}

/// Coarse kind of a purpose; one outstanding ticket per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PurposeKind {
    ContextMenu,
    Hierarchy,
    DispatchHistory,
}

impl LookupPurpose {
    pub fn kind(&self) -> PurposeKind {
        match self {
            Self::ContextMenu { .. } => PurposeKind::ContextMenu,
            Self::Hierarchy => PurposeKind::Hierarchy,
            Self::DispatchHistory { .. } => PurposeKind::DispatchHistory,
        }
    }
}

/// A lookup the host must perform.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    pub ticket: LookupTicket,
    pub component_id: String,
    pub url: String,
    pub purpose: LookupPurpose,
}

/// Relative URL of the location endpoint for `component_id`.
#[must_use]
pub fn location_url(config: &InspectorConfig, component_id: &str) -> String {
    let id: String = form_urlencoded::byte_serialize(component_id.as_bytes()).collect();
    format!(
        "{}/inspector/location?componentId={id}",
        config.normalized_context_path()
    )
}

/// Parse a response body. A body carrying an `error` field is a failure.
pub fn parse_location_response(body: &str) -> Result<LocationData, LookupError> {
    let data: LocationData =
        serde_json::from_str(body).map_err(|err| LookupError::InvalidBody(err.to_string()))?;
    match data.error {
        Some(message) => Err(LookupError::Backend(message)),
        None => Ok(data),
    }
}

/// Hands out monotonically increasing tickets and remembers the latest
/// outstanding one per purpose kind.
#[derive(Debug, Default)]
pub struct TicketBook {
    next: u64,
    outstanding: Vec<(LookupTicket, LookupPurpose)>,
}

impl TicketBook {
    /// Issue a ticket for `purpose`, superseding any outstanding one of the same kind.
    pub fn issue(&mut self, purpose: LookupPurpose) -> LookupTicket {
        self.next += 1;
        let ticket = LookupTicket(self.next);
        let kind = purpose.kind();
        self.outstanding.retain(|(_, p)| p.kind() != kind);
        self.outstanding.push((ticket, purpose));
        ticket
    }

    /// Accept `ticket` if it is still outstanding; accepting retires it.
    pub fn redeem(&mut self, ticket: LookupTicket) -> Option<LookupPurpose> {
        let pos = self.outstanding.iter().position(|(t, _)| *t == ticket)?;
        Some(self.outstanding.remove(pos).1)
    }

    /// Forget the outstanding ticket of `kind`, if any.
    pub fn cancel(&mut self, kind: PurposeKind) {
        self.outstanding.retain(|(_, p)| p.kind() != kind);
    }

    /// Forget every outstanding ticket.
    pub fn cancel_all(&mut self) {
        self.outstanding.clear();
    }

    pub fn is_pending(&self, kind: PurposeKind) -> bool {
        self.outstanding.iter().any(|(_, p)| p.kind() == kind)
    }
}
