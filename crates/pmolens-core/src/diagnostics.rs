#![forbid(unsafe_code)]

//! Diagnostic log of inspector state transitions.
//!
//! Entries carry a per-log monotonic sequence number instead of wall-clock
//! time so logs from two runs with the same input compare equal.

use std::collections::VecDeque;

use serde::Serialize;

use crate::lookup::{LookupTicket, PurposeKind};

/// Diagnostic event types for JSONL logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    InspectToggled,
    HighlightToggled,
    HierarchyToggled,
    ResetAll,
    SelectionChanged,
    LookupIssued,
    LookupDiscarded,
    LookupFailed,
    NavigationFailed,
}

impl DiagnosticEventKind {
    /// Get the JSONL event type string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InspectToggled => "inspect_toggled",
            Self::HighlightToggled => "highlight_toggled",
            Self::HierarchyToggled => "hierarchy_toggled",
            Self::ResetAll => "reset_all",
            Self::SelectionChanged => "selection_changed",
            Self::LookupIssued => "lookup_issued",
            Self::LookupDiscarded => "lookup_discarded",
            Self::LookupFailed => "lookup_failed",
            Self::NavigationFailed => "navigation_failed",
        }
    }
}

/// JSONL diagnostic log entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticEntry {
    pub seq: u64,
    pub kind: DiagnosticEventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<LookupTicket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<PurposeKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl DiagnosticEntry {
    /// Create an entry; the log assigns `seq` when recording.
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            seq: 0,
            kind,
            enabled: None,
            component_id: None,
            candidate_count: None,
            selected_index: None,
            ticket: None,
            purpose: None,
            context: None,
        }
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn with_component(mut self, id: impl Into<String>) -> Self {
        self.component_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_selection(mut self, index: usize, count: usize) -> Self {
        self.selected_index = Some(index);
        self.candidate_count = Some(count);
        self
    }

    #[must_use]
    pub fn with_ticket(mut self, ticket: LookupTicket, purpose: PurposeKind) -> Self {
        self.ticket = Some(ticket);
        self.purpose = Some(purpose);
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Format as a JSONL line.
    pub fn to_jsonl(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"seq":{},"kind":"{}"}}"#, self.seq, self.kind.as_str())
        })
    }
}

/// Bounded in-memory diagnostic log.
#[derive(Debug, Clone)]
pub struct DiagnosticLog {
    entries: VecDeque<DiagnosticEntry>,
    max_entries: usize,
    next_seq: u64,
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: 1024,
            next_seq: 0,
        }
    }

    #[must_use]
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max.max(1);
        self
    }

    /// Record an entry, evicting the oldest beyond capacity.
    pub fn record(&mut self, mut entry: DiagnosticEntry) {
        entry.seq = self.next_seq;
        self.next_seq += 1;
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &DiagnosticEntry> {
        self.entries.iter()
    }

    pub fn entries_of_kind(&self, kind: DiagnosticEventKind) -> Vec<&DiagnosticEntry> {
        self.entries.iter().filter(|e| e.kind == kind).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Export all entries as JSONL.
    pub fn to_jsonl(&self) -> String {
        self.entries
            .iter()
            .map(DiagnosticEntry::to_jsonl)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
