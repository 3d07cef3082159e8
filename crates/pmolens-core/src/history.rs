#![forbid(unsafe_code)]

//! Dispatch history view: aspect executions, most recent first.

use serde::Serialize;

use crate::model::{DispatchRecord, display_value};

/// One contributing class in a record's breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownRow {
    pub source_class: String,
    pub value: String,
}

/// A displayed record with its own expand/collapse flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub aspect_name: String,
    pub result: String,
    /// In the order the backend returned it.
    pub breakdown: Vec<BreakdownRow>,
    pub expanded: bool,
}

impl From<&DispatchRecord> for HistoryEntry {
    fn from(record: &DispatchRecord) -> Self {
        Self {
            aspect_name: record.aspect_name.clone(),
            result: display_value(&record.result),
            breakdown: record
                .breakdown
                .iter()
                .map(|(class, value)| BreakdownRow {
                    source_class: class.clone(),
                    value: display_value(value),
                })
                .collect(),
            expanded: false,
        }
    }
}

/// Contents of the dispatch panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchHistoryView {
    /// Most recent first. Empty renders [`Self::PLACEHOLDER`].
    entries: Vec<HistoryEntry>,
}

impl DispatchHistoryView {
    pub const TITLE: &'static str = "Aspect Overview";
    pub const PLACEHOLDER: &'static str = "No aspect history recorded.";

    /// Build from chronological records; `None` behaves like an empty list.
    #[must_use]
    pub fn new(records: Option<&[DispatchRecord]>) -> Self {
        let entries = records
            .unwrap_or_default()
            .iter()
            .rev()
            .map(HistoryEntry::from)
            .collect();
        Self { entries }
    }

    #[inline]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Whether only the placeholder is shown.
    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flip the breakdown of the entry at display position `index`.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.expanded = !entry.expanded;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(name: &str) -> DispatchRecord {
        DispatchRecord {
            aspect_name: name.to_string(),
            result: json!(true),
            ..DispatchRecord::default()
        }
    }

    #[test]
    fn most_recent_first() {
        let records = vec![record("A"), record("B"), record("C")];
        let view = DispatchHistoryView::new(Some(&records));
        let names: Vec<&str> = view.entries().iter().map(|e| e.aspect_name.as_str()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
        // Input order is untouched.
        assert_eq!(records[0].aspect_name, "A");
    }

    #[test]
    fn missing_or_empty_history_is_placeholder() {
        assert!(DispatchHistoryView::new(None).is_placeholder());
        assert!(DispatchHistoryView::new(Some(&[])).is_placeholder());
    }

    #[test]
    fn breakdown_rows_in_backend_order() {
        let mut rec = record("visible");
        rec.result = json!("false");
        rec.breakdown.insert("shop.Second".into(), json!(false));
        rec.breakdown.insert("shop.First".into(), json!("yes"));
        let view = DispatchHistoryView::new(Some(std::slice::from_ref(&rec)));
        let entry = &view.entries()[0];
        assert_eq!(entry.result, "false");
        assert_eq!(
            entry.breakdown,
            vec![
                BreakdownRow { source_class: "shop.Second".into(), value: "false".into() },
                BreakdownRow { source_class: "shop.First".into(), value: "yes".into() },
            ]
        );
    }

    #[test]
    fn toggle_flips_one_entry() {
        let records = vec![record("A"), record("B")];
        let mut view = DispatchHistoryView::new(Some(&records));
        assert!(view.toggle(1));
        assert!(view.entries()[1].expanded);
        assert!(!view.entries()[0].expanded);
        assert!(!view.toggle(5));
    }
}
