#![forbid(unsafe_code)]

//! Pointer hit resolution and cyclic disambiguation.
//!
//! # Invariants
//!
//! 1. Candidates are topmost-first and each carries PMO metadata directly.
//! 2. `0 <= index < candidates.len()` whenever candidates are non-empty.
//! 3. The index resets to 0 whenever the candidate set changes.
//! 4. `n` forward cycles over `n` candidates return to the starting pick.

use crate::document::{ATTR_PMO_CLASS, DocumentView, ElementRoles, resolve_component_id};
use crate::geometry::Point;

/// Every metadata-bearing element under `point`, topmost first.
///
/// An element qualifies only if it resolves to a component id *and* carries
/// the PMO class attribute itself; containers that merely inherit an id
/// from an ancestor would otherwise show up as duplicate targets.
pub fn resolve_candidates<D: DocumentView>(
    doc: &D,
    roles: &ElementRoles,
    point: Point,
) -> Vec<D::Element> {
    doc.elements_from_point(point)
        .into_iter()
        .filter(|el| {
            doc.has_attribute(el, ATTR_PMO_CLASS)
                && resolve_component_id(doc, roles, el).is_some()
        })
        .collect()
}

/// Direction of a cycling gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Next,
    Previous,
}

impl CycleDirection {
    /// Wheel down cycles forward, wheel up backward.
    #[inline]
    pub fn from_wheel(delta_y: f64) -> Self {
        if delta_y > 0.0 { Self::Next } else { Self::Previous }
    }
}

/// Candidates under the pointer plus the current pick.
#[derive(Debug, Clone)]
pub struct SelectionState<E> {
    candidates: Vec<E>,
    index: usize,
}

impl<E> Default for SelectionState<E> {
    fn default() -> Self {
        Self {
            candidates: Vec::new(),
            index: 0,
        }
    }
}

impl<E: Clone + PartialEq> SelectionState<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the candidate set. Returns `true` if it changed, in which case
    /// the pick resets to the topmost candidate.
    pub fn set_candidates(&mut self, candidates: Vec<E>) -> bool {
        if candidates == self.candidates {
            return false;
        }
        self.candidates = candidates;
        self.index = 0;
        true
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
        self.index = 0;
    }

    #[inline]
    pub fn candidates(&self) -> &[E] {
        &self.candidates
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether cycling is meaningful (and the wheel must be captured).
    #[inline]
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }

    pub fn current(&self) -> Option<&E> {
        self.candidates.get(self.index)
    }

    pub fn cycle_next(&mut self) {
        let n = self.candidates.len();
        if n > 0 {
            self.index = (self.index + 1) % n;
        }
    }

    pub fn cycle_previous(&mut self) {
        let n = self.candidates.len();
        if n > 0 {
            self.index = (self.index + n - 1) % n;
        }
    }

    pub fn cycle(&mut self, direction: CycleDirection) {
        match direction {
            CycleDirection::Next => self.cycle_next(),
            CycleDirection::Previous => self.cycle_previous(),
        }
    }
}
