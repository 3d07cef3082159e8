#![forbid(unsafe_code)]

//! Mode controller.
//!
//! [`Inspector`] owns every piece of inspector state and is the only thing
//! that mutates it. The host feeds it [`InspectorEvent`]s, executes the
//! [`Effect`]s it queues and repaints from [`Inspector::scene`].
//!
//! # Modes
//!
//! Inspect and highlight-all are mutually exclusive. Entering either one
//! closes the hierarchy panel, and opening the hierarchy panel ends both.
//! The context menu only exists while inspecting. Every toggle is idempotent
//! with respect to its target state, and [`Inspector::reset_all`] returns to
//! [`InteractionMode::Idle`] with nothing on screen.
//!
//! # Lookups
//!
//! Lookups leave as [`Effect::Lookup`] carrying a ticket. Responses come
//! back through [`Inspector::complete_lookup`]; a ticket that was superseded
//! or cancelled in the meantime is dropped without touching any state.

use crate::config::InspectorConfig;
use crate::diagnostics::{DiagnosticEntry, DiagnosticEventKind, DiagnosticLog};
use crate::document::{ATTR_COMPONENT_ID, DocumentView, resolve_component_id};
use crate::error::LookupError;
use crate::geometry::Point;
use crate::highlight::{HighlightSet, HoverHighlight};
use crate::hierarchy::{HierarchyRow, HierarchyTree, NodePath};
use crate::history::DispatchHistoryView;
use crate::hit::{CycleDirection, SelectionState, resolve_candidates};
use crate::input::{
    ClickTarget, ControlButton, EventDisposition, HierarchyEvent, InspectorEvent, KeyInput,
};
use crate::lookup::{
    LookupPurpose, LookupRequest, LookupTicket, PurposeKind, TicketBook, location_url,
};
use crate::menu::{ContextMenu, MenuAction};
use crate::model::{LocationData, SourceLocation};
use crate::navigation::{NavigationOutcome, NavigationRequest, failure_notice};
use crate::overlay::OverlayState;
use crate::scene::{ControlsState, Cursor, Scene};

/// Notice shown when the page carries no PMO components at all.
pub const NO_COMPONENTS_NOTICE: &str = "No PMO components found.";
/// Notice shown when the hierarchy lookup fails or comes back empty.
pub const HIERARCHY_FAILED_NOTICE: &str = "Could not load hierarchy.";

/// Which exclusive mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Inspecting,
    HighlightingAll,
}

/// Side effects the host must perform, in queue order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect<E> {
    /// Fetch location data and report back via [`Inspector::complete_lookup`].
    Lookup(LookupRequest),
    /// Ask the local IDE endpoint to open a file; report back via
    /// [`Inspector::navigation_finished`].
    OpenEditor(NavigationRequest),
    /// Show a blocking user notice.
    Notify(String),
    /// Scroll the element into the middle of the viewport.
    ScrollIntoView(E),
}

/// The inspection engine.
#[derive(Debug)]
pub struct Inspector<E> {
    config: InspectorConfig,
    mode: InteractionMode,
    controls_expanded: bool,
    pointer: Point,
    /// Footer line shown in every tooltip.
    footer: String,
    selection: SelectionState<E>,
    overlay: OverlayState,
    highlights: HighlightSet,
    hover: HoverHighlight,
    context_menu: Option<ContextMenu>,
    hierarchy: Option<HierarchyTree>,
    hierarchy_revision: u64,
    dispatch: Option<DispatchHistoryView>,
    tickets: TicketBook,
    effects: Vec<Effect<E>>,
    diagnostics: Option<DiagnosticLog>,
}

impl<E: Clone + PartialEq> Inspector<E> {
    pub fn new(config: InspectorConfig) -> Self {
        let footer = format!(
            "{} to highlight all",
            config.keybindings.toggle_highlight_all
        );
        let diagnostics = config.diagnostics.then(DiagnosticLog::new);
        Self {
            config,
            mode: InteractionMode::Idle,
            controls_expanded: false,
            pointer: Point::default(),
            footer,
            selection: SelectionState::new(),
            overlay: OverlayState::default(),
            highlights: HighlightSet::default(),
            hover: HoverHighlight::default(),
            context_menu: None,
            hierarchy: None,
            hierarchy_revision: 0,
            dispatch: None,
            tickets: TicketBook::default(),
            effects: Vec::new(),
            diagnostics,
        }
    }

    // --- Read access ---------------------------------------------------

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    #[inline]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    #[inline]
    pub fn is_inspecting(&self) -> bool {
        self.mode == InteractionMode::Inspecting
    }

    #[inline]
    pub fn is_highlighting(&self) -> bool {
        self.mode == InteractionMode::HighlightingAll
    }

    #[inline]
    pub fn is_hierarchy_open(&self) -> bool {
        self.hierarchy.is_some()
    }

    #[inline]
    pub fn is_context_menu_open(&self) -> bool {
        self.context_menu.is_some()
    }

    #[inline]
    pub fn is_dispatch_open(&self) -> bool {
        self.dispatch.is_some()
    }

    /// Last pointer position seen, viewport coordinates.
    pub fn last_pointer(&self) -> Point {
        self.pointer
    }

    pub fn selection(&self) -> &SelectionState<E> {
        &self.selection
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    pub fn hierarchy(&self) -> Option<&HierarchyTree> {
        self.hierarchy.as_ref()
    }

    pub fn dispatch(&self) -> Option<&DispatchHistoryView> {
        self.dispatch.as_ref()
    }

    /// Whether a lookup of `kind` is still awaited.
    pub fn is_pending(&self, kind: PurposeKind) -> bool {
        self.tickets.is_pending(kind)
    }

    /// Diagnostic log, if enabled in the configuration.
    pub fn diagnostics(&self) -> Option<&DiagnosticLog> {
        self.diagnostics.as_ref()
    }

    /// Take all queued effects, oldest first.
    pub fn drain_effects(&mut self) -> Vec<Effect<E>> {
        std::mem::take(&mut self.effects)
    }

    /// Snapshot of what should be on screen.
    pub fn scene(&self) -> Scene<'_> {
        Scene {
            overlay: &self.overlay,
            highlights: &self.highlights,
            hover: &self.hover,
            context_menu: self.context_menu.as_ref(),
            hierarchy: self.hierarchy.as_ref(),
            dispatch: self.dispatch.as_ref(),
            controls: ControlsState {
                expanded: self.controls_expanded,
                inspect_active: self.is_inspecting(),
                highlight_active: self.is_highlighting(),
                hierarchy_active: self.is_hierarchy_open(),
            },
            cursor: if self.is_inspecting() {
                Cursor::Crosshair
            } else {
                Cursor::Default
            },
        }
    }

    // --- Event entry point ---------------------------------------------

    /// Apply one host event.
    pub fn handle<D: DocumentView<Element = E>>(
        &mut self,
        doc: &D,
        event: InspectorEvent,
    ) -> EventDisposition {
        match event {
            InspectorEvent::Key(key) => self.key(doc, &key),
            InspectorEvent::PointerMove(point) => {
                self.pointer_moved(doc, point);
                EventDisposition::PASS
            }
            InspectorEvent::Wheel { delta_y } => self.wheel(doc, delta_y),
            InspectorEvent::Click { position, target } => self.click(doc, position, target),
            InspectorEvent::Control(button) => {
                self.control(doc, button);
                EventDisposition::CONSUME
            }
            InspectorEvent::MenuEntry(action) => {
                self.menu_action(action);
                EventDisposition::CONSUME
            }
            InspectorEvent::Hierarchy(event) => {
                self.hierarchy_event(doc, event);
                EventDisposition::CONSUME
            }
            InspectorEvent::ToggleDispatchEntry(index) => {
                if let Some(view) = &mut self.dispatch {
                    view.toggle(index);
                }
                EventDisposition::CONSUME
            }
            InspectorEvent::CloseDispatchPanel => {
                self.dispatch = None;
                EventDisposition::CONSUME
            }
            InspectorEvent::Refresh => {
                self.refresh(doc);
                EventDisposition::PASS
            }
        }
    }

    // --- Modes ---------------------------------------------------------

    /// Enter or leave inspect mode.
    pub fn toggle_inspect(&mut self) {
        if self.is_inspecting() {
            self.leave_inspect();
            // Leaving via the chord brings the controls back into view.
            self.controls_expanded = true;
        } else {
            self.leave_highlight();
            self.close_hierarchy();
            self.mode = InteractionMode::Inspecting;
            crate::info!("inspect mode on");
        }
        self.record(
            DiagnosticEntry::new(DiagnosticEventKind::InspectToggled)
                .with_enabled(self.is_inspecting()),
        );
    }

    /// Enter or leave highlight-all mode.
    pub fn toggle_highlight_all<D: DocumentView<Element = E>>(&mut self, doc: &D) {
        if self.is_highlighting() {
            self.leave_highlight();
        } else {
            self.leave_inspect();
            self.close_hierarchy();
            self.mode = InteractionMode::HighlightingAll;
            self.highlights
                .rebuild(doc, &self.config.roles, self.config.label_offset);
        }
        self.record(
            DiagnosticEntry::new(DiagnosticEventKind::HighlightToggled)
                .with_enabled(self.is_highlighting()),
        );
    }

    /// Open the hierarchy panel for the page's root component, or close it.
    ///
    /// A pending hierarchy lookup counts as open, so a second toggle cancels it.
    pub fn toggle_hierarchy<D: DocumentView<Element = E>>(&mut self, doc: &D) {
        if self.is_hierarchy_open() || self.tickets.is_pending(PurposeKind::Hierarchy) {
            self.close_hierarchy();
            self.record(
                DiagnosticEntry::new(DiagnosticEventKind::HierarchyToggled).with_enabled(false),
            );
            return;
        }

        self.leave_inspect();
        self.leave_highlight();

        let root_id = doc
            .query_first_with_attribute(ATTR_COMPONENT_ID)
            .and_then(|el| doc.attribute(&el, ATTR_COMPONENT_ID))
            .filter(|id| !id.is_empty());
        let Some(root_id) = root_id else {
            crate::warn!("no PMO components in page");
            self.effects.push(Effect::Notify(NO_COMPONENTS_NOTICE.to_string()));
            return;
        };
        self.issue_lookup(root_id, LookupPurpose::Hierarchy);
        self.record(DiagnosticEntry::new(DiagnosticEventKind::HierarchyToggled).with_enabled(true));
    }

    /// Back to idle with nothing on screen. Safe to call in any state.
    pub fn reset_all(&mut self) {
        self.leave_inspect();
        self.leave_highlight();
        self.close_hierarchy();
        self.context_menu = None;
        self.dispatch = None;
        self.hover.clear();
        self.tickets.cancel_all();
        crate::debug!("inspector reset");
        self.record(DiagnosticEntry::new(DiagnosticEventKind::ResetAll));
    }

    fn leave_inspect(&mut self) {
        if !self.is_inspecting() {
            return;
        }
        self.mode = InteractionMode::Idle;
        self.overlay.hide();
        self.selection.clear();
        self.context_menu = None;
        self.tickets.cancel(PurposeKind::ContextMenu);
        crate::info!("inspect mode off");
    }

    fn leave_highlight(&mut self) {
        if !self.is_highlighting() {
            return;
        }
        self.mode = InteractionMode::Idle;
        self.highlights.clear();
    }

    fn close_hierarchy(&mut self) {
        self.hierarchy = None;
        self.hover.clear();
        self.tickets.cancel(PurposeKind::Hierarchy);
        self.tickets.cancel(PurposeKind::DispatchHistory);
    }

    fn control<D: DocumentView<Element = E>>(&mut self, doc: &D, button: ControlButton) {
        match button {
            ControlButton::Main => {
                if self.controls_expanded {
                    self.controls_expanded = false;
                    self.reset_all();
                } else {
                    self.controls_expanded = true;
                }
            }
            ControlButton::Inspect => self.toggle_inspect(),
            ControlButton::HighlightAll => self.toggle_highlight_all(doc),
            ControlButton::Hierarchy => self.toggle_hierarchy(doc),
        }
    }

    fn key<D: DocumentView<Element = E>>(&mut self, doc: &D, key: &KeyInput) -> EventDisposition {
        let bindings = &self.config.keybindings;
        if bindings.toggle_inspect.matches(key) {
            self.toggle_inspect();
            EventDisposition::PREVENT
        } else if bindings.toggle_highlight_all.matches(key) {
            self.toggle_highlight_all(doc);
            EventDisposition::PREVENT
        } else if bindings.reset.matches(key) {
            self.reset_all();
            EventDisposition::PASS
        } else {
            EventDisposition::PASS
        }
    }

    // --- Pointer -------------------------------------------------------

    fn pointer_moved<D: DocumentView<Element = E>>(&mut self, doc: &D, point: Point) {
        self.pointer = point;
        if !self.is_inspecting() {
            return;
        }
        let candidates = resolve_candidates(doc, &self.config.roles, point);
        if self.selection.set_candidates(candidates) {
            crate::trace!(count = self.selection.len(), "candidate set changed");
            self.record(
                DiagnosticEntry::new(DiagnosticEventKind::SelectionChanged)
                    .with_selection(self.selection.index(), self.selection.len()),
            );
        }
        self.present_overlay(doc);
    }

    fn wheel<D: DocumentView<Element = E>>(&mut self, doc: &D, delta_y: f64) -> EventDisposition {
        if !self.is_inspecting() || !self.selection.is_ambiguous() {
            return EventDisposition::PASS;
        }
        self.selection.cycle(CycleDirection::from_wheel(delta_y));
        self.record(
            DiagnosticEntry::new(DiagnosticEventKind::SelectionChanged)
                .with_selection(self.selection.index(), self.selection.len()),
        );
        self.present_overlay(doc);
        EventDisposition::PREVENT
    }

    fn click<D: DocumentView<Element = E>>(
        &mut self,
        doc: &D,
        position: Point,
        target: ClickTarget,
    ) -> EventDisposition {
        if target != ClickTarget::ContextMenu {
            self.context_menu = None;
            self.tickets.cancel(PurposeKind::ContextMenu);
        }
        if target != ClickTarget::DispatchPanel {
            self.dispatch = None;
        }
        if target.is_floating_panel() || !self.is_inspecting() {
            return EventDisposition::PASS;
        }

        let id = self
            .selection
            .current()
            .and_then(|el| resolve_component_id(doc, &self.config.roles, el));
        let Some(id) = id else {
            return EventDisposition::PASS;
        };
        self.issue_lookup(
            id,
            LookupPurpose::ContextMenu {
                anchor: position,
                viewport: doc.viewport_size(),
            },
        );
        EventDisposition::CONSUME
    }

    fn present_overlay<D: DocumentView<Element = E>>(&mut self, doc: &D) {
        self.overlay.present(
            doc,
            &self.config.roles,
            &self.selection,
            self.pointer,
            self.config.tooltip_offset,
            &self.footer,
        );
    }

    /// Recompute annotations after the page moved underneath them.
    pub fn refresh<D: DocumentView<Element = E>>(&mut self, doc: &D) {
        // The hover box belongs to the hierarchy panel, not to a mode.
        self.hover.refresh(doc, &self.config.roles);
        match self.mode {
            InteractionMode::Inspecting => self.pointer_moved(doc, self.pointer),
            InteractionMode::HighlightingAll => {
                self.highlights
                    .rebuild(doc, &self.config.roles, self.config.label_offset);
            }
            InteractionMode::Idle => {}
        }
    }

    // --- Menu, hierarchy, navigation -----------------------------------

    fn menu_action(&mut self, action: MenuAction) {
        let Some(menu) = self.context_menu.take() else {
            return;
        };
        if !menu.has_action(action) {
            crate::debug!(action = action.as_str(), "menu action not offered");
            return;
        }
        let data = menu.data;
        match action {
            MenuAction::OpenProperty => self.navigate(data.property_location.as_ref()),
            MenuAction::OpenClass => self.navigate(Some(&data.class_target())),
            MenuAction::OpenInstantiation => self.navigate(data.instantiation_location.as_ref()),
            MenuAction::ShowDispatcherHistory => {
                self.dispatch = Some(DispatchHistoryView::new(data.dispatcher_history.as_deref()));
            }
        }
    }

    fn hierarchy_event<D: DocumentView<Element = E>>(&mut self, doc: &D, event: HierarchyEvent) {
        match event {
            HierarchyEvent::ToggleExpanded(path) => {
                if let Some(tree) = &mut self.hierarchy {
                    tree.toggle(&path);
                }
            }
            HierarchyEvent::LabelClicked(path) => {
                let target = self.row_target(&path, |row| row.navigation.clone());
                self.navigate(target.as_ref());
            }
            HierarchyEvent::InstantiationClicked(path) => {
                let target = self.row_target(&path, |row| row.instantiation.clone());
                self.navigate(target.as_ref());
            }
            HierarchyEvent::HistoryClicked(path) => {
                let id = self.row_target(&path, |row| {
                    row.history_action
                        .then(|| row.component_id.clone())
                        .flatten()
                });
                if let Some(id) = id {
                    self.issue_lookup(id, LookupPurpose::DispatchHistory { path });
                }
            }
            HierarchyEvent::RowEnter(path) => {
                let id = self.row_target(&path, |row| row.component_id.clone());
                match id {
                    Some(id) => {
                        if let Some(target) = self.hover.show(doc, &self.config.roles, &id) {
                            self.effects.push(Effect::ScrollIntoView(target));
                        }
                    }
                    None => self.hover.clear(),
                }
            }
            HierarchyEvent::RowLeave => self.hover.clear(),
            HierarchyEvent::Close => self.close_hierarchy(),
        }
    }

    fn row_target<T>(
        &self,
        path: &NodePath,
        pick: impl FnOnce(&HierarchyRow) -> Option<T>,
    ) -> Option<T> {
        self.hierarchy.as_ref()?.row(path).and_then(pick)
    }

    fn navigate(&mut self, location: Option<&SourceLocation>) {
        let request = location.and_then(|loc| NavigationRequest::for_location(loc, &self.config));
        match request {
            Some(request) => {
                crate::debug!(path = %request.file_path, line = request.line, "open in editor");
                self.effects.push(Effect::OpenEditor(request));
            }
            None => {
                crate::debug!("navigation target has no class");
            }
        }
    }

    /// Report the outcome of an [`Effect::OpenEditor`].
    pub fn navigation_finished(&mut self, outcome: NavigationOutcome) {
        if let NavigationOutcome::Failed(reason) = outcome {
            crate::warn!(%reason, "editor navigation failed");
            self.record(
                DiagnosticEntry::new(DiagnosticEventKind::NavigationFailed).with_context(reason),
            );
            self.effects
                .push(Effect::Notify(failure_notice(self.config.inspector_port)));
        }
    }

    // --- Lookups -------------------------------------------------------

    fn issue_lookup(&mut self, component_id: String, purpose: LookupPurpose) {
        let kind = purpose.kind();
        let ticket = self.tickets.issue(purpose.clone());
        let url = location_url(&self.config, &component_id);
        crate::debug!(ticket = ticket.0, %component_id, "lookup issued");
        self.record(
            DiagnosticEntry::new(DiagnosticEventKind::LookupIssued)
                .with_component(component_id.clone())
                .with_ticket(ticket, kind),
        );
        self.effects.push(Effect::Lookup(LookupRequest {
            ticket,
            component_id,
            url,
            purpose,
        }));
    }

    /// Deliver the response for `ticket`. Stale tickets are ignored.
    pub fn complete_lookup(
        &mut self,
        ticket: LookupTicket,
        result: Result<LocationData, LookupError>,
    ) {
        let Some(purpose) = self.tickets.redeem(ticket) else {
            crate::debug!(ticket = ticket.0, "discarding stale lookup response");
            self.record(
                DiagnosticEntry::new(DiagnosticEventKind::LookupDiscarded)
                    .with_context(format!("ticket {}", ticket.0)),
            );
            return;
        };

        let data = match result {
            Ok(data) => data,
            Err(err) => {
                crate::warn!(ticket = ticket.0, error = %err, "lookup failed");
                self.record(
                    DiagnosticEntry::new(DiagnosticEventKind::LookupFailed)
                        .with_ticket(ticket, purpose.kind())
                        .with_context(err.to_string()),
                );
                if purpose.kind() == PurposeKind::Hierarchy {
                    self.effects
                        .push(Effect::Notify(HIERARCHY_FAILED_NOTICE.to_string()));
                }
                return;
            }
        };

        match purpose {
            LookupPurpose::ContextMenu { anchor, viewport } => {
                self.context_menu = Some(ContextMenu::build(
                    data,
                    anchor,
                    viewport,
                    self.config.menu_footprint,
                ));
            }
            LookupPurpose::Hierarchy => match &data.hierarchy {
                Some(root) => {
                    self.hierarchy_revision += 1;
                    self.hierarchy = Some(HierarchyTree::new(root, self.hierarchy_revision));
                }
                None => {
                    crate::warn!("hierarchy response without a tree");
                    self.effects
                        .push(Effect::Notify(HIERARCHY_FAILED_NOTICE.to_string()));
                }
            },
            LookupPurpose::DispatchHistory { .. } => {
                self.dispatch = Some(DispatchHistoryView::new(data.dispatcher_history.as_deref()));
            }
        }
    }

    fn record(&mut self, entry: DiagnosticEntry) {
        if let Some(log) = &mut self.diagnostics {
            log.record(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ATTR_PMO_CLASS, ATTR_PMO_PROPERTY};
    use crate::geometry::ViewportRect;
    use crate::input::Modifiers;
    use crate::synthetic::{NodeId, SyntheticDocument};
    use pretty_assertions::assert_eq;

    fn page() -> (SyntheticDocument, NodeId, NodeId) {
        let mut doc = SyntheticDocument::default();
        let body = doc.body();
        let section = doc.append_with(
            body,
            "div",
            ViewportRect::new(0.0, 0.0, 400.0, 400.0),
            &[(ATTR_COMPONENT_ID, "sec"), (ATTR_PMO_CLASS, "shop.OrderPmo")],
        );
        let field = doc.append_with(
            section,
            "input",
            ViewportRect::new(10.0, 10.0, 100.0, 20.0),
            &[
                (ATTR_COMPONENT_ID, "qty"),
                (ATTR_PMO_CLASS, "shop.OrderPmo"),
                (ATTR_PMO_PROPERTY, "quantity"),
            ],
        );
        (doc, section, field)
    }

    fn inspector() -> Inspector<NodeId> {
        Inspector::new(InspectorConfig {
            diagnostics: true,
            ..InspectorConfig::default()
        })
    }

    fn lookups(effects: &[Effect<NodeId>]) -> Vec<&LookupRequest> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Lookup(req) => Some(req),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn chord_toggles_inspect() {
        let (doc, _, _) = page();
        let mut insp = inspector();
        let key = KeyInput::new("E", Modifiers::CTRL | Modifiers::SHIFT);
        let disp = insp.handle(&doc, InspectorEvent::Key(key.clone()));
        assert_eq!(disp, EventDisposition::PREVENT);
        assert!(insp.is_inspecting());
        assert_eq!(insp.scene().cursor, Cursor::Crosshair);

        insp.handle(&doc, InspectorEvent::Key(key));
        assert!(!insp.is_inspecting());
        assert!(insp.scene().controls.expanded);
    }

    #[test]
    fn unrelated_keys_pass() {
        let (doc, _, _) = page();
        let mut insp = inspector();
        let disp = insp.handle(&doc, InspectorEvent::Key(KeyInput::new("e", Modifiers::CTRL)));
        assert_eq!(disp, EventDisposition::PASS);
        assert_eq!(insp.mode(), InteractionMode::Idle);
    }

    #[test]
    fn pointer_over_nested_components_is_ambiguous() {
        let (doc, section, field) = page();
        let mut insp = inspector();
        insp.toggle_inspect();
        insp.handle(&doc, InspectorEvent::PointerMove(Point::new(20.0, 15.0)));
        assert_eq!(insp.selection().candidates(), &[field, section]);

        let tooltip = insp.scene().overlay.tooltip.clone().unwrap();
        assert_eq!(tooltip.title(), "OrderPmo.quantity");
        assert_eq!(
            tooltip.cycle_hint.unwrap().text(),
            "Element 1 of 2 (Scroll to cycle)"
        );
        assert_eq!(tooltip.position, Point::new(35.0, 30.0));

        let disp = insp.handle(&doc, InspectorEvent::Wheel { delta_y: 3.0 });
        assert_eq!(disp, EventDisposition::PREVENT);
        assert_eq!(insp.selection().current(), Some(&section));
        assert_eq!(
            insp.scene().overlay.target,
            Some(ViewportRect::new(0.0, 0.0, 400.0, 400.0))
        );
    }

    #[test]
    fn wheel_passes_without_ambiguity() {
        let (doc, _, _) = page();
        let mut insp = inspector();
        insp.toggle_inspect();
        insp.handle(&doc, InspectorEvent::PointerMove(Point::new(300.0, 300.0)));
        assert_eq!(insp.selection().len(), 1);
        let disp = insp.handle(&doc, InspectorEvent::Wheel { delta_y: -1.0 });
        assert_eq!(disp, EventDisposition::PASS);
    }

    #[test]
    fn page_click_opens_menu_after_lookup() {
        let (doc, _, _) = page();
        let mut insp = inspector();
        insp.toggle_inspect();
        insp.handle(&doc, InspectorEvent::PointerMove(Point::new(20.0, 15.0)));
        let disp = insp.handle(
            &doc,
            InspectorEvent::Click {
                position: Point::new(20.0, 15.0),
                target: ClickTarget::Page,
            },
        );
        assert_eq!(disp, EventDisposition::CONSUME);

        let effects = insp.drain_effects();
        let reqs = lookups(&effects);
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].component_id, "qty");
        assert_eq!(reqs[0].url, "/inspector/location?componentId=qty");

        let data = LocationData {
            property_name: Some("quantity".into()),
            pmo_class_name: Some("shop.OrderPmo".into()),
            ..LocationData::default()
        };
        insp.complete_lookup(reqs[0].ticket, Ok(data));
        let menu = insp.context_menu().unwrap();
        assert_eq!(menu.title.as_deref(), Some("OrderPmo"));
        assert!(menu.has_action(MenuAction::OpenProperty));
    }

    #[test]
    fn click_while_idle_passes() {
        let (doc, _, _) = page();
        let mut insp = inspector();
        let disp = insp.handle(
            &doc,
            InspectorEvent::Click {
                position: Point::new(20.0, 15.0),
                target: ClickTarget::Page,
            },
        );
        assert_eq!(disp, EventDisposition::PASS);
        assert!(insp.drain_effects().is_empty());
    }

    #[test]
    fn stale_menu_response_is_dropped() {
        let (doc, _, _) = page();
        let mut insp = inspector();
        insp.toggle_inspect();
        insp.handle(&doc, InspectorEvent::PointerMove(Point::new(20.0, 15.0)));
        let click = InspectorEvent::Click {
            position: Point::new(20.0, 15.0),
            target: ClickTarget::Page,
        };
        insp.handle(&doc, click.clone());
        insp.handle(&doc, click);
        let effects = insp.drain_effects();
        let reqs = lookups(&effects);
        assert_eq!(reqs.len(), 2);

        insp.complete_lookup(reqs[0].ticket, Ok(LocationData::default()));
        assert!(!insp.is_context_menu_open());
        insp.complete_lookup(reqs[1].ticket, Ok(LocationData::default()));
        assert!(insp.is_context_menu_open());

        let log = insp.diagnostics().unwrap();
        assert_eq!(log.entries_of_kind(DiagnosticEventKind::LookupDiscarded).len(), 1);
    }

    #[test]
    fn menu_open_class_navigates_with_default_line() {
        let (doc, _, _) = page();
        let mut insp = inspector();
        insp.toggle_inspect();
        insp.handle(&doc, InspectorEvent::PointerMove(Point::new(300.0, 300.0)));
        insp.handle(
            &doc,
            InspectorEvent::Click {
                position: Point::new(300.0, 300.0),
                target: ClickTarget::Page,
            },
        );
        let effects = insp.drain_effects();
        let ticket = lookups(&effects)[0].ticket;
        insp.complete_lookup(
            ticket,
            Ok(LocationData {
                pmo_class_name: Some("shop.OrderPmo".into()),
                ..LocationData::default()
            }),
        );

        insp.handle(&doc, InspectorEvent::MenuEntry(MenuAction::OpenClass));
        assert!(!insp.is_context_menu_open());
        let effects = insp.drain_effects();
        let Some(Effect::OpenEditor(req)) = effects.first() else {
            panic!("expected an editor request, got {effects:?}");
        };
        assert_eq!(req.file_path, "shop/OrderPmo.java");
        assert_eq!(req.line, 1);
    }

    #[test]
    fn navigation_failure_notifies_with_port() {
        let mut insp = inspector();
        insp.navigation_finished(NavigationOutcome::Failed("refused".into()));
        assert_eq!(
            insp.drain_effects(),
            vec![Effect::Notify(failure_notice(63342))]
        );
        insp.navigation_finished(NavigationOutcome::Opened);
        assert!(insp.drain_effects().is_empty());
    }

    #[test]
    fn highlight_all_excludes_inspect() {
        let (doc, _, _) = page();
        let mut insp = inspector();
        insp.toggle_inspect();
        insp.toggle_highlight_all(&doc);
        assert!(insp.is_highlighting());
        assert!(!insp.is_inspecting());
        assert_eq!(insp.scene().highlights.len(), 4);

        insp.toggle_inspect();
        assert!(insp.is_inspecting());
        assert!(insp.scene().highlights.is_empty());
    }

    #[test]
    fn hierarchy_without_components_notifies() {
        let doc = SyntheticDocument::default();
        let mut insp = inspector();
        insp.toggle_hierarchy(&doc);
        assert_eq!(
            insp.drain_effects(),
            vec![Effect::Notify(NO_COMPONENTS_NOTICE.to_string())]
        );
        assert!(!insp.is_hierarchy_open());
    }

    #[test]
    fn hierarchy_failure_notifies() {
        let (doc, _, _) = page();
        let mut insp = inspector();
        insp.toggle_hierarchy(&doc);
        let effects = insp.drain_effects();
        let req = lookups(&effects)[0].clone();
        assert_eq!(req.component_id, "sec");

        insp.complete_lookup(req.ticket, Err(LookupError::Network("offline".into())));
        assert!(!insp.is_hierarchy_open());
        assert_eq!(
            insp.drain_effects(),
            vec![Effect::Notify(HIERARCHY_FAILED_NOTICE.to_string())]
        );
    }

    #[test]
    fn entering_inspect_cancels_pending_hierarchy() {
        let (doc, _, _) = page();
        let mut insp = inspector();
        insp.toggle_hierarchy(&doc);
        let effects = insp.drain_effects();
        let ticket = lookups(&effects)[0].ticket;

        insp.toggle_inspect();
        insp.complete_lookup(ticket, Ok(LocationData::default()));
        assert!(!insp.is_hierarchy_open());
        assert!(insp.drain_effects().is_empty());
    }

    #[test]
    fn main_button_collapse_resets() {
        let (doc, _, _) = page();
        let mut insp = inspector();
        insp.handle(&doc, InspectorEvent::Control(ControlButton::Main));
        insp.handle(&doc, InspectorEvent::Control(ControlButton::HighlightAll));
        assert!(insp.is_highlighting());
        insp.handle(&doc, InspectorEvent::Control(ControlButton::Main));
        assert_eq!(insp.mode(), InteractionMode::Idle);
        assert!(insp.scene().is_blank());
        assert!(!insp.scene().controls.expanded);
    }

    #[test]
    fn escape_resets_everything() {
        let (doc, _, _) = page();
        let mut insp = inspector();
        insp.toggle_inspect();
        insp.handle(&doc, InspectorEvent::PointerMove(Point::new(20.0, 15.0)));
        let disp = insp.handle(
            &doc,
            InspectorEvent::Key(KeyInput::new("Escape", Modifiers::empty())),
        );
        assert_eq!(disp, EventDisposition::PASS);
        assert_eq!(insp.mode(), InteractionMode::Idle);
        assert!(insp.scene().is_blank());
        assert!(insp.selection().is_empty());
    }

    #[test]
    fn shift_escape_still_resets() {
        let (doc, _, _) = page();
        let mut insp = inspector();
        insp.toggle_inspect();
        insp.handle(
            &doc,
            InspectorEvent::Key(KeyInput::new("Escape", Modifiers::SHIFT)),
        );
        assert!(!insp.is_inspecting());
        assert!(insp.scene().is_blank());
    }

    #[test]
    fn refresh_follows_moved_elements() {
        let (mut doc, section, _) = page();
        let mut insp = inspector();
        insp.toggle_inspect();
        insp.handle(&doc, InspectorEvent::PointerMove(Point::new(300.0, 300.0)));
        doc.set_rect(section, ViewportRect::new(0.0, 0.0, 500.0, 500.0));
        insp.handle(&doc, InspectorEvent::Refresh);
        assert_eq!(
            insp.scene().overlay.target,
            Some(ViewportRect::new(0.0, 0.0, 500.0, 500.0))
        );
    }
}
