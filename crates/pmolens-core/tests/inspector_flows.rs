//! End-to-end flows through the inspector against a synthetic page.
//!
//! Each test drives [`Inspector`] the way the web host does: feed events,
//! drain effects, answer lookups with backend-shaped JSON.

use pmolens_core::controller::{Effect, HIERARCHY_FAILED_NOTICE, Inspector, InteractionMode};
use pmolens_core::document::{ATTR_COMPONENT_ID, ATTR_PMO_CLASS, ATTR_PMO_PROPERTY};
use pmolens_core::geometry::{Point, ViewportRect};
use pmolens_core::hierarchy::{LeafMarker, NodePath};
use pmolens_core::input::{ClickTarget, ControlButton, HierarchyEvent, InspectorEvent};
use pmolens_core::lookup::{LookupRequest, parse_location_response};
use pmolens_core::menu::MenuAction;
use pmolens_core::synthetic::{NodeId, SyntheticDocument};
use pmolens_core::{DocumentView, InspectorConfig};
use pretty_assertions::assert_eq;

const HIERARCHY_BODY: &str = r#"{
    "componentId": "root",
    "pmoClassName": "shop.OrderPmo",
    "hierarchy": {
        "componentId": "root",
        "className": "OrderPmo",
        "fullClassName": "shop.OrderPmo",
        "classLocation": {"className": "shop.OrderPmo", "lineNumber": 12},
        "children": [
            {
                "componentId": "qty",
                "className": "OrderPmo",
                "propertyName": "quantity",
                "propertyLocation": {"className": "shop.OrderPmo", "lineNumber": 40}
            },
            {
                "componentId": "sys",
                "className": "Spacer",
                "propertyName": "null"
            }
        ]
    }
}"#;

fn page() -> (SyntheticDocument, NodeId) {
    let mut doc = SyntheticDocument::default();
    let body = doc.body();
    let root = doc.append_with(
        body,
        "div",
        ViewportRect::new(0.0, 0.0, 600.0, 600.0),
        &[(ATTR_COMPONENT_ID, "root"), (ATTR_PMO_CLASS, "shop.OrderPmo")],
    );
    let wrapper = doc.append(root, "vaadin-form-item", ViewportRect::new(0.0, 0.0, 300.0, 40.0));
    let field = doc.append_with(
        wrapper,
        "input",
        ViewportRect::new(100.0, 5.0, 150.0, 30.0),
        &[
            (ATTR_COMPONENT_ID, "qty"),
            (ATTR_PMO_CLASS, "shop.OrderPmo"),
            (ATTR_PMO_PROPERTY, "quantity"),
        ],
    );
    (doc, field)
}

fn single_lookup(effects: Vec<Effect<NodeId>>) -> LookupRequest {
    let mut lookups: Vec<_> = effects
        .into_iter()
        .filter_map(|e| match e {
            Effect::Lookup(req) => Some(req),
            _ => None,
        })
        .collect();
    assert_eq!(lookups.len(), 1, "expected exactly one lookup");
    lookups.remove(0)
}

fn open_hierarchy(insp: &mut Inspector<NodeId>, doc: &SyntheticDocument) {
    insp.handle(doc, InspectorEvent::Control(ControlButton::Hierarchy));
    let req = single_lookup(insp.drain_effects());
    assert_eq!(req.component_id, "root");
    insp.complete_lookup(req.ticket, parse_location_response(HIERARCHY_BODY));
}

#[test]
fn hierarchy_panel_renders_rows() {
    let (doc, _) = page();
    let mut insp = Inspector::new(InspectorConfig::default());
    open_hierarchy(&mut insp, &doc);

    let tree = insp.hierarchy().expect("hierarchy open");
    let labels: Vec<String> = tree.visible_rows().iter().map(|r| r.label.text()).collect();
    assert_eq!(labels, vec!["OrderPmo", "quantity : OrderPmo", "Spacer"]);

    let spacer = tree.row(&NodePath::from(vec![1])).unwrap();
    assert!(!spacer.is_navigable());
    assert_eq!(spacer.marker, LeafMarker::System);
    assert!(!spacer.history_action);

    let qty = tree.row(&NodePath::from(vec![0])).unwrap();
    assert_eq!(qty.marker, LeafMarker::Property);
    assert!(qty.history_action);
}

#[test]
fn hierarchy_label_click_opens_editor() {
    let (doc, _) = page();
    let mut insp = Inspector::new(InspectorConfig::default());
    open_hierarchy(&mut insp, &doc);

    insp.handle(
        &doc,
        InspectorEvent::Hierarchy(HierarchyEvent::LabelClicked(NodePath::from(vec![0]))),
    );
    let effects = insp.drain_effects();
    let [Effect::OpenEditor(req)] = effects.as_slice() else {
        panic!("expected one editor request, got {effects:?}");
    };
    assert_eq!(
        req.url,
        "http://localhost:63342/api/file/src/main/java/shop/OrderPmo.java?line=40"
    );

    // Non-navigable rows do nothing.
    insp.handle(
        &doc,
        InspectorEvent::Hierarchy(HierarchyEvent::LabelClicked(NodePath::from(vec![1]))),
    );
    assert!(insp.drain_effects().is_empty());
}

#[test]
fn hierarchy_collapse_hides_children() {
    let (doc, _) = page();
    let mut insp = Inspector::new(InspectorConfig::default());
    open_hierarchy(&mut insp, &doc);

    insp.handle(
        &doc,
        InspectorEvent::Hierarchy(HierarchyEvent::ToggleExpanded(NodePath::root())),
    );
    assert_eq!(insp.hierarchy().unwrap().visible_rows().len(), 1);
}

#[test]
fn hovering_a_row_highlights_and_scrolls_to_the_wrapper() {
    let (doc, field) = page();
    let mut insp = Inspector::new(InspectorConfig::default());
    open_hierarchy(&mut insp, &doc);

    insp.handle(
        &doc,
        InspectorEvent::Hierarchy(HierarchyEvent::RowEnter(NodePath::from(vec![0]))),
    );
    let hover = insp.scene().hover.clone();
    assert_eq!(hover.rect, Some(ViewportRect::new(0.0, 0.0, 300.0, 40.0)));
    let effects = insp.drain_effects();
    let [Effect::ScrollIntoView(target)] = effects.as_slice() else {
        panic!("expected a scroll request, got {effects:?}");
    };
    assert_ne!(*target, field);

    insp.handle(&doc, InspectorEvent::Hierarchy(HierarchyEvent::RowLeave));
    assert!(!insp.scene().hover.is_visible());
}

#[test]
fn hover_box_follows_the_page_after_scrolling() {
    let (mut doc, field) = page();
    let mut insp = Inspector::new(InspectorConfig::default());
    open_hierarchy(&mut insp, &doc);

    insp.handle(
        &doc,
        InspectorEvent::Hierarchy(HierarchyEvent::RowEnter(NodePath::from(vec![0]))),
    );
    insp.drain_effects();

    // The host scrolled the wrapper into view and reports the move.
    let wrapper = doc.parent(&field).expect("field sits in a wrapper");
    let scrolled = ViewportRect::new(0.0, 380.0, 300.0, 40.0);
    doc.set_rect(wrapper, scrolled);
    insp.handle(&doc, InspectorEvent::Refresh);

    assert_eq!(insp.scene().hover.rect, Some(scrolled));
    // Re-measuring must not trigger another scroll.
    assert!(insp.drain_effects().is_empty());
}

#[test]
fn history_action_fetches_and_reverses_records() {
    let (doc, _) = page();
    let mut insp = Inspector::new(InspectorConfig::default());
    open_hierarchy(&mut insp, &doc);

    insp.handle(
        &doc,
        InspectorEvent::Hierarchy(HierarchyEvent::HistoryClicked(NodePath::from(vec![0]))),
    );
    let req = single_lookup(insp.drain_effects());
    assert_eq!(req.component_id, "qty");

    let body = r#"{
        "componentId": "qty",
        "dispatcherHistory": [
            {"aspectName": "A", "result": true},
            {"aspectName": "B", "result": 3},
            {"aspectName": "C", "result": "x", "breakdown": {"shop.Base": false}}
        ]
    }"#;
    insp.complete_lookup(req.ticket, parse_location_response(body));
    let view = insp.dispatch().expect("dispatch panel open");
    let names: Vec<&str> = view.entries().iter().map(|e| e.aspect_name.as_str()).collect();
    assert_eq!(names, vec!["C", "B", "A"]);
    assert_eq!(view.entries()[0].breakdown[0].value, "false");

    // The dispatch panel survives clicks inside itself only.
    insp.handle(
        &doc,
        InspectorEvent::Click {
            position: Point::new(1.0, 1.0),
            target: ClickTarget::DispatchPanel,
        },
    );
    assert!(insp.is_dispatch_open());
    insp.handle(
        &doc,
        InspectorEvent::Click {
            position: Point::new(1.0, 1.0),
            target: ClickTarget::HierarchyPanel,
        },
    );
    assert!(!insp.is_dispatch_open());
}

#[test]
fn backend_error_fails_hierarchy_load() {
    let (doc, _) = page();
    let mut insp = Inspector::new(InspectorConfig::default());
    insp.handle(&doc, InspectorEvent::Control(ControlButton::Hierarchy));
    let req = single_lookup(insp.drain_effects());
    insp.complete_lookup(
        req.ticket,
        parse_location_response(r#"{"error": "Component not found"}"#),
    );
    assert!(!insp.is_hierarchy_open());
    assert_eq!(
        insp.drain_effects(),
        vec![Effect::Notify(HIERARCHY_FAILED_NOTICE.to_string())]
    );
}

#[test]
fn entering_inspect_closes_hierarchy() {
    let (doc, _) = page();
    let mut insp = Inspector::new(InspectorConfig::default());
    open_hierarchy(&mut insp, &doc);
    assert!(insp.is_hierarchy_open());

    insp.toggle_inspect();
    assert!(!insp.is_hierarchy_open());
    assert_eq!(insp.mode(), InteractionMode::Inspecting);
}

#[test]
fn section_menu_offers_only_open_class() {
    let (doc, _) = page();
    let mut insp = Inspector::new(InspectorConfig::default());
    insp.toggle_inspect();
    insp.handle(&doc, InspectorEvent::PointerMove(Point::new(500.0, 500.0)));
    insp.handle(
        &doc,
        InspectorEvent::Click {
            position: Point::new(500.0, 500.0),
            target: ClickTarget::Page,
        },
    );
    let req = single_lookup(insp.drain_effects());
    assert_eq!(req.component_id, "root");
    insp.complete_lookup(
        req.ticket,
        parse_location_response(r#"{"pmoClassName": "shop.OrderPmo"}"#),
    );

    let menu = insp.context_menu().expect("menu open");
    let actions: Vec<MenuAction> = menu.entries.iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![MenuAction::OpenClass]);
    assert_eq!(menu.subtitle, "Section");
    // Clamped against the default 1280x800 viewport and 340x500 footprint.
    assert_eq!(menu.position, Point::new(500.0, 300.0));
}

#[test]
fn aspect_overview_from_menu() {
    let (doc, _) = page();
    let mut insp = Inspector::new(InspectorConfig::default());
    insp.toggle_inspect();
    insp.handle(&doc, InspectorEvent::PointerMove(Point::new(120.0, 10.0)));
    insp.handle(
        &doc,
        InspectorEvent::Click {
            position: Point::new(120.0, 10.0),
            target: ClickTarget::Page,
        },
    );
    let req = single_lookup(insp.drain_effects());
    let body = r#"{
        "propertyName": "quantity",
        "pmoClassName": "shop.OrderPmo",
        "dispatcherHistory": [{"aspectName": "A"}, {"aspectName": "B"}]
    }"#;
    insp.complete_lookup(req.ticket, parse_location_response(body));
    assert!(insp.context_menu().unwrap().has_action(MenuAction::ShowDispatcherHistory));

    insp.handle(&doc, InspectorEvent::MenuEntry(MenuAction::ShowDispatcherHistory));
    assert!(!insp.is_context_menu_open());
    let names: Vec<&str> = insp
        .dispatch()
        .unwrap()
        .entries()
        .iter()
        .map(|e| e.aspect_name.as_str())
        .collect();
    assert_eq!(names, vec!["B", "A"]);
}

#[test]
fn highlight_all_on_empty_page() {
    let doc = SyntheticDocument::default();
    let mut insp = Inspector::new(InspectorConfig::default());
    insp.toggle_highlight_all(&doc);
    assert!(insp.is_highlighting());
    assert!(insp.scene().highlights.is_empty());
    assert!(insp.drain_effects().is_empty());
}
