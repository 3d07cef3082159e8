#![forbid(unsafe_code)]

//! HTML for every inspector layer, plus decoding of delegated clicks.
//!
//! Painting is string-based: each [`Layer`] renders to one HTML fragment and
//! the host only touches the DOM when a fragment changed. Expand/collapse
//! state is not part of the fragment; it comes separately as
//! [`ClassToggle`]s so flipping a node never replaces the panel's content.
//! Interactive elements carry `data-pmolens-*` attributes instead of
//! handlers; a single delegated listener turns them back into
//! [`InspectorEvent`]s.

use std::fmt::Write as _;

use pmolens_core::geometry::{Point, ViewportRect};
use pmolens_core::hierarchy::{HierarchyRow, HierarchyTree, NodePath};
use pmolens_core::highlight::{HighlightItem, HighlightSet, HoverHighlight};
use pmolens_core::history::DispatchHistoryView;
use pmolens_core::input::{ClickTarget, ControlButton, HierarchyEvent, InspectorEvent};
use pmolens_core::menu::{ContextMenu, MenuAction};
use pmolens_core::overlay::OverlayState;
use pmolens_core::scene::{ControlsState, Scene};

/// Marks the outermost element of a floating panel.
pub const ATTR_PANEL: &str = "data-pmolens-panel";
/// Delegated action name, see [`decode_action`].
pub const ATTR_ACTION: &str = "data-pmolens-action";
/// Node path of a hierarchy row.
pub const ATTR_PATH: &str = "data-pmolens-path";
/// Index of a dispatch record.
pub const ATTR_INDEX: &str = "data-pmolens-index";
/// Node path on a hierarchy node's container (row plus children).
pub const ATTR_NODE: &str = "data-pmolens-node";
/// Index on a dispatch record's container (summary plus breakdown).
pub const ATTR_RECORD: &str = "data-pmolens-record";

/// Class marking a hierarchy node whose children are hidden.
pub const CLASS_COLLAPSED: &str = "pmolens-collapsed";
/// Class marking a dispatch record whose breakdown is shown.
pub const CLASS_OPEN: &str = "open";

/// Set (`on`) or clear one class on the element matching `selector`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassToggle {
    pub selector: String,
    pub class: &'static str,
    pub on: bool,
}

/// Independently repainted parts of the inspector UI, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Highlights,
    Hover,
    Overlay,
    Hierarchy,
    Dispatch,
    Menu,
    Controls,
}

impl Layer {
    pub const ALL: [Layer; 7] = [
        Layer::Highlights,
        Layer::Hover,
        Layer::Overlay,
        Layer::Hierarchy,
        Layer::Dispatch,
        Layer::Menu,
        Layer::Controls,
    ];

    /// DOM id of the layer's container.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Highlights => "pmolens-highlights",
            Self::Hover => "pmolens-hover",
            Self::Overlay => "pmolens-overlay",
            Self::Hierarchy => "pmolens-hierarchy",
            Self::Dispatch => "pmolens-dispatch",
            Self::Menu => "pmolens-menu",
            Self::Controls => "pmolens-controls",
        }
    }

    /// Render this layer's fragment for `scene`. Empty means nothing to show.
    pub fn render(self, scene: &Scene<'_>) -> String {
        match self {
            Self::Highlights => highlights_html(scene.highlights),
            Self::Hover => hover_html(scene.hover),
            Self::Overlay => overlay_html(scene.overlay),
            Self::Hierarchy => scene.hierarchy.map(hierarchy_html).unwrap_or_default(),
            Self::Dispatch => scene.dispatch.map(dispatch_html).unwrap_or_default(),
            Self::Menu => scene.context_menu.map(menu_html).unwrap_or_default(),
            Self::Controls => controls_html(scene.controls),
        }
    }

    /// Expansion state to apply on top of [`Layer::render`]'s fragment.
    pub fn toggles(self, scene: &Scene<'_>) -> Vec<ClassToggle> {
        let mut toggles = Vec::new();
        match self {
            Self::Hierarchy => {
                if let Some(tree) = scene.hierarchy {
                    row_toggles(tree.root(), &mut toggles);
                }
            }
            Self::Dispatch => {
                if let Some(view) = scene.dispatch {
                    toggles.extend(view.entries().iter().enumerate().map(|(index, entry)| {
                        ClassToggle {
                            selector: format!(r#"[{ATTR_RECORD}="{index}"]"#),
                            class: CLASS_OPEN,
                            on: entry.expanded,
                        }
                    }));
                }
            }
            _ => {}
        }
        toggles
    }
}

fn row_toggles(row: &HierarchyRow, toggles: &mut Vec<ClassToggle>) {
    if !row.has_children() {
        return;
    }
    toggles.push(ClassToggle {
        selector: format!(r#"[{ATTR_NODE}="{}"]"#, row.path),
        class: CLASS_COLLAPSED,
        on: !row.expanded,
    });
    for child in &row.children {
        row_toggles(child, toggles);
    }
}

/// Escape text for element content and double-quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn rect_style(rect: ViewportRect) -> String {
    format!(
        "left:{}px;top:{}px;width:{}px;height:{}px;",
        rect.left, rect.top, rect.width, rect.height
    )
}

fn point_style(point: Point) -> String {
    format!("left:{}px;top:{}px;", point.x, point.y)
}

// --- Annotation layers ---------------------------------------------------

fn overlay_html(overlay: &OverlayState) -> String {
    let mut html = String::new();
    if let Some(rect) = overlay.target {
        let _ = write!(
            html,
            r#"<div class="pmolens-box pmolens-target" style="{}"></div>"#,
            rect_style(rect)
        );
    }
    if let Some(tooltip) = &overlay.tooltip {
        let _ = write!(
            html,
            r#"<div class="pmolens-tooltip" style="{}">"#,
            point_style(tooltip.position)
        );
        if let Some(hint) = tooltip.cycle_hint {
            let _ = write!(html, r#"<div class="pmolens-cycle">{}</div>"#, escape(&hint.text()));
        }
        html.push_str(r#"<div class="pmolens-hint">Click for options</div>"#);
        let property = tooltip
            .property_name
            .as_deref()
            .map(|p| format!(".{}", escape(p)))
            .unwrap_or_default();
        let _ = write!(
            html,
            r#"<div class="pmolens-title"><strong>{}</strong>{property}</div>"#,
            escape(&tooltip.class_name)
        );
        let _ = write!(
            html,
            r#"<div class="pmolens-footer">{}</div></div>"#,
            escape(&tooltip.footer)
        );
    }
    html
}

fn highlights_html(highlights: &HighlightSet) -> String {
    let mut html = String::new();
    for item in highlights.items() {
        match item {
            HighlightItem::Box { rect, category } => {
                let _ = write!(
                    html,
                    r#"<div class="pmolens-box" style="{}border-color:{};background:{};"></div>"#,
                    rect_style(*rect),
                    category.border_color(),
                    category.fill_color()
                );
            }
            HighlightItem::Label {
                position,
                text,
                category,
            } => {
                let _ = write!(
                    html,
                    r#"<div class="pmolens-label" style="{}background:{};">{}</div>"#,
                    point_style(*position),
                    category.label_background(),
                    escape(text)
                );
            }
        }
    }
    html
}

fn hover_html(hover: &HoverHighlight) -> String {
    hover
        .rect
        .map(|rect| {
            format!(
                r#"<div class="pmolens-box pmolens-hover-box" style="{}border-color:{};"></div>"#,
                rect_style(rect),
                HoverHighlight::COLOR
            )
        })
        .unwrap_or_default()
}

// --- Panels --------------------------------------------------------------

fn menu_html(menu: &ContextMenu) -> String {
    let mut html = format!(
        r#"<div class="pmolens-menu" {ATTR_PANEL}="menu" style="{}">"#,
        point_style(menu.position)
    );
    let _ = write!(
        html,
        r#"<div class="pmolens-menu-head"><div class="pmolens-menu-title">{}</div><div class="pmolens-menu-sub">{}</div></div>"#,
        escape(menu.title.as_deref().unwrap_or("Unknown")),
        escape(&menu.subtitle)
    );
    html.push_str(r#"<div class="pmolens-menu-items">"#);
    for entry in &menu.entries {
        let _ = write!(
            html,
            r#"<div class="pmolens-menu-item" {ATTR_ACTION}="menu:{}"><div class="pmolens-item-title">{}</div><div class="pmolens-item-sub">{}</div></div>"#,
            entry.action.as_str(),
            escape(&entry.title),
            escape(&entry.subtitle)
        );
    }
    html.push_str("</div></div>");
    html
}

fn hierarchy_html(tree: &HierarchyTree) -> String {
    let mut html = format!(
        r#"<div class="pmolens-panel pmolens-tree" {ATTR_PANEL}="hierarchy"><div class="pmolens-panel-head"><span>PMO Hierarchy</span><button {ATTR_ACTION}="tree:close">Close</button></div><div class="pmolens-scroll">"#
    );
    row_html(tree.root(), &mut html);
    html.push_str("</div></div>");
    html
}

fn row_html(row: &HierarchyRow, html: &mut String) {
    let _ = write!(
        html,
        r#"<div class="pmolens-node" {ATTR_NODE}="{path}"><div class="pmolens-row" {ATTR_PATH}="{path}">"#,
        path = row.path
    );
    if row.has_children() {
        let _ = write!(
            html,
            r#"<div class="pmolens-expander" {ATTR_ACTION}="tree:toggle">&#9656;</div>"#
        );
    } else {
        html.push_str(r#"<div class="pmolens-expander empty"></div>"#);
    }

    let (class, action) = if row.is_navigable() {
        ("navigable", format!(r#" {ATTR_ACTION}="tree:label""#))
    } else {
        ("system", String::new())
    };
    let _ = write!(
        html,
        r#"<div class="pmolens-content {class}"{action} title="{}">"#,
        escape(&row.label.class_name)
    );
    if let Some(color) = row.marker.color() {
        let _ = write!(html, r#"<span class="pmolens-dot" style="color:{color};">&#9679;</span>"#);
    }
    match &row.label.property_name {
        Some(property) => {
            let _ = write!(
                html,
                r#"<span class="pmolens-prop">{}</span><span class="pmolens-sep">:</span><span class="pmolens-class">{}</span>"#,
                escape(property),
                escape(&row.label.class_name)
            );
        }
        None => {
            let _ = write!(
                html,
                r#"<span class="pmolens-class">{}</span>"#,
                escape(&row.label.class_name)
            );
        }
    }
    if row.instantiation.is_some() {
        let _ = write!(
            html,
            r#"<span class="pmolens-action" title="Jump to Instantiation" {ATTR_ACTION}="tree:instantiation">&#9889;</span>"#
        );
    }
    if row.history_action {
        let _ = write!(
            html,
            r#"<span class="pmolens-action" title="Show Aspect Overview" {ATTR_ACTION}="tree:history">&#8767;</span>"#
        );
    }
    html.push_str("</div></div>");

    // Children are always emitted; collapsing only hides them.
    if row.has_children() {
        html.push_str(r#"<div class="pmolens-children">"#);
        for child in &row.children {
            row_html(child, html);
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");
}

fn dispatch_html(view: &DispatchHistoryView) -> String {
    let mut html = format!(
        r#"<div class="pmolens-panel pmolens-dispatch" {ATTR_PANEL}="dispatch"><div class="pmolens-panel-head"><span>{}</span><button {ATTR_ACTION}="dispatch:close">&times;</button></div><div class="pmolens-scroll">"#,
        DispatchHistoryView::TITLE
    );
    if view.is_placeholder() {
        let _ = write!(
            html,
            r#"<div class="pmolens-empty">{}</div>"#,
            DispatchHistoryView::PLACEHOLDER
        );
    }
    for (index, entry) in view.entries().iter().enumerate() {
        let _ = write!(
            html,
            r#"<div class="pmolens-record" {ATTR_RECORD}="{index}"><div class="pmolens-summary" {ATTR_ACTION}="dispatch:toggle" {ATTR_INDEX}="{index}"><span class="pmolens-aspect">{}</span><span class="pmolens-result">{}</span></div>"#,
            escape(&entry.aspect_name),
            escape(&entry.result)
        );
        html.push_str(r#"<div class="pmolens-chain">"#);
        for row in &entry.breakdown {
            let _ = write!(
                html,
                r#"<div class="pmolens-chain-item"><span class="pmolens-chain-class">{}</span><span class="pmolens-chain-value">{}</span></div>"#,
                escape(&row.source_class),
                escape(&row.value)
            );
        }
        html.push_str("</div></div>");
    }
    html.push_str("</div></div>");
    html
}

fn controls_html(controls: ControlsState) -> String {
    let button = |action: &str, title: &str, glyph: &str, active: bool| {
        let state = if active { " active" } else { "" };
        format!(
            r#"<div class="pmolens-btn sub{state}" title="{title}" {ATTR_ACTION}="control:{action}">{glyph}</div>"#
        )
    };
    let expanded = if controls.expanded { " expanded" } else { "" };
    format!(
        r#"<div class="pmolens-cluster{expanded}" {ATTR_PANEL}="controls">{}{}{}<div class="pmolens-btn main" title="Inspector Menu" {ATTR_ACTION}="control:main">+</div></div>"#,
        button("inspect", "Toggle Inspector", "&#8853;", controls.inspect_active),
        button("highlight", "Toggle Highlight", "&#9635;", controls.highlight_active),
        button("hierarchy", "Show Full Hierarchy", "&#9776;", controls.hierarchy_active),
    )
}

// --- Decoding ------------------------------------------------------------

/// Which panel a click landed in, from the nearest [`ATTR_PANEL`] value.
pub fn click_target(panel: Option<&str>) -> ClickTarget {
    match panel {
        Some("menu") => ClickTarget::ContextMenu,
        Some("hierarchy") => ClickTarget::HierarchyPanel,
        Some("dispatch") => ClickTarget::DispatchPanel,
        Some("controls") => ClickTarget::Controls,
        _ => ClickTarget::Page,
    }
}

/// Turn a delegated action back into an event. `path` and `index` are the
/// nearest [`ATTR_PATH`] and [`ATTR_INDEX`] values.
pub fn decode_action(
    action: &str,
    path: Option<&str>,
    index: Option<&str>,
) -> Option<InspectorEvent> {
    let (group, name) = action.split_once(':')?;
    let path = || path.and_then(NodePath::parse);
    let event = match group {
        "menu" => InspectorEvent::MenuEntry(MenuAction::parse(name)?),
        "control" => InspectorEvent::Control(match name {
            "main" => ControlButton::Main,
            "inspect" => ControlButton::Inspect,
            "highlight" => ControlButton::HighlightAll,
            "hierarchy" => ControlButton::Hierarchy,
            _ => return None,
        }),
        "tree" => InspectorEvent::Hierarchy(match name {
            "toggle" => HierarchyEvent::ToggleExpanded(path()?),
            "label" => HierarchyEvent::LabelClicked(path()?),
            "instantiation" => HierarchyEvent::InstantiationClicked(path()?),
            "history" => HierarchyEvent::HistoryClicked(path()?),
            "close" => HierarchyEvent::Close,
            _ => return None,
        }),
        "dispatch" => match name {
            "toggle" => InspectorEvent::ToggleDispatchEntry(index?.parse().ok()?),
            "close" => InspectorEvent::CloseDispatchPanel,
            _ => return None,
        },
        _ => return None,
    };
    Some(event)
}

/// Stylesheet injected once into the page.
pub const STYLESHEET: &str = r#"
#pmolens-root { position: fixed; inset: 0; pointer-events: none; z-index: 2147483000; font-family: system-ui, sans-serif; }
#pmolens-root .pmolens-box { position: fixed; box-sizing: border-box; border: 2px solid #2196F3; background: rgba(33, 150, 243, 0.1); pointer-events: none; }
#pmolens-root .pmolens-hover-box { border-width: 3px; background: rgba(255, 152, 0, 0.12); }
#pmolens-root .pmolens-label { position: fixed; color: #fff; font-size: 11px; padding: 2px 6px; border-radius: 3px; white-space: nowrap; pointer-events: none; }
#pmolens-root .pmolens-tooltip { position: fixed; background: rgba(33, 33, 33, 0.92); color: #fff; padding: 8px 10px; border-radius: 4px; font-size: 12px; pointer-events: none; }
#pmolens-root .pmolens-cycle { margin-bottom: 4px; font-size: 10px; color: #FF9800; }
#pmolens-root .pmolens-hint { margin-bottom: 4px; opacity: 0.9; font-size: 11px; }
#pmolens-root .pmolens-footer { margin-top: 4px; opacity: 0.8; font-size: 10px; }
#pmolens-root .pmolens-menu { position: fixed; width: 320px; background: #fff; border-radius: 6px; box-shadow: 0 6px 24px rgba(0, 0, 0, 0.25); pointer-events: auto; }
#pmolens-root .pmolens-menu-head { padding: 16px; border-bottom: 1px solid #e0e0e0; }
#pmolens-root .pmolens-menu-title { font-weight: 600; font-size: 14px; color: #1976D2; margin-bottom: 4px; }
#pmolens-root .pmolens-menu-sub, #pmolens-root .pmolens-item-sub { font-size: 11px; color: #757575; }
#pmolens-root .pmolens-menu-items { padding: 8px 0; }
#pmolens-root .pmolens-menu-item { padding: 8px 16px; cursor: pointer; }
#pmolens-root .pmolens-menu-item:hover { background: #f5f5f5; }
#pmolens-root .pmolens-item-title { font-weight: 500; font-size: 13px; color: #212121; }
#pmolens-root .pmolens-panel { position: fixed; display: flex; flex-direction: column; background: #fff; box-shadow: 0 6px 24px rgba(0, 0, 0, 0.25); border-radius: 6px; pointer-events: auto; max-height: 70vh; }
#pmolens-root .pmolens-tree { left: 16px; top: 16px; width: 420px; }
#pmolens-root .pmolens-dispatch { right: 16px; top: 16px; width: 380px; }
#pmolens-root .pmolens-panel-head { display: flex; justify-content: space-between; align-items: center; padding: 10px 14px; border-bottom: 1px solid #e0e0e0; font-weight: 600; }
#pmolens-root .pmolens-scroll { overflow: auto; padding: 8px; }
#pmolens-root .pmolens-row { display: flex; align-items: center; padding: 2px 0; }
#pmolens-root .pmolens-row:hover { background: #FFF3E0; }
#pmolens-root .pmolens-expander { width: 14px; cursor: pointer; color: #546E7A; }
#pmolens-root .pmolens-expander { transform: rotate(90deg); }
#pmolens-root .pmolens-collapsed > .pmolens-row .pmolens-expander { transform: none; }
#pmolens-root .pmolens-children { padding-left: 16px; }
#pmolens-root .pmolens-collapsed > .pmolens-children { display: none; }
#pmolens-root .pmolens-content { display: flex; align-items: center; white-space: nowrap; gap: 4px; }
#pmolens-root .pmolens-content.navigable { cursor: pointer; }
#pmolens-root .pmolens-content.navigable .pmolens-class { color: #1565C0; }
#pmolens-root .pmolens-content.system .pmolens-class { color: #757575; }
#pmolens-root .pmolens-prop { font-weight: 600; font-family: monospace; color: #212121; }
#pmolens-root .pmolens-sep { color: #999; }
#pmolens-root .pmolens-action { cursor: pointer; margin-left: 6px; color: #546E7A; }
#pmolens-root .pmolens-record { border-bottom: 1px solid #eee; }
#pmolens-root .pmolens-summary { display: flex; justify-content: space-between; padding: 6px 4px; cursor: pointer; }
#pmolens-root .pmolens-aspect { font-weight: 600; }
#pmolens-root .pmolens-result { font-family: monospace; }
#pmolens-root .pmolens-chain { display: none; padding: 4px 12px 8px; }
#pmolens-root .pmolens-record.open .pmolens-chain { display: block; }
#pmolens-root .pmolens-chain-item { display: flex; justify-content: space-between; font-size: 12px; }
#pmolens-root .pmolens-chain-class { color: #546E7A; }
#pmolens-root .pmolens-empty { padding: 12px; color: #757575; }
#pmolens-root .pmolens-cluster { position: fixed; right: 24px; bottom: 24px; display: flex; flex-direction: column; align-items: center; gap: 10px; pointer-events: auto; }
#pmolens-root .pmolens-btn { width: 40px; height: 40px; border-radius: 50%; display: flex; align-items: center; justify-content: center; color: #fff; cursor: pointer; background: linear-gradient(135deg, #757575 0%, #616161 100%); }
#pmolens-root .pmolens-btn.main { width: 52px; height: 52px; font-size: 26px; background: linear-gradient(135deg, #2196F3 0%, #1976D2 100%); transition: transform 0.2s; }
#pmolens-root .pmolens-cluster.expanded .pmolens-btn.main { transform: rotate(45deg); }
#pmolens-root .pmolens-btn.sub { display: none; }
#pmolens-root .pmolens-cluster.expanded .pmolens-btn.sub { display: flex; }
#pmolens-root .pmolens-btn.active { background: linear-gradient(135deg, #009688 0%, #00796B 100%); }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use pmolens_core::config::MenuFootprint;
    use pmolens_core::geometry::ViewportSize;
    use pmolens_core::model::{DispatchRecord, HierarchyNode, LocationData, SourceLocation};
    use pmolens_core::scene::Cursor;
    use pretty_assertions::assert_eq;

    fn panel_toggles(
        layer: Layer,
        hierarchy: Option<&HierarchyTree>,
        dispatch: Option<&DispatchHistoryView>,
    ) -> Vec<ClassToggle> {
        let overlay = OverlayState::default();
        let highlights = HighlightSet::default();
        let hover = HoverHighlight::default();
        let scene = Scene {
            overlay: &overlay,
            highlights: &highlights,
            hover: &hover,
            context_menu: None,
            hierarchy,
            dispatch,
            controls: ControlsState::default(),
            cursor: Cursor::Default,
        };
        layer.toggles(&scene)
    }

    #[test]
    fn escape_handles_markup() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn menu_items_carry_actions() {
        let data = LocationData {
            pmo_class_name: Some("shop.OrderPmo".into()),
            property_name: Some("amount".into()),
            ..LocationData::default()
        };
        let menu = ContextMenu::build(
            data,
            Point::new(10.0, 20.0),
            ViewportSize::new(1280.0, 800.0),
            MenuFootprint::default(),
        );
        let html = menu_html(&menu);
        assert!(html.contains(r#"data-pmolens-panel="menu""#));
        assert!(html.contains(r#"data-pmolens-action="menu:open-property""#));
        assert!(html.contains(r#"data-pmolens-action="menu:open-class""#));
        assert!(!html.contains("menu:open-instantiation"));
        assert!(html.contains("left:10px;top:20px;"));
    }

    #[test]
    fn rows_render_labels_and_actions() {
        let node = HierarchyNode {
            class_name: "OrderPmo".into(),
            class_location: Some(SourceLocation::for_class("shop.OrderPmo")),
            children: vec![HierarchyNode {
                class_name: "<Evil>".into(),
                ..HierarchyNode::default()
            }],
            ..HierarchyNode::default()
        };
        let mut tree = HierarchyTree::new(&node, 1);
        let open = hierarchy_html(&tree);
        assert!(open.contains("&lt;Evil&gt;"));
        assert!(open.contains(r#"data-pmolens-path="0""#));
        assert!(open.contains(r#"pmolens-content navigable" data-pmolens-action="tree:label""#));
        assert!(open.contains(r#"pmolens-content system" title"#));
        assert!(open.contains(r#"data-pmolens-node=""><div"#));
    }

    #[test]
    fn collapsing_only_flips_a_class() {
        let node = HierarchyNode {
            class_name: "OrderPmo".into(),
            children: vec![HierarchyNode {
                class_name: "LinePmo".into(),
                children: vec![HierarchyNode {
                    class_name: "Leaf".into(),
                    ..HierarchyNode::default()
                }],
                ..HierarchyNode::default()
            }],
            ..HierarchyNode::default()
        };
        let mut tree = HierarchyTree::new(&node, 1);
        let open = hierarchy_html(&tree);
        assert_eq!(
            panel_toggles(Layer::Hierarchy, Some(&tree), None),
            vec![
                ClassToggle {
                    selector: r#"[data-pmolens-node=""]"#.into(),
                    class: CLASS_COLLAPSED,
                    on: false,
                },
                ClassToggle {
                    selector: r#"[data-pmolens-node="0"]"#.into(),
                    class: CLASS_COLLAPSED,
                    on: false,
                },
            ]
        );

        tree.toggle(&NodePath::root());
        // Same markup, subtree included; only the root's class changes.
        assert_eq!(hierarchy_html(&tree), open);
        assert!(open.contains("Leaf"));
        let toggles = panel_toggles(Layer::Hierarchy, Some(&tree), None);
        assert!(toggles[0].on);
        assert!(!toggles[1].on);
    }

    #[test]
    fn dispatch_placeholder_and_breakdown() {
        let empty = dispatch_html(&DispatchHistoryView::new(None));
        assert!(empty.contains(DispatchHistoryView::PLACEHOLDER));

        let records = vec![DispatchRecord {
            aspect_name: "enabled".into(),
            result: serde_json::json!(true),
            breakdown: serde_json::from_str(r#"{"shop.Base": false}"#).unwrap(),
            timestamp: None,
        }];
        let mut view = DispatchHistoryView::new(Some(&records));
        let closed = dispatch_html(&view);
        assert!(closed.contains(r#"data-pmolens-index="0""#));
        assert!(closed.contains("shop.Base"));
        assert!(!panel_toggles(Layer::Dispatch, None, Some(&view))[0].on);

        view.toggle(0);
        assert_eq!(dispatch_html(&view), closed);
        assert_eq!(
            panel_toggles(Layer::Dispatch, None, Some(&view)),
            vec![ClassToggle {
                selector: r#"[data-pmolens-record="0"]"#.into(),
                class: CLASS_OPEN,
                on: true,
            }]
        );
        assert!(panel_toggles(Layer::Menu, None, Some(&view)).is_empty());
    }

    #[test]
    fn controls_reflect_state() {
        let html = controls_html(ControlsState {
            expanded: true,
            inspect_active: true,
            ..ControlsState::default()
        });
        assert!(html.contains("pmolens-cluster expanded"));
        assert!(html.contains(r#"pmolens-btn sub active" title="Toggle Inspector""#));
        assert!(html.contains(r#"pmolens-btn sub" title="Toggle Highlight""#));
    }

    #[test]
    fn click_targets() {
        assert_eq!(click_target(None), ClickTarget::Page);
        assert_eq!(click_target(Some("menu")), ClickTarget::ContextMenu);
        assert_eq!(click_target(Some("dispatch")), ClickTarget::DispatchPanel);
        assert_eq!(click_target(Some("bogus")), ClickTarget::Page);
    }

    #[test]
    fn decode_actions() {
        assert_eq!(
            decode_action("menu:open-class", None, None),
            Some(InspectorEvent::MenuEntry(MenuAction::OpenClass))
        );
        assert_eq!(
            decode_action("tree:history", Some("0.2"), None),
            Some(InspectorEvent::Hierarchy(HierarchyEvent::HistoryClicked(
                NodePath::from(vec![0, 2])
            )))
        );
        assert_eq!(
            decode_action("dispatch:toggle", None, Some("3")),
            Some(InspectorEvent::ToggleDispatchEntry(3))
        );
        assert_eq!(
            decode_action("control:highlight", None, None),
            Some(InspectorEvent::Control(ControlButton::HighlightAll))
        );
        assert_eq!(
            decode_action("tree:toggle", Some(""), None),
            Some(InspectorEvent::Hierarchy(HierarchyEvent::ToggleExpanded(
                NodePath::root()
            )))
        );
        assert_eq!(decode_action("tree:label", None, None), None);
        assert_eq!(decode_action("nonsense", None, None), None);
    }
}
