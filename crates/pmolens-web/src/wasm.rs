#![forbid(unsafe_code)]

//! `wasm-bindgen` surface: listeners in, scene out, effects executed.

use std::cell::RefCell;
use std::rc::Rc;

use pmolens_core::InspectorConfig;
use pmolens_core::controller::{Effect, Inspector};
use pmolens_core::error::LookupError;
use pmolens_core::geometry::Point;
use pmolens_core::hierarchy::NodePath;
use pmolens_core::input::{EventDisposition, HierarchyEvent, InspectorEvent, KeyInput, Modifiers};
use pmolens_core::lookup::{LookupRequest, parse_location_response};
use pmolens_core::model::LocationData;
use pmolens_core::navigation::{NavigationOutcome, NavigationRequest};
use pmolens_core::scene::Scene;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent,
    MouseEvent, RequestInit, RequestMode, Response, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition, WheelEvent, Window,
};

use crate::console_log;
use crate::dom::BrowserDocument;
use crate::markup::{self, ATTR_ACTION, ATTR_INDEX, ATTR_PANEL, ATTR_PATH, ClassToggle, Layer};

const ROOT_ID: &str = "pmolens-root";

/// Engine, document adapter and painted layers, shared with every listener.
struct Host {
    inspector: Inspector<Element>,
    doc: BrowserDocument,
    body: Option<HtmlElement>,
    layers: Vec<PaintedLayer>,
    /// Path of the hierarchy row under the pointer.
    hovered_row: Option<String>,
}

type Shared = Rc<RefCell<Host>>;

/// A layer container plus what it currently shows.
struct PaintedLayer {
    layer: Layer,
    element: Element,
    html: String,
    toggles: Vec<ClassToggle>,
}

impl PaintedLayer {
    fn new(layer: Layer, element: Element) -> Self {
        Self {
            layer,
            element,
            html: String::new(),
            toggles: Vec::new(),
        }
    }

    /// Replace the fragment only when it changed, then apply the class
    /// toggles that differ from what is on screen.
    fn paint(&mut self, scene: &Scene<'_>) {
        let html = self.layer.render(scene);
        let replaced = html != self.html;
        if replaced {
            self.element.set_inner_html(&html);
            self.html = html;
        }
        let toggles = self.layer.toggles(scene);
        for (i, toggle) in toggles.iter().enumerate() {
            if replaced || self.toggles.get(i) != Some(toggle) {
                self.apply(toggle);
            }
        }
        self.toggles = toggles;
    }

    fn apply(&self, toggle: &ClassToggle) {
        if let Ok(Some(target)) = self.element.query_selector(&toggle.selector) {
            let _ = target
                .class_list()
                .toggle_with_force(toggle.class, toggle.on);
        }
    }
}

impl Host {
    fn paint(&mut self) {
        let Self {
            inspector,
            body,
            layers,
            ..
        } = self;
        let scene = inspector.scene();
        for layer in layers.iter_mut() {
            layer.paint(&scene);
        }
        if let Some(body) = body {
            let _ = body.style().set_property("cursor", scene.cursor.as_css());
        }
    }
}

/// Feed `event`, repaint and run whatever the engine asked for.
fn dispatch(shared: &Shared, event: InspectorEvent) -> EventDisposition {
    let disposition = {
        let mut host = shared.borrow_mut();
        let host = &mut *host;
        host.inspector.handle(&host.doc, event)
    };
    flush(shared);
    disposition
}

fn flush(shared: &Shared) {
    let effects = {
        let mut host = shared.borrow_mut();
        host.paint();
        host.inspector.drain_effects()
    };
    for effect in effects {
        run_effect(shared, effect);
    }
}

fn run_effect(shared: &Shared, effect: Effect<Element>) {
    match effect {
        Effect::Lookup(LookupRequest { ticket, url, .. }) => {
            let shared = Rc::clone(shared);
            spawn_local(async move {
                let result = fetch_location(&url).await;
                shared.borrow_mut().inspector.complete_lookup(ticket, result);
                flush(&shared);
            });
        }
        Effect::OpenEditor(request) => {
            let shared = Rc::clone(shared);
            spawn_local(async move {
                let outcome = open_in_editor(&request).await;
                shared.borrow_mut().inspector.navigation_finished(outcome);
                flush(&shared);
            });
        }
        Effect::Notify(message) => {
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(&message);
            }
        }
        Effect::ScrollIntoView(element) => {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Center);
            options.set_inline(ScrollLogicalPosition::Nearest);
            element.scroll_into_view_with_scroll_into_view_options(&options);
        }
    }
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// GET the location endpoint. The body is parsed whatever the status; the
/// backend reports failures through its `error` field.
async fn fetch_location(url: &str) -> Result<LocationData, LookupError> {
    let network = |err: JsValue| LookupError::Network(describe(&err));
    let window = web_sys::window().ok_or_else(|| LookupError::Network("no window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(network)?
        .dyn_into()
        .map_err(network)?;
    let text = JsFuture::from(response.text().map_err(network)?)
        .await
        .map_err(network)?;
    let body = text
        .as_string()
        .ok_or_else(|| LookupError::InvalidBody("response body is not text".into()))?;
    parse_location_response(&body)
}

/// Fire an opaque request at the IDE endpoint; only transport failures count.
async fn open_in_editor(request: &NavigationRequest) -> NavigationOutcome {
    let Some(window) = web_sys::window() else {
        return NavigationOutcome::Failed("no window".into());
    };
    let init = RequestInit::new();
    init.set_method("GET");
    init.set_mode(RequestMode::NoCors);
    match JsFuture::from(window.fetch_with_str_and_init(&request.url, &init)).await {
        Ok(_) => NavigationOutcome::Opened,
        Err(err) => NavigationOutcome::Failed(describe(&err)),
    }
}

fn apply(event: &Event, disposition: EventDisposition) {
    if disposition.prevent_default {
        event.prevent_default();
    }
    if disposition.stop_propagation {
        event.stop_propagation();
    }
}

fn modifiers(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Modifiers {
    let mut mods = Modifiers::empty();
    mods.set(Modifiers::CTRL, ctrl);
    mods.set(Modifiers::SHIFT, shift);
    mods.set(Modifiers::ALT, alt);
    mods.set(Modifiers::SUPER, meta);
    mods
}

fn pointer(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

/// Nearest ancestor-or-self of the event target matching `selector`.
fn closest(event: &Event, selector: &str) -> Option<Element> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .closest(selector)
        .ok()
        .flatten()
}

fn closest_attribute(event: &Event, name: &str) -> Option<String> {
    closest(event, &format!("[{name}]")).and_then(|el| el.get_attribute(name))
}

/// A registered DOM listener; dropping it unregisters.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    capture: bool,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        capture: bool,
        passive: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_capture(capture);
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            kind,
            capture,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback_and_bool(
            self.kind,
            self.callback.as_ref().unchecked_ref(),
            self.capture,
        );
    }
}

fn listen(
    shared: &Shared,
    window: &Window,
    document: &Document,
    root: &Element,
) -> Result<Vec<Listener>, JsValue> {
    let mut listeners = Vec::new();

    let s = Rc::clone(shared);
    listeners.push(Listener::attach(document, "keydown", true, false, move |event| {
        if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
            let mods = modifiers(key.ctrl_key(), key.shift_key(), key.alt_key(), key.meta_key());
            let disposition = dispatch(&s, InspectorEvent::Key(KeyInput::new(key.key(), mods)));
            apply(&event, disposition);
        }
    })?);

    let s = Rc::clone(shared);
    listeners.push(Listener::attach(document, "mousemove", true, true, move |event| {
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            dispatch(&s, InspectorEvent::PointerMove(pointer(mouse)));
        }
    })?);

    // Non-passive so cycling can suppress page scrolling.
    let s = Rc::clone(shared);
    listeners.push(Listener::attach(document, "wheel", true, false, move |event| {
        if let Some(wheel) = event.dyn_ref::<WheelEvent>() {
            let disposition = dispatch(&s, InspectorEvent::Wheel {
                delta_y: wheel.delta_y(),
            });
            apply(&event, disposition);
        }
    })?);

    let s = Rc::clone(shared);
    listeners.push(Listener::attach(document, "click", true, false, move |event| {
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            let panel = closest_attribute(&event, ATTR_PANEL);
            let disposition = dispatch(&s, InspectorEvent::Click {
                position: pointer(mouse),
                target: markup::click_target(panel.as_deref()),
            });
            apply(&event, disposition);
        }
    })?);

    // Delegated actions inside the inspector's own panels.
    let s = Rc::clone(shared);
    listeners.push(Listener::attach(root, "click", false, false, move |event| {
        let Some(action) = closest_attribute(&event, ATTR_ACTION) else {
            return;
        };
        let path = closest_attribute(&event, ATTR_PATH);
        let index = closest_attribute(&event, ATTR_INDEX);
        match markup::decode_action(&action, path.as_deref(), index.as_deref()) {
            Some(decoded) => apply(&event, dispatch(&s, decoded)),
            None => tracing::debug!(%action, "unknown panel action"),
        }
    })?);

    // Document-wide so leaving the panel also ends the row hover.
    let s = Rc::clone(shared);
    listeners.push(Listener::attach(document, "mouseover", true, true, move |event| {
        let row = closest_attribute(&event, ATTR_PATH);
        let changed = {
            let mut host = s.borrow_mut();
            if host.hovered_row == row {
                false
            } else {
                host.hovered_row = row.clone();
                true
            }
        };
        if !changed {
            return;
        }
        let hierarchy_event = match row.as_deref().and_then(NodePath::parse) {
            Some(path) => HierarchyEvent::RowEnter(path),
            None => HierarchyEvent::RowLeave,
        };
        dispatch(&s, InspectorEvent::Hierarchy(hierarchy_event));
    })?);

    for kind in ["scroll", "resize"] {
        let s = Rc::clone(shared);
        listeners.push(Listener::attach(window, kind, true, true, move |_| {
            dispatch(&s, InspectorEvent::Refresh);
        })?);
    }

    Ok(listeners)
}

/// Browser entry point of the inspector.
///
/// Construction injects the inspector UI into the page and starts listening;
/// `destroy` removes both again.
#[wasm_bindgen]
pub struct PmoLensWeb {
    shared: Shared,
    listeners: Vec<Listener>,
    root: Element,
}

#[wasm_bindgen]
impl PmoLensWeb {
    /// `config` is the JSON form of the inspector configuration; `log_level`
    /// is a tracing level name (default `info`).
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>, log_level: Option<String>) -> Result<PmoLensWeb, JsValue> {
        console_log::init(console_log::parse_level(log_level.as_deref()));

        let config = InspectorConfig::from_json(config.as_deref().unwrap_or_default())
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let body = document.body();

        // A page reload during development may leave a stale root behind.
        if let Some(stale) = document.get_element_by_id(ROOT_ID) {
            stale.remove();
        }
        let root = document.create_element("div")?;
        root.set_id(ROOT_ID);
        let style = document.create_element("style")?;
        style.set_text_content(Some(markup::STYLESHEET));
        root.append_child(&style)?;

        let mut layers = Vec::with_capacity(Layer::ALL.len());
        for layer in Layer::ALL {
            let element = document.create_element("div")?;
            element.set_id(layer.id());
            root.append_child(&element)?;
            layers.push(PaintedLayer::new(layer, element));
        }
        match &body {
            Some(body) => body.append_child(&root)?,
            None => document
                .document_element()
                .ok_or_else(|| JsValue::from_str("empty document"))?
                .append_child(&root)?,
        };

        let host = Host {
            inspector: Inspector::new(config),
            doc: BrowserDocument::new(window.clone(), document.clone(), root.clone()),
            body,
            layers,
            hovered_row: None,
        };
        let shared = Rc::new(RefCell::new(host));
        let listeners = listen(&shared, &window, &document, &root)?;
        flush(&shared);
        tracing::info!("inspector ready");

        Ok(Self {
            shared,
            listeners,
            root,
        })
    }

    #[wasm_bindgen(js_name = toggleInspect)]
    pub fn toggle_inspect(&self) {
        self.shared.borrow_mut().inspector.toggle_inspect();
        flush(&self.shared);
    }

    #[wasm_bindgen(js_name = toggleHighlightAll)]
    pub fn toggle_highlight_all(&self) {
        {
            let mut host = self.shared.borrow_mut();
            let host = &mut *host;
            host.inspector.toggle_highlight_all(&host.doc);
        }
        flush(&self.shared);
    }

    #[wasm_bindgen(js_name = toggleHierarchy)]
    pub fn toggle_hierarchy(&self) {
        {
            let mut host = self.shared.borrow_mut();
            let host = &mut *host;
            host.inspector.toggle_hierarchy(&host.doc);
        }
        flush(&self.shared);
    }

    #[wasm_bindgen(js_name = resetAll)]
    pub fn reset_all(&self) {
        self.shared.borrow_mut().inspector.reset_all();
        flush(&self.shared);
    }

    /// Current scene as JSON, for debugging and browser tests.
    #[wasm_bindgen(js_name = sceneJson)]
    pub fn scene_json(&self) -> Result<String, JsValue> {
        let host = self.shared.borrow();
        serde_json::to_string(&host.inspector.scene())
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Diagnostic log as JSONL; empty unless enabled in the configuration.
    #[wasm_bindgen(js_name = diagnosticsJsonl)]
    pub fn diagnostics_jsonl(&self) -> String {
        self.shared
            .borrow()
            .inspector
            .diagnostics()
            .map(|log| log.to_jsonl())
            .unwrap_or_default()
    }

    /// Unregister listeners and remove the injected UI.
    pub fn destroy(&mut self) {
        self.listeners.clear();
        self.shared.borrow_mut().inspector.reset_all();
        if let Some(body) = &self.shared.borrow().body {
            let _ = body.style().remove_property("cursor");
        }
        self.root.remove();
    }
}
