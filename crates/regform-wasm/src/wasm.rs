#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the RegistrationFormRunner.
//!
//! This module wraps [`super::runner_core::RunnerCore`] with JS-friendly types,
//! reads the live page at `init`, and applies patches to it through
//! `web-sys`. Only compiled on `wasm32` targets.

use std::collections::HashMap;

use js_sys::{Array, Object, Reflect};
use regform_core::document::{InputType, PageElement, PageSnapshot, Tag};
use regform_runtime::{FormConfig, SubmitOutcome};
use regform_web::{DomPatch, Locator};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, HtmlInputElement};

use super::runner_core::RunnerCore;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn page() -> Result<(web_sys::Window, web_sys::Document), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    Ok((window, document))
}

fn observe(el: &Element) -> PageElement {
    let Some(input) = el.dyn_ref::<HtmlInputElement>() else {
        return PageElement::new(Tag::from_name(&el.tag_name()));
    };
    PageElement {
        value: input.value(),
        default_value: input.default_value(),
        checked: input.checked(),
        default_checked: input.default_checked(),
        ..PageElement::input(InputType::from_name(&input.type_()))
    }
}

/// Record what the page holds under every configured id, plus the marker
/// class of each social-login button in document order.
fn snapshot_page(doc: &web_sys::Document, config: &FormConfig) -> Result<PageSnapshot, JsValue> {
    let mut page = PageSnapshot::default();
    for dom_id in config.ids.all() {
        if let Some(el) = doc.get_element_by_id(dom_id) {
            page.elements.insert(dom_id.to_owned(), observe(&el));
        }
    }
    if config.social_markers.is_empty() {
        return Ok(page);
    }
    let selector = config
        .social_markers
        .iter()
        .map(|m| format!(".{m}"))
        .collect::<Vec<_>>()
        .join(", ");
    let found = doc.query_selector_all(&selector)?;
    for index in 0..found.length() {
        let Some(el) = found.item(index).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let classes = el.class_list();
        if let Some(marker) = config.social_markers.iter().find(|m| classes.contains(m)) {
            page.social_markers.push(marker.clone());
        }
    }
    Ok(page)
}

fn strings_to_js(items: Vec<String>) -> Array {
    let arr = Array::new();
    for item in items {
        arr.push(&JsValue::from_str(&item));
    }
    arr
}

/// Binds page elements to runner node ids and writes patches into them.
#[derive(Default)]
struct DomApplier {
    elements: HashMap<u32, Element>,
}

impl DomApplier {
    fn locate(doc: &web_sys::Document, locator: &Locator) -> Option<Element> {
        match locator {
            Locator::Body => doc.body().map(Into::into),
            Locator::Id { id } => doc.get_element_by_id(id),
            Locator::Class { class, nth } => {
                let index = u32::try_from(*nth).ok()?;
                doc.get_elements_by_class_name(class).item(index)
            }
        }
    }

    fn element(&self, node: u32) -> Result<&Element, String> {
        self.elements
            .get(&node)
            .ok_or_else(|| format!("patch targets unbound node {node}"))
    }

    fn html(&self, node: u32) -> Result<&HtmlElement, String> {
        self.element(node)?
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| format!("node {node} is not an HTML element"))
    }

    fn input(&self, node: u32) -> Result<&HtmlInputElement, String> {
        self.element(node)?
            .dyn_ref::<HtmlInputElement>()
            .ok_or_else(|| format!("node {node} is not an <input>"))
    }

    fn apply(&mut self, doc: &web_sys::Document, patch: &DomPatch) -> Result<(), String> {
        let js_err = |err: JsValue| format!("{err:?}");
        match patch {
            DomPatch::Adopt { node, locator } => {
                let el = Self::locate(doc, locator)
                    .ok_or_else(|| format!("no page element for {locator:?}"))?;
                self.elements.insert(*node, el);
            }
            DomPatch::Insert {
                node,
                parent,
                tag,
                classes,
            } => {
                let el = doc.create_element(tag).map_err(js_err)?;
                el.set_class_name(&classes.join(" "));
                self.element(*parent)?.append_child(&el).map_err(js_err)?;
                self.elements.insert(*node, el);
            }
            DomPatch::Remove { node } => {
                if let Some(el) = self.elements.remove(node) {
                    el.remove();
                }
            }
            DomPatch::SetStyle {
                node,
                property,
                value,
            } => self
                .html(*node)?
                .style()
                .set_property(property, value)
                .map_err(js_err)?,
            DomPatch::RemoveStyle { node, property } => {
                self.html(*node)?
                    .style()
                    .remove_property(property)
                    .map_err(js_err)?;
            }
            DomPatch::SetAttribute { node, name, value } => self
                .element(*node)?
                .set_attribute(name, value)
                .map_err(js_err)?,
            DomPatch::AddClass { node, class } => self
                .element(*node)?
                .class_list()
                .add_1(class)
                .map_err(js_err)?,
            DomPatch::RemoveClass { node, class } => self
                .element(*node)?
                .class_list()
                .remove_1(class)
                .map_err(js_err)?,
            DomPatch::SetText { node, text } => {
                self.element(*node)?.set_text_content(Some(text.as_str()));
            }
            DomPatch::SetValue { node, value } => self.input(*node)?.set_value(value),
            DomPatch::SetChecked { node, checked } => self.input(*node)?.set_checked(*checked),
            DomPatch::SetDisabled { node, disabled } => {
                let el = self.element(*node)?;
                if *disabled {
                    el.set_attribute("disabled", "").map_err(js_err)?;
                } else {
                    el.remove_attribute("disabled").map_err(js_err)?;
                }
            }
        }
        Ok(())
    }
}

/// Registration form runner driven by the page script.
///
/// Host-driven: the page forwards DOM events with `pushEncodedInput`,
/// advances time from its own timers, then calls `step` and
/// `applyToDocument`.
#[wasm_bindgen]
pub struct RegistrationFormRunner {
    inner: RunnerCore,
    dom: DomApplier,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

impl Default for RegistrationFormRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl RegistrationFormRunner {
    /// Create a runner for a page using the stock ids and markers.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        install_panic_hook();
        Self {
            inner: RunnerCore::new(),
            dom: DomApplier::default(),
        }
    }

    /// Create a runner from a JSON `FormConfig`.
    #[wasm_bindgen(js_name = fromConfigJson)]
    pub fn from_config_json(json: &str) -> Result<RegistrationFormRunner, JsValue> {
        install_panic_hook();
        let config = FormConfig::from_json_str(json).map_err(js_error)?;
        Ok(Self {
            inner: RunnerCore::with_config(config),
            dom: DomApplier::default(),
        })
    }

    /// Bind the form to the live page. Call exactly once, after the page's
    /// markup is loaded.
    ///
    /// Throws if an element the form needs is missing or of the wrong kind;
    /// the runner then stays unready. On success the initial state is
    /// already written to the page.
    pub fn init(&mut self) -> Result<(), JsValue> {
        let (_, document) = page()?;
        let snapshot = snapshot_page(&document, self.inner.config())?;
        self.inner.init(&snapshot).map_err(js_error)?;
        self.apply_to_document().map(|_| ())
    }

    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    /// Advance the deterministic clock by `dt_ms` milliseconds.
    #[wasm_bindgen(js_name = advanceTimeMs)]
    pub fn advance_time_ms(&mut self, dt_ms: f64) {
        self.inner.advance_time_ms(dt_ms);
    }

    /// Set the deterministic clock to absolute milliseconds.
    #[wasm_bindgen(js_name = setTimeMs)]
    pub fn set_time_ms(&mut self, ts_ms: f64) {
        self.inner.set_time_ms(ts_ms);
    }

    /// Parse a JSON-encoded DOM event and push it to the event queue.
    /// Returns `true` if accepted, `false` if unsupported/malformed.
    #[wasm_bindgen(js_name = pushEncodedInput)]
    pub fn push_encoded_input(&mut self, json: &str) -> bool {
        self.inner.push_encoded_input(json)
    }

    /// Process pending events and due timers.
    ///
    /// Returns `{ events_processed, tasks_run, rendered, default_prevented,
    /// submit }` where `submit` is `"accepted"`, `"rejected"`, or `null`.
    pub fn step(&mut self) -> JsValue {
        let result = self.inner.step();
        let obj = Object::new();
        set_js(
            &obj,
            "events_processed",
            JsValue::from_f64(result.events_processed as f64),
        );
        set_js(&obj, "tasks_run", JsValue::from_f64(result.tasks_run as f64));
        set_js(&obj, "rendered", JsValue::from_bool(result.rendered));
        set_js(
            &obj,
            "default_prevented",
            JsValue::from_bool(result.default_prevented),
        );
        let submit = match result.last_submit {
            Some(SubmitOutcome::Accepted { .. } | SubmitOutcome::Unconfirmed) => {
                JsValue::from_str("accepted")
            }
            Some(SubmitOutcome::Rejected { .. }) => JsValue::from_str("rejected"),
            None => JsValue::NULL,
        };
        set_js(&obj, "submit", submit);
        obj.into()
    }

    /// Number of deferred tasks still waiting on the clock.
    #[wasm_bindgen(js_name = pendingTasks)]
    pub fn pending_tasks(&self) -> u32 {
        u32::try_from(self.inner.pending_tasks()).unwrap_or(u32::MAX)
    }

    /// Take pending DOM patches as a JSON array.
    #[wasm_bindgen(js_name = takePatchesJson)]
    pub fn take_patches_json(&mut self) -> String {
        self.inner.take_patches_json()
    }

    /// Take alert messages raised since the last call.
    #[wasm_bindgen(js_name = takeAlerts)]
    pub fn take_alerts(&mut self) -> Array {
        strings_to_js(self.inner.take_alerts())
    }

    /// Take accumulated log lines.
    #[wasm_bindgen(js_name = takeLogs)]
    pub fn take_logs(&mut self) -> Array {
        strings_to_js(self.inner.take_logs())
    }

    /// Write pending patches into the live page and raise pending alerts
    /// with `window.alert`. Returns the number of patches applied.
    ///
    /// Throws at the first patch the page cannot take; the remaining
    /// patches of that batch are dropped.
    #[wasm_bindgen(js_name = applyToDocument)]
    pub fn apply_to_document(&mut self) -> Result<u32, JsValue> {
        let (window, document) = page()?;

        let mut applied = 0u32;
        for patch in self.inner.take_patches() {
            if let Err(msg) = self.dom.apply(&document, &patch) {
                return Err(JsValue::from_str(&format!(
                    "regform patch {applied} failed: {msg}"
                )));
            }
            applied += 1;
        }
        for message in self.inner.take_alerts() {
            window.alert_with_message(&message)?;
        }
        Ok(applied)
    }
}
