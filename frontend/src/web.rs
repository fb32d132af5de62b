//! Browser implementation of [`UiNode`] and thin wrappers over `web_sys`.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlButtonElement, HtmlElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, ScrollBehavior, ScrollToOptions, Window,
};

use crate::dom::{Rect, UiNode, Viewport};
use crate::error::SiteError;
use crate::reveal::ObserverOptions;

#[derive(Clone, Debug, PartialEq)]
pub struct WebNode(Element);

impl WebNode {
    pub fn new(element: Element) -> Self {
        Self(element)
    }

    pub fn element(&self) -> &Element {
        &self.0
    }

    pub fn query(&self, selector: &str) -> Option<WebNode> {
        self.0.query_selector(selector).ok().flatten().map(WebNode)
    }

    pub fn query_all(&self, selector: &str) -> Vec<WebNode> {
        match self.0.query_selector_all(selector) {
            Ok(list) => collect_elements(&list),
            Err(_) => Vec::new(),
        }
    }

    /// Wraps an event target, if it is an element.
    pub fn from_event(event: &Event) -> Option<WebNode> {
        event.target()?.dyn_into::<Element>().ok().map(WebNode)
    }
}

impl UiNode for WebNode {
    fn id(&self) -> Option<String> {
        let id = self.0.id();
        (!id.is_empty()).then_some(id)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        traced(self.0.set_attribute(name, value), "set_attribute", name);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn set_class(&self, class: &str, on: bool) {
        traced(self.0.class_list().toggle_with_force(class, on), "toggle class", class);
    }

    fn text(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn markup(&self) -> String {
        self.0.inner_html()
    }

    fn set_markup(&self, markup: &str) {
        self.0.set_inner_html(markup);
    }

    fn value(&self) -> String {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else if let Some(select) = self.0.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            String::new()
        }
    }

    fn set_value(&self, value: &str) {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        } else if let Some(select) = self.0.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        }
    }

    fn set_disabled(&self, disabled: bool) {
        if let Some(button) = self.0.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(disabled);
        } else if disabled {
            traced(self.0.set_attribute("disabled", ""), "set_attribute", "disabled");
        } else {
            traced(self.0.remove_attribute("disabled"), "remove_attribute", "disabled");
        }
    }

    fn is_disabled(&self) -> bool {
        match self.0.dyn_ref::<HtmlButtonElement>() {
            Some(button) => button.disabled(),
            None => self.0.has_attribute("disabled"),
        }
    }

    fn bounding_rect(&self) -> Rect {
        let rect = self.0.get_bounding_client_rect();
        Rect {
            top: rect.top(),
            left: rect.left(),
            bottom: rect.bottom(),
            right: rect.right(),
        }
    }

    fn offset_top(&self) -> f64 {
        self.0.dyn_ref::<HtmlElement>().map_or(0.0, |el| el.offset_top() as f64)
    }

    fn offset_height(&self) -> f64 {
        self.0.dyn_ref::<HtmlElement>().map_or(0.0, |el| el.offset_height() as f64)
    }

    fn contains(&self, other: &Self) -> bool {
        let node: &web_sys::Node = other.0.as_ref();
        self.0.contains(Some(node))
    }
}

/// Failed DOM mutations are not fatal; leave a trace and carry on.
fn traced<T>(result: Result<T, JsValue>, operation: &str, name: &str) {
    if let Err(e) = result {
        debug!("{} {:?} failed: {:?}", operation, name, e);
    }
}

fn collect_elements(list: &web_sys::NodeList) -> Vec<WebNode> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .map(WebNode)
        .collect()
}

pub fn window() -> Result<Window, SiteError> {
    web_sys::window().ok_or(SiteError::NoWindow)
}

pub fn document() -> Result<Document, SiteError> {
    window()?.document().ok_or(SiteError::NoDocument)
}

pub fn by_id(document: &Document, id: &str) -> Option<WebNode> {
    document.get_element_by_id(id).map(WebNode)
}

pub fn query(document: &Document, selector: &str) -> Option<WebNode> {
    document.query_selector(selector).ok().flatten().map(WebNode)
}

pub fn query_all(document: &Document, selector: &str) -> Vec<WebNode> {
    match document.query_selector_all(selector) {
        Ok(list) => collect_elements(&list),
        Err(_) => Vec::new(),
    }
}

pub fn scroll_y(window: &Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

/// Layout viewport size, falling back to the root element's client box.
pub fn viewport(window: &Window) -> Viewport {
    let root = window.document().and_then(|doc| doc.document_element());
    let fallback_width = root.as_ref().map_or(0.0, |el| el.client_width() as f64);
    let fallback_height = root.as_ref().map_or(0.0, |el| el.client_height() as f64);
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .filter(|w| *w > 0.0)
        .unwrap_or(fallback_width);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .filter(|h| *h > 0.0)
        .unwrap_or(fallback_height);
    Viewport { width, height }
}

pub fn smooth_scroll_to(window: &Window, top: f64) {
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

/// Attaches `handler` for the lifetime of the page.
pub fn listen<T, F>(target: &T, event: &str, handler: F) -> Result<(), SiteError>
where
    T: AsRef<EventTarget>,
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target
        .as_ref()
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Fire-and-forget single-shot timer.
pub fn after(delay_ms: u32, callback: impl FnOnce() + 'static) {
    Timeout::new(delay_ms, callback).forget();
}

/// Creates an intersection observer that reports each entry to `on_entry`.
pub fn intersection_observer<F>(
    options: &ObserverOptions,
    mut on_entry: F,
) -> Result<IntersectionObserver, SiteError>
where
    F: FnMut(&IntersectionObserverEntry, &IntersectionObserver) + 'static,
{
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                on_entry(&entry, &observer);
            }
        }
    }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(&options.root_margin);
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();
    Ok(observer)
}

/// Calls `step` once per animation frame until it returns `false`.
pub fn animate_frames<F>(mut step: F) -> Result<(), SiteError>
where
    F: FnMut() -> bool + 'static,
{
    let window = window()?;
    let slot: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let handle = slot.clone();
    let frame_window = window.clone();

    *handle.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        if !step() {
            // Drops this closure; the loop is over.
            let _ = slot.borrow_mut().take();
            return;
        }
        if let Some(callback) = slot.borrow().as_ref() {
            let _ = frame_window.request_animation_frame(callback.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(callback) = handle.borrow().as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }
    Ok(())
}
