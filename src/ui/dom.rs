//! Thin DOM helpers for the page shell (wasm32 only)

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, HtmlInputElement};

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

pub fn element(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

pub fn set_html(id: &str, html: &str) {
    if let Some(el) = element(id) {
        el.set_inner_html(html);
    }
}

pub fn set_text(id: &str, text: &str) {
    if let Some(el) = element(id) {
        el.set_text_content(Some(text));
    }
}

pub fn set_hidden(id: &str, hidden: bool) {
    if let Some(el) = element(id) {
        let _ = el.class_list().toggle_with_force("hidden", hidden);
    }
}

pub fn set_title(title: &str) {
    if let Some(doc) = document() {
        doc.set_title(title);
    }
}

pub fn input_value(id: &str) -> Option<String> {
    element(id)?
        .dyn_into::<HtmlInputElement>()
        .ok()
        .map(|input| input.value())
}

pub fn focus_input(id: &str) {
    if let Some(input) = element(id).and_then(|el| el.dyn_into::<HtmlInputElement>().ok()) {
        let _ = input.focus();
    }
}

pub fn current_hash() -> String {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

/// `data-action` (and optional `data-id`) of the nearest tagged ancestor
pub fn action_of(event: &Event) -> Option<(String, Option<String>)> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let tagged = target.closest("[data-action]").ok()??;
    let action = tagged.get_attribute("data-action")?;
    Some((action, tagged.get_attribute("data-id")))
}

/// Attach a listener for the page's lifetime
pub fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    let callback: &js_sys::Function = closure.as_ref().unchecked_ref();
    if let Err(e) = target.add_event_listener_with_callback(event, callback) {
        log::warn!("Failed to listen for {event}: {e:?}");
    }
    closure.forget();
}
