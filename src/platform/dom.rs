//! DOM gate surface and toast notifier (web only)

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

use crate::config::NotifyTiming;
use crate::consts::{LOCK_MARKER_CLASS, LOCK_MESSAGE_CLASS, LOCK_OVERLAY_CLASS};
use crate::reconciler::{GateSurface, Notifier};

const OVERLAY_STYLE: &str = "position:absolute; inset:0; display:flex; flex-direction:column; \
    align-items:center; justify-content:center; color:#ff4444; font-family:monospace; \
    background:rgba(0,0,0,0.8); z-index:10; border-radius:inherit;";

const TOAST_STYLE: &str = "position:fixed; bottom:20px; right:20px; background:rgba(0,20,30,0.9); \
    border:1px solid #00f3ff; color:#00f3ff; padding:15px; font-family:monospace; z-index:99999; \
    backdrop-filter:blur(5px); animation: slideIn 0.5s ease-out; \
    box-shadow: 0 0 20px rgba(0,243,255,0.2);";

/// Gates found as navigation links whose `href` contains the gate name
pub struct DomSurface {
    document: Document,
}

impl DomSurface {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn element(&self, gate: &str) -> Option<HtmlElement> {
        let selector = format!("a[href*=\"{}\"]", gate);
        self.document
            .query_selector(&selector)
            .ok()
            .flatten()?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn overlay(el: &Element) -> Option<Element> {
        el.query_selector(&format!(".{}", LOCK_OVERLAY_CLASS))
            .ok()
            .flatten()
    }

    fn set_treatment(el: &HtmlElement, pointer_events: &str, filter: &str, opacity: &str) {
        let style = el.style();
        let _ = style.set_property("pointer-events", pointer_events);
        let _ = style.set_property("filter", filter);
        let _ = style.set_property("opacity", opacity);
    }

    fn build_overlay(&self, message: &str) -> Option<Element> {
        let overlay = self.document.create_element("div").ok()?;
        overlay.set_class_name(LOCK_OVERLAY_CLASS);

        let frame = self.document.create_element("div").ok()?;
        let _ = frame.set_attribute("style", OVERLAY_STYLE);

        let icon = self.document.create_element("span").ok()?;
        let _ = icon.set_attribute("style", "font-size:24px");
        icon.set_text_content(Some("\u{1F512}"));

        let text = self.document.create_element("span").ok()?;
        text.set_class_name(LOCK_MESSAGE_CLASS);
        let _ = text.set_attribute("style", "font-size:10px; margin-top:5px; text-align:center");
        text.set_text_content(Some(message));

        frame.append_child(&icon).ok()?;
        frame.append_child(&text).ok()?;
        overlay.append_child(&frame).ok()?;
        Some(overlay)
    }
}

impl GateSurface for DomSurface {
    fn contains(&self, gate: &str) -> bool {
        self.element(gate).is_some()
    }

    fn is_locked(&self, gate: &str) -> bool {
        self.element(gate)
            .is_some_and(|el| el.class_list().contains(LOCK_MARKER_CLASS))
    }

    fn lock_message(&self, gate: &str) -> Option<String> {
        let el = self.element(gate)?;
        el.query_selector(&format!(".{}", LOCK_MESSAGE_CLASS))
            .ok()
            .flatten()?
            .text_content()
    }

    fn apply_lock(&mut self, gate: &str, message: &str) {
        let Some(el) = self.element(gate) else {
            return;
        };
        let _ = el.class_list().add_1(LOCK_MARKER_CLASS);
        Self::set_treatment(&el, "none", "grayscale(1) brightness(0.5)", "0.5");
        let _ = el.style().set_property("position", "relative");
        if let Some(stale) = Self::overlay(&el) {
            stale.remove();
        }
        if let Some(overlay) = self.build_overlay(message) {
            let _ = el.append_child(&overlay);
        }
    }

    fn set_lock_message(&mut self, gate: &str, message: &str) {
        if let Some(text) = self
            .element(gate)
            .and_then(|el| el.query_selector(&format!(".{}", LOCK_MESSAGE_CLASS)).ok().flatten())
        {
            text.set_text_content(Some(message));
        }
    }

    fn apply_unlock(&mut self, gate: &str) {
        let Some(el) = self.element(gate) else {
            return;
        };
        let _ = el.class_list().remove_1(LOCK_MARKER_CLASS);
        Self::set_treatment(&el, "auto", "none", "1");
        if let Some(overlay) = Self::overlay(&el) {
            overlay.remove();
        }
    }
}

/// Bottom-right toast that fades out and removes itself
pub struct ToastNotifier {
    document: Document,
    timing: NotifyTiming,
}

impl ToastNotifier {
    pub fn new(document: Document, timing: NotifyTiming) -> Self {
        Self { document, timing }
    }

    fn show(&self, text: &str) -> Option<()> {
        let window = web_sys::window()?;
        let body = self.document.body()?;

        let toast = self.document.create_element("div").ok()?;
        let _ = toast.set_attribute("style", TOAST_STYLE);
        let icon = self.document.create_element("span").ok()?;
        let _ = icon.set_attribute("style", "margin-right:10px");
        icon.set_text_content(Some("\u{26A0}\u{FE0F}"));
        toast.append_child(&icon).ok()?;
        toast
            .append_child(&self.document.create_text_node(text))
            .ok()?;
        body.append_child(&toast).ok()?;

        let toast: HtmlElement = toast.dyn_into().ok()?;
        let fade_ms = self.timing.fade_ms;
        let fade = Closure::once_into_js(move || {
            let style = toast.style();
            let _ = style.set_property("transition", &format!("opacity {}ms", fade_ms));
            let _ = style.set_property("opacity", "0");

            let remove = Closure::once_into_js(move || toast.remove());
            if let Some(window) = web_sys::window() {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    remove.unchecked_ref::<js_sys::Function>(),
                    fade_ms as i32,
                );
            }
        });
        window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                fade.unchecked_ref::<js_sys::Function>(),
                self.timing.display_ms as i32,
            )
            .ok()?;
        Some(())
    }
}

impl Notifier for ToastNotifier {
    fn notify(&mut self, text: &str) {
        log::info!("Notification: {}", text);
        if self.show(text).is_none() {
            log::warn!("Could not display notification");
        }
    }
}
