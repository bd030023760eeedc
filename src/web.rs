//! Browser entry points
//!
//! Runs one reconciliation pass on load and exposes the mutation surface to
//! page scripts. All calls happen on the UI thread, so the store lives in a
//! thread-local.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::Document;

use crate::config::GateConfig;
use crate::consts::{CONFIG_ATTRIBUTE, PAGE_ATTRIBUTE};
use crate::gates::PageContext;
use crate::platform::LocalStore;
use crate::platform::dom::{DomSurface, ToastNotifier};
use crate::progression::{ProgressionStore, interaction_amount, promotion_target};
use crate::reconciler::Reconciler;

type WebStore = ProgressionStore<LocalStore, Reconciler<DomSurface, ToastNotifier>>;

thread_local! {
    static STORE: RefCell<Option<WebStore>> = const { RefCell::new(None) };
}

fn body_attribute(document: &Document, name: &str) -> Option<String> {
    document.body()?.get_attribute(name)
}

fn build(document: Document) -> WebStore {
    let config = body_attribute(&document, CONFIG_ATTRIBUTE)
        .map(|json| GateConfig::from_json(&json))
        .unwrap_or_default();
    let page = body_attribute(&document, PAGE_ATTRIBUTE)
        .map(|marker| PageContext::from_marker(&marker))
        .unwrap_or_default();

    let reconciler = Reconciler::new(
        DomSurface::new(document.clone()),
        ToastNotifier::new(document, config.notify),
        config.hub_gates.clone(),
        page,
    );
    ProgressionStore::new(LocalStore::new(), reconciler, config)
}

/// Run `f` against the page's store, creating it on first use
fn with_store<R>(f: impl FnOnce(&mut WebStore) -> R) -> Option<R> {
    STORE.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            let document = web_sys::window()?.document()?;
            *slot = Some(build(document));
        }
        slot.as_mut().map(f)
    })
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    if with_store(|store| store.sync()).is_none() {
        log::warn!("No document available, gates not reconciled");
    }
}

/// Record interaction events (e.g. monitor views)
#[wasm_bindgen(js_name = recordInteraction)]
pub fn record_interaction(amount: Option<f64>) {
    let amount = interaction_amount(amount.unwrap_or(1.0));
    with_store(|store| store.record_interaction(amount));
}

/// Raise the visitor to `level` (e.g. after the questionnaire, `promote(1)`)
#[wasm_bindgen]
pub fn promote(level: f64) {
    let level = promotion_target(level);
    with_store(|store| store.promote(level));
}

/// Re-run reconciliation against the stored record
#[wasm_bindgen]
pub fn reconcile() {
    with_store(|store| store.sync());
}

/// Declare the current page kind and reconcile
#[wasm_bindgen(js_name = setPage)]
pub fn set_page(marker: &str) {
    let page = PageContext::from_marker(marker);
    with_store(|store| {
        store.gate_sync_mut().set_page(page);
        store.sync();
    });
}

/// Current level id
#[wasm_bindgen(js_name = currentLevel)]
pub fn current_level() -> u32 {
    with_store(|store| store.load().level).unwrap_or_default()
}

/// Current level name, `LEVEL <n>` when outside the catalog
#[wasm_bindgen(js_name = currentLevelName)]
pub fn current_level_name() -> String {
    with_store(|store| {
        let level = store.load().level;
        store.config().levels.label(level)
    })
    .unwrap_or_default()
}
