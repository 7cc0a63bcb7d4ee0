use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Window};

#[macro_use]
mod log;

pub mod config;
pub mod dom;
pub mod page;
pub mod reveal;
pub mod web;

pub use config::{PageSignals, RevealConfig, SiteConfig};
use page::{ProjectLinks, ReadyState};
pub use reveal::{Category, RevealEngine};
pub use web::ScrollReveal;

thread_local! {
    /// Engine started by `boot`, kept so late content can be registered
    static BOOTED: RefCell<Option<ScrollReveal>> = const { RefCell::new(None) };
}

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Wire the whole page once the document is parsed. `config` holds optional
/// YAML/JSON overrides: reveal engine settings at the top level plus
/// `project_links`.
#[wasm_bindgen]
pub fn boot(config: Option<String>) -> Result<(), JsValue> {
    let config = SiteConfig::from_yaml(config.as_deref().unwrap_or(""))
        .map_err(|e| JsValue::from_str(&e))?;
    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;

    let signals = web::read_page_signals(&window);
    let reveal = signals.apply_to(config.reveal);
    let links = ProjectLinks::new(config.project_links);

    if ReadyState::parse(&document.ready_state()).is_parsed() {
        on_ready(&window, &document, reveal, &links);
        return Ok(());
    }
    let (ready_window, ready_document) = (window.clone(), document.clone());
    let ready = Closure::once_into_js(move || {
        on_ready(&ready_window, &ready_document, reveal, &links);
    });
    document.add_event_listener_with_callback("DOMContentLoaded", ready.unchecked_ref())?;
    Ok(())
}

fn on_ready(window: &Window, document: &Document, config: RevealConfig, links: &ProjectLinks) {
    web::page::install_on_ready(window, document, links, !config.reduced_motion);

    let watch = config.watch_insertions;
    let Some(mut reveal) = ScrollReveal::from_config(window, config) else {
        return;
    };
    reveal.start();
    if watch {
        if let Some(root) = document.document_element() {
            reveal.watch_for_insertions(&root);
        }
    }
    BOOTED.with(|booted| *booted.borrow_mut() = Some(reveal));
}

/// Explicit registration for content a script inserts after `boot`
#[wasm_bindgen]
pub fn register_new_content(root: &Element) {
    BOOTED.with(|booted| {
        if let Some(reveal) = booted.borrow().as_ref() {
            reveal.register_new_content(root);
        }
    });
}
