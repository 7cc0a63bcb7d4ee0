//! Browser wiring: `web-sys` backends for the DOM seam and the page glue

pub mod dom;
pub mod page;
pub mod reveal;

pub use dom::WebDom;
pub use reveal::{AnimationFrames, IntersectionWatcher, ScrollReveal, SharedEngine, WebEngine};

use web_sys::Window;

use crate::config::PageSignals;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
const STAGGER_STEP_PROPERTY: &str = "--sr-stagger-step";

/// Read the page-level signals once: the stylesheet's stagger step and the
/// platform reduced-motion preference
pub fn read_page_signals(window: &Window) -> PageSignals {
    let reduced = window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .map(|query| query.matches())
        .unwrap_or(false);
    let step = window
        .document()
        .and_then(|document| document.document_element())
        .and_then(|root| window.get_computed_style(&root).ok().flatten())
        .and_then(|style| style.get_property_value(STAGGER_STEP_PROPERTY).ok())
        .unwrap_or_default();
    PageSignals::from_raw(&step, reduced)
}
