//! Browser backends for the reveal engine and its JavaScript handle

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MutationObserver, MutationObserverInit, MutationRecord, Node, Window,
};

use super::dom::WebDom;
use crate::config::RevealConfig;
use crate::reveal::{FrameScheduler, RevealEngine, ViewportWatcher};

pub type WebEngine = RevealEngine<WebDom, IntersectionWatcher, AnimationFrames>;
pub type SharedEngine = Rc<RefCell<WebEngine>>;

/// `IntersectionObserver` feeding entries back into the engine. Without
/// observer support (or under reduced motion) it is inert and reports itself
/// unavailable, which sends the engine down the reveal-everything path.
pub struct IntersectionWatcher {
    observer: Option<IntersectionObserver>,
}

impl IntersectionWatcher {
    pub fn disabled() -> Self {
        Self { observer: None }
    }

    fn new(engine: Weak<RefCell<WebEngine>>, config: &RevealConfig) -> Self {
        let callback = Closure::wrap(Box::new(move |entries: Array, _observer: IntersectionObserver| {
            let Some(engine) = engine.upgrade() else {
                return;
            };
            let Ok(mut engine) = engine.try_borrow_mut() else {
                return;
            };
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                engine.on_visibility_change(&entry.target(), entry.is_intersecting());
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&config.root_margin);
        init.set_threshold(&JsValue::from_f64(config.threshold));

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init).ok();
        if observer.is_some() {
            callback.forget();
        }
        Self { observer }
    }
}

impl ViewportWatcher<Element> for IntersectionWatcher {
    fn watch(&self, node: &Element) {
        if let Some(observer) = &self.observer {
            observer.observe(node);
        }
    }

    fn unwatch(&self, node: &Element) {
        if let Some(observer) = &self.observer {
            observer.unobserve(node);
        }
    }

    fn is_available(&self) -> bool {
        self.observer.is_some()
    }
}

/// `requestAnimationFrame`-based scheduler; nested requests count frames
#[derive(Debug, Clone)]
pub struct AnimationFrames {
    window: Window,
}

impl AnimationFrames {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl FrameScheduler for AnimationFrames {
    fn after_frames(&self, frames: u32, task: Box<dyn FnOnce()>) {
        request_frames(self.window.clone(), frames.max(1), task);
    }
}

fn request_frames(window: Window, remaining: u32, task: Box<dyn FnOnce()>) {
    let next = window.clone();
    let callback = Closure::once_into_js(move || {
        if remaining <= 1 {
            task();
        } else {
            request_frames(next, remaining - 1, task);
        }
    });
    let _ = window.request_animation_frame(callback.unchecked_ref());
}

/// Build an engine wired to the live document. Returns `None` when there is
/// no document to work on.
pub fn install(window: &Window, config: RevealConfig) -> Option<SharedEngine> {
    let dom = WebDom::new(window.document()?);
    let frames = AnimationFrames::new(window.clone());
    Some(Rc::new_cyclic(|weak: &Weak<RefCell<WebEngine>>| {
        let watcher = if config.reduced_motion {
            IntersectionWatcher::disabled()
        } else {
            IntersectionWatcher::new(weak.clone(), &config)
        };
        RefCell::new(RevealEngine::new(dom, watcher, frames, config))
    }))
}

/// Forward every element added under `root` to `register_new_content`
pub fn watch_for_insertions(engine: &SharedEngine, root: &Node) -> Option<MutationObserver> {
    let engine = Rc::downgrade(engine);
    let callback = Closure::wrap(Box::new(move |records: Array, _observer: MutationObserver| {
        let Some(engine) = engine.upgrade() else {
            return;
        };
        let Ok(mut engine) = engine.try_borrow_mut() else {
            return;
        };
        for record in records.iter() {
            let record: MutationRecord = record.unchecked_into();
            let added = record.added_nodes();
            for i in 0..added.length() {
                if let Some(element) = added.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    engine.register_new_content(&element);
                }
            }
        }
    }) as Box<dyn FnMut(Array, MutationObserver)>);

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref()).ok()?;
    callback.forget();

    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    observer.observe_with_options(root, &init).ok()?;
    Some(observer)
}

/// Scroll-reveal handle exposed to JavaScript
#[wasm_bindgen]
pub struct ScrollReveal {
    engine: SharedEngine,
    insertions: Option<MutationObserver>,
}

impl ScrollReveal {
    pub fn from_config(window: &Window, config: RevealConfig) -> Option<Self> {
        Some(Self {
            engine: install(window, config)?,
            insertions: None,
        })
    }

    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }
}

#[wasm_bindgen]
impl ScrollReveal {
    /// Create an engine from optional YAML/JSON overrides. Page-level
    /// signals (stagger step, reduced motion) are read once here.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<ScrollReveal, JsValue> {
        let config = RevealConfig::from_yaml(config.as_deref().unwrap_or(""))
            .map_err(|e| JsValue::from_str(&e))?;
        let window = web_sys::window().ok_or("No window")?;
        let config = super::read_page_signals(&window).apply_to(config);
        Self::from_config(&window, config).ok_or_else(|| JsValue::from_str("No document"))
    }

    /// Scan the document and start observing, or reveal everything under
    /// reduced motion
    #[wasm_bindgen]
    pub fn start(&self) {
        self.engine.borrow_mut().start();
    }

    /// Tag a subtree; returns how many elements were newly tagged
    #[wasm_bindgen]
    pub fn scan(&self, root: &Element) -> usize {
        self.engine.borrow_mut().scan(root)
    }

    #[wasm_bindgen]
    pub fn observe(&self, target: &Element) -> bool {
        self.engine.borrow_mut().observe(target)
    }

    /// Register content inserted after page-ready
    #[wasm_bindgen]
    pub fn register_new_content(&self, root: &Element) {
        self.engine.borrow_mut().register_new_content(root);
    }

    /// Reveal everything now, without observation
    #[wasm_bindgen]
    pub fn reduced_motion_fallback(&self) {
        self.engine.borrow_mut().reduced_motion_fallback();
    }

    /// Keep a subtree watch running that registers inserted content.
    /// Replaces any earlier watch.
    #[wasm_bindgen]
    pub fn watch_for_insertions(&mut self, root: &Element) {
        if let Some(previous) = self.insertions.take() {
            previous.disconnect();
        }
        self.insertions = watch_for_insertions(&self.engine, root);
    }

    /// Number of elements the engine is tracking
    #[wasm_bindgen]
    pub fn target_count(&self) -> usize {
        self.engine.borrow().targets().len()
    }
}
