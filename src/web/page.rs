//! Page glue: header measurement, navigation, theme, anchored scrolling,
//! contact form, e-mail modal, project cards and parallax

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, FormData, Headers,
    HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement,
    KeyboardEvent, Node, RequestInit, Response, ScrollBehavior, ScrollToOptions, Window,
};

use super::reveal::AnimationFrames;
use crate::page::contact::{self, ContactError, ContactSubmission, StatusLine};
use crate::page::layout::{
    anchor_scroll_top, header_height, in_page_hash, px, stored_header_height,
    HEADER_HEIGHT_PROPERTY,
};
use crate::page::lifecycle::ReadyState;
use crate::page::modal::{ModalState, BODY_LOCK_CLASS, HIDE_DELAY_MS, SHOW_CLASS, SHOW_DELAY_MS};
use crate::page::parallax::ParallaxFrame;
use crate::page::projects::{ProjectLinks, PROJECT_CARD_SELECTOR};
use crate::page::theme::{Theme, DARK_CLASS, THEME_STORAGE_KEY};
use crate::reveal::FrameScheduler;

const NAV_OPEN_CLASS: &str = "open";
const RESIZE_DEBOUNCE_MS: i32 = 160;
const NAV_SETTLE_MS: i32 = 160;
const THEME_SETTLE_MS: i32 = 120;
const NAV_LINK_CLOSE_MS: i32 = 60;
const ANCHOR_AFTER_NAV_MS: i32 = 80;
const LOAD_HASH_JUMP_MS: i32 = 120;
const LOAD_REMEASURE_MS: [i32; 2] = [60, 220];
const LINK_BLUR_MS: i32 = 100;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = Promise)]
    type Thenable;

    /// `Promise.prototype.then` over plain functions
    #[wasm_bindgen(method, js_name = then)]
    fn then_with(this: &Thenable, on_ok: &JsValue, on_err: &JsValue) -> Promise;
}

/// Attach a listener for the life of the page
fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

fn listen_passive(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    let _ = target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        closure.as_ref().unchecked_ref(),
        &options,
    );
    closure.forget();
}

/// Run `task` after `ms`; returns the timer handle
fn set_timeout(window: &Window, ms: i32, task: impl FnOnce() + 'static) -> Option<i32> {
    let callback = Closure::once_into_js(task);
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), ms)
        .ok()
}

/// Run `on_ok` or `on_err` when `promise` settles. Each handler frees itself
/// once it runs; the one that never runs is left to the JS GC.
pub fn on_settled(
    promise: &Promise,
    on_ok: impl FnOnce(JsValue) + 'static,
    on_err: impl FnOnce(JsValue) + 'static,
) {
    let _ = promise.unchecked_ref::<Thenable>().then_with(&Closure::once_into_js(on_ok), &Closure::once_into_js(on_err));
}

/// Run `task` once the page has loaded; at once when `load` already fired
pub fn when_loaded(window: &Window, document: &Document, task: impl FnOnce() + 'static) {
    if ReadyState::parse(&document.ready_state()).is_loaded() {
        task();
        return;
    }
    let callback = Closure::once_into_js(task);
    let _ = window.add_event_listener_with_callback("load", callback.unchecked_ref());
}

fn html_element(element: Element) -> Option<HtmlElement> {
    element.dyn_into::<HtmlElement>().ok()
}

fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

// --- header ---

/// Measure the fixed header, publish it as `--header-h` and pad `main`
/// below it. Returns the height, 0 without a header.
pub fn sync_header_height(document: &Document) -> f64 {
    let Some(header) = query(document, ".site-header") else {
        return 0.0;
    };
    let height = header_height(header.get_bounding_client_rect().height());
    if let Some(root) = document.document_element().and_then(html_element) {
        let _ = root.style().set_property(HEADER_HEIGHT_PROPERTY, &px(height));
    }
    if let Some(main) = query(document, "main").and_then(html_element) {
        let _ = main.style().set_property("padding-top", &px(height));
    }
    height
}

fn resync_header_later(window: &Window, document: &Document, ms: i32) {
    let document = document.clone();
    set_timeout(window, ms, move || {
        sync_header_height(&document);
    });
}

/// Header height as last published, measuring it if it never was
fn current_header_height(window: &Window, document: &Document) -> f64 {
    document
        .document_element()
        .and_then(|root| window.get_computed_style(&root).ok().flatten())
        .and_then(|style| style.get_property_value(HEADER_HEIGHT_PROPERTY).ok())
        .and_then(|value| stored_header_height(&value))
        .unwrap_or_else(|| sync_header_height(document))
}

// --- footer ---

pub fn set_year(document: &Document) {
    if let Some(year) = document.get_element_by_id("year") {
        let now = js_sys::Date::new_0();
        year.set_text_content(Some(now.get_full_year().to_string().as_str()));
    }
}

// --- navigation ---

fn set_expanded(toggle: &Element, open: bool) {
    let _ = toggle.set_attribute("aria-expanded", if open { "true" } else { "false" });
}

fn is_open(nav: &Element) -> bool {
    nav.class_list().contains(NAV_OPEN_CLASS)
}

/// Close the nav; returns whether it was open
fn close_nav(nav: &Element, toggle: Option<&Element>) -> bool {
    if !is_open(nav) {
        return false;
    }
    let _ = nav.class_list().remove_1(NAV_OPEN_CLASS);
    if let Some(toggle) = toggle {
        set_expanded(toggle, false);
    }
    true
}

fn closest_to_target(event: &Event, selector: &str) -> Option<Element> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .closest(selector)
        .ok()
        .flatten()
}

fn closest_hash_link(event: &Event) -> Option<Element> {
    closest_to_target(event, "a[href^=\"#\"]")
}

pub fn install_nav(window: &Window, document: &Document) {
    let (Some(nav), Some(toggle)) = (
        document.get_element_by_id("nav"),
        document.get_element_by_id("nav-toggle"),
    ) else {
        return;
    };
    set_expanded(&toggle, is_open(&nav));

    {
        let (nav, button, window, document) =
            (nav.clone(), toggle.clone(), window.clone(), document.clone());
        listen(&toggle, "click", move |_| {
            let open = nav.class_list().toggle(NAV_OPEN_CLASS).unwrap_or(false);
            set_expanded(&button, open);
            resync_header_later(&window, &document, NAV_SETTLE_MS);
        });
    }

    // Click outside closes
    {
        let (nav, toggle, window, inner_document) =
            (nav.clone(), toggle.clone(), window.clone(), document.clone());
        listen(document, "click", move |event| {
            if !is_open(&nav) {
                return;
            }
            let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
            if toggle.contains(target.as_ref()) || nav.contains(target.as_ref()) {
                return;
            }
            close_nav(&nav, Some(&toggle));
            resync_header_later(&window, &inner_document, NAV_SETTLE_MS);
        });
    }

    // Following an in-page link closes the menu once the scroll has started
    {
        let (menu, toggle, window, document) =
            (nav.clone(), toggle.clone(), window.clone(), document.clone());
        listen(&nav, "click", move |event| {
            if closest_hash_link(&event).is_none() {
                return;
            }
            let (menu, toggle, document) = (menu.clone(), toggle.clone(), document.clone());
            set_timeout(&window, NAV_LINK_CLOSE_MS, move || {
                if close_nav(&menu, Some(&toggle)) {
                    sync_header_height(&document);
                }
            });
        });
    }

    {
        let inner_document = document.clone();
        listen(document, "keydown", move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|e| e.key()) else {
                return;
            };
            if (key == "Escape" || key == "Esc") && close_nav(&nav, Some(&toggle)) {
                sync_header_height(&inner_document);
            }
        });
    }
}

// --- theme ---

fn stored_theme(window: &Window) -> Theme {
    let stored = window
        .local_storage()
        .ok()
        .flatten()
        .and_then(|storage| storage.get_item(THEME_STORAGE_KEY).ok().flatten());
    Theme::from_stored(stored.as_deref())
}

fn current_theme(document: &Document) -> Theme {
    let is_dark = document
        .document_element()
        .map(|root| root.class_list().contains(DARK_CLASS))
        .unwrap_or(false);
    Theme::from_dark_flag(is_dark)
}

fn apply_theme(document: &Document, theme: Theme) {
    if let Some(root) = document.document_element() {
        let classes = root.class_list();
        let _ = if theme.is_dark() {
            classes.add_1(DARK_CLASS)
        } else {
            classes.remove_1(DARK_CLASS)
        };
    }
    if let Some(button) = document.get_element_by_id("theme-toggle") {
        let _ = button.set_attribute("aria-pressed", theme.aria_pressed());
        let _ = button.set_attribute("aria-label", theme.aria_label());
    }
}

pub fn install_theme(window: &Window, document: &Document) {
    let Some(button) = document.get_element_by_id("theme-toggle") else {
        return;
    };
    apply_theme(document, stored_theme(window));

    {
        let (window, document) = (window.clone(), document.clone());
        listen(&button, "click", move |_| {
            let theme = current_theme(&document).toggled();
            apply_theme(&document, theme);
            if let Some(storage) = window.local_storage().ok().flatten() {
                let _ = storage.set_item(THEME_STORAGE_KEY, theme.storage_value());
            }
            resync_header_later(&window, &document, THEME_SETTLE_MS);
        });
    }

    let Some(clickable) = html_element(button.clone()) else {
        return;
    };
    listen(&button, "keydown", move |event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|e| e.key()) else {
            return;
        };
        if key == "Enter" || key == " " {
            event.prevent_default();
            clickable.click();
        }
    });
}

// --- anchored scrolling ---

fn scroll_to(window: &Window, top: f64, behavior: ScrollBehavior) {
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_left(0.0);
    options.set_behavior(behavior);
    window.scroll_to_with_scroll_to_options(&options);
}

/// Scroll position that lands `hash` under the header; 0 when it has no
/// target
fn anchor_top(window: &Window, document: &Document, hash: &str, header: f64) -> f64 {
    match query(document, hash) {
        Some(target) => anchor_scroll_top(
            target.get_bounding_client_rect().top(),
            window.scroll_y().unwrap_or(0.0),
            header,
        ),
        None => 0.0,
    }
}

pub fn install_anchor_scroll(window: &Window, document: &Document) {
    let (window, inner_document) = (window.clone(), document.clone());
    listen(document, "click", move |event| {
        let Some(link) = closest_hash_link(&event) else {
            return;
        };
        let href = link.get_attribute("href").unwrap_or_default();
        let Some(hash) = in_page_hash(&href).map(str::to_string) else {
            return;
        };
        event.prevent_default();

        let header = current_header_height(&window, &inner_document);
        let top = anchor_top(&window, &inner_document, &hash, header);

        let scroll_window = window.clone();
        let scroll = move || {
            scroll_to(&scroll_window, top, ScrollBehavior::Smooth);
            if let Some(link) = link.dyn_ref::<HtmlElement>() {
                let _ = link.blur();
            }
            let pushed = scroll_window
                .history()
                .and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(hash.as_str())));
            if pushed.is_err() {
                let _ = scroll_window.location().set_hash(&hash);
            }
        };

        let nav = inner_document.get_element_by_id("nav");
        let toggle = inner_document.get_element_by_id("nav-toggle");
        if nav.is_some_and(|nav| close_nav(&nav, toggle.as_ref())) {
            set_timeout(&window, ANCHOR_AFTER_NAV_MS, scroll);
        } else {
            scroll();
        }
    });
}

// --- window lifecycle ---

pub fn install_window_handlers(window: &Window, document: &Document) {
    {
        let (timer_window, document) = (window.clone(), document.clone());
        let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        listen(window, "resize", move |_| {
            if let Some(handle) = pending.take() {
                timer_window.clear_timeout_with_handle(handle);
            }
            let document = document.clone();
            pending.set(set_timeout(&timer_window, RESIZE_DEBOUNCE_MS, move || {
                sync_header_height(&document);
            }));
        });
    }

    let (load_window, inner_document) = (window.clone(), document.clone());
    when_loaded(window, document, move || {
        let document = inner_document;
        sync_header_height(&document);
        for ms in LOAD_REMEASURE_MS {
            resync_header_later(&load_window, &document, ms);
        }

        let hash = load_window.location().hash().unwrap_or_default();
        if hash.is_empty() {
            return;
        }
        let (window, document) = (load_window.clone(), document.clone());
        set_timeout(&load_window, LOAD_HASH_JUMP_MS, move || {
            if query(&document, &hash).is_none() {
                return;
            }
            let header = current_header_height(&window, &document);
            let top = anchor_top(&window, &document, &hash, header);
            scroll_to(&window, top, ScrollBehavior::Auto);
        });
    });
}

// --- parallax ---

fn apply_parallax(window: &Window, document: &Document, background: &HtmlElement) {
    let scrolled = window.scroll_y().unwrap_or(0.0);
    let hero_height = query(document, ".hero")
        .and_then(html_element)
        .map(|hero| hero.offset_height() as f64)
        .unwrap_or(0.0);
    if let Some(frame) = ParallaxFrame::at(scrolled, hero_height) {
        let style = background.style();
        let _ = style.set_property("transform", &frame.transform());
        let _ = style.set_property("opacity", &frame.opacity.to_string());
    }
}

/// rAF-throttled hero parallax; the caller skips it under reduced motion
pub fn install_parallax(window: &Window, document: &Document) {
    let Some(background) = query(document, ".hero-bg").and_then(html_element) else {
        return;
    };
    let frames = AnimationFrames::new(window.clone());
    let ticking = Rc::new(Cell::new(false));

    {
        let update: Rc<dyn Fn()> = {
            let (window, document, background) =
                (window.clone(), document.clone(), background.clone());
            let ticking = Rc::clone(&ticking);
            Rc::new(move || {
                apply_parallax(&window, &document, &background);
                ticking.set(false);
            })
        };
        listen_passive(window, "scroll", move |_| {
            if ticking.get() {
                return;
            }
            ticking.set(true);
            let update = Rc::clone(&update);
            frames.after_frames(1, Box::new(move || update()));
        });
    }

    let (load_window, inner_document) = (window.clone(), document.clone());
    when_loaded(window, document, move || {
        apply_parallax(&load_window, &inner_document, &background);
    });
}

// --- links ---

/// Drop focus from a clicked link shortly after, so the focus ring does not
/// linger on mouse clicks
pub fn install_link_blur(window: &Window, document: &Document) {
    let window = window.clone();
    listen(document, "click", move |event| {
        let Some(link) = closest_to_target(&event, "a").and_then(html_element) else {
            return;
        };
        set_timeout(&window, LINK_BLUR_MS, move || {
            let _ = link.blur();
        });
    });
}

/// Make each project card with a configured URL open it in a new tab.
/// Clicks on links inside the card keep their own target.
pub fn install_project_cards(window: &Window, document: &Document, links: &ProjectLinks) {
    if links.is_empty() {
        return;
    }
    let Ok(cards) = document.query_selector_all(PROJECT_CARD_SELECTOR) else {
        return;
    };
    for index in 0..cards.length() {
        let Some(card) = cards.get(index).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };
        let Some(url) = links.link_for(index as usize).map(str::to_string) else {
            continue;
        };
        let _ = card.style().set_property("cursor", "pointer");
        let window = window.clone();
        listen(&card, "click", move |event| {
            if closest_to_target(&event, "a").is_some() {
                return;
            }
            let _ = window.open_with_url_and_target(&url, "_blank");
        });
    }
}

// --- e-mail modal ---

fn set_display(element: &HtmlElement, value: &str) {
    let _ = element.style().set_property("display", value);
}

fn lock_body(document: &Document, locked: bool) {
    if let Some(body) = document.body() {
        let classes = body.class_list();
        let _ = if locked {
            classes.add_1(BODY_LOCK_CLASS)
        } else {
            classes.remove_1(BODY_LOCK_CLASS)
        };
    }
}

fn open_modal(
    window: &Window,
    document: &Document,
    modal: &HtmlElement,
    state: &Rc<RefCell<ModalState>>,
) {
    let ticket = state.borrow_mut().open();
    set_display(modal, "flex");
    lock_body(document, true);
    let (modal, state) = (modal.clone(), Rc::clone(state));
    set_timeout(window, SHOW_DELAY_MS, move || {
        if state.borrow_mut().shown(ticket) {
            let _ = modal.class_list().add_1(SHOW_CLASS);
        }
    });
}

fn close_modal(
    window: &Window,
    document: &Document,
    modal: &HtmlElement,
    state: &Rc<RefCell<ModalState>>,
) {
    let Some(ticket) = state.borrow_mut().close() else {
        return;
    };
    let _ = modal.class_list().remove_1(SHOW_CLASS);
    let (document, modal, state) = (document.clone(), modal.clone(), Rc::clone(state));
    set_timeout(window, HIDE_DELAY_MS, move || {
        if state.borrow_mut().hidden(ticket) {
            set_display(&modal, "none");
            lock_body(&document, false);
        }
    });
}

/// `#email-card` opens `#email-modal`; `.close-modal` or a click on the
/// backdrop closes it
pub fn install_email_modal(window: &Window, document: &Document) {
    let Some(modal) = document.get_element_by_id("email-modal").and_then(html_element) else {
        return;
    };
    let state = Rc::new(RefCell::new(ModalState::default()));

    if let Some(card) = document.get_element_by_id("email-card") {
        let (window, document, modal, state) =
            (window.clone(), document.clone(), modal.clone(), Rc::clone(&state));
        listen(&card, "click", move |event| {
            event.prevent_default();
            open_modal(&window, &document, &modal, &state);
        });
    }

    if let Some(button) = query(document, ".close-modal") {
        let (window, document, modal, state) =
            (window.clone(), document.clone(), modal.clone(), Rc::clone(&state));
        listen(&button, "click", move |_| {
            close_modal(&window, &document, &modal, &state);
        });
    }

    let (window, document, backdrop) = (window.clone(), document.clone(), modal.clone());
    listen(&modal, "click", move |event| {
        let on_backdrop = event
            .target()
            .and_then(|t| t.dyn_into::<Node>().ok())
            .is_some_and(|t| backdrop.is_same_node(Some(&t)));
        if on_backdrop {
            close_modal(&window, &document, &backdrop, &state);
        }
    });
}

// --- contact form ---

fn field_value(document: &Document, id: &str) -> String {
    let Some(element) = document.get_element_by_id(id) else {
        return String::new();
    };
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        return input.value();
    }
    element
        .dyn_ref::<HtmlTextAreaElement>()
        .map(|area| area.value())
        .unwrap_or_default()
}

/// Everything a submission needs once the request is in flight
#[derive(Clone)]
struct SubmitContext {
    window: Window,
    form: HtmlFormElement,
    status: Option<HtmlElement>,
    button: Option<HtmlButtonElement>,
}

impl SubmitContext {
    fn show(&self, line: &StatusLine) {
        if let Some(status) = &self.status {
            status.set_text_content(Some(line.text.as_str()));
            let _ = status.style().set_property("color", line.severity.color());
        }
    }

    fn set_busy(&self, busy: bool) {
        if let Some(button) = &self.button {
            button.set_disabled(busy);
        }
    }

    fn finish(&self, status: u16, body: &str) {
        form_log!(Info, "status {} response: {}", status, body);
        match contact::interpret_response(status, body) {
            Ok(()) => {
                self.show(&StatusLine::sent());
                self.form.reset();
            }
            Err(err) => {
                if err.is_missing_form() {
                    form_log!(Warn, "Form not found, check the action URL or relay form id");
                }
                self.show(&StatusLine::from(&err));
            }
        }
        self.set_busy(false);
    }

    /// Show the network error, then let the browser submit natively
    fn network_failure(&self, cause: &JsValue) {
        form_log!(Error, "fetch error {:?}", cause);
        self.show(&StatusLine::from(&ContactError::Network));
        let form = self.form.clone();
        set_timeout(&self.window, contact::NATIVE_SUBMIT_DELAY_MS, move || {
            let _ = form.submit();
        });
        self.set_busy(false);
    }
}

fn submit_contact(ctx: SubmitContext, document: &Document) {
    ctx.show(&StatusLine::cleared());

    let mut submission = ContactSubmission::new(
        &field_value(document, "cf-name"),
        &field_value(document, "cf-email"),
        &field_value(document, "cf-message"),
    );
    if let Some(honey) = ctx
        .form
        .query_selector("input[name=\"_honey\"]")
        .ok()
        .flatten()
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
    {
        submission = submission.with_honeypot(&honey.value());
    }
    if let Err(err) = submission.validate() {
        ctx.show(&StatusLine::from(&err));
        return;
    }

    ctx.set_busy(true);
    ctx.show(&StatusLine::sending());

    let endpoint = contact::endpoint(ctx.form.get_attribute("action").as_deref()).to_string();
    form_log!(Info, "sending to {}", endpoint);

    let body = match FormData::new_with_form(&ctx.form) {
        Ok(body) => body,
        Err(cause) => {
            ctx.network_failure(&cause);
            return;
        }
    };
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&body.into());
    if let Ok(headers) = Headers::new() {
        let _ = headers.set("Accept", "application/json");
        init.set_headers(&headers.into());
    }

    let request = ctx.window.fetch_with_str_and_init(&endpoint, &init);
    let on_error = ctx.clone();
    on_settled(
        &request,
        move |response| {
            let response: Response = response.unchecked_into();
            let status = response.status();
            match response.text() {
                Ok(text) => {
                    let unreadable = ctx.clone();
                    on_settled(
                        &text,
                        move |body| ctx.finish(status, &body.as_string().unwrap_or_default()),
                        move |_| unreadable.finish(status, ""),
                    );
                }
                Err(_) => ctx.finish(status, ""),
            }
        },
        move |cause| on_error.network_failure(&cause),
    );
}

pub fn install_contact_form(window: &Window, document: &Document) {
    let Some(form) = document
        .get_element_by_id("contact-form")
        .and_then(|e| e.dyn_into::<HtmlFormElement>().ok())
    else {
        return;
    };
    let ctx = SubmitContext {
        window: window.clone(),
        form: form.clone(),
        status: document.get_element_by_id("form-status").and_then(html_element),
        button: document
            .get_element_by_id("cf-submit")
            .and_then(|e| e.dyn_into::<HtmlButtonElement>().ok()),
    };
    let document = document.clone();
    listen(&form, "submit", move |event| {
        event.prevent_default();
        submit_contact(ctx.clone(), &document);
    });
}

/// Everything that needs the document parsed. Parallax is left out under
/// reduced motion.
pub fn install_on_ready(
    window: &Window,
    document: &Document,
    links: &ProjectLinks,
    parallax: bool,
) {
    set_year(document);
    sync_header_height(document);
    install_window_handlers(window, document);
    install_nav(window, document);
    install_theme(window, document);
    install_contact_form(window, document);
    install_anchor_scroll(window, document);
    install_email_modal(window, document);
    install_link_blur(window, document);
    install_project_cards(window, document, links);
    if parallax {
        install_parallax(window, document);
    }
}
