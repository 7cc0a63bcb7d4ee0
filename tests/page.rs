//! Browser tests for the page glue. Each test builds its own detached HTML
//! document so fixed ids like `#nav` never collide between tests.
#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use portfolio_reveal::page::contact::ContactError;
use portfolio_reveal::page::theme::{Theme, THEME_STORAGE_KEY};
use portfolio_reveal::page::{ProjectLinks, StatusLine};
use portfolio_reveal::web::page::{
    install_anchor_scroll, install_contact_form, install_email_modal, install_nav,
    install_project_cards, install_theme, on_settled,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{
    Document, Element, Event, EventInit, EventTarget, HtmlButtonElement, HtmlElement,
    HtmlInputElement, HtmlTextAreaElement, KeyboardEvent, KeyboardEventInit, Window,
};

wasm_bindgen_test_configure!(run_in_browser);

fn window() -> Window {
    web_sys::window().unwrap()
}

fn fresh_document(body: &str) -> Document {
    let document = window()
        .document()
        .unwrap()
        .implementation()
        .unwrap()
        .create_html_document()
        .unwrap();
    document.body().unwrap().set_inner_html(body);
    document
}

fn by_id(document: &Document, id: &str) -> Element {
    document.get_element_by_id(id).unwrap()
}

/// Dispatch a bubbling, cancelable event; false when a handler prevented it
fn fire(target: &EventTarget, kind: &str) -> bool {
    let init = EventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    let event = Event::new_with_event_init_dict(kind, &init).unwrap();
    target.dispatch_event(&event).unwrap()
}

fn press(target: &EventTarget, key: &str) {
    let init = KeyboardEventInit::new();
    init.set_key(key);
    init.set_bubbles(true);
    init.set_cancelable(true);
    let event = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
    target.dispatch_event(&event).unwrap();
}

async fn sleep(ms: i32) {
    let promise = Promise::new(&mut |resolve, _| {
        let _ = window().set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
    });
    JsFuture::from(promise).await.unwrap();
}

fn style_of(element: &Element, property: &str) -> String {
    element
        .dyn_ref::<HtmlElement>()
        .unwrap()
        .style()
        .get_property_value(property)
        .unwrap()
}

#[wasm_bindgen_test]
fn theme_toggle_persists_and_syncs_aria() {
    let window = window();
    let storage = window.local_storage().unwrap().unwrap();
    storage.remove_item(THEME_STORAGE_KEY).unwrap();

    let document = fresh_document(r#"<button id="theme-toggle"></button>"#);
    install_theme(&window, &document);
    let button = by_id(&document, "theme-toggle");
    let root = document.document_element().unwrap();
    assert!(!root.class_list().contains("dark"));
    assert_eq!(button.get_attribute("aria-pressed").as_deref(), Some("false"));

    fire(&button, "click");
    assert!(root.class_list().contains("dark"));
    assert_eq!(storage.get_item(THEME_STORAGE_KEY).unwrap().as_deref(), Some("dark"));
    assert_eq!(button.get_attribute("aria-pressed").as_deref(), Some("true"));
    assert_eq!(
        button.get_attribute("aria-label").as_deref(),
        Some(Theme::Dark.aria_label())
    );

    press(&button, "Enter");
    assert!(!root.class_list().contains("dark"));
    assert_eq!(storage.get_item(THEME_STORAGE_KEY).unwrap().as_deref(), Some("light"));

    storage.remove_item(THEME_STORAGE_KEY).unwrap();
}

#[wasm_bindgen_test]
fn stored_dark_theme_applies_on_install() {
    let window = window();
    let storage = window.local_storage().unwrap().unwrap();
    storage.set_item(THEME_STORAGE_KEY, "dark").unwrap();

    let document = fresh_document(r#"<button id="theme-toggle"></button>"#);
    install_theme(&window, &document);
    assert!(document.document_element().unwrap().class_list().contains("dark"));

    storage.remove_item(THEME_STORAGE_KEY).unwrap();
}

#[wasm_bindgen_test]
fn nav_opens_and_closes() {
    let document = fresh_document(
        r#"<button id="nav-toggle"><span id="icon"></span></button>
           <nav id="nav"><a href="" id="plain-link">x</a></nav>
           <p id="outside"></p>"#,
    );
    install_nav(&window(), &document);
    let (nav, toggle) = (by_id(&document, "nav"), by_id(&document, "nav-toggle"));
    let is_open = || nav.class_list().contains("open");

    fire(&toggle, "click");
    assert!(is_open());
    assert_eq!(toggle.get_attribute("aria-expanded").as_deref(), Some("true"));

    press(&document, "Escape");
    assert!(!is_open());
    assert_eq!(toggle.get_attribute("aria-expanded").as_deref(), Some("false"));

    // A click on the icon inside the toggle is not an outside click
    fire(&by_id(&document, "icon"), "click");
    assert!(is_open());
    fire(&by_id(&document, "plain-link"), "click");
    assert!(is_open());

    fire(&by_id(&document, "outside"), "click");
    assert!(!is_open());
}

#[wasm_bindgen_test]
fn anchor_click_is_handled_in_page() {
    let document = fresh_document(
        r##"<a id="jump" href="#anchor-target">go</a>
           <a id="away" href="https://example.com/">away</a>
           <div id="anchor-target"></div>"##,
    );
    install_anchor_scroll(&window(), &document);

    let allowed = fire(&by_id(&document, "jump"), "click");
    assert!(!allowed);
    assert_eq!(window().location().hash().unwrap(), "#anchor-target");

    // External links keep their default action
    let away = by_id(&document, "away");
    let init = EventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    let event = Event::new_with_event_init_dict("click", &init).unwrap();
    away.dispatch_event(&event).unwrap();
    assert!(!event.default_prevented());
}

const CONTACT_FORM: &str = r#"
    <form id="contact-form" action="data:text/plain,ok">
      <input id="cf-name" name="name">
      <input id="cf-email" name="email">
      <textarea id="cf-message" name="message"></textarea>
      <input name="_honey" value="">
      <button id="cf-submit" type="submit">Send</button>
    </form>
    <p id="form-status"></p>"#;

#[wasm_bindgen_test]
fn contact_form_reports_missing_fields() {
    let document = fresh_document(CONTACT_FORM);
    install_contact_form(&window(), &document);
    let (form, status) = (by_id(&document, "contact-form"), by_id(&document, "form-status"));

    assert!(!fire(&form, "submit"));
    assert_eq!(
        status.text_content().unwrap_or_default(),
        ContactError::MissingFields.to_string()
    );
    assert_eq!(style_of(&status, "color"), "tomato");
    let button: HtmlButtonElement = by_id(&document, "cf-submit").unchecked_into();
    assert!(!button.disabled());
}

#[wasm_bindgen_test]
fn contact_form_goes_busy_while_sending() {
    let document = fresh_document(CONTACT_FORM);
    install_contact_form(&window(), &document);
    by_id(&document, "cf-name").unchecked_into::<HtmlInputElement>().set_value("Jana");
    by_id(&document, "cf-email")
        .unchecked_into::<HtmlInputElement>()
        .set_value("jana@example.com");
    by_id(&document, "cf-message")
        .unchecked_into::<HtmlTextAreaElement>()
        .set_value("Ahoj");

    fire(&by_id(&document, "contact-form"), "submit");
    let button: HtmlButtonElement = by_id(&document, "cf-submit").unchecked_into();
    assert!(button.disabled());
    assert_eq!(
        by_id(&document, "form-status").text_content().unwrap_or_default(),
        StatusLine::sending().text
    );
}

#[wasm_bindgen_test]
fn contact_form_catches_honeypot() {
    let document = fresh_document(CONTACT_FORM);
    install_contact_form(&window(), &document);
    by_id(&document, "cf-name").unchecked_into::<HtmlInputElement>().set_value("Bot");
    by_id(&document, "cf-email")
        .unchecked_into::<HtmlInputElement>()
        .set_value("bot@example.com");
    by_id(&document, "cf-message")
        .unchecked_into::<HtmlTextAreaElement>()
        .set_value("spam");
    document
        .query_selector("input[name=\"_honey\"]")
        .unwrap()
        .unwrap()
        .unchecked_into::<HtmlInputElement>()
        .set_value("filled");

    fire(&by_id(&document, "contact-form"), "submit");
    assert_eq!(
        by_id(&document, "form-status").text_content().unwrap_or_default(),
        ContactError::SpamDetected.to_string()
    );
}

#[wasm_bindgen_test]
async fn email_modal_fades_in_and_out() {
    let document = fresh_document(
        r#"<a id="email-card" href="">mail</a>
           <div id="email-modal" style="display: none">
             <div id="modal-box"><button class="close-modal">x</button></div>
           </div>"#,
    );
    install_email_modal(&window(), &document);
    let modal = by_id(&document, "email-modal");
    let body = document.body().unwrap();

    assert!(!fire(&by_id(&document, "email-card"), "click"));
    assert_eq!(style_of(&modal, "display"), "flex");
    assert!(body.class_list().contains("modal-open"));
    sleep(50).await;
    assert!(modal.class_list().contains("show"));

    // Clicks inside the dialog do not count as the backdrop
    fire(&by_id(&document, "modal-box"), "click");
    assert!(modal.class_list().contains("show"));

    let close = document.query_selector(".close-modal").unwrap().unwrap();
    fire(&close, "click");
    assert!(!modal.class_list().contains("show"));
    assert_eq!(style_of(&modal, "display"), "flex");
    sleep(400).await;
    assert_eq!(style_of(&modal, "display"), "none");
    assert!(!body.class_list().contains("modal-open"));

    // Backdrop click closes as well
    fire(&by_id(&document, "email-card"), "click");
    sleep(50).await;
    fire(&modal, "click");
    assert!(!modal.class_list().contains("show"));
    sleep(400).await;
    assert_eq!(style_of(&modal, "display"), "none");
}

#[wasm_bindgen_test]
fn project_cards_with_links_become_clickable() {
    let document = fresh_document(
        r#"<div class="projects-grid">
             <article class="project-card" id="linked"></article>
             <article class="project-card" id="unlinked"></article>
           </div>"#,
    );
    let links = ProjectLinks::new(vec!["https://a.example/".to_string(), String::new()]);
    install_project_cards(&window(), &document, &links);

    assert_eq!(style_of(&by_id(&document, "linked"), "cursor"), "pointer");
    assert_eq!(style_of(&by_id(&document, "unlinked"), "cursor"), "");
}

#[wasm_bindgen_test]
async fn settled_promise_runs_matching_handler() {
    let outcome: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

    let record = |prefix: &'static str| {
        let outcome = Rc::clone(&outcome);
        move |value: JsValue| {
            outcome
                .borrow_mut()
                .push(format!("{}:{}", prefix, value.as_string().unwrap_or_default()));
        }
    };
    on_settled(&Promise::resolve(&JsValue::from_str("done")), record("ok"), record("err"));
    on_settled(&Promise::reject(&JsValue::from_str("boom")), record("ok"), record("err"));
    sleep(0).await;

    assert_eq!(*outcome.borrow(), vec!["ok:done".to_string(), "err:boom".to_string()]);
}
