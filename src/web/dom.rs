use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::dom::{Dom, Selector};

/// Live browser document
#[derive(Debug, Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn document_root(&self) -> Option<Element> {
        self.document.document_element()
    }

    fn select_all(&self, root: &Element, selector: &Selector<'_>) -> Vec<Element> {
        let Ok(list) = root.query_selector_all(&selector.css()) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn matches(&self, node: &Element, selector: &Selector<'_>) -> bool {
        node.matches(&selector.css()).unwrap_or(false)
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        let children = node.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .collect()
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_style_property(&self, node: &Element, name: &str, value: &str) {
        // Only HTML elements carry an inline style we can write to
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            let _ = element.style().set_property(name, value);
        }
    }

    fn is_connected(&self, node: &Element) -> bool {
        node.is_connected()
    }
}
