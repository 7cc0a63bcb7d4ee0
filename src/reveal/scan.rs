use super::category::{Category, CARD, HEADING, STAGGER_GROUP};
use crate::config::ClassNames;
use crate::dom::{Dom, Selector};

const SECTION: Selector<'static> = Selector::Tag("section");

/// Structural selectors other than `section`, which has its own rule
const CONTENT_SELECTORS: [Selector<'static>; 8] = [
    HEADING,
    CARD,
    STAGGER_GROUP,
    Selector::Class("contact-grid"),
    Selector::Class("about-grid"),
    Selector::Class("hero-text"),
    Selector::Class("hero-card"),
    Selector::ClassWithin { ancestor: "hero-cta", class: "btn" },
];

/// Walks a subtree and tags everything that should reveal on scroll
pub struct Scanner<'a, D: Dom> {
    dom: &'a D,
    classes: &'a ClassNames,
}

impl<'a, D: Dom> Scanner<'a, D> {
    pub fn new(dom: &'a D, classes: &'a ClassNames) -> Self {
        Self { dom, classes }
    }

    /// Tag the subtree at `root` (root included). Returns only the elements
    /// that were newly tagged, so a second pass over the same tree returns
    /// nothing.
    pub fn scan(&self, root: &D::Node) -> Vec<(D::Node, Category)> {
        let mut tagged = Vec::new();
        let sections = self.dom.select_inclusive(root, &SECTION);

        // Relocate before tagging so the wrapper is classified on its own
        for section in &sections {
            if !self.dom.has_class(section, &self.classes.marker) {
                continue;
            }
            if let Some(inner) = self.inner_wrapper(section) {
                self.dom.remove_class(section, &self.classes.marker);
                self.tag(&inner, &mut tagged);
            }
        }

        for section in &sections {
            let content = self.inner_wrapper(section).unwrap_or_else(|| section.clone());
            self.tag(&content, &mut tagged);
        }

        for selector in &CONTENT_SELECTORS {
            for node in self.dom.select_inclusive(root, selector) {
                self.tag(&node, &mut tagged);
            }
        }

        tagged
    }

    fn inner_wrapper(&self, section: &D::Node) -> Option<D::Node> {
        self.dom
            .select_first(section, &Selector::Class(&self.classes.container))
    }

    fn tag(&self, node: &D::Node, tagged: &mut Vec<(D::Node, Category)>) {
        if self.dom.has_class(node, &self.classes.marker) {
            return;
        }
        let category = Category::classify(self.dom, node);
        self.dom.add_class(node, &self.classes.marker);
        if let Some(class) = category.class_name(self.classes) {
            self.dom.add_class(node, class);
        }
        tagged.push((node.clone(), category));
    }
}
