//! Element-tree abstraction shared by the browser and headless backends
//!
//! The reveal engine only reads and writes classes, one attribute and one
//! inline style property, so that is all the trait exposes.

pub mod memory;
pub mod selector;

pub use memory::{MemoryDom, NodeId};
pub use selector::Selector;

use std::fmt::Debug;

/// A document the engine can scan and tag
///
/// Implementations are cheap handles: cloning one must refer to the same
/// underlying tree, because deferred reveals carry their own clone.
pub trait Dom: Clone + 'static {
    type Node: Clone + PartialEq + Debug + 'static;

    /// Root element of the document, if there is one
    fn document_root(&self) -> Option<Self::Node>;

    /// Descendants of `root` (root excluded) matching `selector`, in document order
    fn select_all(&self, root: &Self::Node, selector: &Selector<'_>) -> Vec<Self::Node>;

    fn matches(&self, node: &Self::Node, selector: &Selector<'_>) -> bool;

    /// Direct element children in order
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Set an inline style property such as a CSS custom property
    fn set_style_property(&self, node: &Self::Node, name: &str, value: &str);

    /// Whether `node` is still attached to the document
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// Like `select_all`, but `root` itself is included when it matches
    fn select_inclusive(&self, root: &Self::Node, selector: &Selector<'_>) -> Vec<Self::Node> {
        let mut found = Vec::new();
        if self.matches(root, selector) {
            found.push(root.clone());
        }
        found.extend(self.select_all(root, selector));
        found
    }

    /// First descendant of `root` matching `selector`
    fn select_first(&self, root: &Self::Node, selector: &Selector<'_>) -> Option<Self::Node> {
        self.select_all(root, selector).into_iter().next()
    }
}
