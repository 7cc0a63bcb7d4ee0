use std::cell::RefCell;
use std::rc::Rc;

use super::{Dom, Selector};

/// Handle to an element stored in a `MemoryDom`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: Vec::new(),
            style: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// In-memory element tree for headless runs and tests
///
/// Clones share the same tree. Detached elements keep their storage, so a
/// `NodeId` stays valid for the life of the tree.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Rc<RefCell<Vec<NodeData>>>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Create a document holding only an `html` root
    pub fn new() -> Self {
        Self {
            nodes: Rc::new(RefCell::new(vec![NodeData::new("html")])),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Create a detached element
    pub fn create(&self, tag: &str, classes: &[&str]) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let mut data = NodeData::new(tag);
        data.classes = classes.iter().map(|c| c.to_string()).collect();
        nodes.push(data);
        NodeId(nodes.len() - 1)
    }

    /// Attach a detached element as the last child of `parent`
    pub fn append(&self, parent: NodeId, child: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(parent);
        nodes[parent.0].children.push(child);
    }

    /// Remove `node` (and its subtree) from its parent
    pub fn detach(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    /// Create an element and append it under `parent`
    pub fn element(&self, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
        let id = self.create(tag, classes);
        self.append(parent, id);
        id
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let attributes = &mut nodes[node.0].attributes;
        match attributes.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.nodes.borrow()[node.0].classes.clone()
    }

    pub fn style_property(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0]
            .style
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node.0].parent
    }

    /// Ancestors of `node`, nearest first
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut current = nodes[node.0].parent;
        while let Some(id) = current {
            out.push(id);
            current = nodes[id.0].parent;
        }
        out
    }

    /// Every element under `root` (root excluded) in document order
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = nodes[root.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            // Reverse so the first child is visited first
            stack.extend(nodes[id.0].children.iter().rev().copied());
        }
        out
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn document_root(&self) -> Option<NodeId> {
        Some(self.root())
    }

    fn select_all(&self, root: &NodeId, selector: &Selector<'_>) -> Vec<NodeId> {
        self.descendants(*root)
            .into_iter()
            .filter(|id| self.matches(id, selector))
            .collect()
    }

    fn matches(&self, node: &NodeId, selector: &Selector<'_>) -> bool {
        match selector {
            Selector::Tag(tag) => self.nodes.borrow()[node.0].tag.eq_ignore_ascii_case(tag),
            Selector::Class(class) => self.has_class(node, class),
            Selector::ClassWithin { ancestor, class } => {
                self.has_class(node, class)
                    && self.ancestors(*node).iter().any(|a| self.has_class(a, ancestor))
            }
        }
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes.borrow()[node.0].classes.iter().any(|c| c == class)
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.nodes.borrow_mut()[node.0].classes.push(class.to_string());
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.nodes.borrow_mut()[node.0].classes.retain(|c| c != class);
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0]
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    fn set_style_property(&self, node: &NodeId, name: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let style = &mut nodes[node.0].style;
        match style.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => style.push((name.to_string(), value.to_string())),
        }
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        *node == self.root() || self.ancestors(*node).last() == Some(&self.root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (MemoryDom, NodeId, NodeId, NodeId) {
        let dom = MemoryDom::new();
        let body = dom.element(dom.root(), "body", &[]);
        let hero = dom.element(body, "div", &["hero-cta"]);
        let btn = dom.element(hero, "a", &["btn"]);
        let loose = dom.element(body, "a", &["btn"]);
        (dom, hero, btn, loose)
    }

    #[test]
    fn test_descendants_document_order() {
        let (dom, hero, btn, loose) = sample();
        let all = dom.descendants(dom.root());
        assert_eq!(all.len(), 4);
        let pos = |id| all.iter().position(|n| *n == id).unwrap();
        assert!(pos(hero) < pos(btn));
        assert!(pos(btn) < pos(loose));
    }

    #[test]
    fn test_class_within_needs_ancestor() {
        let (dom, _, btn, loose) = sample();
        let sel = Selector::ClassWithin { ancestor: "hero-cta", class: "btn" };
        assert!(dom.matches(&btn, &sel));
        assert!(!dom.matches(&loose, &sel));
    }

    #[test]
    fn test_tag_match_ignores_case() {
        let dom = MemoryDom::new();
        let h = dom.element(dom.root(), "H2", &[]);
        assert!(dom.matches(&h, &Selector::Tag("h2")));
    }

    #[test]
    fn test_add_class_is_idempotent() {
        let (dom, hero, _, _) = sample();
        dom.add_class(&hero, "x");
        dom.add_class(&hero, "x");
        assert_eq!(dom.classes(hero), vec!["hero-cta", "x"]);
        dom.remove_class(&hero, "x");
        assert!(!dom.has_class(&hero, "x"));
    }

    #[test]
    fn test_detach_disconnects_subtree() {
        let (dom, hero, btn, loose) = sample();
        assert!(dom.is_connected(&btn));
        dom.detach(hero);
        assert!(!dom.is_connected(&hero));
        assert!(!dom.is_connected(&btn));
        assert!(dom.is_connected(&loose));
        assert_eq!(dom.descendants(dom.root()).len(), 2);
    }

    #[test]
    fn test_select_inclusive_includes_root() {
        let dom = MemoryDom::new();
        let section = dom.create("section", &[]);
        dom.element(section, "section", &[]);
        assert_eq!(dom.select_all(&section, &Selector::Tag("section")).len(), 1);
        assert_eq!(dom.select_inclusive(&section, &Selector::Tag("section")).len(), 2);
    }

    #[test]
    fn test_attributes_and_style() {
        let (dom, hero, _, _) = sample();
        dom.set_attribute(hero, "data-once", "false");
        assert_eq!(dom.attribute(&hero, "data-once").as_deref(), Some("false"));
        dom.set_style_property(&hero, "--sr-delay", "0ms");
        dom.set_style_property(&hero, "--sr-delay", "50ms");
        assert_eq!(dom.style_property(hero, "--sr-delay").as_deref(), Some("50ms"));
    }
}
