use crate::config::ClassNames;
use crate::dom::{Dom, Selector};

pub const HEADING: Selector<'static> = Selector::Tag("h2");
pub const CARD: Selector<'static> = Selector::Class("project-card");
pub const STAGGER_GROUP: Selector<'static> = Selector::Class("projects-grid");

/// How a reveal target animates, fixed when it is tagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    /// Generic content block, no category class
    #[default]
    Plain,
    Heading,
    Card,
    /// Children reveal one after another instead of the element itself
    StaggerGroup,
}

impl Category {
    /// Classify by structure. Precedence is heading > card > stagger > plain.
    pub fn classify<D: Dom>(dom: &D, node: &D::Node) -> Self {
        if dom.matches(node, &HEADING) {
            Category::Heading
        } else if dom.matches(node, &CARD) {
            Category::Card
        } else if dom.matches(node, &STAGGER_GROUP) {
            Category::StaggerGroup
        } else {
            Category::Plain
        }
    }

    /// Recover the category of an element that was tagged before the
    /// engine saw it, from the category class it carries
    pub fn from_classes<D: Dom>(dom: &D, node: &D::Node, classes: &ClassNames) -> Self {
        if dom.has_class(node, &classes.heading) {
            Category::Heading
        } else if dom.has_class(node, &classes.card) {
            Category::Card
        } else if dom.has_class(node, &classes.stagger) {
            Category::StaggerGroup
        } else {
            Category::Plain
        }
    }

    /// Class written next to the marker, if any
    pub fn class_name<'a>(&self, classes: &'a ClassNames) -> Option<&'a str> {
        match self {
            Category::Plain => None,
            Category::Heading => Some(&classes.heading),
            Category::Card => Some(&classes.card),
            Category::StaggerGroup => Some(&classes.stagger),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    #[test]
    fn test_classify_precedence() {
        let dom = MemoryDom::new();
        let root = dom.root();
        let heading_card = dom.element(root, "h2", &["project-card"]);
        let card_grid = dom.element(root, "div", &["project-card", "projects-grid"]);
        let grid = dom.element(root, "div", &["projects-grid"]);
        let plain = dom.element(root, "div", &["about-grid"]);

        assert_eq!(Category::classify(&dom, &heading_card), Category::Heading);
        assert_eq!(Category::classify(&dom, &card_grid), Category::Card);
        assert_eq!(Category::classify(&dom, &grid), Category::StaggerGroup);
        assert_eq!(Category::classify(&dom, &plain), Category::Plain);
    }

    #[test]
    fn test_from_classes() {
        let dom = MemoryDom::new();
        let classes = ClassNames::default();
        let group = dom.element(dom.root(), "div", &["animate-on-scroll", "stagger-group"]);
        let bare = dom.element(dom.root(), "div", &["animate-on-scroll"]);
        assert_eq!(Category::from_classes(&dom, &group, &classes), Category::StaggerGroup);
        assert_eq!(Category::from_classes(&dom, &bare, &classes), Category::Plain);
    }

    #[test]
    fn test_class_name() {
        let classes = ClassNames::default();
        assert_eq!(Category::Plain.class_name(&classes), None);
        assert_eq!(Category::Card.class_name(&classes), Some("card"));
        assert_eq!(Category::StaggerGroup.class_name(&classes), Some("stagger-group"));
    }
}
