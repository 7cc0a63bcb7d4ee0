/// Cards that open a project page when clicked anywhere outside a link
pub const PROJECT_CARD_SELECTOR: &str = ".projects-grid .project-card";

/// Click-through targets for the project cards, by card position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectLinks {
    links: Vec<String>,
}

impl ProjectLinks {
    pub fn new(links: Vec<String>) -> Self {
        Self { links }
    }

    pub fn is_empty(&self) -> bool {
        self.links.iter().all(|l| l.trim().is_empty())
    }

    /// URL for the card at `index`; blank entries leave the card inert
    pub fn link_for(&self, index: usize) -> Option<&str> {
        self.links
            .get(index)
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
    }
}
