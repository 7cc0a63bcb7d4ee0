/// The small selector vocabulary the page structure needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// Element name, e.g. `section`
    Tag(&'a str),
    /// Single class, e.g. `.project-card`
    Class(&'a str),
    /// Class nested somewhere under an ancestor class, e.g. `.hero-cta .btn`
    ClassWithin { ancestor: &'a str, class: &'a str },
}

impl<'a> Selector<'a> {
    /// CSS text for backends that delegate matching to the browser
    pub fn css(&self) -> String {
        match self {
            Selector::Tag(tag) => tag.to_string(),
            Selector::Class(class) => format!(".{}", class),
            Selector::ClassWithin { ancestor, class } => format!(".{} .{}", ancestor, class),
        }
    }
}
