pub mod html;

/// An `<a href>` element as found in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Raw `href` attribute
    pub href: String,
    /// Visible text, whitespace collapsed
    pub text: String,
}

/// Result of parsing an article document
#[derive(Debug, Default)]
pub struct ParseResult {
    /// Rendered HTML of the main content region (empty if the region is missing)
    pub content: String,
    /// Anchors inside the main content region, in document order
    pub anchors: Vec<Anchor>,
}

impl ParseResult {
    /// Creates a new parse result with the given content and anchors
    pub fn new(content: String, anchors: Vec<Anchor>) -> Self {
        Self { content, anchors }
    }
}
