use crate::parsers::{Anchor, ParseResult};
use scraper::{ElementRef, Html, Selector};

/// Id of the element wrapping an article's body in rendered MediaWiki pages
pub const CONTENT_ID: &str = "mw-content-text";

/// Parses an article document, keeping only the main content region.
///
/// Navigation chrome, sidebars and footers sit outside `#mw-content-text`
/// and contribute nothing.
pub fn parse(html: &str) -> ParseResult {
    let doc = Html::parse_document(html);

    // Find the main content region
    let content_selector = Selector::parse(&format!("#{}", CONTENT_ID)).expect("valid selector");
    let Some(content) = doc.select(&content_selector).next() else {
        ::log::debug!("Document has no #{} region", CONTENT_ID);
        return ParseResult::default();
    };

    // Extract links from it
    let anchors = collect_anchors(content);

    ::log::debug!("HTML parser found {} anchors", anchors.len());
    if !anchors.is_empty() {
        ::log::trace!(
            "First few anchors: {:?}",
            anchors.iter().take(5).map(|a| &a.href).collect::<Vec<_>>()
        );
    }

    ParseResult::new(content.html(), anchors)
}

/// Extracts every `<a href>` below `root`
fn collect_anchors(root: ElementRef<'_>) -> Vec<Anchor> {
    let link_selector = Selector::parse("a[href]").expect("valid selector");
    root.select(&link_selector)
        .filter_map(|e| {
            let href = e.value().attr("href")?;
            let text = e
                .text()
                .collect::<Vec<_>>()
                .join(" ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            Some(Anchor {
                href: href.to_string(),
                text,
            })
        })
        .collect()
}
