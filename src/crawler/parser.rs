//! HTML parser for extracting link targets and element ids
//!
//! The extractor is pure: it only reads the document and never resolves,
//! filters or normalizes anything.

use scraper::{Html, Selector};
use std::collections::HashSet;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Distinct `<a href>` values, first occurrence order
    pub links: Vec<String>,

    /// Distinct `id` attribute values, document order
    pub ids: Vec<String>,
}

/// Parses HTML content and extracts hyperlink targets and element ids
///
/// # Example
///
/// ```
/// use anchorwatch::crawler::parse_html;
///
/// let html = r#"<h1 id="top">Title</h1><a href="/a">A</a><a href="/a">again</a>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.links, vec!["/a"]);
/// assert_eq!(parsed.ids, vec!["top"]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        links: distinct_attr_values(&document, "a[href]", "href"),
        ids: distinct_attr_values(&document, "[id]", "id"),
    }
}

/// Collects each distinct value of `attr` on elements matching `selector`
fn distinct_attr_values(document: &Html, selector: &str, attr: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attr))
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}
