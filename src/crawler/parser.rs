//! HTML parser for extracting links and visible text
//!
//! This module handles parsing HTML content to extract:
//! - Raw href values of anchors to follow
//! - The visible text of the page, for keyword matching

use scraper::{Html, Node, Selector};
use std::collections::HashSet;

/// Elements whose text content is never visible
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Distinct raw href attribute values in first-seen order, unresolved
    pub hrefs: Vec<String>,

    /// Visible text, one non-empty chunk per line
    pub text: String,
}

/// Parses HTML content and extracts anchor hrefs and visible text
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
///
/// Hrefs are returned exactly as written, each at most once; resolving and
/// filtering them is the normalizer's job. Error recovery in the HTML parser can
/// clone an unclosed anchor into later elements, so the same href may appear
/// more times in the tree than in the source.
///
/// # Example
///
/// ```
/// use keyword_scout::crawler::parse_html;
///
/// let html = r#"<html><body><a href="/page">Link</a><script>x()</script></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.hrefs, vec!["/page"]);
/// assert_eq!(parsed.text, "Link");
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        hrefs: extract_hrefs(&document),
        text: extract_text(&document),
    }
}

/// Extracts the distinct anchor hrefs from the HTML document
fn extract_hrefs(document: &Html) -> Vec<String> {
    let mut hrefs = Vec::new();
    let mut seen = HashSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if seen.insert(href) {
                    hrefs.push(href.to_string());
                }
            }
        }
    }

    hrefs
}

/// Extracts visible text with scripting and styling removed
///
/// Each text node is split into lines and on runs of two spaces; every
/// non-empty trimmed chunk becomes one output line.
fn extract_text(document: &Html) -> String {
    let mut chunks: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let content: &str = text;
        chunks.extend(
            content
                .lines()
                .flat_map(|line| line.split("  "))
                .map(str::trim)
                .filter(|chunk| !chunk.is_empty()),
        );
    }

    chunks.join("\n")
}
