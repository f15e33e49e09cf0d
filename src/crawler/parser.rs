//! HTML parser for extracting links and metadata
//!
//! This module settles a fetched document:
//! - dismisses consent overlays
//! - extracts the page title
//! - collects raw link references to follow

use crate::crawler::consent::dismiss_overlays;
use scraper::{Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Raw `href` values as written in the document
    pub links: Vec<String>,

    /// Document markup after overlay dismissal
    pub html: String,

    /// Consent selector that matched, if an overlay was dismissed
    pub dismissed_overlay: Option<&'static str>,
}

/// Parses HTML content and extracts links and metadata
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - links inside a dismissed consent overlay
///
/// References are returned exactly as written; resolving and filtering them
/// is the caller's job.
///
/// # Example
///
/// ```
/// use sitepress::crawler::parse_html;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["/page".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let mut document = Html::parse_document(html);

    let dismissed_overlay = dismiss_overlays(&mut document);
    let title = extract_title(&document);
    let links = extract_links(&document);

    ParsedPage {
        title,
        links,
        html: document.html(),
        dismissed_overlay,
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| {
            element
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|s| !s.is_empty())
}

/// Collects the raw references of every followable link
fn extract_links(document: &Html) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }
            if let Some(href) = element.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }

    if let Ok(canonical_selector) = Selector::parse("link[rel='canonical'][href]") {
        for element in document.select(&canonical_selector) {
            if let Some(href) = element.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }

    links
}
