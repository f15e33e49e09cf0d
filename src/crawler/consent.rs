//! Best-effort dismissal of cookie and consent overlays
//!
//! Consent banners are found with a ranked list of selectors for common
//! consent platforms followed by generic patterns. The first selector that
//! matches anything wins and every element it matches is removed from the
//! document. Nothing here is allowed to fail a render.

use scraper::{Html, Selector};

/// Consent overlay selectors, most specific first
const CONSENT_SELECTORS: &[&str] = &[
    "#onetrust-consent-sdk",
    "#onetrust-banner-sdk",
    "#CybotCookiebotDialog",
    "#usercentrics-root",
    "#didomi-host",
    ".qc-cmp2-container",
    "#truste-consent-track",
    ".cc-window",
    "#cookie-banner",
    "#cookie-consent",
    "#cookie-notice",
    ".cookie-banner",
    ".cookie-consent",
    ".cookie-notice",
    "[id*='cookie'][role='dialog']",
    "[class*='cookie'][role='dialog']",
    "[aria-label*='cookie']",
    "[aria-label*='consent']",
];

/// Removes the first kind of consent overlay found in `document`
///
/// Returns the selector that matched, or `None` when the page had no
/// recognizable overlay.
pub fn dismiss_overlays(document: &mut Html) -> Option<&'static str> {
    for &candidate in CONSENT_SELECTORS {
        let selector = match Selector::parse(candidate) {
            Ok(selector) => selector,
            Err(_) => continue,
        };

        let ids: Vec<_> = document.select(&selector).map(|element| element.id()).collect();
        if ids.is_empty() {
            continue;
        }

        for id in ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
        return Some(candidate);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_known_platform_banner() {
        let mut document = Html::parse_document(
            r#"<html><body><p>Content</p><div id="onetrust-consent-sdk"><button>Accept</button></div></body></html>"#,
        );

        assert_eq!(dismiss_overlays(&mut document), Some("#onetrust-consent-sdk"));
        let html = document.html();
        assert!(html.contains("Content"));
        assert!(!html.contains("Accept"));
    }

    #[test]
    fn test_first_ranked_selector_wins() {
        let mut document = Html::parse_document(
            r#"<html><body>
                <div class="cookie-banner">generic</div>
                <div id="CybotCookiebotDialog">platform</div>
            </body></html>"#,
        );

        assert_eq!(dismiss_overlays(&mut document), Some("#CybotCookiebotDialog"));
        let html = document.html();
        assert!(!html.contains("platform"));
        assert!(html.contains("generic"));
    }

    #[test]
    fn test_removes_every_match_of_winning_selector() {
        let mut document = Html::parse_document(
            r#"<html><body><div class="cookie-notice">one</div><div class="cookie-notice">two</div></body></html>"#,
        );

        assert_eq!(dismiss_overlays(&mut document), Some(".cookie-notice"));
        let html = document.html();
        assert!(!html.contains("one"));
        assert!(!html.contains("two"));
    }

    #[test]
    fn test_page_without_overlay_is_untouched() {
        let source = r#"<html><head></head><body><a href="/a">A</a></body></html>"#;
        let mut document = Html::parse_document(source);
        let before = document.html();

        assert_eq!(dismiss_overlays(&mut document), None);
        assert_eq!(document.html(), before);
    }
}
