//! Snapshot capture for rendered pages
//!
//! A capture is a self-contained HTML snapshot of the settled page:
//! - scripts are removed so the snapshot stays as it was rendered
//! - stylesheets that do not apply to the emulated media type are removed
//! - the preferred color scheme is declared with a `color-scheme` meta tag
//! - a `<base>` element keeps relative resources pointing at the live site
//! - an optional header and footer identify the page and capture time

use crate::config::Media;
use crate::crawler::renderer::{CaptureOptions, PageHandle};
use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};
use scraper::{Html, Selector};

/// Builds the snapshot markup for a rendered page
pub fn build_snapshot(
    page: &PageHandle,
    options: &CaptureOptions,
    captured_at: DateTime<Utc>,
) -> String {
    let mut document = Html::parse_document(&page.html);

    remove_matching(&mut document, "script");
    remove_matching(&mut document, "meta[name='color-scheme']");
    remove_inapplicable_styles(&mut document, options.media);
    let has_base = Selector::parse("base[href]")
        .map(|selector| document.select(&selector).next().is_some())
        .unwrap_or(false);

    let mut html = document.html();

    let mut head_extras = format!(
        r#"<meta name="color-scheme" content="{}">"#,
        options.color_scheme.meta_content()
    );
    if !has_base {
        head_extras.push_str(&format!(
            r#"<base href="{}">"#,
            encode_double_quoted_attribute(page.url.as_str())
        ));
    }
    html = insert_after_open_tag(&html, "head", &head_extras);

    if options.header_footer {
        let title = page.title.as_deref().unwrap_or("Untitled");
        let header = format!(
            r#"<header class="sitepress-header"><strong>{}</strong> | <a href="{}">{}</a></header>"#,
            encode_text(title),
            encode_double_quoted_attribute(page.url.as_str()),
            encode_text(page.url.as_str())
        );
        let footer = format!(
            r#"<footer class="sitepress-footer">Captured {} ({} media, {} color scheme)</footer>"#,
            captured_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            options.media,
            options.color_scheme
        );
        html = insert_after_open_tag(&html, "body", &header);
        html = insert_before_close_tag(&html, "body", &footer);
    }

    html
}

/// Returns true if a `media` attribute value applies to `media`
///
/// Any query without a media type (`(min-width: 600px)`), `all`, or the
/// emulated type applies. `not <type>` applies to every other type.
pub fn media_applies(attribute: &str, media: Media) -> bool {
    let target = media.as_str();
    attribute.split(',').any(|query| {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return true;
        }
        let query = query.strip_prefix("only ").unwrap_or(&query).trim_start();
        let (negated, query) = match query.strip_prefix("not ") {
            Some(rest) => (true, rest.trim_start()),
            None => (false, query),
        };
        let media_type = query.split_whitespace().next().unwrap_or("all");
        if media_type.starts_with('(') {
            return !negated;
        }
        let matches = media_type == "all" || media_type == target;
        matches != negated
    })
}

fn remove_inapplicable_styles(document: &mut Html, media: Media) {
    let selector = match Selector::parse("link[rel~='stylesheet'][media], style[media]") {
        Ok(selector) => selector,
        Err(_) => return,
    };
    let ids: Vec<_> = document
        .select(&selector)
        .filter(|element| {
            element
                .value()
                .attr("media")
                .map(|value| !media_applies(value, media))
                .unwrap_or(false)
        })
        .map(|element| element.id())
        .collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn remove_matching(document: &mut Html, css: &str) {
    let selector = match Selector::parse(css) {
        Ok(selector) => selector,
        Err(_) => return,
    };
    let ids: Vec<_> = document.select(&selector).map(|element| element.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Inserts `snippet` right after the first `<tag ...>` opening tag
fn insert_after_open_tag(html: &str, tag: &str, snippet: &str) -> String {
    let open = format!("<{}", tag);
    let mut search_from = 0;
    while let Some(found) = html[search_from..].find(&open) {
        let start = search_from + found;
        let after_name = start + open.len();
        let next = html[after_name..].chars().next();
        if matches!(next, Some('>') | Some(' ') | Some('\t') | Some('\n') | Some('/')) {
            if let Some(close) = html[after_name..].find('>') {
                let insert_at = after_name + close + 1;
                let mut out = String::with_capacity(html.len() + snippet.len());
                out.push_str(&html[..insert_at]);
                out.push_str(snippet);
                out.push_str(&html[insert_at..]);
                return out;
            }
        }
        search_from = after_name;
    }
    html.to_string()
}

/// Inserts `snippet` right before the last `</tag>`
fn insert_before_close_tag(html: &str, tag: &str, snippet: &str) -> String {
    let close = format!("</{}>", tag);
    match html.rfind(&close) {
        Some(index) => {
            let mut out = String::with_capacity(html.len() + snippet.len());
            out.push_str(&html[..index]);
            out.push_str(snippet);
            out.push_str(&html[index..]);
            out
        }
        None => format!("{}{}", html, snippet),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorScheme;
    use chrono::TimeZone;
    use url::Url;

    fn page(html: &str) -> PageHandle {
        PageHandle {
            url: Url::parse("https://site.example/docs/a").unwrap(),
            title: Some("Docs & More".to_string()),
            html: html.to_string(),
        }
    }

    fn captured_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_media_applies() {
        assert!(media_applies("all", Media::Print));
        assert!(media_applies("print", Media::Print));
        assert!(!media_applies("print", Media::Screen));
        assert!(media_applies("screen, print", Media::Print));
        assert!(media_applies("only screen and (min-width: 600px)", Media::Screen));
        assert!(!media_applies("only screen and (min-width: 600px)", Media::Print));
        assert!(media_applies("(prefers-color-scheme: dark)", Media::Print));
        assert!(media_applies("not print", Media::Screen));
        assert!(!media_applies("not print", Media::Print));
        assert!(media_applies("", Media::Screen));
    }

    #[test]
    fn test_snapshot_declares_color_scheme_and_base() {
        let options = CaptureOptions {
            color_scheme: ColorScheme::Dark,
            ..CaptureOptions::default()
        };
        let html = build_snapshot(
            &page(r#"<html><head><meta name="color-scheme" content="light"></head><body>Hi</body></html>"#),
            &options,
            captured_at(),
        );

        assert!(html.contains(r#"<meta name="color-scheme" content="dark">"#));
        assert!(!html.contains(r#"content="light""#));
        assert!(html.contains(r#"<base href="https://site.example/docs/a">"#));
    }

    #[test]
    fn test_existing_base_is_kept() {
        let html = build_snapshot(
            &page(r#"<html><head><base href="https://cdn.site.example/"></head><body></body></html>"#),
            &CaptureOptions::default(),
            captured_at(),
        );
        assert_eq!(html.matches("<base").count(), 1);
        assert!(html.contains("https://cdn.site.example/"));
    }

    #[test]
    fn test_scripts_removed() {
        let html = build_snapshot(
            &page(r#"<html><head><script>alert(1)</script></head><body><script src="/app.js"></script>Text</body></html>"#),
            &CaptureOptions::default(),
            captured_at(),
        );
        assert!(!html.contains("<script"));
        assert!(html.contains("Text"));
    }

    #[test]
    fn test_print_media_drops_screen_stylesheets() {
        let source = r#"<html><head>
            <link rel="stylesheet" href="/screen.css" media="screen">
            <link rel="stylesheet" href="/print.css" media="print">
            <link rel="stylesheet" href="/base.css">
        </head><body></body></html>"#;
        let options = CaptureOptions {
            media: Media::Print,
            ..CaptureOptions::default()
        };
        let html = build_snapshot(&page(source), &options, captured_at());

        assert!(!html.contains("/screen.css"));
        assert!(html.contains("/print.css"));
        assert!(html.contains("/base.css"));
    }

    #[test]
    fn test_header_and_footer() {
        let options = CaptureOptions {
            header_footer: true,
            ..CaptureOptions::default()
        };
        let html = build_snapshot(
            &page("<html><head></head><body><header>Site nav</header><p>Body</p></body></html>"),
            &options,
            captured_at(),
        );

        let header_at = html.find("sitepress-header").unwrap();
        let nav_at = html.find("Site nav").unwrap();
        assert!(header_at < nav_at);
        assert!(html.contains("<strong>Docs &amp; More</strong>"));
        assert!(html.contains("Captured 2024-05-01T12:00:00Z (screen media, light color scheme)"));
        assert!(html.find("sitepress-footer").unwrap() < html.rfind("</body>").unwrap());
    }

    #[test]
    fn test_no_header_footer_by_default() {
        let html = build_snapshot(
            &page("<html><head></head><body>Body</body></html>"),
            &CaptureOptions::default(),
            captured_at(),
        );
        assert!(!html.contains("sitepress-header"));
        assert!(!html.contains("sitepress-footer"));
    }

    #[test]
    fn test_insert_after_open_tag_skips_longer_names() {
        let html = "<header>x</header><head>";
        assert_eq!(
            insert_after_open_tag(html, "head", "!"),
            "<header>x</header><head>!"
        );
    }

    #[test]
    fn test_header_escapes_title_markup() {
        let options = CaptureOptions {
            header_footer: true,
            ..CaptureOptions::default()
        };
        let mut source = page("<html><head></head><body></body></html>");
        source.title = Some("<img src=x onerror=alert(1)> & Co".to_string());
        let html = build_snapshot(&source, &options, captured_at());

        assert!(html.contains("<strong>&lt;img src=x onerror=alert(1)&gt; &amp; Co</strong>"));
        assert!(!html.contains("<img"));
    }
}
