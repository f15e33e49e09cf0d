//! Deterministic artifact file names

use sha2::{Digest, Sha256};
use url::Url;

/// Longest file stem produced, in UTF-8 bytes, including the URL hash
pub const MAX_STEM_BYTES: usize = 200;

/// Bytes of the URL digest kept in the name (two hex characters each)
const HASH_BYTES: usize = 4;

/// Builds the artifact file name for a captured page
///
/// The name is `{title}-{suffix}-{hash}.html` where the suffix is the last
/// two non-empty segments of the URL path (`index` for the root path) and
/// the hash is a short SHA-256 digest of the full URL. The readable part is
/// lowercased and every run of non-alphanumeric characters becomes a single
/// `-`. The stem never exceeds [`MAX_STEM_BYTES`] bytes, so names stay
/// inside common filesystem limits whatever script the title is in.
///
/// # Example
///
/// ```
/// use sitepress::output::artifact_name;
/// use url::Url;
///
/// let url = Url::parse("https://site.example/docs/guide/setup/").unwrap();
/// let name = artifact_name(Some("Setup: Quick Start"), &url);
/// assert!(name.starts_with("setup-quick-start-guide-setup-"));
/// assert!(name.ends_with(".html"));
/// ```
pub fn artifact_name(title: Option<&str>, url: &Url) -> String {
    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("untitled");
    let readable = collapse(&format!("{}-{}", title, path_suffix(url)));
    let hash = short_hash(url);

    let budget = MAX_STEM_BYTES - hash.len() - 1;
    let mut bounded = truncate_to_bytes(&readable, budget).to_string();
    while bounded.ends_with('-') {
        bounded.pop();
    }
    if bounded.is_empty() {
        bounded.push_str("page");
    }
    format!("{}-{}.html", bounded, hash)
}

fn short_hash(url: &Url) -> String {
    let digest = Sha256::digest(url.as_str().as_bytes());
    hex::encode(&digest[..HASH_BYTES])
}

fn path_suffix(url: &Url) -> String {
    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    match segments.len() {
        0 => "index".to_string(),
        n => segments[n.saturating_sub(2)..].join("-"),
    }
}

/// Longest prefix of `text` that fits in `max` bytes on a char boundary
fn truncate_to_bytes(text: &str, max: usize) -> &str {
    let mut end = 0;
    for (index, c) in text.char_indices() {
        let next = index + c.len_utf8();
        if next > max {
            break;
        }
        end = next;
    }
    &text[..end]
}

/// Lowercases and collapses every non-alphanumeric run to one `-`
fn collapse(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_separator = false;
    for c in raw.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(c);
        } else {
            pending_separator = true;
        }
    }
    out
}
