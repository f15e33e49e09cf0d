//! URL handling module for Sitepress
//!
//! This module turns raw hyperlink references found on a page into canonical,
//! same-origin URLs, or explains why a reference is not followed.

mod extension;

pub use extension::ignored_extension;

use crate::{ConfigError, Rejection};
use url::{ParseError, Url};

/// The boundary of one crawl: its root, the root's origin and the
/// configured exclusion substrings
#[derive(Debug, Clone)]
pub struct CrawlScope {
    /// The crawl root, fragment stripped
    root: Url,

    /// `scheme://host[:port]/` of the root
    origin_root: Url,

    /// Substrings that exclude a URL when contained anywhere in it
    exclusions: Vec<String>,
}

impl CrawlScope {
    /// Creates a scope from the root URL and exclusion substrings
    ///
    /// The root must be an absolute `http` or `https` URL with a host. Its
    /// fragment is dropped. Empty exclusion strings are discarded since they
    /// would match every URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitepress::url::CrawlScope;
    ///
    /// let scope = CrawlScope::new("https://site.example/docs/#top", vec![]).unwrap();
    /// assert_eq!(scope.root().as_str(), "https://site.example/docs/");
    /// ```
    pub fn new(root: &str, exclusions: Vec<String>) -> Result<Self, ConfigError> {
        let mut root = Url::parse(root.trim())
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid root URL '{}': {}", root, e)))?;

        if root.scheme() != "http" && root.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Root URL must use http or https, got: {}",
                root.scheme()
            )));
        }
        if root.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Root URL has no host: {}",
                root
            )));
        }
        root.set_fragment(None);

        let origin_root = root
            .join("/")
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid root URL '{}': {}", root, e)))?;

        let exclusions = exclusions
            .into_iter()
            .filter(|pattern| !pattern.is_empty())
            .collect();

        Ok(Self {
            root,
            origin_root,
            exclusions,
        })
    }

    /// The crawl root
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// `scheme://host[:port]/` of the crawl root
    pub fn origin_root(&self) -> &Url {
        &self.origin_root
    }

    /// Returns true if `url` has the same scheme, host and port as the root
    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.root.origin()
    }

    /// Canonicalizes a raw hyperlink reference found on `page`
    ///
    /// # Rules
    ///
    /// 1. Trim the reference and drop everything from the first `#`
    /// 2. Resolve it:
    ///    - a reference with a scheme is already absolute
    ///    - a reference starting with `/` resolves against the root's origin
    ///    - anything else resolves against the directory of `page`'s path
    ///      (the path up to and including its last `/`)
    /// 3. Reject the origin root and the crawl root itself
    /// 4. Reject ignored extensions (images, scripts, archives, documents)
    /// 5. Reject other origins
    /// 6. Reject URLs containing an exclusion substring
    ///
    /// Malformed references are rejections, never errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitepress::url::CrawlScope;
    /// use url::Url;
    ///
    /// let scope = CrawlScope::new("https://site.example/docs/", vec![]).unwrap();
    /// let page = Url::parse("https://site.example/docs/a/").unwrap();
    ///
    /// let url = scope.canonicalize("b", &page).unwrap();
    /// assert_eq!(url.as_str(), "https://site.example/docs/a/b");
    /// ```
    pub fn canonicalize(&self, reference: &str, page: &Url) -> Result<Url, Rejection> {
        let trimmed = reference.trim();
        if trimmed.starts_with('#') {
            return Err(Rejection::FragmentOnly);
        }

        let without_fragment = match trimmed.find('#') {
            Some(index) => &trimmed[..index],
            None => trimmed,
        };
        if without_fragment.is_empty() {
            return Err(Rejection::Empty);
        }

        let mut resolved = self.resolve(without_fragment, page)?;
        resolved.set_fragment(None);

        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            return Err(Rejection::UnsupportedScheme(resolved.scheme().to_string()));
        }

        if resolved == self.origin_root || resolved == self.root {
            return Err(Rejection::SelfReference);
        }

        if let Some(extension) = ignored_extension(&resolved) {
            return Err(Rejection::IgnoredExtension(extension));
        }

        if !self.is_same_origin(&resolved) {
            return Err(Rejection::CrossOrigin(
                resolved.origin().ascii_serialization(),
            ));
        }

        if let Some(pattern) = self
            .exclusions
            .iter()
            .find(|pattern| resolved.as_str().contains(pattern.as_str()))
        {
            return Err(Rejection::Excluded(pattern.clone()));
        }

        Ok(resolved)
    }

    /// Resolves a fragment-free, non-empty reference to an absolute URL
    fn resolve(&self, reference: &str, page: &Url) -> Result<Url, Rejection> {
        match Url::parse(reference) {
            Ok(absolute) => Ok(absolute),
            Err(ParseError::RelativeUrlWithoutBase) => {
                let base = if reference.starts_with('/') {
                    self.origin_root.clone()
                } else {
                    page_directory(page)
                };
                base.join(reference)
                    .map_err(|e| Rejection::Malformed(format!("{}: {}", reference, e)))
            }
            Err(e) => Err(Rejection::Malformed(format!("{}: {}", reference, e))),
        }
    }
}

/// The page URL truncated to the directory of its path, without query
fn page_directory(page: &Url) -> Url {
    let mut directory = page.clone();
    let path = page.path();
    let cut = path.rfind('/').map(|index| &path[..=index]).unwrap_or("/");
    directory.set_path(cut);
    directory.set_query(None);
    directory.set_fragment(None);
    directory
}
