//! The rendering collaborator seen by the coordinator
//!
//! The coordinator never talks to the network or the filesystem directly: it
//! asks a [`Renderer`] to open a page and later to capture it.

use crate::config::{CaptureConfig, ColorScheme, Media};
use crate::PressError;
use async_trait::async_trait;
use std::path::Path;
use url::Url;

/// A page that was opened successfully and can be captured
#[derive(Debug, Clone)]
pub struct PageHandle {
    /// The URL that was navigated to
    pub url: Url,

    /// Page title, if the page has one
    pub title: Option<String>,

    /// Settled page markup with consent overlays already dismissed
    pub html: String,
}

/// Outcome of opening one page
#[derive(Debug, Clone, Default)]
pub struct RenderResult {
    /// Raw `href` values found on the page, as written
    pub links: Vec<String>,

    /// The opened page; `None` when navigation failed
    pub page: Option<PageHandle>,

    /// Why navigation failed, when it did
    pub failure: Option<String>,
}

impl RenderResult {
    /// A successful render
    pub fn opened(page: PageHandle, links: Vec<String>) -> Self {
        Self {
            links,
            page: Some(page),
            failure: None,
        }
    }

    /// A failed navigation: no links, nothing to capture
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            links: Vec::new(),
            page: None,
            failure: Some(reason.into()),
        }
    }

    /// Returns true if navigation succeeded
    pub fn ok(&self) -> bool {
        self.page.is_some()
    }
}

/// Presentation options applied when capturing a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureOptions {
    pub media: Media,
    pub color_scheme: ColorScheme,
    pub header_footer: bool,
}

impl From<&CaptureConfig> for CaptureOptions {
    fn from(config: &CaptureConfig) -> Self {
        Self {
            media: config.media,
            color_scheme: config.color_scheme,
            header_footer: config.header_footer,
        }
    }
}

/// Opens pages and captures them as artifacts
///
/// Implementations must give every `render` call its own isolated page so
/// concurrent renders do not observe each other's state.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Navigates to `url`, waits for it to settle, dismisses consent overlays
    /// on a best-effort basis and collects outbound links
    ///
    /// Navigation failures are reported through [`RenderResult::failed`],
    /// never as errors.
    async fn render(&self, url: &Url) -> RenderResult;

    /// Persists an artifact for an already rendered page at `output`
    async fn capture(
        &self,
        page: &PageHandle,
        output: &Path,
        options: &CaptureOptions,
    ) -> Result<(), PressError>;
}
