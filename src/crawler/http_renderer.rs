use crate::config::Config;
use crate::crawler::capture::build_snapshot;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult};
use crate::crawler::parser::parse_html;
use crate::crawler::renderer::{CaptureOptions, PageHandle, RenderResult, Renderer};
use crate::PressError;
use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Renderer that loads pages over HTTP and captures HTML snapshots
///
/// Every render parses its own document, so concurrent renders share nothing
/// but the connection pool.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    /// Creates a renderer from the crawl configuration
    pub fn new(config: &Config) -> Result<Self, PressError> {
        let timeout = Duration::from_secs(config.crawler.navigation_timeout);
        let client = build_http_client(&config.user_agent, timeout)?;
        Ok(Self { client })
    }

    /// Creates a renderer around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render(&self, url: &Url) -> RenderResult {
        let fetched = fetch_url(&self.client, url.as_str()).await;
        let (final_url, status_code, body) = match fetched {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => (final_url, status_code, body),
            failure => return RenderResult::failed(failure.to_string()),
        };

        if final_url != url.as_str() {
            tracing::debug!("{} redirected to {}", url, final_url);
        }

        let parsed = parse_html(&body);
        if let Some(selector) = parsed.dismissed_overlay {
            tracing::debug!("Dismissed consent overlay {} on {}", selector, url);
        }
        tracing::trace!(
            "Rendered {} (HTTP {}, {} links)",
            url,
            status_code,
            parsed.links.len()
        );

        let page = PageHandle {
            url: url.clone(),
            title: parsed.title,
            html: parsed.html,
        };
        RenderResult::opened(page, parsed.links)
    }

    async fn capture(
        &self,
        page: &PageHandle,
        output: &Path,
        options: &CaptureOptions,
    ) -> Result<(), PressError> {
        let snapshot = build_snapshot(page, options, chrono::Utc::now());

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| PressError::Capture {
                        path: output.display().to_string(),
                        message: e.to_string(),
                    })?;
            }
        }

        tokio::fs::write(output, snapshot)
            .await
            .map_err(|e| PressError::Capture {
                path: output.display().to_string(),
                message: e.to_string(),
            })
    }
}
